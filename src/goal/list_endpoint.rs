//! Defines the endpoint for listing savings goals with their progress.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    goal::{Goal, core::get_goals},
    reporting::GoalProgress,
    user::UserId,
};

/// The state needed to list goals.
#[derive(Debug, Clone)]
pub struct ListGoalsState {
    /// The database connection for managing goals.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListGoalsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Pair each goal with its progress ratio.
///
/// Goals whose progress is undefined, e.g. a stored target of zero, are
/// logged and left out.
pub(crate) fn with_progress(goals: Vec<Goal>) -> Vec<GoalProgress> {
    goals
        .into_iter()
        .filter_map(|goal| {
            let id = goal.id;
            GoalProgress::new(goal)
                .inspect_err(|error| tracing::warn!("skipping goal {id}: {error}"))
                .ok()
        })
        .collect()
}

/// A route handler for listing the user's goals, newest first, with their progress.
pub async fn get_goals_endpoint(
    State(state): State<ListGoalsState>,
    user_id: UserId,
) -> Result<Json<Vec<GoalProgress>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let goals = get_goals(&user_id, &connection)?;

    Ok(Json(with_progress(goals)))
}
