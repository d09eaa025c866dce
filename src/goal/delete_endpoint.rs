//! Defines the endpoint for deleting a savings goal.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{AppState, Error, database_id::GoalId, goal::core::delete_goal, user::UserId};

/// The state needed to delete a goal.
#[derive(Debug, Clone)]
pub struct DeleteGoalState {
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteGoalState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a goal, responds with 204 No Content on success.
pub async fn delete_goal_endpoint(
    State(state): State<DeleteGoalState>,
    user_id: UserId,
    Path(goal_id): Path<GoalId>,
) -> Result<StatusCode, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    delete_goal(goal_id, &user_id, &connection)
        .inspect_err(|error| tracing::debug!("could not delete goal {goal_id}: {error}"))?;

    Ok(StatusCode::NO_CONTENT)
}
