//! Defines the endpoint for creating a new savings goal.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::{StatusCode, header::LOCATION},
    response::IntoResponse,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    endpoints::{self, format_endpoint},
    goal::{Goal, core::create_goal},
    user::UserId,
};

/// The state needed to create a goal.
#[derive(Debug, Clone)]
pub struct CreateGoalState {
    /// The database connection for managing goals.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateGoalState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for creating a goal.
#[derive(Debug, Serialize, Deserialize)]
pub struct GoalForm {
    /// What the user is saving for.
    pub title: String,
    /// The amount to save.
    pub target_amount: f64,
    /// The amount saved so far.
    #[serde(default)]
    pub current_amount: f64,
    /// Optional notes.
    #[serde(default)]
    pub note: Option<String>,
}

/// A route handler for creating a new goal, responds with the created goal,
/// its location and the status code 201 Created.
pub async fn create_goal_endpoint(
    State(state): State<CreateGoalState>,
    user_id: UserId,
    Json(form): Json<GoalForm>,
) -> Result<impl IntoResponse, Error> {
    let builder = Goal::build(&form.title, form.target_amount, form.current_amount).note(form.note);

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let goal = create_goal(builder, &user_id, &connection)
        .inspect_err(|error| tracing::debug!("could not create goal: {error}"))?;

    tracing::info!("user {user_id} set goal {}", goal.id);

    let location = format_endpoint(endpoints::GOAL, goal.id);

    Ok((StatusCode::CREATED, [(LOCATION, location)], Json(goal)))
}
