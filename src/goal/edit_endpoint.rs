//! Defines the endpoint for editing a savings goal.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::GoalId,
    goal::{Goal, GoalChanges, core::update_goal},
    user::UserId,
};

/// The state needed to edit a goal.
#[derive(Debug, Clone)]
pub struct EditGoalState {
    /// The database connection for managing goals.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditGoalState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for changing a goal, responds with the updated goal.
pub async fn edit_goal_endpoint(
    State(state): State<EditGoalState>,
    user_id: UserId,
    Path(goal_id): Path<GoalId>,
    Json(changes): Json<GoalChanges>,
) -> Result<Json<Goal>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let goal = update_goal(goal_id, &user_id, changes, &connection)
        .inspect_err(|error| tracing::debug!("could not update goal {goal_id}: {error}"))?;

    Ok(Json(goal))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Json,
        extract::{Path, State},
    };
    use rusqlite::Connection;

    use crate::{
        Error,
        db::initialize,
        goal::{Goal, GoalChanges, create_goal, edit_endpoint::EditGoalState, edit_goal_endpoint},
        user::UserId,
    };

    fn get_test_state() -> (EditGoalState, Goal) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let goal = create_goal(
            Goal::build("Laptop", 1500.0, 300.0),
            &UserId::new_unchecked("user-1"),
            &connection,
        )
        .unwrap();

        (
            EditGoalState {
                db_connection: Arc::new(Mutex::new(connection)),
            },
            goal,
        )
    }

    #[tokio::test]
    async fn edits_goal() {
        let (state, goal) = get_test_state();
        let changes = GoalChanges {
            title: "Laptop".to_owned(),
            target_amount: 1500.0,
            current_amount: 750.0,
            note: Some("Halfway".to_owned()),
        };

        let Json(updated) = edit_goal_endpoint(
            State(state),
            UserId::new_unchecked("user-1"),
            Path(goal.id),
            Json(changes),
        )
        .await
        .unwrap();

        assert_eq!(updated.current_amount, 750.0);
        assert_eq!(updated.note.as_deref(), Some("Halfway"));
    }

    #[tokio::test]
    async fn other_users_cannot_edit_goal() {
        let (state, goal) = get_test_state();
        let changes = GoalChanges {
            title: "Mine".to_owned(),
            target_amount: 1.0,
            current_amount: 0.0,
            note: None,
        };

        let result = edit_goal_endpoint(
            State(state),
            UserId::new_unchecked("user-2"),
            Path(goal.id),
            Json(changes),
        )
        .await;

        assert_eq!(result.map(|Json(goal)| goal), Err(Error::UpdateMissingGoal));
    }
}
