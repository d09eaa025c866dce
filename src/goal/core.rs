//! Defines the savings goal model and its database queries.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    database_id::GoalId,
    db::{format_timestamp, parse_stored_timestamp},
    transaction::{normalize_note, round_to_cents, validate_title},
    user::UserId,
};

// ============================================================================
// MODELS
// ============================================================================

/// An amount of money a user is saving towards, e.g. a holiday.
///
/// To create a new `Goal`, use [Goal::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    /// The ID of the goal.
    pub id: GoalId,
    /// The user saving towards the goal.
    pub user_id: UserId,
    /// What the user is saving for.
    pub title: String,
    /// The amount to save, always greater than zero.
    pub target_amount: f64,
    /// The amount saved so far.
    pub current_amount: f64,
    /// Free text notes about the goal.
    pub note: Option<String>,
    /// When the goal was set.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
}

impl Goal {
    /// Create a new goal.
    ///
    /// Shortcut for [GoalBuilder] for discoverability.
    pub fn build(title: &str, target_amount: f64, current_amount: f64) -> GoalBuilder {
        GoalBuilder {
            title: title.to_owned(),
            target_amount,
            current_amount,
            note: None,
            created_at: None,
        }
    }
}

/// A builder for creating [Goal] instances, validated by [create_goal].
#[derive(Debug, PartialEq, Clone)]
pub struct GoalBuilder {
    /// What the user is saving for. Must not be empty.
    pub title: String,
    /// The amount to save. Must be greater than zero after rounding to cents.
    pub target_amount: f64,
    /// The amount saved so far. Must be zero or greater.
    pub current_amount: f64,
    /// Optional free text notes.
    pub note: Option<String>,
    /// When the goal was set. Defaults to the current time.
    pub created_at: Option<OffsetDateTime>,
}

impl GoalBuilder {
    /// Set the note for the goal.
    pub fn note(mut self, note: Option<String>) -> Self {
        self.note = note;
        self
    }

    /// Set when the goal was set.
    pub fn created_at(mut self, created_at: Option<OffsetDateTime>) -> Self {
        self.created_at = created_at;
        self
    }
}

/// The fields of a goal that may be changed after it is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalChanges {
    /// The new title.
    pub title: String,
    /// The new target amount.
    pub target_amount: f64,
    /// The new amount saved so far.
    pub current_amount: f64,
    /// The new note.
    #[serde(default)]
    pub note: Option<String>,
}

fn validate_target(target_amount: f64) -> Result<f64, Error> {
    let rounded = round_to_cents(target_amount);

    if rounded.is_finite() && rounded > 0.0 {
        Ok(rounded)
    } else {
        Err(Error::InvalidGoalTarget(target_amount))
    }
}

fn validate_current(current_amount: f64) -> Result<f64, Error> {
    let rounded = round_to_cents(current_amount);

    if current_amount >= 0.0 && rounded.is_finite() {
        Ok(rounded)
    } else {
        Err(Error::InvalidGoalAmount(current_amount))
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const GOAL_COLUMNS: &str = "id, user_id, title, target_amount, current_amount, note, created_at";

/// Create a new goal for `user_id` in the database from a builder.
///
/// # Errors
/// This function will return a:
/// - [Error::EmptyTitle] if the title is blank,
/// - [Error::InvalidGoalTarget] if the target is not greater than zero,
/// - [Error::InvalidGoalAmount] if the current amount is negative or not finite,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_goal(
    builder: GoalBuilder,
    user_id: &UserId,
    connection: &Connection,
) -> Result<Goal, Error> {
    let title = validate_title(&builder.title)?;
    let target_amount = validate_target(builder.target_amount)?;
    let current_amount = validate_current(builder.current_amount)?;
    let note = normalize_note(builder.note);
    let created_at =
        format_timestamp(builder.created_at.unwrap_or_else(OffsetDateTime::now_utc))?;

    let goal = connection
        .prepare(&format!(
            "INSERT INTO goal (user_id, title, target_amount, current_amount, note, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING {GOAL_COLUMNS}"
        ))?
        .query_row(
            (
                user_id.as_ref(),
                title,
                target_amount,
                current_amount,
                note,
                created_at,
            ),
            map_goal_row,
        )?;

    Ok(goal)
}

/// Retrieve one of `user_id`'s goals by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a goal owned by `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_goal(id: GoalId, user_id: &UserId, connection: &Connection) -> Result<Goal, Error> {
    let goal = connection
        .prepare(&format!(
            "SELECT {GOAL_COLUMNS} FROM goal WHERE id = ?1 AND user_id = ?2"
        ))?
        .query_row((id, user_id.as_ref()), map_goal_row)?;

    Ok(goal)
}

/// Retrieve all of `user_id`'s goals, newest first.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_goals(user_id: &UserId, connection: &Connection) -> Result<Vec<Goal>, Error> {
    let mut statement = connection.prepare(&format!(
        "SELECT {GOAL_COLUMNS} FROM goal
         WHERE user_id = ?1
         ORDER BY created_at IS NULL, created_at DESC, id DESC"
    ))?;

    statement
        .query_map((user_id.as_ref(),), map_goal_row)?
        .map(|maybe_goal| maybe_goal.map_err(Error::from))
        .collect()
}

/// Update the title, amounts and note of one of `user_id`'s goals.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingGoal] if `id` does not refer to a goal owned by `user_id`,
/// - [Error::EmptyTitle], [Error::InvalidGoalTarget] or [Error::InvalidGoalAmount] for invalid changes,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_goal(
    id: GoalId,
    user_id: &UserId,
    changes: GoalChanges,
    connection: &Connection,
) -> Result<Goal, Error> {
    let title = validate_title(&changes.title)?;
    let target_amount = validate_target(changes.target_amount)?;
    let current_amount = validate_current(changes.current_amount)?;
    let note = normalize_note(changes.note);

    connection
        .prepare(&format!(
            "UPDATE goal SET title = ?1, target_amount = ?2, current_amount = ?3, note = ?4
             WHERE id = ?5 AND user_id = ?6
             RETURNING {GOAL_COLUMNS}"
        ))?
        .query_row(
            (
                title,
                target_amount,
                current_amount,
                note,
                id,
                user_id.as_ref(),
            ),
            map_goal_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingGoal,
            error => error.into(),
        })
}

/// Delete one of `user_id`'s goals.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingGoal] if `id` does not refer to a goal owned by `user_id`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_goal(id: GoalId, user_id: &UserId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM goal WHERE id = ?1 AND user_id = ?2",
        (id, user_id.as_ref()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingGoal);
    }

    Ok(())
}

/// Create the goal table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_goal_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS goal (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                title TEXT NOT NULL,
                target_amount REAL NOT NULL CHECK (target_amount > 0),
                current_amount REAL NOT NULL CHECK (current_amount >= 0),
                note TEXT,
                created_at TEXT
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_goal_user_created_at ON goal(user_id, created_at);",
        (),
    )?;

    Ok(())
}

fn map_goal_row(row: &Row) -> Result<Goal, rusqlite::Error> {
    let id = row.get(0)?;
    let user_id: String = row.get(1)?;
    let created_at: Option<String> = row.get(6)?;

    let created_at = created_at.as_deref().and_then(|text| {
        let parsed = parse_stored_timestamp(text);
        if parsed.is_none() {
            tracing::warn!("goal {id} has a malformed date {text:?}, treating it as undated");
        }
        parsed
    });

    Ok(Goal {
        id,
        user_id: UserId::new_unchecked(&user_id),
        title: row.get(2)?,
        target_amount: row.get(3)?,
        current_amount: row.get(4)?,
        note: row.get(5)?,
        created_at,
    })
}

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::datetime;

    use crate::{
        Error,
        db::initialize,
        goal::{Goal, GoalChanges, create_goal, delete_goal, get_goal, get_goals, update_goal},
        user::UserId,
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn test_user() -> UserId {
        UserId::new_unchecked("user-1")
    }

    #[test]
    fn create_succeeds() {
        let conn = get_test_connection();

        let goal = create_goal(
            Goal::build("Holiday", 500.0, 125.0)
                .note(Some("Japan".to_owned()))
                .created_at(Some(datetime!(2024-01-01 00:00 UTC))),
            &test_user(),
            &conn,
        )
        .unwrap();

        assert_eq!(goal.id, 1);
        assert_eq!(goal.title, "Holiday");
        assert_eq!(goal.target_amount, 500.0);
        assert_eq!(goal.current_amount, 125.0);
        assert_eq!(goal.note.as_deref(), Some("Japan"));
        assert_eq!(goal.created_at, Some(datetime!(2024-01-01 00:00 UTC)));
    }

    #[test]
    fn create_fails_on_zero_target() {
        let conn = get_test_connection();

        let result = create_goal(Goal::build("Holiday", 0.0, 10.0), &test_user(), &conn);

        assert_eq!(result, Err(Error::InvalidGoalTarget(0.0)));
    }

    #[test]
    fn create_fails_on_target_that_rounds_to_zero() {
        let conn = get_test_connection();

        let result = create_goal(Goal::build("Holiday", 0.001, 0.0), &test_user(), &conn);

        assert_eq!(result, Err(Error::InvalidGoalTarget(0.001)));
    }

    #[test]
    fn create_fails_on_negative_current_amount() {
        let conn = get_test_connection();

        let result = create_goal(Goal::build("Holiday", 100.0, -1.0), &test_user(), &conn);

        assert_eq!(result, Err(Error::InvalidGoalAmount(-1.0)));
    }

    #[test]
    fn create_fails_on_current_amount_too_large_to_round() {
        let conn = get_test_connection();

        let result = create_goal(Goal::build("Holiday", 100.0, 1e307), &test_user(), &conn);

        assert_eq!(result, Err(Error::InvalidGoalAmount(1e307)));
        assert!(get_goals(&test_user(), &conn).unwrap().is_empty());
    }

    #[test]
    fn update_fails_on_current_amount_too_large_to_round() {
        let conn = get_test_connection();
        let goal = create_goal(Goal::build("Holiday", 500.0, 125.0), &test_user(), &conn).unwrap();

        let result = update_goal(
            goal.id,
            &test_user(),
            GoalChanges {
                title: "Holiday".to_owned(),
                target_amount: 500.0,
                current_amount: f64::MAX,
                note: None,
            },
            &conn,
        );

        assert_eq!(result, Err(Error::InvalidGoalAmount(f64::MAX)));
        assert_eq!(get_goal(goal.id, &test_user(), &conn), Ok(goal));
    }

    #[test]
    fn create_fails_on_empty_title() {
        let conn = get_test_connection();

        let result = create_goal(Goal::build("", 100.0, 1.0), &test_user(), &conn);

        assert_eq!(result, Err(Error::EmptyTitle));
    }

    #[test]
    fn get_goals_lists_newest_first_for_user() {
        let conn = get_test_connection();
        for (title, created_at) in [
            ("Car", datetime!(2024-01-01 00:00 UTC)),
            ("House", datetime!(2024-06-01 00:00 UTC)),
        ] {
            create_goal(
                Goal::build(title, 1000.0, 0.0).created_at(Some(created_at)),
                &test_user(),
                &conn,
            )
            .unwrap();
        }
        create_goal(
            Goal::build("Someone else's", 10.0, 0.0),
            &UserId::new_unchecked("user-2"),
            &conn,
        )
        .unwrap();

        let titles: Vec<String> = get_goals(&test_user(), &conn)
            .unwrap()
            .into_iter()
            .map(|goal| goal.title)
            .collect();

        assert_eq!(titles, vec!["House", "Car"]);
    }

    #[test]
    fn update_changes_amounts() {
        let conn = get_test_connection();
        let goal = create_goal(Goal::build("Holiday", 500.0, 125.0), &test_user(), &conn).unwrap();

        let updated = update_goal(
            goal.id,
            &test_user(),
            GoalChanges {
                title: "Big holiday".to_owned(),
                target_amount: 800.0,
                current_amount: 200.0,
                note: None,
            },
            &conn,
        )
        .unwrap();

        assert_eq!(updated.title, "Big holiday");
        assert_eq!(updated.target_amount, 800.0);
        assert_eq!(updated.current_amount, 200.0);
        assert_eq!(updated.created_at, goal.created_at);
    }

    #[test]
    fn update_rejects_zero_target() {
        let conn = get_test_connection();
        let goal = create_goal(Goal::build("Holiday", 500.0, 125.0), &test_user(), &conn).unwrap();

        let result = update_goal(
            goal.id,
            &test_user(),
            GoalChanges {
                title: "Holiday".to_owned(),
                target_amount: 0.0,
                current_amount: 125.0,
                note: None,
            },
            &conn,
        );

        assert_eq!(result, Err(Error::InvalidGoalTarget(0.0)));
        assert_eq!(get_goal(goal.id, &test_user(), &conn), Ok(goal));
    }

    #[test]
    fn update_fails_on_missing_goal() {
        let conn = get_test_connection();

        let result = update_goal(
            3,
            &test_user(),
            GoalChanges {
                title: "Holiday".to_owned(),
                target_amount: 10.0,
                current_amount: 0.0,
                note: None,
            },
            &conn,
        );

        assert_eq!(result, Err(Error::UpdateMissingGoal));
    }

    #[test]
    fn delete_is_scoped_to_user() {
        let conn = get_test_connection();
        let goal = create_goal(Goal::build("Holiday", 500.0, 125.0), &test_user(), &conn).unwrap();

        let other = delete_goal(goal.id, &UserId::new_unchecked("user-2"), &conn);
        let own = delete_goal(goal.id, &test_user(), &conn);

        assert_eq!(other, Err(Error::DeleteMissingGoal));
        assert_eq!(own, Ok(()));
        assert_eq!(get_goal(goal.id, &test_user(), &conn), Err(Error::NotFound));
    }
}
