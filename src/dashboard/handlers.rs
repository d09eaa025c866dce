//! Dashboard HTTP handlers.
//!
//! This module contains:
//! - The state shared by the report handlers
//! - The route handler for the dashboard overview

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::Serialize;
use time_tz::Tz;

use crate::{
    AppState, Error,
    goal::{get_goals, with_progress},
    reporting::{GoalProgress, MonthlySummary, Totals, bucket_by_month, compute_totals},
    timezone::get_timezone,
    transaction::get_transactions,
    user::UserId,
};

/// The state needed for the report handlers.
///
/// Contains the database connection and timezone information required
/// by dashboard handlers.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading transactions and goals.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

impl DashboardState {
    /// The reporting timezone.
    pub(crate) fn timezone(&self) -> Result<&'static Tz, Error> {
        get_timezone(&self.local_timezone).ok_or_else(|| {
            tracing::error!("Invalid timezone {}", self.local_timezone);
            Error::InvalidTimezoneError(self.local_timezone.clone())
        })
    }
}

/// Everything the dashboard shows.
#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    /// All-time income, expense and balance.
    pub totals: Totals,
    /// Income and expenses per calendar month, January to December.
    pub monthly: Vec<MonthlySummary>,
    /// The user's goals, newest first, with their progress.
    pub goals: Vec<GoalProgress>,
}

/// A route handler for the dashboard overview.
pub async fn get_dashboard_endpoint(
    State(state): State<DashboardState>,
    user_id: UserId,
) -> Result<Json<DashboardSummary>, Error> {
    let timezone = state.timezone()?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transactions = get_transactions(&user_id, None, &connection)?;
    let goals = get_goals(&user_id, &connection)?;
    drop(connection);

    Ok(Json(DashboardSummary {
        totals: compute_totals(&transactions),
        monthly: bucket_by_month(&transactions, timezone),
        goals: with_progress(goals),
    }))
}
