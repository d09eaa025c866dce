//! The weekly category report behind the income and expense views.

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    dashboard::handlers::DashboardState,
    reporting::{WeekWindow, category_totals, local_midnight, week_window},
    transaction::{TransactionType, get_transactions},
    user::UserId,
};

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// Query parameters for the weekly report.
#[derive(Debug, Deserialize)]
pub struct WeeklyReportQuery {
    /// Only include transactions of this type. All types if omitted.
    #[serde(default, rename = "type")]
    pub transaction_type: Option<TransactionType>,
    /// Report on the week containing this date instead of the current week.
    #[serde(default, with = "iso_date::option")]
    pub anchor: Option<Date>,
}

/// The spending or earnings of one week, by category.
#[derive(Debug, Serialize)]
pub struct WeeklyReport {
    /// The week the report covers.
    #[serde(flatten)]
    pub window: WeekWindow,
    /// The sum over all categories.
    pub total: f64,
    /// Category name to the amount in the week. Categories without any
    /// transactions in the week are left out.
    pub categories: BTreeMap<String, f64>,
}

/// A route handler for the per-category totals of one Monday-based week.
pub async fn get_weekly_report_endpoint(
    State(state): State<DashboardState>,
    user_id: UserId,
    Query(query): Query<WeeklyReportQuery>,
) -> Result<Json<WeeklyReport>, Error> {
    let timezone = state.timezone()?;
    let now = match query.anchor {
        Some(anchor) => local_midnight(anchor, timezone),
        None => OffsetDateTime::now_utc(),
    };
    let window = week_window(now, timezone);

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transactions = get_transactions(&user_id, query.transaction_type, &connection)?;
    drop(connection);

    let categories = category_totals(&transactions, window);
    let total = categories.values().sum();

    Ok(Json(WeeklyReport {
        window,
        total,
        categories,
    }))
}
