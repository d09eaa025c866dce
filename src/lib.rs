//! Finance Tracker is a JSON API for tracking personal income, expenses and
//! savings goals.
//!
//! Users are authenticated by an upstream identity provider which forwards the
//! user's ID in the `x-user-id` header. This library stores each user's
//! transactions and goals in SQLite and serves the summaries used for charts:
//! running totals, month-bucketed income and expense series, weekly category
//! breakdowns and goal progress.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod goal;
mod logging;
mod reporting;
mod routing;
mod timezone;
mod transaction;
mod user;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use goal::{Goal, GoalBuilder, GoalChanges};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use reporting::{
    GoalProgress, MonthlySummary, Totals, WeekWindow, bucket_by_month, category_totals,
    compute_totals, current_week_window, progress_ratio, week_window, weekly_category_totals,
};
pub use routing::build_router;
pub use timezone::get_timezone;
pub use transaction::{Transaction, TransactionBuilder, TransactionChanges, TransactionType};
pub use user::UserId;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request did not carry the ID of an authenticated user.
    ///
    /// Authentication happens upstream, so this usually means the request
    /// bypassed the gateway.
    #[error("the request is missing the authenticated user ID")]
    MissingUserId,

    /// An empty string was used as the title of a transaction or goal.
    #[error("title cannot be empty")]
    EmptyTitle,

    /// A transaction amount was negative or not a finite number.
    #[error("{0} is not a valid amount, amounts must be zero or greater")]
    InvalidAmount(f64),

    /// The category does not belong to the vocabulary of the transaction type.
    #[error("\"{category}\" is not a valid {transaction_type} category")]
    InvalidCategory {
        /// The type of the transaction the category was given for.
        transaction_type: transaction::TransactionType,
        /// The rejected category.
        category: String,
    },

    /// A timestamp could not be converted to or from its stored form.
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// A goal's target amount was zero, negative or not a finite number.
    ///
    /// Progress towards such a goal is undefined, so this is treated as a
    /// data-entry error rather than producing an infinite ratio.
    #[error("{0} is not a valid goal target, targets must be greater than zero")]
    InvalidGoalTarget(f64),

    /// A goal's current amount was negative or not a finite number.
    #[error("{0} is not a valid goal amount, amounts must be zero or greater")]
    InvalidGoalAmount(f64),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Tried to update a goal that does not exist
    #[error("tried to update a goal that is not in the database")]
    UpdateMissingGoal,

    /// Tried to delete a goal that does not exist
    #[error("tried to delete a goal that is not in the database")]
    DeleteMissingGoal,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::MissingUserId => StatusCode::UNAUTHORIZED,
            Error::EmptyTitle
            | Error::InvalidAmount(_)
            | Error::InvalidCategory { .. }
            | Error::InvalidDate(_)
            | Error::InvalidGoalTarget(_)
            | Error::InvalidGoalAmount(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::NotFound
            | Error::UpdateMissingTransaction
            | Error::DeleteMissingTransaction
            | Error::UpdateMissingGoal
            | Error::DeleteMissingGoal => StatusCode::NOT_FOUND,
            Error::InvalidTimezoneError(_) | Error::SqlError(_) | Error::DatabaseLockError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            // Internal details are only meant for the server logs.
            tracing::error!("An unexpected error occurred: {}", self);
            "An unexpected error occurred, check the server logs for more details.".to_owned()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
