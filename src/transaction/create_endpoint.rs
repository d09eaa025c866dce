//! Defines the endpoint for creating a new transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::{StatusCode, header::LOCATION},
    response::IntoResponse,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    endpoints::{self, format_endpoint},
    transaction::{Transaction, TransactionType, core::create_transaction},
    user::UserId,
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for creating a transaction.
#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionForm {
    /// Whether the transaction is an income or an expense.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// A short name for the transaction.
    pub title: String,
    /// The value of the transaction in dollars.
    pub amount: f64,
    /// The category, which must suit the transaction type.
    pub category: String,
    /// Optional notes.
    #[serde(default)]
    pub note: Option<String>,
    /// When the transaction happened, defaults to now.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
}

/// A route handler for creating a new transaction, responds with the created
/// transaction, its location and the status code 201 Created.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    user_id: UserId,
    Json(form): Json<TransactionForm>,
) -> Result<impl IntoResponse, Error> {
    let builder = Transaction::build(
        form.transaction_type,
        &form.title,
        form.amount,
        &form.category,
    )
    .note(form.note)
    .created_at(form.created_at);

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = create_transaction(builder, &user_id, &connection)
        .inspect_err(|error| tracing::debug!("could not create transaction: {error}"))?;

    tracing::info!(
        "user {user_id} recorded {} transaction {}",
        transaction.transaction_type,
        transaction.id
    );

    let location = format_endpoint(endpoints::TRANSACTION, transaction.id);

    Ok((StatusCode::CREATED, [(LOCATION, location)], Json(transaction)))
}
