//! Defines the endpoints for reading and editing a single transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::TransactionId,
    transaction::{
        Transaction, TransactionChanges,
        core::{get_transaction, update_transaction},
    },
    user::UserId,
};

/// The state needed to edit a transaction.
#[derive(Debug, Clone)]
pub struct EditTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for getting one of the user's transactions.
pub async fn get_transaction_endpoint(
    State(state): State<EditTransactionState>,
    user_id: UserId,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Json<Transaction>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_transaction(transaction_id, &user_id, &connection).map(Json)
}

/// A route handler for changing the title, amount, category or note of a
/// transaction, responds with the updated transaction.
///
/// The type of a transaction cannot be changed.
pub async fn edit_transaction_endpoint(
    State(state): State<EditTransactionState>,
    user_id: UserId,
    Path(transaction_id): Path<TransactionId>,
    Json(changes): Json<TransactionChanges>,
) -> Result<Json<Transaction>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = update_transaction(transaction_id, &user_id, changes, &connection)
        .inspect_err(|error| {
            tracing::debug!("could not update transaction {transaction_id}: {error}")
        })?;

    Ok(Json(transaction))
}
