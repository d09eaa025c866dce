//! Defines the core data models and database queries for transactions.

use std::fmt::Display;

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    database_id::TransactionId,
    db::{format_timestamp, parse_stored_timestamp},
    user::UserId,
};

// ============================================================================
// MODELS
// ============================================================================

/// Whether money was earned or spent.
///
/// The type of a transaction is fixed when it is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money earned, e.g. a salary payment.
    Income,
    /// Money spent, e.g. groceries.
    Expense,
}

impl TransactionType {
    /// The name of the type as stored in the database and sent over the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(FromSqlError::Other(
                format!("unknown transaction type \"{other}\"").into(),
            )),
        }
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The user that recorded the transaction.
    pub user_id: UserId,
    /// Whether the transaction is an income or an expense.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// A short name for the transaction, e.g. "March rent".
    pub title: String,
    /// The amount of money spent or earned, never negative.
    pub amount: f64,
    /// The category the transaction is filed under, e.g. "Food".
    pub category: String,
    /// Free text notes about the transaction.
    pub note: Option<String>,
    /// When the transaction happened.
    ///
    /// Transactions without a date are left out of every time-bucketed summary.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        transaction_type: TransactionType,
        title: &str,
        amount: f64,
        category: &str,
    ) -> TransactionBuilder {
        TransactionBuilder {
            transaction_type,
            title: title.to_owned(),
            amount,
            category: category.to_owned(),
            note: None,
            created_at: None,
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// The builder is validated when it is passed to [create_transaction].
///
/// # Examples
///
/// ```ignore
/// use time::macros::datetime;
///
/// use crate::transaction::{Transaction, TransactionType};
///
/// let transaction = Transaction::build(TransactionType::Expense, "Groceries", 45.99, "Food")
///     .note(Some("Weekly shop".to_owned()))
///     .created_at(Some(datetime!(2025-01-15 10:30 UTC)));
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// Whether the transaction is an income or an expense.
    pub transaction_type: TransactionType,

    /// A short name for the transaction. Must not be empty.
    pub title: String,

    /// The amount of money spent or earned.
    ///
    /// Must be zero or greater, the direction of the money is given by
    /// `transaction_type`. Amounts are rounded to the nearest cent.
    pub amount: f64,

    /// The category, which must be one of [TransactionType::categories].
    pub category: String,

    /// Optional free text notes. Blank notes are stored as `None`.
    pub note: Option<String>,

    /// When the transaction happened. Defaults to the current time.
    pub created_at: Option<OffsetDateTime>,
}

impl TransactionBuilder {
    /// Set the note for the transaction.
    pub fn note(mut self, note: Option<String>) -> Self {
        self.note = note;
        self
    }

    /// Set the date and time the transaction happened.
    pub fn created_at(mut self, created_at: Option<OffsetDateTime>) -> Self {
        self.created_at = created_at;
        self
    }
}

/// The fields of a transaction that may be changed after it is created.
///
/// The transaction type is deliberately absent, a transaction cannot switch
/// between income and expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionChanges {
    /// The new title.
    pub title: String,
    /// The new amount.
    pub amount: f64,
    /// The new category, validated against the stored transaction type.
    pub category: String,
    /// The new note.
    #[serde(default)]
    pub note: Option<String>,
}

/// Round a monetary amount to two decimal places.
pub(crate) fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Trim `title` and reject it if nothing is left.
pub(crate) fn validate_title(title: &str) -> Result<String, Error> {
    let title = title.trim();

    if title.is_empty() {
        Err(Error::EmptyTitle)
    } else {
        Ok(title.to_owned())
    }
}

/// Trim `note` and treat blank notes as no note.
pub(crate) fn normalize_note(note: Option<String>) -> Option<String> {
    note.map(|note| note.trim().to_owned())
        .filter(|note| !note.is_empty())
}

fn validate_amount(amount: f64) -> Result<f64, Error> {
    // Rounding can overflow very large amounts to infinity.
    let rounded = round_to_cents(amount);

    if amount >= 0.0 && rounded.is_finite() {
        Ok(rounded)
    } else {
        Err(Error::InvalidAmount(amount))
    }
}

fn validate_category(transaction_type: TransactionType, category: &str) -> Result<String, Error> {
    let category = category.trim();

    if transaction_type.has_category(category) {
        Ok(category.to_owned())
    } else {
        Err(Error::InvalidCategory {
            transaction_type,
            category: category.to_owned(),
        })
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const TRANSACTION_COLUMNS: &str = "id, user_id, type, title, amount, category, note, created_at";

/// Create a new transaction for `user_id` in the database from a builder.
///
/// If the builder has no date, the transaction is dated now.
///
/// # Errors
/// This function will return a:
/// - [Error::EmptyTitle] if the title is blank,
/// - [Error::InvalidAmount] if the amount is negative or not finite,
/// - [Error::InvalidCategory] if the category does not match the transaction type,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    user_id: &UserId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let title = validate_title(&builder.title)?;
    let amount = validate_amount(builder.amount)?;
    let category = validate_category(builder.transaction_type, &builder.category)?;
    let note = normalize_note(builder.note);
    let created_at =
        format_timestamp(builder.created_at.unwrap_or_else(OffsetDateTime::now_utc))?;

    let transaction = connection
        .prepare(&format!(
            "INSERT INTO \"transaction\" (user_id, type, title, amount, category, note, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            (
                user_id.as_ref(),
                builder.transaction_type,
                title,
                amount,
                category,
                note,
                created_at,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve one of `user_id`'s transactions from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a transaction owned by `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(
    id: TransactionId,
    user_id: &UserId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE id = ?1 AND user_id = ?2"
        ))?
        .query_row((id, user_id.as_ref()), map_transaction_row)?;

    Ok(transaction)
}

/// Retrieve `user_id`'s transactions, newest first, optionally only those of one type.
///
/// Transactions without a date are listed last. Rows that cannot be decoded,
/// e.g. with an unknown type, are skipped and logged rather than failing the
/// whole query.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_transactions(
    user_id: &UserId,
    transaction_type: Option<TransactionType>,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let mut statement = connection.prepare(&format!(
        "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\"
         WHERE user_id = ?1 AND (?2 IS NULL OR type = ?2)
         ORDER BY created_at IS NULL, created_at DESC, id DESC"
    ))?;
    let rows = statement.query_map(
        (user_id.as_ref(), transaction_type.map(TransactionType::as_str)),
        map_transaction_row,
    )?;

    let mut transactions = Vec::new();

    for row in rows {
        match row {
            Ok(transaction) => transactions.push(transaction),
            Err(
                error @ (rusqlite::Error::FromSqlConversionFailure(..)
                | rusqlite::Error::InvalidColumnType(..)),
            ) => {
                tracing::warn!("skipping malformed transaction row for user {user_id}: {error}");
            }
            Err(error) => return Err(error.into()),
        }
    }

    Ok(transactions)
}

/// Update the editable fields of one of `user_id`'s transactions.
///
/// The category is validated against the type the transaction was created with.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingTransaction] if `id` does not refer to a transaction owned by `user_id`,
/// - [Error::EmptyTitle], [Error::InvalidAmount] or [Error::InvalidCategory] for invalid changes,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    user_id: &UserId,
    changes: TransactionChanges,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let existing = get_transaction(id, user_id, connection).map_err(|error| match error {
        Error::NotFound => Error::UpdateMissingTransaction,
        error => error,
    })?;

    let title = validate_title(&changes.title)?;
    let amount = validate_amount(changes.amount)?;
    let category = validate_category(existing.transaction_type, &changes.category)?;
    let note = normalize_note(changes.note);

    let transaction = connection
        .prepare(&format!(
            "UPDATE \"transaction\" SET title = ?1, amount = ?2, category = ?3, note = ?4
             WHERE id = ?5 AND user_id = ?6
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            (title, amount, category, note, id, user_id.as_ref()),
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingTransaction,
            error => error.into(),
        })?;

    Ok(transaction)
}

/// Delete one of `user_id`'s transactions.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingTransaction] if `id` does not refer to a transaction owned by `user_id`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_transaction(
    id: TransactionId,
    user_id: &UserId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
        (id, user_id.as_ref()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    Ok(())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
                title TEXT NOT NULL,
                amount REAL NOT NULL CHECK (amount >= 0),
                category TEXT NOT NULL,
                note TEXT,
                created_at TEXT
                )",
        (),
    )?;

    // Serves the per-user listing ordered by date.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_created_at
         ON \"transaction\"(user_id, created_at);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
///
/// A stored date that cannot be parsed is logged and treated as missing.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let user_id: String = row.get(1)?;
    let transaction_type = row.get(2)?;
    let title = row.get(3)?;
    let amount = row.get(4)?;
    let category = row.get(5)?;
    let note = row.get(6)?;
    let created_at: Option<String> = row.get(7)?;

    let created_at = created_at.as_deref().and_then(|text| {
        let parsed = parse_stored_timestamp(text);
        if parsed.is_none() {
            tracing::warn!("transaction {id} has a malformed date {text:?}, treating it as undated");
        }
        parsed
    });

    Ok(Transaction {
        id,
        user_id: UserId::new_unchecked(&user_id),
        transaction_type,
        title,
        amount,
        category,
        note,
        created_at,
    })
}

// ============================================================================
// TESTS
// ============================================================================
