//! Database initialization and the shared timestamp encoding.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};
use time::{
    Date, OffsetDateTime, UtcOffset,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros::format_description,
};

use crate::{Error, goal::create_goal_table, transaction::create_transaction_table};

/// Timestamps are stored in UTC at second precision so that text ordering
/// matches chronological ordering.
const STORAGE_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]Z");

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Create all of the database tables for the application.
///
/// Tables are created inside a single exclusive transaction. Calling this on an
/// already initialized database is a no-op.
///
/// # Errors
/// Returns an error if a table cannot be created or there is some other SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_transaction_table(&transaction)?;
    create_goal_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Convert `timestamp` to the text stored in the database.
///
/// # Errors
/// Returns an [Error::InvalidDate] if the timestamp cannot be formatted, e.g. it
/// lies outside of the four digit years.
pub(crate) fn format_timestamp(timestamp: OffsetDateTime) -> Result<String, Error> {
    timestamp
        .to_offset(UtcOffset::UTC)
        .format(STORAGE_FORMAT)
        .map_err(|error| Error::InvalidDate(error.to_string()))
}

/// Parse a stored timestamp.
///
/// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates, which are read as
/// midnight UTC. Returns `None` for anything else.
pub(crate) fn parse_stored_timestamp(text: &str) -> Option<OffsetDateTime> {
    let text = text.trim();

    OffsetDateTime::parse(text, &Rfc3339).ok().or_else(|| {
        Date::parse(text, DATE_FORMAT)
            .ok()
            .map(|date| date.midnight().assume_utc())
    })
}
