//! Transaction management for the finance tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - The category vocabulary of each transaction type
//! - Database functions for storing, querying, and managing transactions
//! - JSON handlers for the transaction endpoints

mod category;
mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod list_endpoint;

pub use core::{
    Transaction, TransactionBuilder, TransactionChanges, TransactionType,
    create_transaction_table, get_transactions,
};
pub(crate) use core::{normalize_note, round_to_cents, validate_title};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::{edit_transaction_endpoint, get_transaction_endpoint};
pub use list_endpoint::{get_categories_endpoint, get_transactions_endpoint};

#[cfg(test)]
pub use core::{create_transaction, delete_transaction, get_transaction, update_transaction};
