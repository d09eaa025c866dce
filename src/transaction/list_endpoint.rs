//! Defines the endpoints for listing transactions and their categories.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    transaction::{Transaction, TransactionType, core::get_transactions},
    user::UserId,
};

/// The state needed to list transactions.
#[derive(Debug, Clone)]
pub struct ListTransactionsState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Query parameters for filtering transactions by type.
#[derive(Debug, Deserialize)]
pub struct TypeQuery {
    /// Only include transactions of this type. All types if omitted.
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
}

/// A route handler for listing the user's transactions, newest first.
pub async fn get_transactions_endpoint(
    State(state): State<ListTransactionsState>,
    user_id: UserId,
    Query(query): Query<TypeQuery>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_transactions(&user_id, query.transaction_type, &connection).map(Json)
}

/// The categories available to one transaction type.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct CategoryList {
    /// The transaction type the categories belong to.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// The category names in display order.
    pub categories: Vec<String>,
}

/// A route handler listing the category vocabulary of each transaction type,
/// or of a single type if `type` is given.
pub async fn get_categories_endpoint(Query(query): Query<TypeQuery>) -> Json<Vec<CategoryList>> {
    let types = match query.transaction_type {
        Some(transaction_type) => vec![transaction_type],
        None => vec![TransactionType::Income, TransactionType::Expense],
    };

    let lists = types
        .into_iter()
        .map(|transaction_type| CategoryList {
            transaction_type,
            categories: transaction_type
                .categories()
                .iter()
                .map(|category| category.to_string())
                .collect(),
        })
        .collect();

    Json(lists)
}

#[cfg(test)]
mod tests {
    use axum::{Json, extract::Query};

    use crate::transaction::{
        TransactionType, get_categories_endpoint, list_endpoint::TypeQuery,
    };

    #[tokio::test]
    async fn lists_categories_for_one_type() {
        let Json(lists) = get_categories_endpoint(Query(TypeQuery {
            transaction_type: Some(TransactionType::Income),
        }))
        .await;

        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].transaction_type, TransactionType::Income);
        assert_eq!(lists[0].categories.len(), 5);
        assert_eq!(lists[0].categories[0], "Salary & Wages");
    }

    #[tokio::test]
    async fn lists_categories_for_all_types() {
        let Json(lists) =
            get_categories_endpoint(Query(TypeQuery {
                transaction_type: None,
            }))
            .await;

        let types: Vec<_> = lists.iter().map(|list| list.transaction_type).collect();
        assert_eq!(types, vec![TransactionType::Income, TransactionType::Expense]);
    }
}
