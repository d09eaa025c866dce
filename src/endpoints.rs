//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/goals/{goal_id}', use [format_endpoint].

/// The route to list and create transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route to access a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route listing the categories of each transaction type.
pub const CATEGORIES: &str = "/api/categories";
/// The route to list and create goals.
pub const GOALS: &str = "/api/goals";
/// The route to access a single goal.
pub const GOAL: &str = "/api/goals/{goal_id}";
/// The route for the dashboard overview.
pub const DASHBOARD: &str = "/api/dashboard";
/// The route for the weekly category report.
pub const WEEKLY_REPORT: &str = "/api/reports/weekly";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace and ends with a
/// right brace. For example, in the endpoint path '/goals/{goal_id}',
/// '{goal_id}' is the parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map_or(endpoint_path.len(), |end| param_start + end + 1);

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
