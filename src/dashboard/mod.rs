//! Dashboard module
//!
//! Serves the summaries behind the dashboard, income and expense views:
//! running totals, the twelve month series, goal progress and the weekly
//! category breakdown.

mod handlers;
mod weekly;

pub use handlers::get_dashboard_endpoint;
pub use weekly::get_weekly_report_endpoint;
