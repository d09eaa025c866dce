//! Derives display-ready summaries from snapshots of transactions and goals.
//!
//! Every function here is pure: it reads the slice it is given, never mutates
//! it, and does no I/O. The dashboard, income and expense reports all share
//! these functions and only differ in which transactions they pass in.

mod aggregation;
mod progress;
mod window;

pub use aggregation::{
    MonthlySummary, Totals, bucket_by_month, category_totals, compute_totals,
    weekly_category_totals,
};
pub use progress::{GoalProgress, progress_ratio};
pub use window::{WeekWindow, current_week_window, week_window};
pub(crate) use window::local_midnight;
