//! Savings goals: the model, its validation and storage, and the JSON
//! handlers for managing goals.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod list_endpoint;

pub use core::{Goal, GoalBuilder, GoalChanges, create_goal_table, get_goals};
pub use create_endpoint::create_goal_endpoint;
pub use delete_endpoint::delete_goal_endpoint;
pub use edit_endpoint::edit_goal_endpoint;
pub use list_endpoint::get_goals_endpoint;
pub(crate) use list_endpoint::with_progress;

#[cfg(test)]
pub use core::{create_goal, delete_goal, get_goal, update_goal};
