//! Progress towards savings goals.

use serde::Serialize;

use crate::{Error, goal::Goal};

/// A goal together with how far along it is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalProgress {
    /// The goal.
    #[serde(flatten)]
    pub goal: Goal,
    /// `current_amount / target_amount`, see [progress_ratio].
    pub progress: f64,
}

impl GoalProgress {
    /// Pair `goal` with its progress ratio.
    ///
    /// # Errors
    /// Returns the same errors as [progress_ratio].
    pub fn new(goal: Goal) -> Result<Self, Error> {
        let progress = progress_ratio(&goal)?;

        Ok(Self { goal, progress })
    }
}

/// The fraction of `goal` that has been saved so far.
///
/// The ratio is not clamped, so an overfunded goal gives a value above 1.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidGoalTarget] if the target is zero, negative or not finite,
/// - or [Error::InvalidGoalAmount] if the current amount is negative or not finite.
pub fn progress_ratio(goal: &Goal) -> Result<f64, Error> {
    if !(goal.target_amount.is_finite() && goal.target_amount > 0.0) {
        return Err(Error::InvalidGoalTarget(goal.target_amount));
    }

    if !(goal.current_amount.is_finite() && goal.current_amount >= 0.0) {
        return Err(Error::InvalidGoalAmount(goal.current_amount));
    }

    Ok(goal.current_amount / goal.target_amount)
}
