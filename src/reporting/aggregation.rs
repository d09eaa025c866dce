//! Transaction data aggregation for totals and charts.
//!
//! Provides functions to total income and expenses, bucket them by calendar
//! month, and group a week's transactions by category.
//!
//! Records with an amount that is negative or not a finite number are skipped
//! rather than failing the whole summary.

use std::collections::BTreeMap;

use serde::Serialize;
use time::{Month, OffsetDateTime};
use time_tz::{OffsetDateTimeExt, TimeZone};

use crate::{
    reporting::window::{WeekWindow, current_week_window},
    transaction::{Transaction, TransactionType},
};

/// The twelve calendar months in chart order.
const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

/// Income and expense totals, and the balance left over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Totals {
    /// The sum of all income.
    pub income: f64,
    /// The sum of all expenses.
    pub expense: f64,
    /// `income - expense`.
    pub balance: f64,
}

/// Income and expense totals for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlySummary {
    /// The month number, 1 for January through 12 for December.
    pub month: u8,
    /// The short month name, e.g. "Jan" or "Sept".
    pub label: &'static str,
    /// The sum of income dated in this month.
    pub income: f64,
    /// The sum of expenses dated in this month.
    pub expense: f64,
}

impl MonthlySummary {
    fn empty(month: Month) -> Self {
        Self {
            month: u8::from(month),
            label: month_abbrev(month),
            income: 0.0,
            expense: 0.0,
        }
    }

    fn add(&mut self, transaction: &Transaction) {
        match transaction.transaction_type {
            TransactionType::Income => self.income += transaction.amount,
            TransactionType::Expense => self.expense += transaction.amount,
        }
    }
}

fn has_valid_amount(transaction: &Transaction) -> bool {
    let is_valid = transaction.amount.is_finite() && transaction.amount >= 0.0;

    if !is_valid {
        tracing::debug!(
            "skipping transaction {} with invalid amount {}",
            transaction.id,
            transaction.amount
        );
    }

    is_valid
}

/// Totals the income and expenses in `transactions`.
///
/// The order of `transactions` does not matter and dates are ignored.
/// An empty slice gives all zeros.
pub fn compute_totals(transactions: &[Transaction]) -> Totals {
    let (income, expense) = transactions
        .iter()
        .filter(|transaction| has_valid_amount(transaction))
        .fold(
            (0.0, 0.0),
            |(income, expense), transaction| match transaction.transaction_type {
                TransactionType::Income => (income + transaction.amount, expense),
                TransactionType::Expense => (income, expense + transaction.amount),
            },
        );

    Totals {
        income,
        expense,
        balance: income - expense,
    }
}

/// Sums income and expenses into one bucket per calendar month.
///
/// The month of each transaction is read on the calendar of `timezone`, using
/// the offset in effect at that transaction's time. The year is ignored, so
/// March 2023 and March 2024 share a bucket. Undated transactions are skipped.
///
/// # Returns
/// Exactly twelve summaries ordered January to December, months without any
/// transactions are zero.
pub fn bucket_by_month<T: TimeZone>(
    transactions: &[Transaction],
    timezone: &T,
) -> Vec<MonthlySummary> {
    let mut buckets = MONTHS.map(MonthlySummary::empty);

    for transaction in transactions.iter().filter(|t| has_valid_amount(t)) {
        let Some(created_at) = transaction.created_at else {
            continue;
        };

        let month = created_at.to_timezone(timezone).month();
        buckets[usize::from(u8::from(month)) - 1].add(transaction);
    }

    buckets.to_vec()
}

/// Sums the amounts of the transactions dated within `window`, grouped by category.
///
/// Categories without transactions in the window are left out. Undated
/// transactions are skipped.
pub fn category_totals(transactions: &[Transaction], window: WeekWindow) -> BTreeMap<String, f64> {
    let mut totals = BTreeMap::new();

    for transaction in transactions.iter().filter(|t| has_valid_amount(t)) {
        let in_window = transaction
            .created_at
            .is_some_and(|created_at| window.contains(created_at));

        if in_window {
            *totals.entry(transaction.category.clone()).or_insert(0.0) += transaction.amount;
        }
    }

    totals
}

/// Sums the amounts of this week's transactions by category, where the week
/// is the [current_week_window] containing `now`.
pub fn weekly_category_totals(
    transactions: &[Transaction],
    now: OffsetDateTime,
) -> BTreeMap<String, f64> {
    category_totals(transactions, current_week_window(now))
}

fn month_abbrev(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sept",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}
