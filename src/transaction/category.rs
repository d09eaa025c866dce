//! The category vocabulary for each transaction type.

use crate::transaction::TransactionType;

/// The categories an income can be filed under.
pub const INCOME_CATEGORIES: [&str; 5] = [
    "Salary & Wages",
    "Business & Self-Employment",
    "Investments & Passive Income",
    "Government Assistance",
    "Gifts & Other Income",
];

/// The categories an expense can be filed under.
pub const EXPENSE_CATEGORIES: [&str; 8] = [
    "Household Expenses",
    "Transportation",
    "Food",
    "Health & Wellness",
    "Personal & Lifestyle",
    "Education",
    "Debt & Financial Obligations",
    "Miscellaneous",
];

impl TransactionType {
    /// The categories that transactions of this type may use, in display order.
    pub fn categories(self) -> &'static [&'static str] {
        match self {
            TransactionType::Income => &INCOME_CATEGORIES,
            TransactionType::Expense => &EXPENSE_CATEGORIES,
        }
    }

    /// Whether `category` belongs to the vocabulary of this transaction type.
    pub fn has_category(self, category: &str) -> bool {
        self.categories().contains(&category)
    }
}

#[cfg(test)]
mod tests {
    use crate::transaction::TransactionType;

    #[test]
    fn categories_are_specific_to_type() {
        assert!(TransactionType::Income.has_category("Salary & Wages"));
        assert!(!TransactionType::Expense.has_category("Salary & Wages"));
        assert!(TransactionType::Expense.has_category("Food"));
        assert!(!TransactionType::Income.has_category("Food"));
    }

    #[test]
    fn category_match_is_exact() {
        assert!(!TransactionType::Expense.has_category("food"));
        assert!(!TransactionType::Expense.has_category(" Food"));
    }
}
