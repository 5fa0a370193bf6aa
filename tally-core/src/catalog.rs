//! Transaction kinds and the fixed category catalog for each kind.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Expense categories, in the order they are offered to the user.
pub const EXPENSE_CATEGORIES: &[&str] = &[
    "обеды",
    "продукты",
    "гигиена",
    "кафе",
    "транспорт",
    "подписки",
    "покупки",
    "развлечения",
    "здоровье",
    "образование",
    "путешествия",
    "подарки",
    "другое",
];

/// Income categories, in the order they are offered to the user.
pub const INCOME_CATEGORIES: &[&str] = &[
    "зарплата",
    "стипендия",
    "спонсор",
    "выплаты",
    "фриланс",
    "прочие",
];

/// Top-level transaction classification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Kind {
    #[serde(rename = "доход")]
    Income,
    #[serde(rename = "расход")]
    Expense,
}

impl Kind {
    /// Keyboard order.
    pub const ALL: [Kind; 2] = [Kind::Income, Kind::Expense];

    /// Label shown on the keyboard and written to the ledger.
    pub fn label(&self) -> &'static str {
        match self {
            Kind::Income => "доход",
            Kind::Expense => "расход",
        }
    }

    /// Case-insensitive match of a kind token.
    ///
    /// The localized labels are the primary tokens; `income` / `expense`
    /// are accepted as aliases.
    pub fn parse(input: &str) -> Option<Kind> {
        match input.trim().to_lowercase().as_str() {
            "доход" | "income" => Some(Kind::Income),
            "расход" | "expense" => Some(Kind::Expense),
            _ => None,
        }
    }

    /// Allowed categories for this kind.
    pub fn categories(&self) -> &'static [&'static str] {
        match self {
            Kind::Income => INCOME_CATEGORIES,
            Kind::Expense => EXPENSE_CATEGORIES,
        }
    }

    /// Exact match against this kind's catalog. Returns the catalog entry.
    pub fn category(&self, input: &str) -> Option<&'static str> {
        self.categories().iter().copied().find(|c| *c == input)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kind_case_insensitive() {
        assert_eq!(Kind::parse("доход"), Some(Kind::Income));
        assert_eq!(Kind::parse("РАСХОД"), Some(Kind::Expense));
        assert_eq!(Kind::parse("Расход"), Some(Kind::Expense));
        assert_eq!(Kind::parse("Income"), Some(Kind::Income));
        assert_eq!(Kind::parse("EXPENSE"), Some(Kind::Expense));
        assert_eq!(Kind::parse("продукты"), None);
        assert_eq!(Kind::parse(""), None);
    }

    #[test]
    fn test_category_is_exact_and_per_kind() {
        assert_eq!(Kind::Expense.category("продукты"), Some("продукты"));
        assert_eq!(Kind::Expense.category("Продукты"), None);
        assert_eq!(Kind::Income.category("продукты"), None);
        assert_eq!(Kind::Income.category("фриланс"), Some("фриланс"));
        assert_eq!(Kind::Expense.category("фриланс"), None);
    }

    #[test]
    fn test_catalogs_do_not_overlap() {
        for c in EXPENSE_CATEGORIES {
            assert!(!INCOME_CATEGORIES.contains(c), "{c} is in both catalogs");
        }
    }

    #[test]
    fn test_kind_serializes_as_label() {
        assert_eq!(serde_json::to_string(&Kind::Expense).unwrap(), "\"расход\"");
    }
}
