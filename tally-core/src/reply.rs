//! Outbound messages: text plus a hint for the reply controls the
//! messaging client should show.

use crate::catalog::Kind;

pub const YES: &str = "Да";
pub const NO: &str = "Нет";
pub const RETRY: &str = "Повторить";
pub const DISCARD: &str = "Отмена";

/// What to do with the user's reply buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Controls {
    /// Leave whatever is currently shown.
    Keep,
    /// Show these labels, `per_row` buttons in each row.
    Options { labels: Vec<String>, per_row: usize },
    /// Remove the buttons so the user types freely.
    Clear,
}

impl Controls {
    pub fn options<S: AsRef<str>>(labels: &[S], per_row: usize) -> Self {
        Controls::Options {
            labels: labels.iter().map(|l| l.as_ref().to_string()).collect(),
            per_row: per_row.max(1),
        }
    }

    /// Button labels grouped into rows. `None` unless this is `Options`.
    pub fn rows(&self) -> Option<Vec<Vec<String>>> {
        match self {
            Controls::Options { labels, per_row } => Some(
                labels
                    .chunks((*per_row).max(1))
                    .map(|row| row.to_vec())
                    .collect(),
            ),
            _ => None,
        }
    }

    /// Flat list of offered labels, empty unless this is `Options`.
    pub fn labels(&self) -> &[String] {
        match self {
            Controls::Options { labels, .. } => labels,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub controls: Controls,
}

impl Reply {
    pub fn new(text: impl Into<String>, controls: Controls) -> Self {
        Self {
            text: text.into(),
            controls,
        }
    }

    pub fn greeting() -> Self {
        Self::new("Привет! Выбери тип транзакции:", kind_controls())
    }

    pub fn cancelled() -> Self {
        Self::new("Отменено. Выбери тип транзакции:", kind_controls())
    }

    pub fn choose_kind_first() -> Self {
        Self::new(
            "Пожалуйста, сначала выбери тип (доход/расход).",
            kind_controls(),
        )
    }

    pub fn choose_category(kind: Kind) -> Self {
        Self::new(
            "📂 Выбери категорию:",
            Controls::options(kind.categories(), 1),
        )
    }

    pub fn enter_amount() -> Self {
        Self::new("💵 Введи сумму (только число):", Controls::Clear)
    }

    pub fn invalid_amount() -> Self {
        Self::new(
            "⚠️ Неверный формат суммы. Введи число (например, 1500).",
            Controls::Keep,
        )
    }

    pub fn ask_note() -> Self {
        Self::new("📝 Хочешь добавить комментарий?", yes_no_controls())
    }

    pub fn invalid_choice() -> Self {
        Self::new("Пожалуйста, выбери 'Да' или 'Нет'.", yes_no_controls())
    }

    pub fn enter_note() -> Self {
        Self::new("✏️ Введи комментарий:", Controls::Clear)
    }

    pub fn saved() -> Self {
        Self::new("✅ Добавлено!", Controls::Keep)
    }

    pub fn next_entry() -> Self {
        Self::new("Что добавляем дальше?", kind_controls())
    }

    pub fn save_failed() -> Self {
        Self::new(
            "❌ Не удалось сохранить запись. Повторить попытку?",
            Controls::options(&[RETRY, DISCARD], 2),
        )
    }

    pub fn discarded() -> Self {
        Self::new("🗑 Запись удалена. Выбери тип транзакции:", kind_controls())
    }
}

fn kind_controls() -> Controls {
    let labels: Vec<&str> = Kind::ALL.iter().map(|k| k.label()).collect();
    Controls::options(&labels, 2)
}

fn yes_no_controls() -> Controls {
    Controls::options(&[YES, NO], 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_keyboard_is_one_row() {
        let rows = Reply::greeting().controls.rows().unwrap();
        assert_eq!(rows, vec![vec!["доход".to_string(), "расход".to_string()]]);
    }

    #[test]
    fn test_category_keyboard_one_per_row() {
        let rows = Reply::choose_category(Kind::Income).controls.rows().unwrap();
        assert_eq!(rows.len(), Kind::Income.categories().len());
        assert!(rows.iter().all(|r| r.len() == 1));
        assert_eq!(rows[0][0], "зарплата");
    }

    #[test]
    fn test_clear_and_keep_have_no_rows() {
        assert_eq!(Reply::enter_amount().controls.rows(), None);
        assert_eq!(Reply::invalid_amount().controls, Controls::Keep);
        assert!(Reply::enter_note().controls.labels().is_empty());
    }

    #[test]
    fn test_zero_per_row_is_clamped() {
        let c = Controls::options(&["a", "b"], 0);
        assert_eq!(c.rows().unwrap().len(), 2);
    }
}
