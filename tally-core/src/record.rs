//! Completed transactions and their ledger row layout

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::catalog::Kind;
use crate::time::month_label;

/// Column headers of a ledger row, in order.
pub const LEDGER_COLUMNS: [&str; 7] = ["id", "date", "month", "type", "category", "amount", "note"];

/// A fully collected transaction, not yet numbered or dated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub kind: Kind,
    pub category: String,
    pub amount: f64,
    /// Empty when the user declined to add a note
    pub note: String,
}

/// A transaction as written to the ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Position in the ledger (existing row count + 1)
    pub sequence_id: u64,
    pub date: NaiveDate,
    /// Localized month name of `date`
    pub month_label: String,
    pub kind: Kind,
    pub category: String,
    pub amount: f64,
    pub note: String,
}

impl TransactionRecord {
    pub fn new(sequence_id: u64, date: NaiveDate, entry: Entry) -> Self {
        Self {
            sequence_id,
            date,
            month_label: month_label(date),
            kind: entry.kind,
            category: entry.category,
            amount: entry.amount,
            note: entry.note,
        }
    }

    /// The seven ledger cells, in [`LEDGER_COLUMNS`] order.
    pub fn to_row(&self) -> LedgerRow {
        vec![
            Cell::Integer(self.sequence_id),
            Cell::Text(self.date.format("%Y-%m-%d").to_string()),
            Cell::Text(self.month_label.clone()),
            Cell::Text(self.kind.label().to_string()),
            Cell::Text(self.category.clone()),
            Cell::Number(self.amount),
            Cell::Text(self.note.clone()),
        ]
    }
}

/// One scalar ledger value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Integer(u64),
    Number(f64),
    Text(String),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Integer(v) => write!(f, "{v}"),
            Cell::Number(v) => write!(f, "{v}"),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

pub type LedgerRow = Vec<Cell>;
