//! tally-ledger: ledger backends for the Tally bot (Google Sheets, local CSV).

pub mod csv_ledger;
pub mod sheets;

pub use csv_ledger::CsvLedger;
pub use sheets::{SheetsConfig, SheetsLedger};
