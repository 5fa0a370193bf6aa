//! Ledger stored as a local CSV file.
//!
//! The first line is the column header; every following record is one
//! transaction.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use tally_core::{LedgerRow, LedgerStore, LEDGER_COLUMNS};

#[derive(Debug, Clone)]
pub struct CsvLedger {
    path: PathBuf,
}

impl CsvLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_empty(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(true);
        }
        let meta = fs::metadata(&self.path)
            .with_context(|| format!("stat {}", self.path.display()))?;
        Ok(meta.len() == 0)
    }
}

#[async_trait]
impl LedgerStore for CsvLedger {
    async fn row_count(&self) -> Result<u64> {
        if self.is_empty()? {
            return Ok(0);
        }
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)
            .with_context(|| format!("opening {}", self.path.display()))?;

        let mut count = 0u64;
        for record in rdr.records() {
            record.with_context(|| format!("reading {}", self.path.display()))?;
            count += 1;
        }
        Ok(count)
    }

    async fn append_row(&self, row: &LedgerRow) -> Result<()> {
        let fresh = self.is_empty()?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("open {}", self.path.display()))?;
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if fresh {
            wtr.write_record(LEDGER_COLUMNS)?;
        }
        wtr.write_record(row.iter().map(|c| c.to_string()))?;
        wtr.flush()
            .with_context(|| format!("write {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::Cell;

    #[tokio::test]
    async fn test_missing_file_has_no_rows() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = CsvLedger::new(dir.path().join("nope.csv"));
        assert_eq!(ledger.row_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_header_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("ledger.csv");
        let ledger = CsvLedger::new(&path);

        ledger.append_row(&vec![Cell::Integer(1), Cell::Text("a".into())]).await.unwrap();
        ledger.append_row(&vec![Cell::Integer(2), Cell::Text("b, c".into())]).await.unwrap();

        let body = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(lines[0], "id,date,month,type,category,amount,note");
        assert_eq!(lines[1], "1,a");
        assert_eq!(lines[2], "2,\"b, c\"");
        assert_eq!(ledger.row_count().await.unwrap(), 2);
    }
}
