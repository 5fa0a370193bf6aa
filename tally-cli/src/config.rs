use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tally_ledger::SheetsConfig;

use crate::state::ensure_tally_home;

/// Messaging-platform access token.
pub const BOT_TOKEN_ENV: &str = "BOT_TOKEN";
/// Google service account key (the JSON document itself).
pub const SERVICE_ACCOUNT_ENV: &str = "SERVICE_ACCOUNT_JSON";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub telegram: TelegramSection,
    #[serde(default)]
    pub ledger: LedgerSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramSection {
    pub api_base: String,
    /// Long-poll timeout passed to getUpdates
    pub poll_timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerBackend {
    Sheets,
    Csv,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerSection {
    pub backend: LedgerBackend,
    pub spreadsheet_name: String,
    /// Skips looking the spreadsheet up by name
    pub spreadsheet_id: Option<String>,
    pub worksheet: String,
    pub header_rows: u64,
    /// For backend = "csv". Defaults to ~/.tally/transactions.csv
    pub csv_path: Option<PathBuf>,
    /// IANA timezone used to date records. Host local time when unset.
    pub timezone: Option<String>,
}

impl Default for TelegramSection {
    fn default() -> Self {
        Self {
            api_base: "https://api.telegram.org".to_string(),
            poll_timeout_secs: 90,
        }
    }
}

impl Default for LedgerSection {
    fn default() -> Self {
        Self {
            backend: LedgerBackend::Sheets,
            spreadsheet_name: "Finance".to_string(),
            spreadsheet_id: None,
            worksheet: "Transactions".to_string(),
            header_rows: 1,
            csv_path: None,
            timezone: None,
        }
    }
}

impl LedgerSection {
    pub fn sheets_config(&self) -> SheetsConfig {
        SheetsConfig {
            spreadsheet_name: self.spreadsheet_name.clone(),
            spreadsheet_id: self.spreadsheet_id.clone(),
            worksheet: self.worksheet.clone(),
            header_rows: self.header_rows,
        }
    }

    pub fn csv_path(&self) -> Result<PathBuf> {
        match &self.csv_path {
            Some(p) => Ok(p.clone()),
            None => Ok(ensure_tally_home()?.join("transactions.csv")),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_tally_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(p: &Path) -> Result<Config> {
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

pub fn bot_token() -> Result<String> {
    required_env(BOT_TOKEN_ENV)
}

pub fn service_account_json() -> Result<String> {
    required_env(SERVICE_ACCOUNT_ENV)
}

fn required_env(name: &str) -> Result<String> {
    let v = std::env::var(name).with_context(|| format!("{name} is not set"))?;
    if v.trim().is_empty() {
        anyhow::bail!("{name} is empty");
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            [ledger]
            backend = "csv"
            timezone = "Europe/Moscow"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.ledger.backend, LedgerBackend::Csv);
        assert_eq!(cfg.ledger.spreadsheet_name, "Finance");
        assert_eq!(cfg.ledger.worksheet, "Transactions");
        assert_eq!(cfg.ledger.timezone.as_deref(), Some("Europe/Moscow"));
        assert_eq!(cfg.telegram.poll_timeout_secs, 90);
    }

    #[test]
    fn test_default_round_trips_through_toml() {
        let s = toml::to_string_pretty(&Config::default()).unwrap();
        let back: Config = toml::from_str(&s).unwrap();
        assert_eq!(back.ledger.backend, LedgerBackend::Sheets);
        assert_eq!(back.ledger.header_rows, 1);
        assert_eq!(back.telegram.api_base, "https://api.telegram.org");
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(cfg.ledger.spreadsheet_name, "Finance");
    }

    #[test]
    fn test_bad_backend_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("config.toml");
        fs::write(&p, "[ledger]\nbackend = \"excel\"\n").unwrap();
        assert!(load_config_from(&p).is_err());
    }
}
