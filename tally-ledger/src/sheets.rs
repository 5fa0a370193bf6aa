//! Ledger stored in a Google Sheets worksheet.
//!
//! Authenticates with a service account key. The spreadsheet must be shared
//! with the service account's email.

use anyhow::{Context, Result};
use async_trait::async_trait;
use google_sheets4::api::{Scope, ValueRange};
use google_sheets4::Sheets;
use hyper::client::HttpConnector;
use hyper_rustls::HttpsConnector;
use serde_json::Value;
use tally_core::{Cell, LedgerRow, LedgerStore};
use tracing::info;

// Use the oauth2 version re-exported by google-sheets4 so the authenticator
// type matches what both hubs expect.
use google_sheets4::oauth2;

type Connector = HttpsConnector<HttpConnector>;

const SPREADSHEET_MIME: &str = "application/vnd.google-apps.spreadsheet";

#[derive(Debug, Clone)]
pub struct SheetsConfig {
    /// Spreadsheet title, used to look the spreadsheet up in Drive.
    pub spreadsheet_name: String,
    /// Skips the Drive lookup when set.
    pub spreadsheet_id: Option<String>,
    pub worksheet: String,
    /// Rows at the top of column A that are not transactions.
    pub header_rows: u64,
}

pub struct SheetsLedger {
    hub: Sheets<Connector>,
    spreadsheet_id: String,
    worksheet: String,
    header_rows: u64,
}

impl SheetsLedger {
    /// Authenticate with the service account key JSON and resolve the
    /// spreadsheet.
    pub async fn connect(service_account_json: &str, cfg: &SheetsConfig) -> Result<Self> {
        let key = oauth2::parse_service_account_key(service_account_json)
            .context("parse service account JSON")?;
        let auth = oauth2::ServiceAccountAuthenticator::builder(key)
            .build()
            .await
            .context("building service account authenticator")?;

        let client = hyper::Client::builder().build(https_connector());

        let spreadsheet_id = match &cfg.spreadsheet_id {
            Some(id) => id.clone(),
            None => {
                let drive = google_drive3::DriveHub::new(client.clone(), auth.clone());
                find_spreadsheet(&drive, &cfg.spreadsheet_name).await?
            }
        };
        info!(spreadsheet_id = %spreadsheet_id, worksheet = %cfg.worksheet, "using Google Sheets ledger");

        Ok(Self {
            hub: Sheets::new(client, auth),
            spreadsheet_id,
            worksheet: cfg.worksheet.clone(),
            header_rows: cfg.header_rows,
        })
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    fn id_column(&self) -> String {
        format!("{}!A:A", quote_sheet(&self.worksheet))
    }
}

#[async_trait]
impl LedgerStore for SheetsLedger {
    async fn row_count(&self) -> Result<u64> {
        let range = self.id_column();
        let (_, values) = self
            .hub
            .spreadsheets()
            .values_get(&self.spreadsheet_id, &range)
            .add_scope(Scope::Spreadsheet)
            .doit()
            .await
            .with_context(|| format!("reading {range}"))?;

        let filled = values.values.map(|v| v.len()).unwrap_or(0) as u64;
        Ok(filled.saturating_sub(self.header_rows))
    }

    async fn append_row(&self, row: &LedgerRow) -> Result<()> {
        let range = self.id_column();
        let body = ValueRange {
            values: Some(vec![row.iter().map(cell_value).collect()]),
            ..Default::default()
        };

        self.hub
            .spreadsheets()
            .values_append(body, &self.spreadsheet_id, &range)
            .value_input_option("RAW")
            .add_scope(Scope::Spreadsheet)
            .doit()
            .await
            .with_context(|| format!("appending to {range}"))?;
        Ok(())
    }
}

async fn find_spreadsheet(drive: &google_drive3::DriveHub<Connector>, name: &str) -> Result<String> {
    let query = format!(
        "name = '{}' and mimeType = '{SPREADSHEET_MIME}' and trashed = false",
        escape_query(name)
    );
    let (_, list) = drive
        .files()
        .list()
        .q(&query)
        .supports_all_drives(true)
        .include_items_from_all_drives(true)
        .page_size(10)
        .add_scope(google_drive3::api::Scope::MetadataReadonly)
        .doit()
        .await
        .with_context(|| format!("searching Drive for spreadsheet '{name}'"))?;

    list.files
        .unwrap_or_default()
        .into_iter()
        .find_map(|f| f.id)
        .with_context(|| {
            format!("spreadsheet '{name}' not found (is it shared with the service account?)")
        })
}

fn https_connector() -> Connector {
    hyper_rustls::HttpsConnectorBuilder::new()
        .with_native_roots()
        .https_or_http()
        .enable_http1()
        .build()
}

fn cell_value(cell: &Cell) -> Value {
    match cell {
        Cell::Integer(v) => Value::from(*v),
        Cell::Number(v) => Value::from(*v),
        Cell::Text(s) => Value::from(s.as_str()),
    }
}

/// A1 notation needs quotes around sheet titles with spaces or symbols.
fn quote_sheet(title: &str) -> String {
    if title.chars().all(|c| c.is_alphanumeric() || c == '_') {
        title.to_string()
    } else {
        format!("'{}'", title.replace('\'', "''"))
    }
}

/// Escape a value for a Drive `q` string literal.
fn escape_query(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\'', "\\'")
}
