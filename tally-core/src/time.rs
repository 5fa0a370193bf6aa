//! Calendar helpers: the current date in the user's timezone and localized
//! month names for ledger rows.

use anyhow::Result;
use chrono::{Local, NaiveDate, Utc};
use chrono_tz::Tz;

/// Nominative month names keyed by the two-digit month number.
const MONTHS_NOMINATIVE: [(&str, &str); 12] = [
    ("01", "январь"),
    ("02", "февраль"),
    ("03", "март"),
    ("04", "апрель"),
    ("05", "май"),
    ("06", "июнь"),
    ("07", "июль"),
    ("08", "август"),
    ("09", "сентябрь"),
    ("10", "октябрь"),
    ("11", "ноябрь"),
    ("12", "декабрь"),
];

/// Localized month name for a date.
///
/// Falls back to chrono's English month name in lowercase when the month
/// code is missing from the table, which a valid `NaiveDate` never produces.
pub fn month_label(date: NaiveDate) -> String {
    let code = date.format("%m").to_string();
    MONTHS_NOMINATIVE
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| date.format("%B").to_string().to_lowercase())
}

/// Parse an IANA timezone name like "Europe/Moscow".
pub fn parse_timezone(tz: &str) -> Result<Tz> {
    tz.parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))
}

/// Source of "today" for new records.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Wall clock. Uses the configured timezone, or the host's local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    tz: Option<Tz>,
}

impl SystemClock {
    pub fn new(tz: Option<Tz>) -> Self {
        Self { tz }
    }
}

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        match self.tz {
            Some(tz) => Utc::now().with_timezone(&tz).date_naive(),
            None => Local::now().date_naive(),
        }
    }
}

/// A clock stuck on one date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
