//! Polling loop: pulls updates from Telegram and feeds text messages to the
//! conversation engine one at a time.

use anyhow::{Context, Result};
use std::time::Duration;
use tally_core::{
    parse_timezone, Clock, ConversationEngine, ConversationId, LedgerStore, MessagingGateway,
    SystemClock,
};
use tally_ledger::{CsvLedger, SheetsLedger};
use tracing::{debug, error, info, warn};

use crate::config::{self, Config, LedgerBackend, LedgerSection};
use crate::telegram::{TelegramClient, Update};

/// Pause after a failed getUpdates call before polling again.
const POLL_ERROR_DELAY: Duration = Duration::from_secs(5);

pub async fn run(cfg: &Config) -> Result<()> {
    let token = config::bot_token()?;
    let poll_timeout = Duration::from_secs(cfg.telegram.poll_timeout_secs);
    let telegram = TelegramClient::new(&cfg.telegram.api_base, &token, poll_timeout)?;

    let ledger = open_ledger(&cfg.ledger).await?;
    let clock = system_clock(&cfg.ledger)?;

    let poller = telegram.clone();
    let mut engine = ConversationEngine::new(telegram, ledger, clock);

    info!(backend = ?cfg.ledger.backend, "bot started");

    let mut offset: Option<i64> = None;
    loop {
        let batch = tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!(active = engine.active_conversations(), "shutting down");
                return Ok(());
            }
            batch = poller.get_updates(offset, cfg.telegram.poll_timeout_secs) => batch,
        };

        let updates = match batch {
            Ok(updates) => updates,
            Err(err) => {
                warn!(error = %format!("{err:#}"), "getUpdates failed; retrying");
                if pause_unless(tokio::signal::ctrl_c(), POLL_ERROR_DELAY).await {
                    info!(active = engine.active_conversations(), "shutting down");
                    return Ok(());
                }
                continue;
            }
        };

        for update in updates {
            offset = Some(update.update_id + 1);
            dispatch(&mut engine, update).await;
        }
    }
}

/// Sleep for `delay` unless `shutdown` completes first. True means shut down.
async fn pause_unless<F: Future>(shutdown: F, delay: Duration) -> bool {
    tokio::select! {
        _ = shutdown => true,
        _ = tokio::time::sleep(delay) => false,
    }
}

/// Hand one update to the engine. Errors are logged, never fatal.
async fn dispatch<G, L, C>(engine: &mut ConversationEngine<G, L, C>, update: Update)
where
    G: MessagingGateway,
    L: LedgerStore,
    C: Clock,
{
    let Some(message) = update.message else {
        return;
    };
    let Some(text) = message.text else {
        debug!(chat = message.chat.id, message_id = message.message_id, "ignoring non-text message");
        return;
    };

    let conversation = ConversationId(message.chat.id);
    if let Err(err) = engine.handle_message(conversation, &text).await {
        error!(%conversation, error = %format!("{err:#}"), "handling message failed");
    }
}

pub async fn open_ledger(section: &LedgerSection) -> Result<Box<dyn LedgerStore>> {
    match section.backend {
        LedgerBackend::Sheets => {
            let creds = config::service_account_json()?;
            let ledger = SheetsLedger::connect(&creds, &section.sheets_config())
                .await
                .context("connecting to Google Sheets")?;
            Ok(Box::new(ledger))
        }
        LedgerBackend::Csv => {
            let path = section.csv_path()?;
            info!(path = %path.display(), "using CSV ledger");
            Ok(Box::new(CsvLedger::new(path)))
        }
    }
}

fn system_clock(section: &LedgerSection) -> Result<SystemClock> {
    let tz = section
        .timezone
        .as_deref()
        .map(parse_timezone)
        .transpose()?;
    Ok(SystemClock::new(tz))
}
