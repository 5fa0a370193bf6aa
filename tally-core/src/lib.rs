//! tally-core: conversation state machine and record types for the Tally
//! finance bot.

pub mod amount;
pub mod catalog;
pub mod conversation;
pub mod engine;
pub mod ports;
pub mod record;
pub mod reply;
pub mod time;
pub mod transition;

#[cfg(test)]
mod proptests;

pub use amount::parse_amount;
pub use catalog::{Kind, EXPENSE_CATEGORIES, INCOME_CATEGORIES};
pub use conversation::{ConversationId, ConversationState, Phase};
pub use engine::ConversationEngine;
pub use ports::{LedgerStore, MemoryLedger, MessagingGateway};
pub use record::{Cell, Entry, LedgerRow, TransactionRecord, LEDGER_COLUMNS};
pub use reply::{Controls, Reply};
pub use time::{month_label, parse_timezone, Clock, FixedClock, SystemClock};
pub use transition::{transition, Input, Transition};
