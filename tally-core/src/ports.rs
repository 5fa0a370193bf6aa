//! Collaborators the engine talks to: the chat transport and the ledger.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};

use crate::conversation::ConversationId;
use crate::record::LedgerRow;
use crate::reply::Reply;

/// Outbound side of the messaging platform.
#[async_trait]
pub trait MessagingGateway: Send + Sync {
    async fn send(&self, conversation: ConversationId, reply: &Reply) -> Result<()>;
}

/// Append-only tabular store.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Number of data rows already stored (headers excluded).
    async fn row_count(&self) -> Result<u64>;

    async fn append_row(&self, row: &LedgerRow) -> Result<()>;
}

#[async_trait]
impl<T: LedgerStore + ?Sized> LedgerStore for Box<T> {
    async fn row_count(&self) -> Result<u64> {
        (**self).row_count().await
    }

    async fn append_row(&self, row: &LedgerRow) -> Result<()> {
        (**self).append_row(row).await
    }
}

#[async_trait]
impl<T: MessagingGateway + ?Sized> MessagingGateway for Box<T> {
    async fn send(&self, conversation: ConversationId, reply: &Reply) -> Result<()> {
        (**self).send(conversation, reply).await
    }
}

/// Ledger kept in process memory.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    rows: Mutex<Vec<LedgerRow>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `rows` already stored.
    pub fn with_rows(rows: Vec<LedgerRow>) -> Self {
        Self {
            rows: Mutex::new(rows),
        }
    }

    pub fn rows(&self) -> Result<Vec<LedgerRow>> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<LedgerRow>>> {
        self.rows
            .lock()
            .map_err(|_| anyhow::anyhow!("memory ledger lock poisoned"))
    }
}

#[async_trait]
impl LedgerStore for MemoryLedger {
    async fn row_count(&self) -> Result<u64> {
        Ok(self.lock()?.len() as u64)
    }

    async fn append_row(&self, row: &LedgerRow) -> Result<()> {
        self.lock()?.push(row.clone());
        Ok(())
    }
}
