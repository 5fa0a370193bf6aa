//! Conversation engine: owns one state per conversation, feeds each inbound
//! message through [`transition`] and performs the resulting I/O.
//!
//! `handle_message` takes `&mut self`, so messages are processed one at a
//! time and two messages of the same conversation can never interleave.

use anyhow::{Context, Result};
use std::collections::HashMap;
use tracing::{debug, error, info};

use crate::conversation::{ConversationId, ConversationState, Phase};
use crate::ports::{LedgerStore, MessagingGateway};
use crate::record::{Entry, TransactionRecord};
use crate::reply::Reply;
use crate::time::Clock;
use crate::transition::{transition, Input, Transition};

pub struct ConversationEngine<G, L, C> {
    gateway: G,
    ledger: L,
    clock: C,
    conversations: HashMap<ConversationId, ConversationState>,
}

impl<G, L, C> ConversationEngine<G, L, C>
where
    G: MessagingGateway,
    L: LedgerStore,
    C: Clock,
{
    pub fn new(gateway: G, ledger: L, clock: C) -> Self {
        Self {
            gateway,
            ledger,
            clock,
            conversations: HashMap::new(),
        }
    }

    /// Current phase; conversations without state are idle.
    pub fn phase(&self, conversation: ConversationId) -> Phase {
        self.conversations
            .get(&conversation)
            .map(ConversationState::phase)
            .unwrap_or(Phase::AwaitingType)
    }

    pub fn state(&self, conversation: ConversationId) -> Option<&ConversationState> {
        self.conversations.get(&conversation)
    }

    /// Number of conversations with an unfinished entry.
    pub fn active_conversations(&self) -> usize {
        self.conversations.len()
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Process one inbound text message.
    ///
    /// Returns the saved record when this message completed an entry.
    /// Errors come from the gateway or the ledger; state changes made before
    /// the failure are kept.
    pub async fn handle_message(
        &mut self,
        conversation: ConversationId,
        text: &str,
    ) -> Result<Option<TransactionRecord>> {
        let from = self.phase(conversation);
        let step = transition(self.conversations.get(&conversation), Input::parse(text));

        match step {
            Transition::Advance { next, reply } => {
                match next {
                    Some(state) => {
                        debug!(%conversation, ?from, to = ?state.phase(), "advance");
                        self.conversations.insert(conversation, state);
                    }
                    None => {
                        debug!(%conversation, ?from, "back to idle");
                        self.conversations.remove(&conversation);
                    }
                }
                self.send(conversation, &reply).await?;
                Ok(None)
            }
            Transition::Finalize(entry) => self.finalize(conversation, entry).await.map(Some),
        }
    }

    async fn finalize(
        &mut self,
        conversation: ConversationId,
        entry: Entry,
    ) -> Result<TransactionRecord> {
        match self.persist(entry.clone()).await {
            Ok(record) => {
                info!(
                    %conversation,
                    sequence_id = record.sequence_id,
                    kind = %record.kind,
                    category = %record.category,
                    amount = record.amount,
                    "transaction saved"
                );
                self.conversations.remove(&conversation);
                self.send(conversation, &Reply::saved()).await?;
                self.send(conversation, &Reply::next_entry()).await?;
                Ok(record)
            }
            Err(err) => {
                error!(%conversation, error = %format!("{err:#}"), "saving transaction failed");
                self.conversations
                    .insert(conversation, ConversationState::AwaitingRetry { entry });
                self.send(conversation, &Reply::save_failed()).await?;
                Err(err)
            }
        }
    }

    async fn persist(&self, entry: Entry) -> Result<TransactionRecord> {
        let count = self
            .ledger
            .row_count()
            .await
            .context("reading ledger row count")?;
        let record = TransactionRecord::new(count + 1, self.clock.today(), entry);
        self.ledger
            .append_row(&record.to_row())
            .await
            .context("appending ledger row")?;
        Ok(record)
    }

    async fn send(&self, conversation: ConversationId, reply: &Reply) -> Result<()> {
        self.gateway
            .send(conversation, reply)
            .await
            .with_context(|| format!("sending reply to conversation {conversation}"))
    }
}
