//! Per-conversation state.
//!
//! Each variant carries exactly the fields collected so far, so a state can
//! never hold a value for a step the user has not completed yet.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::catalog::Kind;
use crate::record::Entry;

/// Stable identifier of one user's chat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConversationId(pub i64);

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The step a conversation is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Idle. Conversations without a stored state are in this phase.
    AwaitingType,
    AwaitingCategory,
    AwaitingAmount,
    AwaitingNoteChoice,
    AwaitingNoteText,
    /// The ledger rejected the finished entry; waiting for retry or discard.
    AwaitingRetry,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConversationState {
    AwaitingCategory {
        kind: Kind,
    },
    AwaitingAmount {
        kind: Kind,
        category: &'static str,
    },
    AwaitingNoteChoice {
        kind: Kind,
        category: &'static str,
        amount: f64,
    },
    AwaitingNoteText {
        kind: Kind,
        category: &'static str,
        amount: f64,
    },
    AwaitingRetry {
        entry: Entry,
    },
}

impl ConversationState {
    pub fn phase(&self) -> Phase {
        match self {
            ConversationState::AwaitingCategory { .. } => Phase::AwaitingCategory,
            ConversationState::AwaitingAmount { .. } => Phase::AwaitingAmount,
            ConversationState::AwaitingNoteChoice { .. } => Phase::AwaitingNoteChoice,
            ConversationState::AwaitingNoteText { .. } => Phase::AwaitingNoteText,
            ConversationState::AwaitingRetry { .. } => Phase::AwaitingRetry,
        }
    }

    pub fn kind(&self) -> Kind {
        match self {
            ConversationState::AwaitingCategory { kind }
            | ConversationState::AwaitingAmount { kind, .. }
            | ConversationState::AwaitingNoteChoice { kind, .. }
            | ConversationState::AwaitingNoteText { kind, .. } => *kind,
            ConversationState::AwaitingRetry { entry } => entry.kind,
        }
    }

    pub fn category(&self) -> Option<&str> {
        match self {
            ConversationState::AwaitingCategory { .. } => None,
            ConversationState::AwaitingAmount { category, .. }
            | ConversationState::AwaitingNoteChoice { category, .. }
            | ConversationState::AwaitingNoteText { category, .. } => Some(category),
            ConversationState::AwaitingRetry { entry } => Some(&entry.category),
        }
    }

    pub fn amount(&self) -> Option<f64> {
        match self {
            ConversationState::AwaitingCategory { .. }
            | ConversationState::AwaitingAmount { .. } => None,
            ConversationState::AwaitingNoteChoice { amount, .. }
            | ConversationState::AwaitingNoteText { amount, .. } => Some(*amount),
            ConversationState::AwaitingRetry { entry } => Some(entry.amount),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_follow_phase() {
        let s = ConversationState::AwaitingCategory { kind: Kind::Income };
        assert_eq!(s.phase(), Phase::AwaitingCategory);
        assert_eq!(s.category(), None);
        assert_eq!(s.amount(), None);

        let s = ConversationState::AwaitingNoteText {
            kind: Kind::Expense,
            category: "кафе",
            amount: 350.0,
        };
        assert_eq!(s.phase(), Phase::AwaitingNoteText);
        assert_eq!(s.kind(), Kind::Expense);
        assert_eq!(s.category(), Some("кафе"));
        assert_eq!(s.amount(), Some(350.0));
    }
}
