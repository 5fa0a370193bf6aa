//! Pure conversation transition function.
//!
//! Each phase accepts a closed set of inputs. Given the same state and input
//! this always returns the same result and performs no I/O.

use crate::amount::parse_amount;
use crate::catalog::Kind;
use crate::conversation::ConversationState;
use crate::record::Entry;
use crate::reply::{Reply, DISCARD, NO, RETRY, YES};

/// An inbound message, classified. Commands keep their raw text for the
/// phases that take free input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input<'a> {
    /// `/start`: greet and restart from scratch.
    Start(&'a str),
    /// `/cancel`: drop the current entry.
    Cancel(&'a str),
    Text(&'a str),
}

impl<'a> Input<'a> {
    pub fn parse(text: &'a str) -> Self {
        let command = text
            .trim()
            .split_whitespace()
            .next()
            .map(|t| t.split('@').next().unwrap_or(t).to_lowercase());

        match command.as_deref() {
            Some("/start") => Input::Start(text),
            Some("/cancel") => Input::Cancel(text),
            _ => Input::Text(text),
        }
    }

    pub fn text(self) -> &'a str {
        match self {
            Input::Start(text) | Input::Cancel(text) | Input::Text(text) => text,
        }
    }
}

/// Result of feeding one input to a conversation
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Store `next` (`None` returns the conversation to idle) and send `reply`.
    Advance {
        next: Option<ConversationState>,
        reply: Reply,
    },
    /// The entry is complete and must be written to the ledger.
    Finalize(Entry),
}

impl Transition {
    fn to(next: ConversationState, reply: Reply) -> Self {
        Transition::Advance {
            next: Some(next),
            reply,
        }
    }

    fn idle(reply: Reply) -> Self {
        Transition::Advance { next: None, reply }
    }
}

pub fn transition(state: Option<&ConversationState>, input: Input<'_>) -> Transition {
    if accepts_commands(state) {
        match input {
            Input::Start(_) => return Transition::idle(Reply::greeting()),
            Input::Cancel(_) => return Transition::idle(Reply::cancelled()),
            Input::Text(_) => {}
        }
    }
    let text = input.text();

    let Some(state) = state else {
        return match Kind::parse(text) {
            Some(kind) => select_kind(kind),
            None => Transition::idle(Reply::choose_kind_first()),
        };
    };

    match state {
        ConversationState::AwaitingCategory { kind } => {
            if let Some(category) = kind.category(text) {
                return Transition::to(
                    ConversationState::AwaitingAmount {
                        kind: *kind,
                        category,
                    },
                    Reply::enter_amount(),
                );
            }
            // Re-selecting the kind is allowed until a category is chosen.
            match Kind::parse(text) {
                Some(kind) => select_kind(kind),
                None => Transition::to(state.clone(), Reply::choose_category(*kind)),
            }
        }

        ConversationState::AwaitingAmount { kind, category } => match parse_amount(text) {
            Some(amount) => Transition::to(
                ConversationState::AwaitingNoteChoice {
                    kind: *kind,
                    category: *category,
                    amount,
                },
                Reply::ask_note(),
            ),
            None => Transition::to(state.clone(), Reply::invalid_amount()),
        },

        ConversationState::AwaitingNoteChoice {
            kind,
            category,
            amount,
        } => {
            if answer_is(text, YES) {
                Transition::to(
                    ConversationState::AwaitingNoteText {
                        kind: *kind,
                        category: *category,
                        amount: *amount,
                    },
                    Reply::enter_note(),
                )
            } else if answer_is(text, NO) {
                Transition::Finalize(entry(*kind, category, *amount, String::new()))
            } else {
                Transition::to(state.clone(), Reply::invalid_choice())
            }
        }

        ConversationState::AwaitingNoteText {
            kind,
            category,
            amount,
        } => Transition::Finalize(entry(*kind, category, *amount, text.to_string())),

        ConversationState::AwaitingRetry { entry } => {
            if answer_is(text, RETRY) {
                Transition::Finalize(entry.clone())
            } else if answer_is(text, DISCARD) {
                Transition::idle(Reply::discarded())
            } else {
                Transition::to(state.clone(), Reply::save_failed())
            }
        }
    }
}

/// Amount, yes/no and note phases read the next message whatever it is, so
/// `/start` there is an invalid amount, an invalid answer or a note.
fn accepts_commands(state: Option<&ConversationState>) -> bool {
    matches!(
        state,
        None | Some(ConversationState::AwaitingCategory { .. })
            | Some(ConversationState::AwaitingRetry { .. })
    )
}

fn select_kind(kind: Kind) -> Transition {
    Transition::to(
        ConversationState::AwaitingCategory { kind },
        Reply::choose_category(kind),
    )
}

/// Case-insensitive match of a button answer, with English aliases for yes/no.
fn answer_is(text: &str, label: &str) -> bool {
    let text = text.trim().to_lowercase();
    if text == label.to_lowercase() {
        return true;
    }
    match label {
        YES => text == "yes",
        NO => text == "no",
        _ => false,
    }
}

fn entry(kind: Kind, category: &str, amount: f64, note: String) -> Entry {
    Entry {
        kind,
        category: category.to_string(),
        amount,
        note,
    }
}
