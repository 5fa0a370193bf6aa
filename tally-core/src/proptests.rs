//! Property-based tests for the transition function

use super::catalog::Kind;
use super::conversation::{ConversationState, Phase};
use super::transition::{transition, Input, Transition};
use proptest::prelude::*;

fn arb_kind() -> impl Strategy<Value = Kind> {
    prop_oneof![Just(Kind::Income), Just(Kind::Expense)]
}

fn arb_state() -> impl Strategy<Value = ConversationState> {
    (arb_kind(), 0usize..16, -1.0e6f64..1.0e6).prop_map(|(kind, i, amount)| {
        let cats = kind.categories();
        let category = cats[i % cats.len()];
        match i % 4 {
            0 => ConversationState::AwaitingCategory { kind },
            1 => ConversationState::AwaitingAmount { kind, category },
            2 => ConversationState::AwaitingNoteChoice { kind, category, amount },
            _ => ConversationState::AwaitingNoteText { kind, category, amount },
        }
    })
}

proptest! {
    #[test]
    fn idle_ignores_anything_but_kinds(text in "\\PC{0,24}") {
        prop_assume!(Kind::parse(&text).is_none());
        prop_assume!(!text.trim_start().starts_with('/'));
        match transition(None, Input::parse(&text)) {
            Transition::Advance { next, .. } => prop_assert!(next.is_none()),
            Transition::Finalize(_) => prop_assert!(false, "finalized from idle"),
        }
    }

    #[test]
    fn amount_phase_keeps_state_on_letters(kind in arb_kind(), text in "[a-zа-я ]{1,12}") {
        prop_assume!(!text.trim().is_empty());
        let category = kind.categories()[0];
        let state = ConversationState::AwaitingAmount { kind, category };
        match transition(Some(&state), Input::parse(&text)) {
            Transition::Advance { next, .. } => prop_assert_eq!(next, Some(state)),
            Transition::Finalize(_) => prop_assert!(false, "finalized from amount phase"),
        }
    }

    #[test]
    fn amount_phase_accepts_decimals(whole in 0u32..1_000_000, frac in 0u32..100, comma in any::<bool>()) {
        let sep = if comma { ',' } else { '.' };
        let text = format!("{whole}{sep}{frac:02}");
        let state = ConversationState::AwaitingAmount { kind: Kind::Expense, category: "кафе" };
        match transition(Some(&state), Input::parse(&text)) {
            Transition::Advance { next: Some(next), .. } => {
                prop_assert_eq!(next.phase(), Phase::AwaitingNoteChoice);
                let expected: f64 = format!("{whole}.{frac:02}").parse().unwrap();
                prop_assert_eq!(next.amount(), Some(expected));
            }
            other => prop_assert!(false, "unexpected {:?}", other),
        }
    }

    #[test]
    fn category_of_other_kind_never_accepted(kind in arb_kind(), i in 0usize..16) {
        let other = if kind == Kind::Income { Kind::Expense } else { Kind::Income };
        let foreign = other.categories()[i % other.categories().len()];
        let state = ConversationState::AwaitingCategory { kind };
        match transition(Some(&state), Input::parse(foreign)) {
            Transition::Advance { next, .. } => prop_assert_eq!(next, Some(state)),
            Transition::Finalize(_) => prop_assert!(false, "finalized from category phase"),
        }
    }

    #[test]
    fn start_resets_only_outside_answers(state in arb_state()) {
        let step = transition(Some(&state), Input::parse("/start"));
        match state.phase() {
            Phase::AwaitingCategory => match step {
                Transition::Advance { next, .. } => prop_assert!(next.is_none()),
                Transition::Finalize(_) => prop_assert!(false, "finalized on /start"),
            },
            Phase::AwaitingNoteText => match step {
                Transition::Finalize(entry) => prop_assert_eq!(entry.note, "/start"),
                other => prop_assert!(false, "unexpected {:?}", other),
            },
            _ => match step {
                Transition::Advance { next, .. } => prop_assert_eq!(next, Some(state)),
                Transition::Finalize(_) => prop_assert!(false, "finalized on /start"),
            },
        }
    }

    #[test]
    fn category_of_own_kind_always_accepted(kind in arb_kind(), i in 0usize..16) {
        let category = kind.categories()[i % kind.categories().len()];
        let state = ConversationState::AwaitingCategory { kind };
        match transition(Some(&state), Input::parse(category)) {
            Transition::Advance { next: Some(next), .. } => {
                prop_assert_eq!(next.phase(), Phase::AwaitingAmount);
                prop_assert_eq!(next.category(), Some(category));
            }
            other => prop_assert!(false, "unexpected {:?}", other),
        }
    }

    #[test]
    fn note_text_is_kept_verbatim(text in "\\PC{1,40}") {
        let state = ConversationState::AwaitingNoteText {
            kind: Kind::Income,
            category: "фриланс",
            amount: 10.0,
        };
        match transition(Some(&state), Input::parse(&text)) {
            Transition::Finalize(entry) => prop_assert_eq!(entry.note, text),
            other => prop_assert!(false, "unexpected {:?}", other),
        }
    }
}
