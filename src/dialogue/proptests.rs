//! Property-based tests for the dialogue state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::state::*;
use super::transition::*;
use super::*;
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_field_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .-]{1,15}"
}

fn arb_state() -> impl Strategy<Value = DialogueState> {
    prop_oneof![
        Just(DialogueState::Idle),
        Just(DialogueState::AwaitingDate),
        arb_field_text().prop_map(|date| DialogueState::AwaitingKind { date }),
        (arb_field_text(), arb_field_text())
            .prop_map(|(date, kind)| DialogueState::AwaitingDuration { date, kind }),
    ]
}

fn arb_text_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        "[a-z ]{0,12}".prop_map(Event::Text),
        any::<i16>().prop_map(|n| Event::Text(n.to_string())),
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        Just(Event::StartAdd),
        Just(Event::Cancel),
        arb_text_event(),
    ]
}

// ============================================================================
// Helpers
// ============================================================================

fn reply_count(effects: &[Effect]) -> usize {
    effects
        .iter()
        .filter(|e| matches!(e, Effect::Reply { .. }))
        .count()
}

fn has_save(effects: &[Effect]) -> bool {
    effects
        .iter()
        .any(|e| matches!(e, Effect::SaveTraining(_)))
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    // Invariant 1: every accepted transition replies exactly once
    #[test]
    fn prop_accepted_transitions_reply_exactly_once(
        state in arb_state(),
        event in arb_event()
    ) {
        if let Ok(result) = transition(&state, 1, event) {
            prop_assert_eq!(
                reply_count(&result.effects), 1,
                "effects: {:?}", result.effects
            );
        }
    }

    // Invariant 2: a save only happens when the flow terminates, and it
    // carries the data collected in the duration state
    #[test]
    fn prop_save_implies_termination(
        state in arb_state(),
        event in arb_event()
    ) {
        if let Ok(result) = transition(&state, 7, event) {
            if has_save(&result.effects) {
                prop_assert_eq!(&result.flow, &Flow::Terminate);
                prop_assert!(
                    matches!(&state, DialogueState::AwaitingDuration { .. }),
                    "save emitted outside the duration state: {:?}",
                    state
                );
                if let DialogueState::AwaitingDuration { date, kind } = &state {
                    let saved = result.effects.iter().find_map(|e| match e {
                        Effect::SaveTraining(t) => Some(t),
                        Effect::Reply { .. } => None,
                    });
                    prop_assert!(saved.is_some());
                    let saved = saved.unwrap();
                    prop_assert_eq!(&saved.date, date);
                    prop_assert_eq!(&saved.kind, kind);
                    prop_assert_eq!(saved.user_id, 7);
                }
            }
        }
    }

    // Invariant 3: cancel always terminates, never saves
    #[test]
    fn prop_cancel_always_terminates(state in arb_state()) {
        let result = transition(&state, 1, Event::Cancel);
        prop_assert!(result.is_ok(), "cancel rejected from {:?}", state);
        let result = result.unwrap();
        prop_assert_eq!(result.flow, Flow::Terminate);
        prop_assert!(!has_save(&result.effects));
    }

    // Invariant 4: any integer round-trips through the duration step
    #[test]
    fn prop_parseable_duration_always_saves(
        date in arb_field_text(),
        kind in arb_field_text(),
        duration in any::<i64>()
    ) {
        let state = DialogueState::AwaitingDuration { date, kind };
        let result = transition(&state, 1, Event::Text(duration.to_string())).unwrap();

        prop_assert_eq!(result.flow, Flow::Terminate);
        let saved_duration = result.effects.iter().find_map(|e| match e {
            Effect::SaveTraining(t) => Some(t.duration),
            Effect::Reply { .. } => None,
        });
        prop_assert_eq!(saved_duration, Some(duration));
    }

    // Invariant 5: non-numeric duration input keeps the state unchanged
    #[test]
    fn prop_non_numeric_duration_never_saves(
        date in arb_field_text(),
        kind in arb_field_text(),
        input in "[a-z ]{0,12}"
    ) {
        let state = DialogueState::AwaitingDuration {
            date: date.clone(),
            kind: kind.clone(),
        };
        let result = transition(&state, 1, Event::Text(input)).unwrap();

        prop_assert!(!has_save(&result.effects));
        prop_assert_eq!(result.flow, Flow::Continue(state));
    }

    // Invariant 6: arbitrary event sequences never panic, and rejected
    // events leave no effects behind
    #[test]
    fn prop_event_sequences_stay_consistent(
        events in proptest::collection::vec(arb_event(), 0..20)
    ) {
        let mut state = DialogueState::Idle;

        for event in events {
            match transition(&state, 1, event) {
                Ok(result) => {
                    prop_assert_eq!(reply_count(&result.effects), 1);
                    state = match result.flow {
                        Flow::Continue(next) => next,
                        Flow::Terminate => DialogueState::Idle,
                    };
                }
                Err(TransitionError::UnexpectedEvent { .. }) => {
                    // Out-of-table event; the session is untouched.
                }
            }
        }
    }
}
