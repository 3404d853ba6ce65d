//! Property tests for the shared definition checks.

use proptest::prelude::*;

use counterfact_core::{assignment, Assignment, Value};
use counterfact_definitions::{
    ActualCauseDefinition, CauseQuery, DirectActualCause, ModifiedHp, OriginalHp,
};
use counterfact_scm::Noise;

const ROCK_VARS: [&str; 5] = [
    "suzy_throws",
    "billy_throws",
    "suzy_hits",
    "billy_hits",
    "bottle_shatters",
];

fn rock_world(suzy: bool, billy: bool) -> (Noise, Assignment) {
    let mut model = test_fixtures::rock_throwing();
    let noise = Noise::from(assignment([("suzy_throws", suzy), ("billy_throws", billy)]));
    let state = model.get_state(&noise).unwrap();
    (noise, state)
}

/// Split the five rock-throwing variables by `mask`, taking values from `state`.
fn split(mask: u8, state: &Assignment) -> (Assignment, Assignment) {
    let mut event = Assignment::new();
    let mut outcome = Assignment::new();
    for (i, name) in ROCK_VARS.iter().enumerate() {
        let target = if mask & (1 << i) != 0 { &mut event } else { &mut outcome };
        target.insert(name.to_string(), state[*name].clone());
    }
    (event, outcome)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn factuality_depends_only_on_the_union(
        mask in 0u8..32,
        flip in 0usize..5,
        suzy in any::<bool>(),
        billy in any::<bool>(),
    ) {
        let (noise, state) = rock_world(suzy, billy);
        let mut altered = state.clone();
        let name = ROCK_VARS[flip];
        let flipped = Value::Int(if altered[name].is_truthy() { 0 } else { 1 });
        altered.insert(name.to_string(), flipped);

        let (event, outcome) = split(mask, &altered);
        let (swapped_outcome, swapped_event) = (event.clone(), outcome.clone());

        let forward = ModifiedHp::new()
            .is_factual(&CauseQuery::new(&event, &outcome, &state, &noise))
            .unwrap();
        let backward = ModifiedHp::new()
            .is_factual(&CauseQuery::new(&swapped_event, &swapped_outcome, &state, &noise))
            .unwrap();
        let union: Assignment = event.iter().chain(outcome.iter()).map(|(k, v)| (k.clone(), v.clone())).collect();
        let empty = Assignment::new();
        let merged = ModifiedHp::new()
            .is_factual(&CauseQuery::new(&union, &empty, &state, &noise))
            .unwrap();
        prop_assert!(!forward.holds);
        prop_assert_eq!(forward.holds, backward.holds);
        prop_assert_eq!(forward.holds, merged.holds);

        // Unflipped, every split is factual.
        let (event, outcome) = split(mask, &state);
        let verdict = ModifiedHp::new()
            .is_factual(&CauseQuery::new(&event, &outcome, &state, &noise))
            .unwrap();
        prop_assert!(verdict.holds);
    }

    #[test]
    fn singleton_events_are_minimal(index in 0usize..4, suzy in any::<bool>(), billy in any::<bool>()) {
        let mut model = test_fixtures::rock_throwing();
        let (noise, state) = rock_world(suzy, billy);
        let name = ROCK_VARS[index];
        let event = assignment([(name, state[name].clone())]);
        let outcome = assignment([("bottle_shatters", state["bottle_shatters"].clone())]);
        let q = CauseQuery::new(&event, &outcome, &state, &noise);

        prop_assert!(ModifiedHp::new().is_minimal(&mut model, &q).unwrap().holds);
        prop_assert!(OriginalHp::new().is_minimal(&mut model, &q).unwrap().holds);
        prop_assert!(DirectActualCause::new().is_minimal(&mut model, &q).unwrap().holds);
    }

    #[test]
    fn insufficient_events_skip_minimality(index in 0usize..4, suzy in any::<bool>(), billy in any::<bool>()) {
        let mut model = test_fixtures::rock_throwing();
        let (noise, state) = rock_world(suzy, billy);
        let name = ROCK_VARS[index];
        let event = assignment([(name, state[name].clone())]);
        let outcome = assignment([("bottle_shatters", state["bottle_shatters"].clone())]);
        let q = CauseQuery::new(&event, &outcome, &state, &noise);

        let verdict = OriginalHp::new().is_actual_cause(&mut model, &q).unwrap();
        if verdict.diagnostic.is_sufficient == Some(false) {
            prop_assert!(!verdict.holds);
            prop_assert_eq!(verdict.diagnostic.is_necessary, None);
            prop_assert_eq!(verdict.diagnostic.is_minimal, None);
        }
        prop_assert!(model.interventions().is_empty());
    }

    #[test]
    fn modified_hp_insufficient_events_skip_minimality(
        index in 0usize..4,
        witness_index in proptest::option::of(0usize..4),
        suzy in any::<bool>(),
        billy in any::<bool>(),
    ) {
        let mut model = test_fixtures::rock_throwing();
        let (noise, mut state) = rock_world(suzy, billy);
        // Record the opposite outcome so the pinned world cannot reproduce it.
        let flipped = Value::Int(if state["bottle_shatters"].is_truthy() { 0 } else { 1 });
        state.insert("bottle_shatters".to_string(), flipped.clone());

        let name = ROCK_VARS[index];
        let event = assignment([(name, state[name].clone())]);
        let outcome = assignment([("bottle_shatters", flipped)]);
        let witness: Vec<String> = witness_index
            .filter(|w| *w != index)
            .map(|w| vec![ROCK_VARS[w].to_string()])
            .unwrap_or_default();
        let q = CauseQuery::new(&event, &outcome, &state, &noise).with_witness(&witness);

        let verdict = ModifiedHp::new().is_actual_cause(&mut model, &q).unwrap();
        prop_assert!(!verdict.holds);
        prop_assert_eq!(verdict.diagnostic.is_factual, Some(true));
        prop_assert_eq!(verdict.diagnostic.is_sufficient, Some(false));
        prop_assert_eq!(verdict.diagnostic.is_necessary, None);
        prop_assert_eq!(verdict.diagnostic.is_minimal, None);
        prop_assert_eq!(verdict.diagnostic.ac3_smaller_cause, None);
        prop_assert!(model.interventions().is_empty());
    }
}
