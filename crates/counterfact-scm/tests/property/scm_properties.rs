//! Property tests for SCM evaluation and interventions.

use counterfact_core::{assignment, Value};
use counterfact_scm::{Noise, StructuralCausalModel};
use proptest::prelude::*;

const ROCK_VARS: [&str; 5] = [
    "suzy_throws",
    "billy_throws",
    "suzy_hits",
    "billy_hits",
    "bottle_shatters",
];

fn rock_noise(suzy: bool, billy: bool) -> Noise {
    Noise::from(assignment([("suzy_throws", suzy), ("billy_throws", billy)]))
}

fn consistent(m: &StructuralCausalModel, state: &counterfact_core::Assignment) -> bool {
    for name in m.topological_order().to_vec() {
        if m.is_intervened(&name) {
            continue;
        }
        let Some(function) = m.structural_function(&name).cloned() else {
            return false;
        };
        if function.parents().is_empty() {
            continue;
        }
        match function.compute(&name, state, None) {
            Ok(v) if v == state[&name] => {}
            _ => return false,
        }
    }
    true
}

proptest! {
    #[test]
    fn get_state_is_deterministic_under_fixed_noise(suzy: bool, billy: bool, seed: u64) {
        let mut m = test_fixtures::rock_throwing_seeded(seed);
        let noise = rock_noise(suzy, billy);
        let first = m.get_state(&noise).unwrap();
        let second = m.get_state(&noise).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert!(consistent(&m, &first));
    }

    #[test]
    fn reset_is_idempotent(var in 0usize..5, value: bool, suzy: bool, billy: bool) {
        let mut m = test_fixtures::rock_throwing();
        let noise = rock_noise(suzy, billy);
        let baseline = m.get_state(&noise).unwrap();

        m.do_intervention(ROCK_VARS[var], value).unwrap();
        m.reset();
        let once = m.get_state(&noise).unwrap();
        m.reset();
        let twice = m.get_state(&noise).unwrap();

        prop_assert!(m.interventions().is_empty());
        prop_assert_eq!(&once, &baseline);
        prop_assert_eq!(&twice, &baseline);
    }

    #[test]
    fn intervention_removes_incoming_edges(var in 0usize..5, value: bool, suzy: bool, billy: bool) {
        let mut m = test_fixtures::rock_throwing();
        let name = ROCK_VARS[var];
        m.do_intervention(name, value).unwrap();
        prop_assert_eq!(m.incoming_edges(name).unwrap(), 0);

        let mut inputs = assignment([(name, !value)]);
        let mut noise = rock_noise(suzy, billy);
        let v = m.evaluate(name, &mut inputs, &mut noise).unwrap();
        prop_assert_eq!(v, Value::from(value));

        let state = m.get_state(&noise).unwrap();
        prop_assert_eq!(&state[name], &Value::from(value));
        prop_assert!(consistent(&m, &state));
    }

    #[test]
    fn sampled_states_satisfy_structural_equations(seed: u64) {
        let mut m = test_fixtures::voting(5);
        m.reseed(seed);
        for state in m.sample(10).unwrap() {
            prop_assert!(consistent(&m, &state));
        }
    }
}
