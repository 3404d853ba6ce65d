//! Property tests for the exhaustive solver.

use proptest::prelude::*;

use counterfact_core::assignment;
use counterfact_definitions::ModifiedHp;
use counterfact_inference::ExhaustiveSearch;
use counterfact_scm::{Noise, StructuralCausalModel};

fn gate(kind: u8) -> StructuralCausalModel {
    match kind % 3 {
        0 => test_fixtures::binary_and(),
        1 => test_fixtures::binary_or(),
        _ => test_fixtures::binary_xor(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn no_cause_contains_another(kind in 0u8..3, a in any::<bool>(), b in any::<bool>()) {
        let mut search = ExhaustiveSearch::new(gate(kind), ModifiedHp::new()).unwrap();
        let noise = Noise::from(assignment([("a", a), ("b", b)]));
        let state = search.model_mut().get_state(&noise).unwrap();
        let outcome = assignment([("y", state["y"].clone())]);

        let causes: Vec<_> = search.solve(&state, &outcome, &noise).unwrap().into_iter().collect();
        for (i, x) in causes.iter().enumerate() {
            prop_assert_eq!(x.diagnostic.is_minimal, Some(true));
            for (j, y) in causes.iter().enumerate() {
                if i != j {
                    let contained = x.variables.iter().all(|v| y.variables.contains(v));
                    prop_assert!(!contained, "{:?} inside {:?}", x.variables, y.variables);
                }
            }
        }
        prop_assert!(search.model().interventions().is_empty());
    }

    #[test]
    fn seeded_searches_agree(seed in any::<u64>(), suzy in any::<bool>(), billy in any::<bool>()) {
        let noise = Noise::from(assignment([("suzy_throws", suzy), ("billy_throws", billy)]));
        let run = || {
            let mut search = ExhaustiveSearch::new(
                test_fixtures::rock_throwing_seeded(seed),
                ModifiedHp::new(),
            )
            .unwrap();
            let state = search.model_mut().get_state(&noise).unwrap();
            let outcome = assignment([("bottle_shatters", state["bottle_shatters"].clone())]);
            search.solve(&state, &outcome, &noise).unwrap()
        };
        prop_assert_eq!(run(), run());
    }
}
