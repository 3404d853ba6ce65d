//! Property tests for subset combinatorics.

use std::collections::HashSet;

use counterfact_core::subsets::{
    combinations, powerset, product_size, subsets, CartesianProduct, PowersetOptions, SubsetOrder,
};
use counterfact_core::Value;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn binomial(n: usize, k: usize) -> usize {
    (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
}

proptest! {
    #[test]
    fn combinations_count_is_binomial(n in 0usize..9, k in 0usize..9) {
        let items: Vec<usize> = (0..n).collect();
        let c = combinations(&items, k);
        let expected = if k > n { 0 } else { binomial(n, k) };
        prop_assert_eq!(c.len(), expected);
    }

    #[test]
    fn full_powerset_has_two_to_the_n_unique_members(n in 0usize..8) {
        let items: Vec<usize> = (0..n).collect();
        let opts = PowersetOptions { include_empty: true, include_full: true, ..Default::default() };
        let all = powerset(&items, opts).unwrap();
        prop_assert_eq!(all.len(), 1 << n);
        let unique: HashSet<Vec<usize>> = all.into_iter().collect();
        prop_assert_eq!(unique.len(), 1 << n);
    }

    #[test]
    fn shuffles_are_permutations(n in 1usize..7, seed in any::<u64>()) {
        let items: Vec<usize> = (0..n).collect();
        let ordered: HashSet<Vec<usize>> =
            powerset(&items, PowersetOptions::non_empty()).unwrap().into_iter().collect();
        for order in [SubsetOrder::Shuffled, SubsetOrder::ShuffledBySize] {
            let mut rng = StdRng::seed_from_u64(seed);
            let shuffled = subsets(&items, PowersetOptions::non_empty(), order, &mut rng).unwrap();
            prop_assert_eq!(shuffled.len(), ordered.len());
            let as_set: HashSet<Vec<usize>> = shuffled.into_iter().collect();
            prop_assert_eq!(&as_set, &ordered);
        }
    }

    #[test]
    fn cartesian_product_matches_size(lens in prop::collection::vec(1usize..4, 0..5)) {
        let domains: Vec<Vec<Value>> = lens
            .iter()
            .map(|&l| (0..l as i64).map(Value::Int).collect())
            .collect();
        let expected = product_size(&domains).unwrap();
        let tuples: HashSet<Vec<Value>> = CartesianProduct::new(domains).collect();
        prop_assert_eq!(tuples.len(), expected);
    }
}
