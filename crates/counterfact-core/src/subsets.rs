//! Subset, powerset and Cartesian-product combinatorics.
//!
//! Subsets are produced in size classes; within a class the order follows
//! the input order lexicographically (the same order as k-combinations
//! over indices).

use rand::seq::SliceRandom;
use rand::Rng;

use crate::errors::SubsetError;
use crate::values::{Assignment, Value};

/// Which subset sizes a powerset covers, and in what direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PowersetOptions {
    /// Largest subsets first.
    pub reverse: bool,
    pub include_empty: bool,
    pub include_full: bool,
    /// Only subsets of exactly this size. Overrides the include flags.
    pub length: Option<usize>,
}

impl PowersetOptions {
    /// Every non-empty subset, the full set included.
    pub fn non_empty() -> Self {
        Self {
            include_full: true,
            ..Self::default()
        }
    }

    /// Proper, non-empty subsets, largest first.
    pub fn proper_descending() -> Self {
        Self {
            reverse: true,
            ..Self::default()
        }
    }

    pub fn exact(length: usize) -> Self {
        Self {
            length: Some(length),
            ..Self::default()
        }
    }

    fn sizes(&self, n: usize) -> Result<Vec<usize>, SubsetError> {
        let mut sizes: Vec<usize> = match self.length {
            Some(length) if length > n => {
                return Err(SubsetError::InvalidLength { length, max: n })
            }
            Some(length) => vec![length],
            None => {
                let lower = usize::from(!self.include_empty);
                let upper = if self.include_full { n + 1 } else { n };
                (lower..upper).collect()
            }
        };
        if self.reverse {
            sizes.reverse();
        }
        Ok(sizes)
    }
}

/// How subsets are ordered after generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubsetOrder {
    #[default]
    Ordered,
    /// One global shuffle across every size.
    Shuffled,
    /// Size classes stay in order; each class is shuffled.
    ShuffledBySize,
}

/// All `k`-element combinations of `items`, in index-lexicographic order.
pub fn combinations<T: Clone>(items: &[T], k: usize) -> Vec<Vec<T>> {
    let n = items.len();
    if k > n {
        return Vec::new();
    }
    let mut out = Vec::new();
    let mut idx: Vec<usize> = (0..k).collect();
    loop {
        out.push(idx.iter().map(|&i| items[i].clone()).collect());

        // Rightmost index that can still advance.
        let Some(pos) = (0..k).rev().find(|&i| idx[i] != i + n - k) else {
            return out;
        };
        idx[pos] += 1;
        for j in pos + 1..k {
            idx[j] = idx[j - 1] + 1;
        }
    }
}

/// Subsets of `items`, grouped by size.
pub fn powerset<T: Clone>(items: &[T], options: PowersetOptions) -> Result<Vec<Vec<T>>, SubsetError> {
    Ok(options
        .sizes(items.len())?
        .into_iter()
        .flat_map(|k| combinations(items, k))
        .collect())
}

/// Every sub-assignment of `event` whose key set is selected by `options`.
pub fn subevents(event: &Assignment, options: PowersetOptions) -> Result<Vec<Assignment>, SubsetError> {
    let keys: Vec<&String> = event.keys().collect();
    Ok(powerset(&keys, options)?
        .into_iter()
        .map(|subset| {
            subset
                .into_iter()
                .map(|k| (k.clone(), event[k].clone()))
                .collect()
        })
        .collect())
}

/// Powerset with an optional shuffle driven by `rng`.
pub fn subsets<T: Clone, R: Rng + ?Sized>(
    items: &[T],
    options: PowersetOptions,
    order: SubsetOrder,
    rng: &mut R,
) -> Result<Vec<Vec<T>>, SubsetError> {
    match order {
        SubsetOrder::Ordered => powerset(items, options),
        SubsetOrder::Shuffled => {
            let mut all = powerset(items, options)?;
            all.shuffle(rng);
            Ok(all)
        }
        SubsetOrder::ShuffledBySize => {
            let mut all = Vec::new();
            for k in options.sizes(items.len())? {
                let mut class = combinations(items, k);
                class.shuffle(rng);
                all.extend(class);
            }
            Ok(all)
        }
    }
}

/// Number of tuples in the product of `domains`, `None` on overflow.
pub fn product_size(domains: &[Vec<Value>]) -> Option<usize> {
    domains
        .iter()
        .try_fold(1usize, |acc, d| acc.checked_mul(d.len()))
}

/// Lazy Cartesian product over value domains.
///
/// The last domain varies fastest. An empty domain list yields a single
/// empty tuple; any empty domain yields nothing.
#[derive(Debug, Clone)]
pub struct CartesianProduct {
    domains: Vec<Vec<Value>>,
    indices: Vec<usize>,
    done: bool,
}

impl CartesianProduct {
    pub fn new(domains: Vec<Vec<Value>>) -> Self {
        let done = domains.iter().any(Vec::is_empty);
        let indices = vec![0; domains.len()];
        Self {
            domains,
            indices,
            done,
        }
    }
}

impl Iterator for CartesianProduct {
    type Item = Vec<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = self
            .indices
            .iter()
            .zip(&self.domains)
            .map(|(&i, d)| d[i].clone())
            .collect();

        // Odometer increment.
        let mut pos = self.domains.len();
        loop {
            if pos == 0 {
                self.done = true;
                break;
            }
            pos -= 1;
            self.indices[pos] += 1;
            if self.indices[pos] < self.domains[pos].len() {
                break;
            }
            self.indices[pos] = 0;
        }
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::assignment;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn combinations_follow_index_order() {
        let c = combinations(&['a', 'b', 'c'], 2);
        assert_eq!(c, vec![vec!['a', 'b'], vec!['a', 'c'], vec!['b', 'c']]);
        assert_eq!(combinations(&['a'], 0), vec![Vec::<char>::new()]);
        assert!(combinations(&['a'], 2).is_empty());
    }

    #[test]
    fn powerset_defaults_exclude_empty_and_full() {
        let p = powerset(&[1, 2, 3], PowersetOptions::default()).unwrap();
        assert_eq!(p.len(), 6);
        assert!(p.iter().all(|s| !s.is_empty() && s.len() < 3));
    }

    #[test]
    fn powerset_reverse_is_largest_first() {
        let p = powerset(&[1, 2, 3], PowersetOptions::proper_descending()).unwrap();
        assert_eq!(p[0].len(), 2);
        assert_eq!(p.last().unwrap().len(), 1);
    }

    #[test]
    fn powerset_full_range() {
        let opts = PowersetOptions {
            include_empty: true,
            include_full: true,
            ..Default::default()
        };
        assert_eq!(powerset(&[1, 2, 3], opts).unwrap().len(), 8);
        assert_eq!(powerset::<u8>(&[], opts).unwrap(), vec![Vec::<u8>::new()]);
    }

    #[test]
    fn powerset_bad_length_errors() {
        let err = powerset(&[1, 2], PowersetOptions::exact(3)).unwrap_err();
        assert_eq!(err, SubsetError::InvalidLength { length: 3, max: 2 });
    }

    #[test]
    fn subevents_keep_values() {
        let event = assignment([("a", 1), ("b", 0)]);
        let subs = subevents(&event, PowersetOptions::default()).unwrap();
        assert_eq!(subs, vec![assignment([("a", 1)]), assignment([("b", 0)])]);
    }

    #[test]
    fn shuffled_by_size_keeps_size_classes() {
        let mut rng = StdRng::seed_from_u64(7);
        let s = subsets(
            &[1, 2, 3, 4],
            PowersetOptions::non_empty(),
            SubsetOrder::ShuffledBySize,
            &mut rng,
        )
        .unwrap();
        assert_eq!(s.len(), 15);
        assert!(s.windows(2).all(|w| w[0].len() <= w[1].len()));
    }

    #[test]
    fn cartesian_product_counts() {
        let domains: Vec<Vec<Value>> =
            vec![vec![0.into(), 1.into()], vec![0.into(), 1.into(), 2.into()]];
        assert_eq!(product_size(&domains), Some(6));
        let all: Vec<_> = CartesianProduct::new(domains).collect();
        assert_eq!(all.len(), 6);
        assert_eq!(all[1], vec![Value::Int(0), Value::Int(1)]);
        assert_eq!(CartesianProduct::new(vec![]).count(), 1);
        assert_eq!(CartesianProduct::new(vec![vec![]]).count(), 0);
    }
}
