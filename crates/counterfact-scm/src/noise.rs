//! Exogenous noise: distributions and the resolve-or-sample cache.

use std::fmt;
use std::sync::Arc;

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use counterfact_core::errors::{ScmError, ScmResult};
use counterfact_core::{Assignment, Value};

/// Sampler signature for custom distributions.
pub type Sampler = Arc<dyn Fn(&mut StdRng) -> Value + Send + Sync>;

/// A distribution over one variable's exogenous noise.
#[derive(Clone)]
pub enum NoiseDistribution {
    /// 1 with probability `p`, else 0.
    Bernoulli { p: f64 },
    /// Uniform over the inclusive integer range.
    UniformInt { low: i64, high: i64 },
    /// One of `values`, uniformly or by `weights`.
    Categorical {
        values: Vec<Value>,
        weights: Option<Vec<f64>>,
    },
    UniformFloat { low: f64, high: f64 },
    /// Arbitrary sampler with an optional declared finite support.
    Custom {
        support: Option<Vec<Value>>,
        sampler: Sampler,
    },
}

impl fmt::Debug for NoiseDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bernoulli { p } => f.debug_struct("Bernoulli").field("p", p).finish(),
            Self::UniformInt { low, high } => f
                .debug_struct("UniformInt")
                .field("low", low)
                .field("high", high)
                .finish(),
            Self::Categorical { values, weights } => f
                .debug_struct("Categorical")
                .field("values", values)
                .field("weights", weights)
                .finish(),
            Self::UniformFloat { low, high } => f
                .debug_struct("UniformFloat")
                .field("low", low)
                .field("high", high)
                .finish(),
            Self::Custom { support, .. } => {
                f.debug_struct("Custom").field("support", support).finish()
            }
        }
    }
}

impl NoiseDistribution {
    /// Fair coin over {0, 1}.
    pub fn coin() -> Self {
        Self::Bernoulli { p: 0.5 }
    }

    pub fn uniform_int(low: i64, high: i64) -> Self {
        Self::UniformInt { low, high }
    }

    pub fn choice(values: Vec<Value>) -> Self {
        Self::Categorical {
            values,
            weights: None,
        }
    }

    pub fn custom<F>(support: Option<Vec<Value>>, sampler: F) -> Self
    where
        F: Fn(&mut StdRng) -> Value + Send + Sync + 'static,
    {
        Self::Custom {
            support,
            sampler: Arc::new(sampler),
        }
    }

    /// Draw one value. `name` only labels errors.
    pub fn sample(&self, name: &str, rng: &mut StdRng) -> ScmResult<Value> {
        let invalid = |reason: String| ScmError::InvalidNoise {
            name: name.to_string(),
            reason,
        };
        match self {
            Self::Bernoulli { p } => {
                if !(0.0..=1.0).contains(p) {
                    return Err(invalid(format!("bernoulli p={p} outside [0, 1]")));
                }
                Ok(Value::from(rng.gen_bool(*p)))
            }
            Self::UniformInt { low, high } => {
                if low > high {
                    return Err(invalid(format!("empty range [{low}, {high}]")));
                }
                Ok(Value::Int(rng.gen_range(*low..=*high)))
            }
            Self::Categorical { values, weights } => match weights {
                None => values
                    .choose(rng)
                    .cloned()
                    .ok_or_else(|| invalid("no categories".to_string())),
                Some(weights) => {
                    if weights.len() != values.len() {
                        return Err(invalid("weights and values differ in length".to_string()));
                    }
                    let index = WeightedIndex::new(weights).map_err(|e| invalid(e.to_string()))?;
                    Ok(values[index.sample(rng)].clone())
                }
            },
            Self::UniformFloat { low, high } => {
                if !low.is_finite() || !high.is_finite() || !(high - low).is_finite() {
                    return Err(invalid(format!("unbounded range [{low}, {high}]")));
                }
                if low > high {
                    return Err(invalid(format!("empty range [{low}, {high}]")));
                }
                Ok(Value::Float(rng.gen_range(*low..=*high)))
            }
            Self::Custom { sampler, .. } => Ok(sampler(rng)),
        }
    }

    /// Every value the distribution can produce, when finite.
    pub fn support(&self) -> Option<Vec<Value>> {
        match self {
            Self::Bernoulli { .. } => Some(vec![Value::Int(0), Value::Int(1)]),
            Self::UniformInt { low, high } => Some((*low..=*high).map(Value::Int).collect()),
            Self::Categorical { values, .. } => Some(values.clone()),
            Self::UniformFloat { .. } => None,
            Self::Custom { support, .. } => support.clone(),
        }
    }
}

/// A noise assignment: one exogenous value per variable, filled lazily.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Noise(Assignment);

impl Noise {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_assignment(&self) -> &Assignment {
        &self.0
    }

    /// Resolve-or-sample the noise for `name`.
    ///
    /// A cached value wins. Otherwise a value is drawn from `distribution`
    /// and cached. Without a distribution there is no noise (`None`).
    pub fn resolve(
        &mut self,
        name: &str,
        distribution: Option<&NoiseDistribution>,
        rng: &mut StdRng,
    ) -> ScmResult<Option<Value>> {
        if let Some(value) = self.0.get(name) {
            return Ok(Some(value.clone()));
        }
        let Some(distribution) = distribution else {
            return Ok(None);
        };
        let value = distribution.sample(name, rng)?;
        self.0.insert(name.to_string(), value.clone());
        Ok(Some(value))
    }
}

impl From<Assignment> for Noise {
    fn from(assignment: Assignment) -> Self {
        Self(assignment)
    }
}

impl From<Noise> for Assignment {
    fn from(noise: Noise) -> Self {
        noise.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use counterfact_core::assignment;
    use rand::SeedableRng;

    #[test]
    fn resolve_prefers_cached_value() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut noise = Noise::from(assignment([("a", 1)]));
        let v = noise
            .resolve("a", Some(&NoiseDistribution::uniform_int(5, 9)), &mut rng)
            .unwrap();
        assert_eq!(v, Some(Value::Int(1)));
    }

    #[test]
    fn resolve_samples_once_and_caches() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut noise = Noise::new();
        let dist = NoiseDistribution::uniform_int(0, 100);
        let first = noise.resolve("a", Some(&dist), &mut rng).unwrap();
        let second = noise.resolve("a", Some(&dist), &mut rng).unwrap();
        assert_eq!(first, second);
        assert_eq!(noise.len(), 1);
    }

    #[test]
    fn resolve_without_distribution_is_none() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut noise = Noise::new();
        assert_eq!(noise.resolve("a", None, &mut rng).unwrap(), None);
        assert!(noise.is_empty());
    }

    #[test]
    fn invalid_distributions_error() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(NoiseDistribution::Bernoulli { p: 1.5 }.sample("x", &mut rng).is_err());
        assert!(NoiseDistribution::uniform_int(3, 1).sample("x", &mut rng).is_err());
        assert!(NoiseDistribution::choice(vec![]).sample("x", &mut rng).is_err());
    }

    #[test]
    fn unbounded_float_ranges_error() {
        let mut rng = StdRng::seed_from_u64(1);
        for (low, high) in [
            (f64::NEG_INFINITY, 0.0),
            (0.0, f64::INFINITY),
            (f64::NAN, 1.0),
            (f64::MIN, f64::MAX),
        ] {
            let err = NoiseDistribution::UniformFloat { low, high }
                .sample("x", &mut rng)
                .unwrap_err();
            assert!(matches!(err, ScmError::InvalidNoise { .. }), "{low}..{high}: {err:?}");
        }
        let ok = NoiseDistribution::UniformFloat { low: -1.0, high: 1.0 }.sample("x", &mut rng);
        assert!(matches!(ok, Ok(Value::Float(f)) if (-1.0..=1.0).contains(&f)));
    }

    #[test]
    fn samples_stay_in_support() {
        let mut rng = StdRng::seed_from_u64(3);
        let dist = NoiseDistribution::Categorical {
            values: vec![(-1).into(), 0.into(), 1.into()],
            weights: Some(vec![0.2, 0.3, 0.5]),
        };
        let support = dist.support().unwrap();
        for _ in 0..50 {
            assert!(support.contains(&dist.sample("q", &mut rng).unwrap()));
        }
    }
}
