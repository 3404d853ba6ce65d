//! Structural functions: `value = f(parents, noise)`.

use std::fmt;
use std::sync::Arc;

use counterfact_core::errors::{ScmError, ScmResult};
use counterfact_core::{Assignment, Value};

use crate::noise::NoiseDistribution;

/// Compute signature shared by every structural function.
pub type ComputeFn =
    Arc<dyn Fn(&ParentValues<'_>, Option<&Value>) -> ScmResult<Value> + Send + Sync>;

fn compute_fn<F>(f: F) -> ComputeFn
where
    F: Fn(&ParentValues<'_>, Option<&Value>) -> ScmResult<Value> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Read-only view of a variable's resolved parent values.
///
/// Only declared parents are readable; anything else is a `MissingParent`.
pub struct ParentValues<'a> {
    variable: &'a str,
    parents: &'a [String],
    values: &'a Assignment,
}

impl<'a> ParentValues<'a> {
    pub fn get(&self, parent: &str) -> ScmResult<&'a Value> {
        let missing = || ScmError::MissingParent {
            variable: self.variable.to_string(),
            parent: parent.to_string(),
        };
        if !self.parents.iter().any(|p| p == parent) {
            return Err(missing());
        }
        self.values.get(parent).ok_or_else(missing)
    }

    pub fn int(&self, parent: &str) -> ScmResult<i64> {
        let value = self.get(parent)?;
        value.as_i64().ok_or_else(|| ScmError::TypeMismatch {
            name: parent.to_string(),
            expected: "int".to_string(),
            actual: value.to_string(),
        })
    }

    pub fn float(&self, parent: &str) -> ScmResult<f64> {
        let value = self.get(parent)?;
        value.as_f64().ok_or_else(|| ScmError::TypeMismatch {
            name: parent.to_string(),
            expected: "float".to_string(),
            actual: value.to_string(),
        })
    }

    pub fn truthy(&self, parent: &str) -> ScmResult<bool> {
        self.get(parent).map(Value::is_truthy)
    }

    /// Declared parents, in declaration order.
    pub fn names(&self) -> &'a [String] {
        self.parents
    }
}

/// A variable's structural function.
#[derive(Clone)]
pub struct StructuralFunction {
    parents: Vec<String>,
    compute: ComputeFn,
    noise: Option<NoiseDistribution>,
}

impl fmt::Debug for StructuralFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructuralFunction")
            .field("parents", &self.parents)
            .field("noise", &self.noise)
            .finish_non_exhaustive()
    }
}

impl StructuralFunction {
    pub fn new<I, S, F>(parents: I, compute: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&ParentValues<'_>, Option<&Value>) -> ScmResult<Value> + Send + Sync + 'static,
    {
        Self {
            parents: parents.into_iter().map(Into::into).collect(),
            compute: compute_fn(compute),
            noise: None,
        }
    }

    /// A root variable whose value is its own noise draw.
    pub fn exogenous(distribution: NoiseDistribution) -> Self {
        Self {
            parents: Vec::new(),
            compute: compute_fn(|_, noise| {
                noise.cloned().ok_or_else(|| ScmError::MissingNoise {
                    name: "<exogenous>".to_string(),
                })
            }),
            noise: Some(distribution),
        }
    }

    /// No parents, no noise, always `value`.
    pub fn constant(value: Value) -> Self {
        Self {
            parents: Vec::new(),
            compute: compute_fn(move |_, _| Ok(value.clone())),
            noise: None,
        }
    }

    pub fn with_noise(mut self, distribution: NoiseDistribution) -> Self {
        self.noise = Some(distribution);
        self
    }

    pub fn parents(&self) -> &[String] {
        &self.parents
    }

    pub fn noise_distribution(&self) -> Option<&NoiseDistribution> {
        self.noise.as_ref()
    }

    pub fn is_constant(&self) -> bool {
        self.parents.is_empty() && self.noise.is_none()
    }

    /// Evaluate for `variable` given resolved parent values in `inputs`.
    pub fn compute(
        &self,
        variable: &str,
        inputs: &Assignment,
        noise: Option<&Value>,
    ) -> ScmResult<Value> {
        if let Some(parent) = self.parents.iter().find(|p| !inputs.contains_key(*p)) {
            return Err(ScmError::MissingParent {
                variable: variable.to_string(),
                parent: parent.clone(),
            });
        }
        let view = ParentValues {
            variable,
            parents: &self.parents,
            values: inputs,
        };
        (self.compute)(&view, noise).map_err(|err| match err {
            ScmError::MissingNoise { .. } => ScmError::MissingNoise {
                name: variable.to_string(),
            },
            other => other,
        })
    }
}
