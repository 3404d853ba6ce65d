//! Causal variables: type, support, and value validation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{ScmError, ScmResult};
use crate::values::Value;

/// The declared type of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableType {
    Bool,
    Int,
    Float,
    Discrete,
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Discrete => "discrete",
        };
        f.write_str(s)
    }
}

/// A validated support. The shape always matches the variable type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Support {
    Bool,
    IntRange { low: i64, high: i64 },
    FloatRange { low: f64, high: f64 },
    Discrete { values: Vec<Value> },
}

/// A causal variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    name: String,
    var_type: VariableType,
    support: Support,
}

impl Variable {
    /// Validate `support` against `var_type` and build the variable.
    ///
    /// bool: a 2-element list. int: `[low, high]` integers, low <= high.
    /// float: `[low, high]` numbers, low <= high. discrete: any non-empty list.
    pub fn new(
        name: impl Into<String>,
        var_type: VariableType,
        support: &[Value],
    ) -> ScmResult<Self> {
        let name = name.into();
        let invalid = |reason: &str| ScmError::InvalidSupport {
            name: name.clone(),
            var_type: var_type.to_string(),
            reason: reason.to_string(),
        };

        let support = match var_type {
            VariableType::Bool => {
                if support.len() != 2 {
                    return Err(invalid("bool support must have exactly 2 elements"));
                }
                Support::Bool
            }
            VariableType::Int => {
                let [low, high] = support else {
                    return Err(invalid("int support must be a [low, high] pair"));
                };
                let (Some(low), Some(high)) = (low.as_i64(), high.as_i64()) else {
                    return Err(invalid("int support bounds must be integers"));
                };
                if low > high {
                    return Err(invalid("low bound exceeds high bound"));
                }
                Support::IntRange { low, high }
            }
            VariableType::Float => {
                let [low, high] = support else {
                    return Err(invalid("float support must be a [low, high] pair"));
                };
                let (Some(low), Some(high)) = (low.as_f64(), high.as_f64()) else {
                    return Err(invalid("float support bounds must be numeric"));
                };
                if low.is_nan() || high.is_nan() || low > high {
                    return Err(invalid("low bound exceeds high bound"));
                }
                Support::FloatRange { low, high }
            }
            VariableType::Discrete => {
                if support.is_empty() {
                    return Err(invalid("discrete support must not be empty"));
                }
                Support::Discrete {
                    values: support.to_vec(),
                }
            }
        };

        Ok(Self {
            name,
            var_type,
            support,
        })
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            var_type: VariableType::Bool,
            support: Support::Bool,
        }
    }

    pub fn integer(name: impl Into<String>, low: i64, high: i64) -> ScmResult<Self> {
        Self::new(name, VariableType::Int, &[Value::Int(low), Value::Int(high)])
    }

    pub fn float(name: impl Into<String>, low: f64, high: f64) -> ScmResult<Self> {
        Self::new(name, VariableType::Float, &[Value::Float(low), Value::Float(high)])
    }

    pub fn discrete(name: impl Into<String>, values: Vec<Value>) -> ScmResult<Self> {
        Self::new(name, VariableType::Discrete, &values)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn var_type(&self) -> VariableType {
        self.var_type
    }

    pub fn support(&self) -> &Support {
        &self.support
    }

    /// Whether the domain is finite and can be enumerated.
    pub fn is_enumerable(&self) -> bool {
        self.var_type != VariableType::Float
    }

    /// Every value in the domain, in support order. `None` for floats.
    pub fn domain(&self) -> Option<Vec<Value>> {
        match &self.support {
            Support::Bool => Some(vec![Value::Int(0), Value::Int(1)]),
            Support::IntRange { low, high } => Some((*low..=*high).map(Value::Int).collect()),
            Support::Discrete { values } => Some(values.clone()),
            Support::FloatRange { .. } => None,
        }
    }

    /// Check that `value` lies in this variable's support.
    pub fn validate_value(&self, value: &Value) -> ScmResult<()> {
        let reject = |reason: String| ScmError::InvalidIntervention {
            name: self.name.clone(),
            value: value.to_string(),
            reason,
        };

        match &self.support {
            Support::Bool => match value.as_i64() {
                Some(0) | Some(1) => Ok(()),
                _ => Err(reject("bool variables accept only 0 or 1".to_string())),
            },
            Support::IntRange { low, high } => match value.as_i64() {
                Some(v) if (*low..=*high).contains(&v) => Ok(()),
                Some(_) => Err(reject(format!("outside [{low}, {high}]"))),
                None => Err(reject("int variables accept only integral values".to_string())),
            },
            Support::FloatRange { low, high } => match value.as_f64() {
                Some(v) if v >= *low && v <= *high => Ok(()),
                Some(_) => Err(reject(format!("outside [{low}, {high}]"))),
                None => Err(reject("float variables accept only numeric values".to_string())),
            },
            Support::Discrete { values } => {
                if values.contains(value) {
                    Ok(())
                } else {
                    Err(reject("not a member of the discrete support".to_string()))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_support_needs_two_elements() {
        let err = Variable::new("a", VariableType::Bool, &[Value::Int(0)]).unwrap_err();
        assert!(matches!(err, ScmError::InvalidSupport { .. }));
        assert!(Variable::new("a", VariableType::Bool, &[0.into(), 1.into()]).is_ok());
    }

    #[test]
    fn int_range_rejects_inverted_bounds() {
        assert!(Variable::integer("m", 3, 1).is_err());
        let err = Variable::new("m", VariableType::Int, &[Value::Float(0.5), 2.into()]);
        assert!(err.is_err());
    }

    #[test]
    fn discrete_rejects_empty() {
        assert!(Variable::discrete("q", vec![]).is_err());
    }

    #[test]
    fn domains() {
        assert_eq!(
            Variable::integer("m", 0, 2).unwrap().domain().unwrap(),
            vec![Value::Int(0), Value::Int(1), Value::Int(2)]
        );
        assert!(Variable::float("f", 0.0, 1.0).unwrap().domain().is_none());
    }

    #[test]
    fn value_validation() {
        let b = Variable::boolean("b");
        assert!(b.validate_value(&Value::Int(1)).is_ok());
        assert!(b.validate_value(&Value::Int(2)).is_err());

        let i = Variable::integer("i", 0, 3).unwrap();
        assert!(i.validate_value(&Value::Float(2.0)).is_ok());
        assert!(i.validate_value(&Value::Float(2.5)).is_err());
        assert!(i.validate_value(&Value::Int(4)).is_err());

        let f = Variable::float("f", 0.0, 1.0).unwrap();
        assert!(f.validate_value(&Value::Float(0.5)).is_ok());
        assert!(f.validate_value(&Value::from("x")).is_err());

        let d = Variable::discrete("d", vec![(-1).into(), 0.into(), 1.into()]).unwrap();
        assert!(d.validate_value(&Value::Int(-1)).is_ok());
        assert!(d.validate_value(&Value::Int(2)).is_err());
    }
}
