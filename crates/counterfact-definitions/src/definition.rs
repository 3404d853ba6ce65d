//! The actual-cause definition trait and its query/verdict types.

use serde::{Deserialize, Serialize};
use tracing::debug;

use counterfact_core::errors::{DefinitionError, DefinitionResult, ScmError};
use counterfact_core::subsets::{subevents, PowersetOptions};
use counterfact_core::Assignment;
use counterfact_scm::{Noise, StructuralCausalModel};

use crate::diagnostic::{Diagnostic, Mismatch};

/// The inputs to every check: a candidate cause (`event`), the effect
/// (`outcome`), the observed `state`, the `noise` that produced it, and an
/// optional explicit witness set.
#[derive(Debug, Clone, Copy)]
pub struct CauseQuery<'a> {
    pub event: &'a Assignment,
    pub outcome: &'a Assignment,
    pub state: &'a Assignment,
    pub noise: &'a Noise,
    /// Variables held at their `state` values during counterfactual checks.
    pub witness: Option<&'a [String]>,
}

impl<'a> CauseQuery<'a> {
    pub fn new(
        event: &'a Assignment,
        outcome: &'a Assignment,
        state: &'a Assignment,
        noise: &'a Noise,
    ) -> Self {
        Self {
            event,
            outcome,
            state,
            noise,
            witness: None,
        }
    }

    pub fn with_witness(self, witness: &'a [String]) -> Self {
        Self {
            witness: Some(witness),
            ..self
        }
    }

    /// Same query about a different event.
    pub fn with_event<'b>(&self, event: &'b Assignment) -> CauseQuery<'b>
    where
        'a: 'b,
    {
        CauseQuery {
            event,
            outcome: self.outcome,
            state: self.state,
            noise: self.noise,
            witness: self.witness,
        }
    }

    /// The witness variables pinned to their observed values.
    pub fn witness_assignment(&self) -> DefinitionResult<Assignment> {
        match self.witness {
            None => Ok(Assignment::new()),
            Some(names) => pin_to_state(names, self.state),
        }
    }

    /// Event variable names.
    pub fn event_names(&self) -> Vec<String> {
        self.event.keys().cloned().collect()
    }
}

/// `names` with their values in `state`.
pub fn pin_to_state(names: &[String], state: &Assignment) -> DefinitionResult<Assignment> {
    names
        .iter()
        .map(|name| {
            state
                .get(name)
                .map(|v| (name.clone(), v.clone()))
                .ok_or_else(|| {
                    DefinitionError::Scm(ScmError::UnknownVariable { name: name.clone() })
                })
        })
        .collect()
}

/// Result of one check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub holds: bool,
    pub diagnostic: Diagnostic,
}

impl Verdict {
    pub fn new(holds: bool, diagnostic: Diagnostic) -> Self {
        Self { holds, diagnostic }
    }

    pub fn holds(diagnostic: Diagnostic) -> Self {
        Self::new(true, diagnostic)
    }

    pub fn fails(diagnostic: Diagnostic) -> Self {
        Self::new(false, diagnostic)
    }
}

/// A formal theory of actual causation.
///
/// Theories override `is_sufficient` and `is_necessary`; the remaining
/// checks have shared implementations. Any method that intervenes on
/// `model` must leave it reset when it returns.
pub trait ActualCauseDefinition {
    /// Short identifier recorded in diagnostics.
    fn name(&self) -> &'static str;

    /// AC1: every event and outcome variable has its given value in the state.
    ///
    /// A variable missing from the state is an `UnknownVariable` error.
    fn is_factual(&self, query: &CauseQuery<'_>) -> DefinitionResult<Verdict> {
        fn mismatches(
            target: &Assignment,
            state: &Assignment,
        ) -> DefinitionResult<std::collections::BTreeMap<String, Mismatch>> {
            let mut out = std::collections::BTreeMap::new();
            for (name, expected) in target {
                let actual = state.get(name).ok_or_else(|| {
                    DefinitionError::Scm(ScmError::UnknownVariable { name: name.clone() })
                })?;
                if actual != expected {
                    out.insert(
                        name.clone(),
                        Mismatch {
                            expected: expected.clone(),
                            actual: actual.clone(),
                        },
                    );
                }
            }
            Ok(out)
        }

        let diagnostic = Diagnostic {
            incorrect_events: mismatches(query.event, query.state)?,
            incorrect_outcomes: mismatches(query.outcome, query.state)?,
            ..Diagnostic::default()
        };
        let holds = diagnostic.incorrect_events.is_empty() && diagnostic.incorrect_outcomes.is_empty();
        Ok(Verdict::new(holds, diagnostic))
    }

    /// AC2b.
    fn is_sufficient(
        &self,
        _model: &mut StructuralCausalModel,
        _query: &CauseQuery<'_>,
    ) -> DefinitionResult<Verdict> {
        Err(DefinitionError::NotImplemented {
            definition: self.name().to_string(),
            operation: "is_sufficient".to_string(),
        })
    }

    /// AC2a.
    fn is_necessary(
        &self,
        _model: &mut StructuralCausalModel,
        _query: &CauseQuery<'_>,
    ) -> DefinitionResult<Verdict> {
        Err(DefinitionError::NotImplemented {
            definition: self.name().to_string(),
            operation: "is_necessary".to_string(),
        })
    }

    /// AC3: no proper, non-empty sub-event is both sufficient and necessary.
    ///
    /// Sub-events are tried largest first; the first one that passes both
    /// is reported as `ac3_smaller_cause`.
    fn is_minimal(
        &self,
        model: &mut StructuralCausalModel,
        query: &CauseQuery<'_>,
    ) -> DefinitionResult<Verdict> {
        if query.event.len() <= 1 {
            return Ok(Verdict::holds(Diagnostic::default()));
        }

        let candidates = subevents(query.event, PowersetOptions::proper_descending())?;

        for sub_event in &candidates {
            model.reset();
            let sub_query = query.with_event(sub_event);
            if !self.is_sufficient(model, &sub_query)?.holds {
                continue;
            }
            if self.is_necessary(model, &sub_query)?.holds {
                model.reset();
                debug!(
                    definition = self.name(),
                    smaller = sub_event.len(),
                    "smaller cause found"
                );
                return Ok(Verdict::fails(Diagnostic {
                    ac3_smaller_cause: Some(sub_event.clone()),
                    ..Diagnostic::default()
                }));
            }
        }
        model.reset();
        Ok(Verdict::holds(Diagnostic::default()))
    }

    /// Factual, then sufficient, then necessary, then minimal. Stops at the
    /// first failure; later flags stay `None`.
    fn is_actual_cause(
        &self,
        model: &mut StructuralCausalModel,
        query: &CauseQuery<'_>,
    ) -> DefinitionResult<Verdict> {
        let mut diagnostic = Diagnostic::for_definition(self.name());

        let factual = self.is_factual(query)?;
        diagnostic.merge(factual.diagnostic);
        diagnostic.is_factual = Some(factual.holds);
        if !factual.holds {
            return Ok(Verdict::fails(diagnostic));
        }

        let sufficient = self.is_sufficient(model, query)?;
        diagnostic.merge(sufficient.diagnostic);
        diagnostic.is_sufficient = Some(sufficient.holds);
        if !sufficient.holds {
            return Ok(Verdict::fails(diagnostic));
        }

        let necessary = self.is_necessary(model, query)?;
        diagnostic.merge(necessary.diagnostic);
        diagnostic.is_necessary = Some(necessary.holds);
        if !necessary.holds {
            return Ok(Verdict::fails(diagnostic));
        }

        let minimal = self.is_minimal(model, query)?;
        diagnostic.merge(minimal.diagnostic);
        diagnostic.is_minimal = Some(minimal.holds);

        debug!(
            definition = self.name(),
            event = ?query.event,
            holds = minimal.holds,
            "actual cause check complete"
        );
        Ok(Verdict::new(minimal.holds, diagnostic))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use counterfact_core::assignment;

    struct Bare;

    impl ActualCauseDefinition for Bare {
        fn name(&self) -> &'static str {
            "bare"
        }
    }

    #[test]
    fn unimplemented_checks_fail_loudly() {
        let mut model = StructuralCausalModel::with_seed(0);
        let (event, outcome, state) = (
            assignment([("a", 1)]),
            assignment([("b", 1)]),
            assignment([("a", 1), ("b", 1)]),
        );
        let noise = Noise::new();
        let q = CauseQuery::new(&event, &outcome, &state, &noise);

        let err = Bare.is_sufficient(&mut model, &q).unwrap_err();
        assert_eq!(
            err,
            DefinitionError::NotImplemented {
                definition: "bare".into(),
                operation: "is_sufficient".into()
            }
        );
        assert!(matches!(
            Bare.is_necessary(&mut model, &q),
            Err(DefinitionError::NotImplemented { .. })
        ));
        // Factual still passes, so the orchestrator reaches sufficiency.
        assert!(Bare.is_actual_cause(&mut model, &q).is_err());
    }

    #[test]
    fn factual_reports_missing_state_variable() {
        let (event, outcome, state) = (
            assignment([("ghost", 1)]),
            Assignment::new(),
            assignment([("a", 1)]),
        );
        let noise = Noise::new();
        let q = CauseQuery::new(&event, &outcome, &state, &noise);
        let err = Bare.is_factual(&q).unwrap_err();
        assert_eq!(
            err,
            DefinitionError::Scm(ScmError::UnknownVariable {
                name: "ghost".into()
            })
        );
    }

    #[test]
    fn witness_assignment_pins_state_values() {
        let (event, outcome, state) = (
            assignment([("a", 1)]),
            assignment([("c", 1)]),
            assignment([("a", 1), ("b", 0), ("c", 1)]),
        );
        let noise = Noise::new();
        let witness = vec!["b".to_string()];
        let q = CauseQuery::new(&event, &outcome, &state, &noise).with_witness(&witness);
        assert_eq!(q.witness_assignment().unwrap(), assignment([("b", 0)]));
    }
}
