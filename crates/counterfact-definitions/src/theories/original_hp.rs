//! Original Halpern-Pearl definition (2001/2005).
//!
//! Sufficiency must hold for every setting of the variables outside the
//! event, outcome and witness. Necessity searches witness sets for an
//! alternative event that no longer produces the outcome.

use counterfact_core::errors::DefinitionResult;
use counterfact_scm::StructuralCausalModel;

use crate::definition::{ActualCauseDefinition, CauseQuery, Verdict};
use crate::diagnostic::Diagnostic;
use crate::theories::trials::{direct_sufficiency, witness_search, Criterion};

pub const ORIGINAL_HP: &str = "original_hp";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OriginalHp;

impl OriginalHp {
    pub fn new() -> Self {
        Self
    }
}

impl ActualCauseDefinition for OriginalHp {
    fn name(&self) -> &'static str {
        ORIGINAL_HP
    }

    fn is_sufficient(
        &self,
        model: &mut StructuralCausalModel,
        query: &CauseQuery<'_>,
    ) -> DefinitionResult<Verdict> {
        let witness = query.witness_assignment()?;
        let trial = direct_sufficiency(model, query.event, &witness, query.outcome, query.noise)?;
        model.reset();

        let mut diagnostic = if trial.sufficient {
            Diagnostic::default()
        } else {
            trial.failure_diagnostic(query.outcome)
        };
        diagnostic.sufficiency_definition = Some(ORIGINAL_HP.to_string());
        Ok(Verdict::new(trial.sufficient, diagnostic))
    }

    fn is_necessary(
        &self,
        model: &mut StructuralCausalModel,
        query: &CauseQuery<'_>,
    ) -> DefinitionResult<Verdict> {
        let (holds, mut diagnostic) = witness_search(model, query, Criterion::Weak)?;
        diagnostic.necessity_definition = Some(ORIGINAL_HP.to_string());
        Ok(Verdict::new(holds, diagnostic))
    }
}
