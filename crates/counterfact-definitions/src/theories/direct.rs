//! Direct actual cause: sufficiency and necessity both quantify over every
//! setting of the variables outside event, outcome and witness.

use counterfact_core::errors::DefinitionResult;
use counterfact_scm::StructuralCausalModel;

use crate::definition::{ActualCauseDefinition, CauseQuery, Verdict};
use crate::diagnostic::Diagnostic;
use crate::theories::trials::{direct_sufficiency, witness_search, Criterion};

pub const DIRECT: &str = "direct";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectActualCause;

impl DirectActualCause {
    pub fn new() -> Self {
        Self
    }
}

impl ActualCauseDefinition for DirectActualCause {
    fn name(&self) -> &'static str {
        DIRECT
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
        diagnostic.sufficiency_definition = Some(DIRECT.to_string());
        Ok(Verdict::new(trial.sufficient, diagnostic))
    }

    fn is_necessary(
        &self,
        model: &mut StructuralCausalModel,
        query: &CauseQuery<'_>,
    ) -> DefinitionResult<Verdict> {
        let (holds, mut diagnostic) = witness_search(model, query, Criterion::Direct)?;
        diagnostic.necessity_definition = Some(DIRECT.to_string());
        Ok(Verdict::new(holds, diagnostic))
    }
}
