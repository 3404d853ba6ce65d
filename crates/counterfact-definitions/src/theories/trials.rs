//! Counterfactual trials shared by the theories: weak and direct
//! sufficiency, and the witness-set necessity search.
//!
//! Every trial resets the model first and intervenes inside a scope, so
//! the model is reset again when the trial returns, error or not.

use rand::seq::SliceRandom;
use tracing::trace;

use counterfact_core::errors::DefinitionResult;
use counterfact_core::subsets::{subsets, CartesianProduct, PowersetOptions, SubsetOrder};
use counterfact_core::{Assignment, Value};
use counterfact_scm::{Noise, StructuralCausalModel};

use crate::definition::{pin_to_state, CauseQuery};
use crate::diagnostic::Diagnostic;
use crate::enumerate::{agrees, finite_domains, restrict, zip_assignment};

/// Outcome of one sufficiency trial.
#[derive(Debug, Clone)]
pub struct Trial {
    pub sufficient: bool,
    /// Resulting state of the (last) intervened world.
    pub state: Assignment,
    /// Remaining-variable setting that broke sufficiency, if any.
    pub counter_setting: Option<Assignment>,
}

impl Trial {
    /// AC2b diagnostic for a failed trial.
    pub fn failure_diagnostic(&self, outcome: &Assignment) -> Diagnostic {
        Diagnostic {
            ac2b_alt_outcome: Some(restrict(&self.state, outcome.keys())),
            ac2b_alt_state: Some(self.state.clone()),
            ac2b_counter_setting: self.counter_setting.clone(),
            ..Diagnostic::default()
        }
    }
}

/// Intervene with `setting`, then `witness`, then `event`, and read the state.
fn intervened_state(
    model: &mut StructuralCausalModel,
    setting: &Assignment,
    witness: &Assignment,
    event: &Assignment,
    noise: &Noise,
) -> DefinitionResult<Assignment> {
    model.reset();
    let mut scope = model.scope();
    scope.intervene(setting)?;
    scope.intervene(witness)?;
    scope.intervene(event)?;
    Ok(scope.get_state(noise)?)
}

/// Weak sufficiency: `do(witness, event)` reproduces `outcome`.
pub fn weak_sufficiency(
    model: &mut StructuralCausalModel,
    event: &Assignment,
    witness: &Assignment,
    outcome: &Assignment,
    noise: &Noise,
) -> DefinitionResult<Trial> {
    let state = intervened_state(model, &Assignment::new(), witness, event, noise)?;
    Ok(Trial {
        sufficient: agrees(&state, outcome),
        state,
        counter_setting: None,
    })
}

/// Variables outside `event`, `outcome` and `witness`, in topological order.
pub fn remaining_variables(
    model: &StructuralCausalModel,
    event: &Assignment,
    outcome: &Assignment,
    witness: &Assignment,
) -> Vec<String> {
    model
        .topological_order()
        .iter()
        .filter(|v| !event.contains_key(*v) && !outcome.contains_key(*v) && !witness.contains_key(*v))
        .cloned()
        .collect()
}

/// Direct sufficiency: `do(witness, event)` reproduces `outcome` under
/// every assignment of the remaining variables.
pub fn direct_sufficiency(
    model: &mut StructuralCausalModel,
    event: &Assignment,
    witness: &Assignment,
    outcome: &Assignment,
    noise: &Noise,
) -> DefinitionResult<Trial> {
    let remaining = remaining_variables(model, event, outcome, witness);
    let domains = finite_domains(model, &remaining)?;

    let mut last = Assignment::new();
    for values in CartesianProduct::new(domains) {
        let setting = zip_assignment(&remaining, &values);
        let state = intervened_state(model, &setting, witness, event, noise)?;
        if !agrees(&state, outcome) {
            trace!(setting = ?setting, "direct sufficiency broken");
            return Ok(Trial {
                sufficient: false,
                state,
                counter_setting: Some(setting),
            });
        }
        last = state;
    }
    Ok(Trial {
        sufficient: true,
        state: last,
        counter_setting: None,
    })
}

/// Which trial decides that an alternative event is a counterexample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Criterion {
    Weak,
    Direct,
}

impl Criterion {
    pub fn trial(
        self,
        model: &mut StructuralCausalModel,
        event: &Assignment,
        witness: &Assignment,
        outcome: &Assignment,
        noise: &Noise,
    ) -> DefinitionResult<Trial> {
        match self {
            Self::Weak => weak_sufficiency(model, event, witness, outcome, noise),
            Self::Direct => direct_sufficiency(model, event, witness, outcome, noise),
        }
    }
}

/// Every alternative value tuple for the event variables, shuffled,
/// without the observed tuple.
pub fn shuffled_alternatives(
    model: &mut StructuralCausalModel,
    names: &[String],
    observed: &[Value],
) -> DefinitionResult<Vec<Vec<Value>>> {
    let domains = finite_domains(model, names)?;
    let mut alternatives: Vec<Vec<Value>> = CartesianProduct::new(domains)
        .filter(|values| values.as_slice() != observed)
        .collect();
    alternatives.shuffle(model.rng());
    Ok(alternatives)
}

/// Necessity by searching witness sets and alternative events.
///
/// With an explicit witness only that set is tried. Otherwise every subset
/// of the non-event, non-outcome variables is tried, smallest first and
/// shuffled within each size, the empty and full sets included. A
/// counterexample is an alternative event that fails `criterion`.
pub fn witness_search(
    model: &mut StructuralCausalModel,
    query: &CauseQuery<'_>,
    criterion: Criterion,
) -> DefinitionResult<(bool, Diagnostic)> {
    let names = query.event_names();
    let observed: Vec<Value> = query.event.values().cloned().collect();
    let alternatives = shuffled_alternatives(model, &names, &observed)?;

    let witness_sets: Vec<Vec<String>> = match query.witness {
        Some(explicit) => vec![explicit.to_vec()],
        None => {
            let candidates =
                remaining_variables(model, query.event, query.outcome, &Assignment::new());
            let options = PowersetOptions {
                include_empty: true,
                include_full: true,
                ..PowersetOptions::default()
            };
            subsets(&candidates, options, SubsetOrder::ShuffledBySize, model.rng())?
        }
    };

    let mut attempts = 0usize;
    for witness_names in &witness_sets {
        let witness = pin_to_state(witness_names, query.state)?;
        for values in &alternatives {
            attempts += 1;
            let alt_event = zip_assignment(&names, values);
            let trial = criterion.trial(model, &alt_event, &witness, query.outcome, query.noise)?;
            if !trial.sufficient {
                model.reset();
                return Ok((
                    true,
                    Diagnostic {
                        ac2a_alt_event: Some(alt_event),
                        ac2a_witness: Some(witness),
                        ac2a_alt_outcome: Some(restrict(&trial.state, query.outcome.keys())),
                        ac2a_attempts: Some(attempts),
                        ..Diagnostic::default()
                    },
                ));
            }
        }
    }

    model.reset();
    Ok((
        false,
        Diagnostic {
            ac2a_attempts: Some(attempts),
            ..Diagnostic::default()
        },
    ))
}
