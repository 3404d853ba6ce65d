//! Exhaustive search for actual causes.
//!
//! Candidate events are subsets of the non-outcome variables, smallest
//! first. A candidate that contains an already confirmed cause cannot be
//! minimal and is skipped without running the definition.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};

use counterfact_core::config::SolverConfig;
use counterfact_core::errors::{SolverError, SolverResult};
use counterfact_core::subsets::{subsets, PowersetOptions, SubsetOrder};
use counterfact_core::Assignment;
use counterfact_definitions::enumerate::{enumerate_states, restrict};
use counterfact_definitions::{ActualCauseDefinition, CauseQuery, Diagnostic};
use counterfact_scm::{Noise, StructuralCausalModel};

use crate::table::{CauseRow, CauseTable};

/// One confirmed actual cause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoundCause {
    /// Event variables, in the order the candidate was generated.
    pub variables: Vec<String>,
    pub event: Assignment,
    pub diagnostic: Diagnostic,
}

impl FoundCause {
    /// Whether every variable of this cause appears in `candidate`.
    fn is_contained_in(&self, candidate: &[String]) -> bool {
        self.variables.iter().all(|v| candidate.contains(v))
    }
}

/// Causes found by one `solve` call, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActualCauses {
    causes: Vec<FoundCause>,
}

impl ActualCauses {
    pub fn len(&self) -> usize {
        self.causes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.causes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FoundCause> {
        self.causes.iter()
    }

    /// The cause over exactly `variables`, in any order.
    pub fn get(&self, variables: &[&str]) -> Option<&FoundCause> {
        self.causes.iter().find(|c| {
            c.variables.len() == variables.len()
                && variables.iter().all(|v| c.variables.iter().any(|cv| cv == v))
        })
    }

    pub fn contains(&self, variables: &[&str]) -> bool {
        self.get(variables).is_some()
    }

    /// The events of every cause.
    pub fn events(&self) -> Vec<Assignment> {
        self.causes.iter().map(|c| c.event.clone()).collect()
    }

    fn push(&mut self, cause: FoundCause) {
        self.causes.push(cause);
    }

    fn prunes(&self, candidate: &[String]) -> bool {
        self.causes.iter().any(|c| c.is_contained_in(candidate))
    }
}

impl IntoIterator for ActualCauses {
    type Item = FoundCause;
    type IntoIter = std::vec::IntoIter<FoundCause>;

    fn into_iter(self) -> Self::IntoIter {
        self.causes.into_iter()
    }
}

/// Exhaustive solver over a model whose variables all have finite support.
pub struct ExhaustiveSearch<D> {
    model: StructuralCausalModel,
    definition: D,
    shuffle_within_size: bool,
}

impl<D: ActualCauseDefinition> ExhaustiveSearch<D> {
    /// Fails with `UnsupportedVariable` if any variable is float-valued.
    pub fn new(model: StructuralCausalModel, definition: D) -> SolverResult<Self> {
        if let Some(variable) = model.variables().find(|v| !v.is_enumerable()) {
            return Err(SolverError::UnsupportedVariable {
                name: variable.name().to_string(),
                reason: format!("{} support cannot be searched exhaustively", variable.var_type()),
            });
        }
        Ok(Self {
            model,
            definition,
            shuffle_within_size: true,
        })
    }

    pub fn from_config(
        model: StructuralCausalModel,
        definition: D,
        config: &SolverConfig,
    ) -> SolverResult<Self> {
        Ok(Self::new(model, definition)?.with_shuffle(config.effective_shuffle_within_size()))
    }

    /// Shuffle candidates within each size class (default) or keep them in
    /// topological order.
    pub fn with_shuffle(mut self, shuffle_within_size: bool) -> Self {
        self.shuffle_within_size = shuffle_within_size;
        self
    }

    pub fn model(&self) -> &StructuralCausalModel {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut StructuralCausalModel {
        &mut self.model
    }

    pub fn definition(&self) -> &D {
        &self.definition
    }

    pub fn into_parts(self) -> (StructuralCausalModel, D) {
        (self.model, self.definition)
    }

    /// Every minimal actual cause of `outcome` in `state`.
    ///
    /// Candidate variables are the state's variables minus the outcome's,
    /// taken in topological order.
    #[instrument(skip_all, fields(definition = self.definition.name()))]
    pub fn solve(
        &mut self,
        state: &Assignment,
        outcome: &Assignment,
        noise: &Noise,
    ) -> SolverResult<ActualCauses> {
        if let Some(name) = outcome.keys().find(|k| !state.contains_key(*k)) {
            return Err(SolverError::UnknownOutcome { name: name.clone() });
        }

        let candidates: Vec<String> = self
            .model
            .topological_order()
            .iter()
            .filter(|v| state.contains_key(*v) && !outcome.contains_key(*v))
            .cloned()
            .collect();
        let order = if self.shuffle_within_size {
            SubsetOrder::ShuffledBySize
        } else {
            SubsetOrder::Ordered
        };
        let candidate_sets = subsets(
            &candidates,
            PowersetOptions::non_empty(),
            order,
            self.model.rng(),
        )
        .map_err(|e| SolverError::Definition(e.into()))?;

        info!(candidates = candidate_sets.len(), "searching for actual causes");

        let mut found = ActualCauses::default();
        let mut checked = 0usize;
        for variables in candidate_sets {
            if found.prunes(&variables) {
                trace!(?variables, "pruned superset of a known cause");
                continue;
            }
            checked += 1;

            let event = restrict(state, &variables);
            let query = CauseQuery::new(&event, outcome, state, noise);
            let verdict = self.definition.is_actual_cause(&mut self.model, &query)?;
            if verdict.holds {
                debug!(?variables, "actual cause confirmed");
                found.push(FoundCause {
                    variables,
                    event,
                    diagnostic: verdict.diagnostic,
                });
            }
        }
        self.model.reset();

        info!(checked, causes = found.len(), "actual cause search complete");
        Ok(found)
    }

    /// Run `solve` in every state reachable from the finite noise supports.
    ///
    /// Columns follow topological order; the outcome variables are split
    /// out of the state columns.
    #[instrument(skip_all, fields(definition = self.definition.name()))]
    pub fn solve_all_states(&mut self, outcome_vars: &[String]) -> SolverResult<CauseTable> {
        for name in outcome_vars {
            if !self.model.contains(name) {
                return Err(SolverError::UnknownOutcome { name: name.clone() });
            }
        }

        let order = self.model.topological_order().to_vec();
        let outcome_columns: Vec<String> = order
            .iter()
            .filter(|v| outcome_vars.contains(v))
            .cloned()
            .collect();
        let state_columns: Vec<String> = order
            .iter()
            .filter(|v| !outcome_vars.contains(v))
            .cloned()
            .collect();

        let states = enumerate_states(&mut self.model)?;
        info!(states = states.len(), "solving every reachable state");

        let mut rows = Vec::with_capacity(states.len());
        for (noise, state) in states {
            let outcome = restrict(&state, &outcome_columns);
            let causes = self.solve(&state, &outcome, &noise)?;
            rows.push(CauseRow {
                noise: noise.as_assignment().clone(),
                state: state_columns.iter().map(|c| state[c].clone()).collect(),
                outcome: outcome_columns.iter().map(|c| state[c].clone()).collect(),
                causes: causes.events(),
            });
        }

        Ok(CauseTable {
            state_columns,
            outcome_columns,
            rows,
        })
    }
}
