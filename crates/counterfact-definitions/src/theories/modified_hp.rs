//! Modified Halpern-Pearl definition (Halpern 2015).
//!
//! Sufficiency is weak: intervening with the event (and a witness pinned at
//! its observed values) must reproduce the outcome. Necessity looks for an
//! alternative event assignment under which it does not.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use tracing::{debug, trace};

use counterfact_core::config::{NecessityConfig, NecessitySearch};
use counterfact_core::constants::DEFAULT_MAX_ATTEMPTS;
use counterfact_core::errors::DefinitionResult;
use counterfact_core::subsets::{product_size, CartesianProduct};
use counterfact_core::Value;
use counterfact_scm::StructuralCausalModel;

use crate::definition::{ActualCauseDefinition, CauseQuery, Verdict};
use crate::diagnostic::Diagnostic;
use crate::enumerate::{finite_domains, restrict, zip_assignment};
use crate::theories::trials::weak_sufficiency;

pub const MODIFIED_HP: &str = "modified_hp";

/// The modified HP definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifiedHp {
    max_attempts: usize,
    search: NecessitySearch,
}

impl Default for ModifiedHp {
    fn default() -> Self {
        Self::new()
    }
}

impl ModifiedHp {
    pub fn new() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            search: NecessitySearch::Auto,
        }
    }

    pub fn from_config(config: &NecessityConfig) -> Self {
        Self::new()
            .with_max_attempts(config.effective_max_attempts())
            .with_search(config.effective_search())
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_search(mut self, search: NecessitySearch) -> Self {
        self.search = search;
        self
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    pub fn search(&self) -> NecessitySearch {
        self.search
    }

    /// Alternative value tuples in the order they will be tried.
    ///
    /// Exhaustive mode yields every tuple but the observed one. Random mode
    /// draws up to `max_attempts` tuples, skipping the observed one and
    /// repeats, and stops early once every tuple has been seen.
    fn alternatives(
        &self,
        model: &mut StructuralCausalModel,
        domains: Vec<Vec<Value>>,
        observed: &[Value],
    ) -> Vec<Vec<Value>> {
        let total = product_size(&domains);
        let exhaustive = match self.search {
            NecessitySearch::Exhaustive => true,
            NecessitySearch::Random => false,
            NecessitySearch::Auto => total.is_some_and(|t| t <= self.max_attempts),
        };

        if exhaustive {
            return CartesianProduct::new(domains)
                .filter(|values| values.as_slice() != observed)
                .collect();
        }

        let total = total.unwrap_or(usize::MAX);
        let mut seen: HashSet<Vec<Value>> = HashSet::new();
        seen.insert(observed.to_vec());
        let mut out = Vec::new();
        let mut attempts = 0;
        while attempts < self.max_attempts && seen.len() < total {
            attempts += 1;
            let rng = model.rng();
            let draw: Option<Vec<Value>> = domains.iter().map(|d| d.choose(&mut *rng).cloned()).collect();
            let Some(draw) = draw else {
                break;
            };
            if seen.insert(draw.clone()) {
                out.push(draw);
            }
        }
        out
    }
}

impl ActualCauseDefinition for ModifiedHp {
    fn name(&self) -> &'static str {
        MODIFIED_HP
    }

    fn is_sufficient(
        &self,
        model: &mut StructuralCausalModel,
        query: &CauseQuery<'_>,
    ) -> DefinitionResult<Verdict> {
        let witness = query.witness_assignment()?;
        let trial = weak_sufficiency(model, query.event, &witness, query.outcome, query.noise)?;

        let mut diagnostic = if trial.sufficient {
            Diagnostic::default()
        } else {
            trial.failure_diagnostic(query.outcome)
        };
        diagnostic.sufficiency_definition = Some(MODIFIED_HP.to_string());
        Ok(Verdict::new(trial.sufficient, diagnostic))
    }

    fn is_necessary(
        &self,
        model: &mut StructuralCausalModel,
        query: &CauseQuery<'_>,
    ) -> DefinitionResult<Verdict> {
        let names = query.event_names();
        let observed: Vec<Value> = query.event.values().cloned().collect();
        let domains = finite_domains(model, &names)?;
        let witness = query.witness_assignment()?;

        let alternatives = self.alternatives(model, domains, &observed);
        let mut diagnostic = Diagnostic {
            necessity_definition: Some(MODIFIED_HP.to_string()),
            ..Diagnostic::default()
        };

        for (attempt, values) in alternatives.iter().enumerate() {
            let alt_event = zip_assignment(&names, values);
            let trial = weak_sufficiency(model, &alt_event, &witness, query.outcome, query.noise)?;
            if !trial.sufficient {
                trace!(alt_event = ?alt_event, "necessity counterexample");
                diagnostic.ac2a_alt_outcome = Some(restrict(&trial.state, query.outcome.keys()));
                diagnostic.ac2a_alt_event = Some(alt_event);
                diagnostic.ac2a_witness = query.witness.map(|_| witness.clone());
                diagnostic.ac2a_attempts = Some(attempt + 1);
                model.reset();
                return Ok(Verdict::holds(diagnostic));
            }
        }

        debug!(
            tried = alternatives.len(),
            "no necessity counterexample found"
        );
        diagnostic.ac2a_attempts = Some(alternatives.len());
        model.reset();
        Ok(Verdict::fails(diagnostic))
    }
}
