//! Functional actual causation over an invariance-preserving partition (IVP).
//!
//! Each reachable state is assigned the set of variables whose values
//! explain its outcome. The partition is filled in by callers; no search
//! for an optimal partition is performed here.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use counterfact_core::errors::{DefinitionResult, ScmError};
use counterfact_core::subsets::{powerset, PowersetOptions};
use counterfact_core::Assignment;
use counterfact_scm::{Noise, StructuralCausalModel};

use crate::definition::{ActualCauseDefinition, CauseQuery, Verdict};
use crate::diagnostic::Diagnostic;
use crate::enumerate::enumerate_states;
use crate::theories::modified_hp::ModifiedHp;

pub const FUNCTIONAL: &str = "functional";

/// Per-state IVP assignments and per-IVP member states.
///
/// IVP keys are normalised to the model's topological order.
#[derive(Debug, Clone, Default)]
pub struct IvpPartition {
    order: Vec<String>,
    state_ivp: HashMap<Assignment, Option<Vec<String>>>,
    members: HashMap<Vec<String>, Vec<Assignment>>,
}

impl IvpPartition {
    /// Empty partition over `states`, with every variable subset
    /// (empty and full included) registered as an IVP with no members.
    pub fn new(order: Vec<String>, states: impl IntoIterator<Item = Assignment>) -> DefinitionResult<Self> {
        let options = PowersetOptions {
            include_empty: true,
            include_full: true,
            ..PowersetOptions::default()
        };
        let members = powerset(&order, options)?
            .into_iter()
            .map(|key| (key, Vec::new()))
            .collect();
        let state_ivp = states.into_iter().map(|s| (s, None)).collect();
        Ok(Self {
            order,
            state_ivp,
            members,
        })
    }

    fn normalise(&self, ivp: &[String]) -> DefinitionResult<Vec<String>> {
        let wanted: BTreeSet<&String> = ivp.iter().collect();
        if let Some(unknown) = wanted.iter().find(|v| !self.order.contains(**v)) {
            return Err(ScmError::UnknownVariable {
                name: (*unknown).clone(),
            }
            .into());
        }
        Ok(self
            .order
            .iter()
            .filter(|v| wanted.contains(v))
            .cloned()
            .collect())
    }

    pub fn set_state_ivp_assignment(&mut self, state: Assignment, ivp: &[String]) -> DefinitionResult<()> {
        let key = self.normalise(ivp)?;
        self.state_ivp.insert(state, Some(key));
        Ok(())
    }

    /// `None` when the state is unknown or has no IVP yet.
    pub fn get_state_ivp_assignment(&self, state: &Assignment) -> Option<&[String]> {
        self.state_ivp
            .get(state)
            .and_then(|ivp| ivp.as_deref())
    }

    /// Replace the members of `ivp`. Duplicate states are kept once.
    pub fn set_ivp_members(
        &mut self,
        ivp: &[String],
        states: impl IntoIterator<Item = Assignment>,
    ) -> DefinitionResult<()> {
        let key = self.normalise(ivp)?;
        let mut unique: Vec<Assignment> = Vec::new();
        for state in states {
            if !unique.contains(&state) {
                unique.push(state);
            }
        }
        self.members.insert(key, unique);
        Ok(())
    }

    pub fn get_ivp_members(&self, ivp: &[String]) -> DefinitionResult<&[Assignment]> {
        let key = self.normalise(ivp)?;
        Ok(self
            .members
            .get(&key)
            .map(Vec::as_slice)
            .unwrap_or(&[]))
    }

    /// Sum over IVPs of member count times IVP size.
    pub fn partition_cost(&self) -> usize {
        self.members
            .iter()
            .map(|(key, states)| key.len() * states.len())
            .sum()
    }

    pub fn state_count(&self) -> usize {
        self.state_ivp.len()
    }
}

/// Functional actual cause: an event must cover the state's IVP and pass
/// Modified HP sufficiency. Necessity is Modified HP's; minimality is
/// vacuous.
#[derive(Debug, Clone)]
pub struct FunctionalActualCause {
    modified_hp: ModifiedHp,
    states: Vec<(Noise, Assignment)>,
    partition: IvpPartition,
}

impl FunctionalActualCause {
    /// Enumerate every reachable state of `model` and start an empty
    /// partition over them. Fails on float or unbounded noise.
    pub fn new(model: &mut StructuralCausalModel) -> DefinitionResult<Self> {
        Self::with_modified_hp(model, ModifiedHp::new())
    }

    pub fn with_modified_hp(
        model: &mut StructuralCausalModel,
        modified_hp: ModifiedHp,
    ) -> DefinitionResult<Self> {
        let states = enumerate_states(model)?;
        let partition = IvpPartition::new(
            model.topological_order().to_vec(),
            states.iter().map(|(_, s)| s.clone()),
        )?;
        debug!(states = states.len(), "ivp partition initialised");
        Ok(Self {
            modified_hp,
            states,
            partition,
        })
    }

    pub fn partition(&self) -> &IvpPartition {
        &self.partition
    }

    pub fn partition_mut(&mut self) -> &mut IvpPartition {
        &mut self.partition
    }

    /// Reachable states with the noise producing each.
    pub fn states(&self) -> &[(Noise, Assignment)] {
        &self.states
    }
}

impl ActualCauseDefinition for FunctionalActualCause {
    fn name(&self) -> &'static str {
        FUNCTIONAL
    }

    fn is_sufficient(
        &self,
        model: &mut StructuralCausalModel,
        query: &CauseQuery<'_>,
    ) -> DefinitionResult<Verdict> {
        let mut diagnostic = Diagnostic {
            sufficiency_definition: Some(FUNCTIONAL.to_string()),
            ..Diagnostic::default()
        };

        let Some(ivp) = self.partition.get_state_ivp_assignment(query.state) else {
            return Ok(Verdict::fails(diagnostic));
        };
        diagnostic.ivp = Some(ivp.to_vec());
        if !ivp.iter().all(|v| query.event.contains_key(v)) {
            return Ok(Verdict::fails(diagnostic));
        }

        let inner = self.modified_hp.is_sufficient(model, query)?;
        diagnostic.merge(inner.diagnostic);
        diagnostic.sufficiency_definition = Some(FUNCTIONAL.to_string());
        Ok(Verdict::new(inner.holds, diagnostic))
    }

    fn is_necessary(
        &self,
        model: &mut StructuralCausalModel,
        query: &CauseQuery<'_>,
    ) -> DefinitionResult<Verdict> {
        self.modified_hp.is_necessary(model, query)
    }

    fn is_minimal(
        &self,
        _model: &mut StructuralCausalModel,
        _query: &CauseQuery<'_>,
    ) -> DefinitionResult<Verdict> {
        Ok(Verdict::holds(Diagnostic::default()))
    }
}
