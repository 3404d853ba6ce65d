//! The structural causal model: base graph and functions, plus an
//! intervention overlay.

use std::collections::{BTreeMap, HashMap};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, trace};

use counterfact_core::config::ScmConfig;
use counterfact_core::errors::{ScmError, ScmResult};
use counterfact_core::{Assignment, Value, Variable, VariableType};

use crate::function::StructuralFunction;
use crate::graph::CausalGraph;
use crate::noise::Noise;
use crate::scope::InterventionScope;

/// A structural causal model.
///
/// The base model (variables, graph, functions) changes only through
/// `add_variable`, `set_structural_function` and `freeze`. Interventions
/// live in a separate overlay: an intervened variable evaluates to its
/// intervened value and has no effective parents. `reset` clears the overlay.
#[derive(Debug, Clone)]
pub struct StructuralCausalModel {
    variables: HashMap<String, Variable>,
    graph: CausalGraph,
    functions: HashMap<String, StructuralFunction>,
    interventions: BTreeMap<String, Value>,
    topological_order: Vec<String>,
    frozen: bool,
    rng: StdRng,
}

impl Default for StructuralCausalModel {
    fn default() -> Self {
        Self::new()
    }
}

impl StructuralCausalModel {
    /// An empty model with an entropy-seeded RNG.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// An empty model whose noise draws and searches are reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn from_config(config: &ScmConfig) -> Self {
        match config.seed {
            Some(seed) => Self::with_seed(seed),
            None => Self::new(),
        }
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            variables: HashMap::new(),
            graph: CausalGraph::new(),
            functions: HashMap::new(),
            interventions: BTreeMap::new(),
            topological_order: Vec::new(),
            frozen: false,
            rng,
        }
    }

    // ---- construction ----

    /// Register a variable, validating its support.
    pub fn add_variable(
        &mut self,
        name: &str,
        var_type: VariableType,
        support: &[Value],
    ) -> ScmResult<()> {
        let variable = Variable::new(name, var_type, support)?;
        self.insert_variable(variable)
    }

    pub fn insert_variable(&mut self, variable: Variable) -> ScmResult<()> {
        if self.variables.contains_key(variable.name()) {
            return Err(ScmError::DuplicateVariable {
                name: variable.name().to_string(),
            });
        }
        self.graph.add_node(variable.name());
        self.variables.insert(variable.name().to_string(), variable);
        self.refresh_order()
    }

    pub fn add_variables<I>(&mut self, variables: I) -> ScmResult<()>
    where
        I: IntoIterator<Item = Variable>,
    {
        for variable in variables {
            self.insert_variable(variable)?;
        }
        Ok(())
    }

    /// Install `function` as the structural function of `name`.
    ///
    /// Replaces any previous incoming edges with `parents -> name`.
    /// Fails without changing the model if the edges would close a cycle.
    pub fn set_structural_function(
        &mut self,
        name: &str,
        function: StructuralFunction,
    ) -> ScmResult<()> {
        if !self.variables.contains_key(name) {
            return Err(ScmError::UnknownVariable {
                name: name.to_string(),
            });
        }
        self.graph.set_parents(name, function.parents())?;
        self.functions.insert(name.to_string(), function);
        self.refresh_order()
    }

    pub fn set_structural_functions<I, S>(&mut self, functions: I) -> ScmResult<()>
    where
        I: IntoIterator<Item = (S, StructuralFunction)>,
        S: AsRef<str>,
    {
        for (name, function) in functions {
            self.set_structural_function(name.as_ref(), function)?;
        }
        Ok(())
    }

    /// Make the current live model the baseline that `reset` returns to.
    ///
    /// Active interventions are folded into the base as constant functions.
    pub fn freeze(&mut self) -> ScmResult<()> {
        let overlay = std::mem::take(&mut self.interventions);
        for (name, value) in overlay {
            self.graph.set_parents(&name, &[])?;
            self.functions
                .insert(name, StructuralFunction::constant(value));
        }
        self.frozen = true;
        self.refresh_order()?;
        debug!(variables = self.variables.len(), "model frozen");
        Ok(())
    }

    fn refresh_order(&mut self) -> ScmResult<()> {
        self.topological_order = self.graph.topological_order()?;
        Ok(())
    }

    // ---- interventions ----

    /// Apply `do(name = value)`.
    pub fn do_intervention(&mut self, name: &str, value: impl Into<Value>) -> ScmResult<()> {
        let value = value.into();
        let variable = self.variable_or_err(name)?;
        variable.validate_value(&value)?;
        trace!(variable = name, value = %value, "intervention applied");
        self.interventions.insert(name.to_string(), value);
        Ok(())
    }

    /// Apply `do` for every entry, in order. Not atomic: entries applied
    /// before a failing one stay applied.
    pub fn intervene(&mut self, interventions: &Assignment) -> ScmResult<()> {
        for (name, value) in interventions {
            self.do_intervention(name, value.clone())?;
        }
        Ok(())
    }

    /// Clear every active intervention.
    pub fn reset(&mut self) {
        if !self.interventions.is_empty() {
            trace!(count = self.interventions.len(), "interventions cleared");
        }
        self.interventions.clear();
    }

    /// Interventions applied through the returned guard are rolled back
    /// when it drops.
    pub fn scope(&mut self) -> InterventionScope<'_> {
        InterventionScope::new(self)
    }

    pub(crate) fn interventions_mut(&mut self) -> &mut BTreeMap<String, Value> {
        &mut self.interventions
    }

    // ---- evaluation ----

    /// Value of `name`, memoized through `inputs`.
    ///
    /// Resolution order: active intervention, then `inputs`, then the
    /// structural function with parents resolved recursively and noise
    /// resolved (or sampled and cached) in `noise`.
    pub fn evaluate(
        &mut self,
        name: &str,
        inputs: &mut Assignment,
        noise: &mut Noise,
    ) -> ScmResult<Value> {
        if let Some(value) = self.interventions.get(name) {
            let value = value.clone();
            inputs.insert(name.to_string(), value.clone());
            return Ok(value);
        }
        if let Some(value) = inputs.get(name) {
            return Ok(value.clone());
        }
        let function = self
            .functions
            .get(name)
            .cloned()
            .ok_or_else(|| ScmError::UnknownVariable {
                name: name.to_string(),
            })?;

        for parent in function.parents() {
            if !inputs.contains_key(parent) {
                self.evaluate(parent, inputs, noise)?;
            }
        }

        let noise_value = noise.resolve(name, function.noise_distribution(), &mut self.rng)?;
        let value = function.compute(name, inputs, noise_value.as_ref())?;
        inputs.insert(name.to_string(), value.clone());
        Ok(value)
    }

    /// Complete state under `noise`. Missing noise is sampled for this call
    /// only; `noise` itself is left untouched.
    pub fn get_state(&mut self, noise: &Noise) -> ScmResult<Assignment> {
        let mut noise = noise.clone();
        self.resolve_state(&mut noise)
    }

    /// Complete state under `noise`, caching any sampled noise into it.
    pub fn resolve_state(&mut self, noise: &mut Noise) -> ScmResult<Assignment> {
        let mut inputs = Assignment::new();
        let order = self.topological_order.clone();
        for name in &order {
            self.evaluate(name, &mut inputs, noise)?;
        }
        Ok(inputs)
    }

    /// `n` independent states, resampling all noise per draw.
    pub fn sample(&mut self, n: usize) -> ScmResult<Vec<Assignment>> {
        (0..n)
            .map(|_| self.resolve_state(&mut Noise::new()))
            .collect()
    }

    // ---- queries ----

    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.get(name)
    }

    pub fn variable_or_err(&self, name: &str) -> ScmResult<&Variable> {
        self.variables
            .get(name)
            .ok_or_else(|| ScmError::UnknownVariable {
                name: name.to_string(),
            })
    }

    /// Variables in topological order.
    pub fn variables(&self) -> impl Iterator<Item = &Variable> + '_ {
        self.topological_order
            .iter()
            .filter_map(|name| self.variables.get(name))
    }

    pub fn topological_order(&self) -> &[String] {
        &self.topological_order
    }

    /// Sort `names` by topological position; unknown names go last.
    pub fn sort_topologically(&self, names: &mut [String]) {
        let position = |n: &String| {
            self.topological_order
                .iter()
                .position(|t| t == n)
                .unwrap_or(usize::MAX)
        };
        names.sort_by_key(position);
    }

    pub fn structural_function(&self, name: &str) -> Option<&StructuralFunction> {
        self.functions.get(name)
    }

    pub fn interventions(&self) -> &BTreeMap<String, Value> {
        &self.interventions
    }

    pub fn is_intervened(&self, name: &str) -> bool {
        self.interventions.contains_key(name)
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Effective parents: none for an intervened variable.
    pub fn parents(&self, name: &str) -> ScmResult<Vec<String>> {
        if self.is_intervened(name) {
            self.variable_or_err(name)?;
            return Ok(Vec::new());
        }
        self.graph.parents(name)
    }

    pub fn children(&self, name: &str) -> ScmResult<Vec<String>> {
        let children = self.graph.children(name)?;
        Ok(children
            .into_iter()
            .filter(|c| !self.is_intervened(c))
            .collect())
    }

    /// Number of effective incoming edges of `name`.
    pub fn incoming_edges(&self, name: &str) -> ScmResult<usize> {
        self.parents(name).map(|p| p.len())
    }

    /// Variables whose value depends on exogenous noise, topologically ordered.
    pub fn noise_variables(&self) -> Vec<String> {
        self.topological_order
            .iter()
            .filter(|name| !self.is_intervened(name))
            .filter(|name| {
                self.functions
                    .get(*name)
                    .is_some_and(|f| f.noise_distribution().is_some())
            })
            .cloned()
            .collect()
    }

    /// The model's RNG, shared by noise sampling and search shuffles.
    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::ParentValues;
    use crate::noise::NoiseDistribution;
    use counterfact_core::assignment;

    /// a -> b, b = a
    fn chain() -> StructuralCausalModel {
        let mut m = StructuralCausalModel::with_seed(0);
        m.add_variables([Variable::boolean("a"), Variable::boolean("b")])
            .unwrap();
        m.set_structural_function("a", StructuralFunction::exogenous(NoiseDistribution::coin()))
            .unwrap();
        m.set_structural_function(
            "b",
            StructuralFunction::new(["a"], |p: &ParentValues<'_>, _: Option<&Value>| {
                p.get("a").cloned()
            }),
        )
        .unwrap();
        m.freeze().unwrap();
        m
    }

    #[test]
    fn duplicate_variable_rejected() {
        let mut m = chain();
        let err = m.insert_variable(Variable::boolean("a")).unwrap_err();
        assert_eq!(err, ScmError::DuplicateVariable { name: "a".into() });
    }

    #[test]
    fn function_for_unknown_variable_rejected() {
        let mut m = chain();
        let err = m
            .set_structural_function("zz", StructuralFunction::constant(Value::Int(0)))
            .unwrap_err();
        assert_eq!(err, ScmError::UnknownVariable { name: "zz".into() });
    }

    #[test]
    fn cyclic_function_rejected() {
        let mut m = chain();
        let err = m
            .set_structural_function(
                "a",
                StructuralFunction::new(["b"], |p: &ParentValues<'_>, _: Option<&Value>| {
                    p.get("b").cloned()
                }),
            )
            .unwrap_err();
        assert!(matches!(err, ScmError::CycleDetected { .. }));
        assert!(m.parents("a").unwrap().is_empty());
    }

    #[test]
    fn evaluate_intervened_ignores_inputs() {
        let mut m = chain();
        m.do_intervention("b", 0).unwrap();
        let mut inputs = assignment([("b", 1)]);
        let v = m.evaluate("b", &mut inputs, &mut Noise::new()).unwrap();
        assert_eq!(v, Value::Int(0));
        assert_eq!(m.incoming_edges("b").unwrap(), 0);
    }

    #[test]
    fn evaluate_uses_inputs_before_function() {
        let mut m = chain();
        let mut inputs = assignment([("b", 1)]);
        let mut noise = Noise::from(assignment([("a", 0)]));
        assert_eq!(m.evaluate("b", &mut inputs, &mut noise).unwrap(), Value::Int(1));
    }

    #[test]
    fn evaluate_recurses_through_parents() {
        let mut m = chain();
        let mut inputs = Assignment::new();
        let mut noise = Noise::from(assignment([("a", 1)]));
        assert_eq!(m.evaluate("b", &mut inputs, &mut noise).unwrap(), Value::Int(1));
        assert_eq!(inputs, assignment([("a", 1), ("b", 1)]));
    }

    #[test]
    fn get_state_leaves_noise_untouched() {
        let mut m = chain();
        let noise = Noise::new();
        let state = m.get_state(&noise).unwrap();
        assert_eq!(state.len(), 2);
        assert_eq!(state["a"], state["b"]);
        assert!(noise.is_empty());
    }

    #[test]
    fn resolve_state_caches_samples() {
        let mut m = chain();
        let mut noise = Noise::new();
        let state = m.resolve_state(&mut noise).unwrap();
        assert_eq!(noise.get("a"), Some(&state["a"]));
    }

    #[test]
    fn invalid_intervention_values() {
        let mut m = chain();
        assert!(matches!(
            m.do_intervention("a", 2),
            Err(ScmError::InvalidIntervention { .. })
        ));
        assert!(matches!(
            m.do_intervention("ghost", 0),
            Err(ScmError::UnknownVariable { .. })
        ));
    }

    #[test]
    fn intervene_is_not_atomic() {
        let mut m = chain();
        let err = m.intervene(&assignment([("a", 1), ("b", 5)]));
        assert!(err.is_err());
        assert!(m.is_intervened("a"));
        m.reset();
        assert!(m.interventions().is_empty());
    }

    #[test]
    fn freeze_folds_interventions_into_base() {
        let mut m = chain();
        m.do_intervention("a", 1).unwrap();
        m.freeze().unwrap();
        m.reset();
        assert!(m.interventions().is_empty());
        let state = m.get_state(&Noise::new()).unwrap();
        assert_eq!(state["a"], Value::Int(1));
        assert_eq!(state["b"], Value::Int(1));
        assert!(m.noise_variables().is_empty());
    }

    #[test]
    fn sample_holds_interventions_constant() {
        let mut m = chain();
        m.do_intervention("a", 0).unwrap();
        let draws = m.sample(20).unwrap();
        assert_eq!(draws.len(), 20);
        assert!(draws.iter().all(|s| s["a"] == Value::Int(0) && s["b"] == Value::Int(0)));
    }

    #[test]
    fn missing_function_is_unknown_variable() {
        let mut m = StructuralCausalModel::with_seed(0);
        m.insert_variable(Variable::boolean("x")).unwrap();
        let err = m.get_state(&Noise::new()).unwrap_err();
        assert_eq!(err, ScmError::UnknownVariable { name: "x".into() });
    }
}
