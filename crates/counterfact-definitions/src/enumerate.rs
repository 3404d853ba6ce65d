//! Finite-domain enumeration helpers shared by the theories and the solver.

use counterfact_core::errors::{DefinitionError, DefinitionResult};
use counterfact_core::subsets::CartesianProduct;
use counterfact_core::{Assignment, Value};
use counterfact_scm::{Noise, StructuralCausalModel};

/// Domains of `names`, in order. Float variables cannot be enumerated.
pub fn finite_domains(
    model: &StructuralCausalModel,
    names: &[String],
) -> DefinitionResult<Vec<Vec<Value>>> {
    names
        .iter()
        .map(|name| {
            let variable = model.variable_or_err(name)?;
            variable
                .domain()
                .ok_or_else(|| DefinitionError::UnsupportedVariable {
                    name: name.clone(),
                    reason: format!("{} support is continuous", variable.var_type()),
                })
        })
        .collect()
}

/// Zip names with one value tuple.
pub fn zip_assignment(names: &[String], values: &[Value]) -> Assignment {
    names.iter().cloned().zip(values.iter().cloned()).collect()
}

/// `assignment` restricted to `keys`; keys it lacks are skipped.
pub fn restrict<'k, I>(assignment: &Assignment, keys: I) -> Assignment
where
    I: IntoIterator<Item = &'k String>,
{
    keys.into_iter()
        .filter_map(|k| assignment.get(k).map(|v| (k.clone(), v.clone())))
        .collect()
}

/// Whether `state` agrees with every entry of `target`.
pub fn agrees(state: &Assignment, target: &Assignment) -> bool {
    target.iter().all(|(k, v)| state.get(k) == Some(v))
}

/// Every complete state reachable by enumerating the finite noise supports
/// of the model's noise-bearing variables, paired with the noise that
/// produces it. Leaves the model reset.
pub fn enumerate_states(
    model: &mut StructuralCausalModel,
) -> DefinitionResult<Vec<(Noise, Assignment)>> {
    let names = model.noise_variables();
    let mut domains = Vec::with_capacity(names.len());
    for name in &names {
        let variable = model.variable_or_err(name)?;
        if !variable.is_enumerable() {
            return Err(DefinitionError::UnsupportedVariable {
                name: name.clone(),
                reason: "float variables cannot be enumerated".to_string(),
            });
        }
        let support = model
            .structural_function(name)
            .and_then(|f| f.noise_distribution())
            .and_then(|d| d.support())
            .ok_or_else(|| DefinitionError::UnsupportedVariable {
                name: name.clone(),
                reason: "noise distribution has no finite support".to_string(),
            })?;
        domains.push(support);
    }

    model.reset();
    let mut states = Vec::new();
    for values in CartesianProduct::new(domains) {
        let noise = Noise::from(zip_assignment(&names, &values));
        let state = model.get_state(&noise)?;
        states.push((noise, state));
    }
    Ok(states)
}
