//! Scoped interventions that roll back on drop.

use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};

use counterfact_core::Value;

use crate::model::StructuralCausalModel;

/// Guard over a model. On drop, the intervention overlay is restored to
/// what it was when the guard was created, on every exit path.
pub struct InterventionScope<'m> {
    model: &'m mut StructuralCausalModel,
    saved: BTreeMap<String, Value>,
}

impl<'m> InterventionScope<'m> {
    pub(crate) fn new(model: &'m mut StructuralCausalModel) -> Self {
        let saved = model.interventions().clone();
        Self { model, saved }
    }
}

impl Deref for InterventionScope<'_> {
    type Target = StructuralCausalModel;

    fn deref(&self) -> &Self::Target {
        self.model
    }
}

impl DerefMut for InterventionScope<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.model
    }
}

impl Drop for InterventionScope<'_> {
    fn drop(&mut self) {
        *self.model.interventions_mut() = std::mem::take(&mut self.saved);
    }
}
