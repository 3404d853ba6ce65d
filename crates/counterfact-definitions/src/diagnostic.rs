//! Diagnostic record accumulated by the four actual-cause checks.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use counterfact_core::{Assignment, Value};

/// Expected (from the event or outcome) vs. actual (from the state).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mismatch {
    pub expected: Value,
    pub actual: Value,
}

/// Everything the checks reported. Fields stay `None` (or empty) when the
/// check that fills them did not run or found nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub definition: Option<String>,
    pub sufficiency_definition: Option<String>,
    pub necessity_definition: Option<String>,

    // AC1
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub incorrect_events: BTreeMap<String, Mismatch>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub incorrect_outcomes: BTreeMap<String, Mismatch>,

    // AC2b
    pub ac2b_alt_outcome: Option<Assignment>,
    pub ac2b_alt_state: Option<Assignment>,
    /// Setting of the remaining variables under which the outcome failed.
    pub ac2b_counter_setting: Option<Assignment>,
    /// Invariance-preserving variables required for this state.
    pub ivp: Option<Vec<String>>,

    // AC2a
    pub ac2a_alt_event: Option<Assignment>,
    pub ac2a_witness: Option<Assignment>,
    pub ac2a_alt_outcome: Option<Assignment>,
    pub ac2a_attempts: Option<usize>,

    // AC3
    pub ac3_smaller_cause: Option<Assignment>,

    pub is_factual: Option<bool>,
    pub is_sufficient: Option<bool>,
    pub is_necessary: Option<bool>,
    pub is_minimal: Option<bool>,
}

impl Diagnostic {
    pub fn for_definition(name: &str) -> Self {
        Self {
            definition: Some(name.to_string()),
            ..Self::default()
        }
    }

    /// Fold `other` into `self`. Values set in `other` win.
    pub fn merge(&mut self, other: Diagnostic) {
        fn take<T>(slot: &mut Option<T>, incoming: Option<T>) {
            if incoming.is_some() {
                *slot = incoming;
            }
        }

        take(&mut self.definition, other.definition);
        take(&mut self.sufficiency_definition, other.sufficiency_definition);
        take(&mut self.necessity_definition, other.necessity_definition);
        self.incorrect_events.extend(other.incorrect_events);
        self.incorrect_outcomes.extend(other.incorrect_outcomes);
        take(&mut self.ac2b_alt_outcome, other.ac2b_alt_outcome);
        take(&mut self.ac2b_alt_state, other.ac2b_alt_state);
        take(&mut self.ac2b_counter_setting, other.ac2b_counter_setting);
        take(&mut self.ivp, other.ivp);
        take(&mut self.ac2a_alt_event, other.ac2a_alt_event);
        take(&mut self.ac2a_witness, other.ac2a_witness);
        take(&mut self.ac2a_alt_outcome, other.ac2a_alt_outcome);
        take(&mut self.ac2a_attempts, other.ac2a_attempts);
        take(&mut self.ac3_smaller_cause, other.ac3_smaller_cause);
        take(&mut self.is_factual, other.is_factual);
        take(&mut self.is_sufficient, other.is_sufficient);
        take(&mut self.is_necessary, other.is_necessary);
        take(&mut self.is_minimal, other.is_minimal);
    }
}
