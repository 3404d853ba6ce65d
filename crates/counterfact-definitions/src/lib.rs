//! # counterfact-definitions
//!
//! Formal definitions of actual causation. Each theory implements
//! [`ActualCauseDefinition`]: factuality (AC1), sufficiency (AC2b),
//! necessity (AC2a) and minimality (AC3), combined by `is_actual_cause`.
//!
//! Every check that intervenes on the model leaves it reset.

pub mod definition;
pub mod diagnostic;
pub mod enumerate;
pub mod theories;

pub use definition::{ActualCauseDefinition, CauseQuery, Verdict};
pub use diagnostic::{Diagnostic, Mismatch};
pub use theories::{
    DirectActualCause, FunctionalActualCause, IvpPartition, ModifiedHp, OriginalHp,
};
