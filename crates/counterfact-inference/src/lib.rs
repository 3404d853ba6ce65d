//! # counterfact-inference
//!
//! Searches a finite model for every minimal actual cause of an outcome,
//! in one observed state or across every state the model can reach.

pub mod exhaustive;
pub mod table;

pub use exhaustive::{ActualCauses, ExhaustiveSearch, FoundCause};
pub use table::{CauseRow, CauseTable};
