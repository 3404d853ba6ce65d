//! Theory implementations of actual causation.

pub mod direct;
pub mod functional;
pub mod modified_hp;
pub mod original_hp;
pub mod trials;

pub use direct::DirectActualCause;
pub use functional::{FunctionalActualCause, IvpPartition};
pub use modified_hp::ModifiedHp;
pub use original_hp::OriginalHp;
