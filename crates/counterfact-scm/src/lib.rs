//! # counterfact-scm
//!
//! Structural causal models: a DAG of variables, one structural function per
//! variable, and an intervention overlay on top of the frozen base model.
//!
//! Evaluation is recursive and memoized through the caller's `inputs`
//! assignment. Noise is resolved lazily and cached in a [`Noise`] map.

pub mod function;
pub mod graph;
pub mod model;
pub mod noise;
pub mod scope;

pub use function::{ParentValues, StructuralFunction};
pub use graph::CausalGraph;
pub use model::StructuralCausalModel;
pub use noise::{Noise, NoiseDistribution};
pub use scope::InterventionScope;
