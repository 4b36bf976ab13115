//! Constructors of every registered [NodeKind](super::graph::NodeKind), grouped by family.

pub mod math;
pub mod parameters;
pub mod texture;
pub mod time;
