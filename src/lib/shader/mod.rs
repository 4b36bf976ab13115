//! Material description compiler: node kinds, parameter parsing and graph construction.

pub mod error;
pub mod factory;
pub mod graph;
pub mod nodes;
pub mod parsing;
pub mod registry;

pub use error::{Error, LineResult};
pub use factory::{CompileResult, LineError, MaterialFactory};
