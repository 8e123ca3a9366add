//! Schema module - Configuration and parameter vector types for weight optimization.

mod config;
mod parameters;

pub use config::*;
pub use parameters::*;
