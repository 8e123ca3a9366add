//! Compute module - Candidate generation and selection for weight optimization.

mod evaluation;
mod operators;
mod ordering;
mod simplex;

pub use evaluation::*;
pub use operators::*;
pub use ordering::*;
pub use simplex::*;
