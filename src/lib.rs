//! Weight tuner - Optimization core for description-ranking weights.
//!
//! This crate tunes the weights of the multi-term scoring function used to
//! rank candidate descriptions for biological sequences. It provides the
//! parameter vector, the operators generating new candidates, and the order
//! used to select survivors. Running the annotation pipeline to score a
//! candidate is left to an [`Evaluator`](compute::Evaluator), and the outer
//! optimization loop to the caller.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Configuration and parameter vector types
//! - `compute`: Simplex normalization, mutation, neighbor generation,
//!   recombination, ordering and parallel evaluation
//!
//! # Example
//!
//! ```rust,no_run
//! use weight_tuner::{
//!     compute::{ParameterRng, evaluate_pending, best_of},
//!     schema::{Fitness, OptimizerConfig, Parameters},
//! };
//!
//! let config = OptimizerConfig::new(["swissprot", "tair", "trembl"]).with_seed(42);
//! let mut rng = ParameterRng::from_config(&config);
//!
//! // Stand-in for the annotation pipeline.
//! let evaluator = |p: &Parameters| {
//!     let score = 1.0 - (p.token_weights.bit_score - 0.5).abs();
//!     Fitness::new(score, score, score)
//! };
//!
//! let mut accepted = vec![rng.random_parameters(&config)?];
//! evaluate_pending(&mut accepted, &evaluator);
//! let mut accepted = accepted.remove(0);
//! let mut increase = None;
//!
//! for _ in 0..100 {
//!     // Generate serially, evaluate in parallel.
//!     let mut batch = (0..4)
//!         .map(|_| rng.neighbor(&accepted, increase, &config))
//!         .collect::<Result<Vec<_>, _>>()?;
//!     evaluate_pending(&mut batch, &evaluator);
//!
//!     let best = best_of(&batch, &config.databases).cloned().unwrap();
//!     increase = best.score_increase_over(&accepted);
//!     if increase.is_some_and(|d| d > 0.0) {
//!         accepted = best;
//!     }
//! }
//!
//! println!("Best score: {:?}", accepted.score());
//! # Ok::<(), weight_tuner::schema::ParameterError>(())
//! ```

pub mod compute;
pub mod schema;

// Re-export commonly used types
pub use compute::{Evaluator, ParameterRng, compare_parameters};
pub use schema::{Fitness, OptimizerConfig, Origin, ParameterError, Parameters};
