//! Evaluation seam to the downstream annotation pipeline.

use rayon::prelude::*;

use crate::schema::{Fitness, Parameters};

/// Scores a candidate parameter vector against a reference set.
///
/// Implementations run the full annotation pipeline; this crate never
/// computes fitness itself.
pub trait Evaluator: Sync {
    fn evaluate(&self, parameters: &Parameters) -> Fitness;
}

impl<F> Evaluator for F
where
    F: Fn(&Parameters) -> Fitness + Sync,
{
    fn evaluate(&self, parameters: &Parameters) -> Fitness {
        self(parameters)
    }
}

/// Evaluate every candidate without fitness, in parallel.
///
/// Candidates must be generated before calling this; evaluation never
/// touches the random stream. Returns the number of evaluations performed.
pub fn evaluate_pending<E: Evaluator>(candidates: &mut [Parameters], evaluator: &E) -> usize {
    let pending = candidates.iter().filter(|c| !c.is_evaluated()).count();
    log::debug!("Evaluating {} of {} candidates", pending, candidates.len());

    candidates
        .par_iter_mut()
        .filter(|candidate| !candidate.is_evaluated())
        .for_each(|candidate| {
            let fitness = evaluator.evaluate(candidate);
            if fitness.avg_evaluation_score.is_nan() {
                log::warn!("Evaluator returned a NaN score; candidate will rank last");
            }
            candidate.fitness = Some(fitness);
        });

    pending
}
