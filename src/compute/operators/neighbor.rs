//! Neighbor generation with a hill-climbing bias.
//!
//! A neighbor differs from its parent in exactly one slot. When the previous
//! accepted move raised the evaluation score, the slot mutated last time is
//! chosen again with probability [`p_mutate_same_parameter`], so the walk
//! keeps climbing in a direction that paid off.

use rand::Rng;

use crate::schema::{OptimizerConfig, Origin, ParameterError, ParameterSlot, Parameters};

use super::ParameterRng;

/// Probability of mutating the previously mutated slot again.
///
/// Zero when the score did not increase (or no increase is known), otherwise
/// `(e^-(1 - Δ) + s) / (e^0 + s)`. Strictly increasing on `(0, 1)`, tending
/// to `(e^-1 + s) / (1 + s)` as Δ approaches zero. Evaluation scores lie in `[0, 1]`, so larger
/// increases cannot occur; they are clamped to certainty.
pub fn p_mutate_same_parameter(score_increase: Option<f64>, scale: f64) -> f64 {
    match score_increase {
        Some(increase) if increase > 0.0 => {
            let p = ((-(1.0 - increase)).exp() + scale) / (0f64.exp() + scale);
            p.min(1.0)
        }
        _ => 0.0,
    }
}

impl ParameterRng {
    /// Uniformly random slot index in `0..slot_count`.
    pub fn random_slot_index(&mut self, config: &OptimizerConfig) -> usize {
        self.rng.gen_range(0..config.slot_count())
    }

    /// Choose the slot index to mutate for a neighbor of `parent`.
    ///
    /// The acceptance draw only happens when the score increased and the
    /// parent records a mutated slot.
    pub fn choose_slot_index(
        &mut self,
        parent: &Parameters,
        score_increase: Option<f64>,
        config: &OptimizerConfig,
    ) -> usize {
        if let Some(last) = parent.last_mutated
            && score_increase.is_some_and(|increase| increase > 0.0)
        {
            let p = p_mutate_same_parameter(score_increase, config.p_mutate_same_parameter_scale);
            if self.rng.r#gen::<f64>() < p {
                log::debug!("Repeating mutation of slot {} (p = {:.4})", last, p);
                return last;
            }
        }
        self.random_slot_index(config)
    }

    /// Clone `parent` and mutate exactly one slot of the clone.
    ///
    /// `score_increase` is the change in average evaluation score observed on
    /// the previous accepted move. The neighbor records the mutated slot, has
    /// no fitness and is tagged as a mutation.
    pub fn neighbor(
        &mut self,
        parent: &Parameters,
        score_increase: Option<f64>,
        config: &OptimizerConfig,
    ) -> Result<Parameters, ParameterError> {
        let index = self.choose_slot_index(parent, score_increase, config);
        let slot = ParameterSlot::from_index(index, config.databases.len())?;

        let mut neighbor = parent.clone();
        self.mutate_slot(&mut neighbor, slot, config)?;

        neighbor.last_mutated = Some(index);
        neighbor.reset_fitness();
        neighbor.origin = Some(Origin::Mutation);
        Ok(neighbor)
    }
}
