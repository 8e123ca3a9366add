//! Single-weight mutation operators.

use rand::Rng;
use rand_distr::StandardNormal;

use crate::schema::{OptimizerConfig, ParameterError, ParameterSlot, Parameters, TokenWeight};

use super::ParameterRng;

impl ParameterRng {
    /// Mutation magnitude: `|N(mean, deviation)|` from the configured mutator.
    pub fn mutation_delta(&mut self, config: &OptimizerConfig) -> f64 {
        let noise: f64 = self.rng.sample(StandardNormal);
        (noise * config.mutator_deviation + config.mutator_mean).abs()
    }

    /// Mutation magnitude for integer database weights: `ceil(100 * delta)`,
    /// saturating at `u64::MAX`.
    pub fn database_weight_delta(&mut self, config: &OptimizerConfig) -> u64 {
        (100.0 * self.mutation_delta(config)).ceil() as u64
    }

    /// Decide whether to subtract `by` from `value`.
    ///
    /// Subtraction is only allowed when the result stays non-negative; then
    /// the direction is a fair coin. Always consumes exactly one draw.
    pub fn safe_subtract(&mut self, value: f64, by: f64) -> bool {
        let coin = self.rng.gen_bool(0.5);
        value - by >= 0.0 && coin
    }

    /// Integer variant of [`ParameterRng::safe_subtract`].
    pub fn safe_subtract_int(&mut self, value: u64, by: u64) -> bool {
        let coin = self.rng.gen_bool(0.5);
        value >= by && coin
    }

    /// Shift one token weight by a half-normal amount and renormalize the triple.
    pub fn mutate_token_weight(
        &mut self,
        params: &mut Parameters,
        weight: TokenWeight,
        config: &OptimizerConfig,
    ) -> Result<(), ParameterError> {
        let by = self.mutation_delta(config);
        let value = params.token_weights.get(weight);
        let mutated = if self.safe_subtract(value, by) {
            value - by
        } else {
            value + by
        };
        log::trace!("Token weight {:?}: {} -> {}", weight, value, mutated);
        *params.token_weights.get_mut(weight) = mutated;
        params.token_weights.normalize()
    }

    /// Shift the integer weight of `database` by `ceil(100 * delta)`.
    pub fn mutate_database_weight(
        &mut self,
        params: &mut Parameters,
        database: &str,
        config: &OptimizerConfig,
    ) {
        let by = self.database_weight_delta(config);
        let entry = params.database_mut(database);
        if self.safe_subtract_int(entry.weight, by) {
            entry.weight -= by;
        } else {
            entry.weight = entry.weight.saturating_add(by);
        }
        log::trace!("Database {} weight -> {}", database, entry.weight);
    }

    /// Shift the bit-score weight of `database` by a half-normal amount.
    pub fn mutate_database_bit_score_weight(
        &mut self,
        params: &mut Parameters,
        database: &str,
        config: &OptimizerConfig,
    ) {
        let by = self.mutation_delta(config);
        let entry = params.database_mut(database);
        if self.safe_subtract(entry.bit_score_weight, by) {
            entry.bit_score_weight -= by;
        } else {
            entry.bit_score_weight += by;
        }
        log::trace!(
            "Database {} bit-score weight -> {}",
            database,
            entry.bit_score_weight
        );
    }

    /// Apply the mutation operator belonging to `slot`.
    pub fn mutate_slot(
        &mut self,
        params: &mut Parameters,
        slot: ParameterSlot,
        config: &OptimizerConfig,
    ) -> Result<(), ParameterError> {
        match slot {
            ParameterSlot::Token(weight) => self.mutate_token_weight(params, weight, config),
            ParameterSlot::DatabaseWeight(db) | ParameterSlot::DatabaseBitScoreWeight(db) => {
                let database = config.databases.get(db).ok_or(ParameterError::SlotOutOfRange {
                    index: slot.index(),
                    slots: config.slot_count(),
                })?;
                if matches!(slot, ParameterSlot::DatabaseWeight(_)) {
                    self.mutate_database_weight(params, database, config);
                } else {
                    self.mutate_database_bit_score_weight(params, database, config);
                }
                Ok(())
            }
        }
    }
}
