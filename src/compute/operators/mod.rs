//! Candidate generation for the weight search.
//!
//! All operators are methods on [`ParameterRng`], the single random stream of
//! a run. Seeding it once makes every generated vector reproducible, as long
//! as candidates are generated serially in a fixed order.
//!
//! - `mutation`: half-normal perturbation of one weight with safe subtraction
//! - `neighbor`: annealing-biased choice of which weight to perturb
//! - `recombination`: uniform crossover of two parents

mod mutation;
mod neighbor;
mod recombination;

pub use neighbor::p_mutate_same_parameter;

use rand::prelude::*;

use crate::schema::{
    DatabaseParameters, OptimizerConfig, Origin, ParameterError, Parameters, TokenWeights,
};

/// Random number generator wrapper for parameter vector operations.
pub struct ParameterRng {
    rng: StdRng,
}

impl ParameterRng {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create with random seed.
    pub fn random() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Create from the configured seed, falling back to entropy.
    pub fn from_config(config: &OptimizerConfig) -> Self {
        match config.random_seed {
            Some(seed) => Self::new(seed),
            None => Self::random(),
        }
    }

    /// Generate a random parameter vector.
    ///
    /// Token weights are multiples of one tenth, normalized afterwards. Each
    /// database gets a whole-number bit-score weight and a weight that is a
    /// multiple of ten.
    pub fn random_parameters(
        &mut self,
        config: &OptimizerConfig,
    ) -> Result<Parameters, ParameterError> {
        let init = &config.init;
        let token_weights = TokenWeights::new(
            self.multiple_of(0.1, init.token_tenths),
            self.multiple_of(0.1, init.token_tenths),
            self.multiple_of(0.1, init.token_tenths),
        );
        let mut params = Parameters::new(token_weights)?;

        for name in &config.databases {
            let bit_score_weight = self.multiple_of(1.0, init.bit_score_weight);
            let weight = 10 * u64::from(self.rng.gen_range(
                init.database_weight_tens.0..=init.database_weight_tens.1,
            ));
            params.databases.insert(
                name.clone(),
                DatabaseParameters {
                    weight,
                    bit_score_weight,
                },
            );
        }

        params.origin = Some(Origin::Random);
        Ok(params)
    }

    /// `unit * k` for a uniformly drawn `k` in the inclusive range.
    fn multiple_of(&mut self, unit: f64, range: (u32, u32)) -> f64 {
        unit * f64::from(self.rng.gen_range(range.0..=range.1))
    }

    /// Pick one of the databases held by `params` uniformly at random.
    pub fn random_database<'a>(&mut self, params: &'a Parameters) -> Option<&'a str> {
        params
            .databases
            .keys()
            .choose(&mut self.rng)
            .map(String::as_str)
    }

    /// Generate next u64 for seeding child RNGs.
    pub fn next_seed(&mut self) -> u64 {
        self.rng.r#gen()
    }
}
