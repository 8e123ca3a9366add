//! Uniform crossover of two parameter vectors.

use rand::Rng;

use crate::schema::{OptimizerConfig, Origin, ParameterError, Parameters, TokenWeight};

use super::ParameterRng;

impl ParameterRng {
    /// Create an offspring of `parent` and `partner`.
    ///
    /// Every token weight, and both weights of every configured database, are
    /// taken verbatim from one parent or the other with probability 1/2 each.
    /// The token weights are then renormalized. The offspring has no fitness,
    /// no mutation lineage and is tagged as a recombination.
    ///
    /// Databases are visited in configured order; one missing from a parent
    /// contributes its zero-valued default.
    pub fn recombine(
        &mut self,
        parent: &Parameters,
        partner: &Parameters,
        config: &OptimizerConfig,
    ) -> Result<Parameters, ParameterError> {
        let mut offspring = self.crossover(parent, partner, config);
        offspring.token_weights.normalize()?;
        offspring.reset_fitness();
        offspring.last_mutated = None;
        offspring.origin = Some(Origin::Recombination);
        Ok(offspring)
    }

    /// Slot-wise coin flips between the parents, without normalization.
    fn crossover(
        &mut self,
        parent: &Parameters,
        partner: &Parameters,
        config: &OptimizerConfig,
    ) -> Parameters {
        let mut offspring = parent.clone();

        for weight in TokenWeight::ALL {
            if self.rng.gen_bool(0.5) {
                *offspring.token_weights.get_mut(weight) = partner.token_weights.get(weight);
            }
        }

        for name in &config.databases {
            let donor = partner.database(name);
            if self.rng.gen_bool(0.5) {
                offspring.database_mut(name).bit_score_weight = donor.bit_score_weight;
            }
            if self.rng.gen_bool(0.5) {
                offspring.database_mut(name).weight = donor.weight;
            }
        }

        offspring
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Fitness, TokenWeights};
    use proptest::prelude::*;

    fn config() -> OptimizerConfig {
        OptimizerConfig::new(["db1", "db2", "db3"]).with_mutator(0.01, 0.005)
    }

    /// All eight token triples a crossover can pick, normalized.
    fn normalized_token_choices(a: &TokenWeights, b: &TokenWeights) -> Vec<TokenWeights> {
        (0..8u8)
            .map(|mask| {
                let pick = |bit: u8, w: TokenWeight| {
                    if mask & (1 << bit) == 0 { a.get(w) } else { b.get(w) }
                };
                let mut choice = TokenWeights::new(
                    pick(0, TokenWeight::BitScore),
                    pick(1, TokenWeight::DatabaseScore),
                    pick(2, TokenWeight::OverlapScore),
                );
                choice.normalize().unwrap();
                choice
            })
            .collect()
    }

    #[test]
    fn test_recombine_metadata() {
        let mut rng = ParameterRng::new(42);
        let config = config();
        let mut a = rng.random_parameters(&config).unwrap();
        let mut b = rng.random_parameters(&config).unwrap();
        a.fitness = Some(Fitness::new(0.4, 0.4, 0.4));
        a.last_mutated = Some(2);
        b.fitness = Some(Fitness::new(0.6, 0.6, 0.6));

        let child = rng.recombine(&a, &b, &config).unwrap();
        assert!(child.fitness.is_none());
        assert!(child.last_mutated.is_none());
        assert_eq!(child.origin, Some(Origin::Recombination));
        assert!(child.token_weights.is_normalized());
        assert_eq!(a.last_mutated, Some(2));
    }

    #[test]
    fn test_recombine_identical_parents() {
        let mut rng = ParameterRng::new(1);
        let config = config();
        let a = rng.random_parameters(&config).unwrap();

        let child = rng.recombine(&a, &a.clone(), &config).unwrap();
        assert_eq!(child.databases, a.databases);
        assert!(child.token_weights.is_normalized());
    }

    #[test]
    fn test_recombine_mixes_both_parents() {
        let mut rng = ParameterRng::new(17);
        let config = config();
        let a = rng.random_parameters(&config).unwrap();
        let mut b = a.clone();
        for db in b.databases.values_mut() {
            db.weight += 1000;
        }

        let mut from_a = false;
        let mut from_b = false;
        for _ in 0..50 {
            let child = rng.recombine(&a, &b, &config).unwrap();
            for name in &config.databases {
                if child.database(name).weight >= 1000 {
                    from_b = true;
                } else {
                    from_a = true;
                }
            }
        }
        assert!(from_a && from_b);
    }

    #[test]
    fn test_recombine_missing_partner_database() {
        let mut rng = ParameterRng::new(23);
        let config = config();
        let a = rng.random_parameters(&config).unwrap();
        let mut b = rng.random_parameters(&config).unwrap();
        b.databases.remove("db3");

        for _ in 0..20 {
            let child = rng.recombine(&a, &b, &config).unwrap();
            let db3 = child.database("db3");
            assert!(db3.weight == a.database("db3").weight || db3.weight == 0);
            assert_eq!(child.databases.len(), 3);
        }
    }

    proptest! {
        #[test]
        fn prop_crossover_copies_exactly(seed in any::<u64>()) {
            let config = config();
            let mut rng = ParameterRng::new(seed);
            let a = rng.random_parameters(&config).unwrap();
            let b = rng.random_parameters(&config).unwrap();

            let raw = rng.crossover(&a, &b, &config);
            for weight in TokenWeight::ALL {
                let value = raw.token_weights.get(weight);
                prop_assert!(
                    value.to_bits() == a.token_weights.get(weight).to_bits()
                        || value.to_bits() == b.token_weights.get(weight).to_bits()
                );
            }
            for name in &config.databases {
                let (child, da, db) = (raw.database(name), a.database(name), b.database(name));
                prop_assert!(child.weight == da.weight || child.weight == db.weight);
                prop_assert!(
                    child.bit_score_weight.to_bits() == da.bit_score_weight.to_bits()
                        || child.bit_score_weight.to_bits() == db.bit_score_weight.to_bits()
                );
            }
        }

        #[test]
        fn prop_recombine_normalizes_a_crossover(seed in any::<u64>()) {
            let config = config();
            let mut rng = ParameterRng::new(seed);
            let a = rng.random_parameters(&config).unwrap();
            let b = rng.random_parameters(&config).unwrap();

            let child = rng.recombine(&a, &b, &config).unwrap();
            prop_assert!(child.token_weights.is_normalized());
            prop_assert!(
                normalized_token_choices(&a.token_weights, &b.token_weights)
                    .contains(&child.token_weights)
            );
        }
    }
}
