//! Parameter vector types subject to optimization.
//!
//! A [`Parameters`] value holds the three token-score weights, the
//! per-database weights, and the bookkeeping the search needs: fitness once
//! evaluated, the slot changed by the last mutation, and where the vector
//! came from.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Weights of the token-score formula. Operators keep them summing to one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TokenWeights {
    pub bit_score: f64,
    pub database_score: f64,
    pub overlap_score: f64,
}

impl TokenWeights {
    /// Create a triple. Does not normalize.
    pub fn new(bit_score: f64, database_score: f64, overlap_score: f64) -> Self {
        Self {
            bit_score,
            database_score,
            overlap_score,
        }
    }

    /// Read one weight.
    #[inline]
    pub fn get(&self, weight: TokenWeight) -> f64 {
        match weight {
            TokenWeight::BitScore => self.bit_score,
            TokenWeight::DatabaseScore => self.database_score,
            TokenWeight::OverlapScore => self.overlap_score,
        }
    }

    /// Mutable access to one weight.
    #[inline]
    pub fn get_mut(&mut self, weight: TokenWeight) -> &mut f64 {
        match weight {
            TokenWeight::BitScore => &mut self.bit_score,
            TokenWeight::DatabaseScore => &mut self.database_score,
            TokenWeight::OverlapScore => &mut self.overlap_score,
        }
    }

    /// Weights in slot order.
    pub fn to_array(&self) -> [f64; 3] {
        [self.bit_score, self.database_score, self.overlap_score]
    }
}

/// One of the three token-score weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenWeight {
    BitScore,
    DatabaseScore,
    OverlapScore,
}

impl TokenWeight {
    /// All token weights in slot order.
    pub const ALL: [TokenWeight; 3] = [
        TokenWeight::BitScore,
        TokenWeight::DatabaseScore,
        TokenWeight::OverlapScore,
    ];
}

/// Tunable weights of a single source database.
///
/// A fresh entry is zero-valued; see [`Parameters::database_mut`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DatabaseParameters {
    /// Integer database weight.
    pub weight: u64,
    /// Description-score bit-score weight.
    pub bit_score_weight: f64,
}

/// Externally computed quality of an evaluated vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fitness {
    pub avg_evaluation_score: f64,
    pub avg_precision: f64,
    pub avg_recall: f64,
}

impl Fitness {
    pub fn new(avg_evaluation_score: f64, avg_precision: f64, avg_recall: f64) -> Self {
        Self {
            avg_evaluation_score,
            avg_precision,
            avg_recall,
        }
    }
}

/// How a vector was produced. Reporting only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Random,
    Mutation,
    Recombination,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Origin::Random => "random",
            Origin::Mutation => "mutation",
            Origin::Recombination => "recombination",
        };
        f.write_str(name)
    }
}

/// A single mutable dimension of a parameter vector.
///
/// Slot indices: `0..3` are the token weights, then two slots per database
/// in sorted order, the integer weight first and the bit-score weight second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterSlot {
    Token(TokenWeight),
    /// Integer weight of the database at this position in the sorted list.
    DatabaseWeight(usize),
    /// Bit-score weight of the database at this position in the sorted list.
    DatabaseBitScoreWeight(usize),
}

impl ParameterSlot {
    /// Map a slot index to its slot for a run with `database_count` databases.
    pub fn from_index(index: usize, database_count: usize) -> Result<Self, ParameterError> {
        let slots = 3 + 2 * database_count;
        if index >= slots {
            return Err(ParameterError::SlotOutOfRange { index, slots });
        }
        let slot = match index {
            0..=2 => ParameterSlot::Token(TokenWeight::ALL[index]),
            _ => {
                let offset = index - 3;
                if offset % 2 == 0 {
                    ParameterSlot::DatabaseWeight(offset / 2)
                } else {
                    ParameterSlot::DatabaseBitScoreWeight(offset / 2)
                }
            }
        };
        Ok(slot)
    }

    /// Slot index, inverse of [`ParameterSlot::from_index`].
    pub fn index(&self) -> usize {
        match *self {
            ParameterSlot::Token(TokenWeight::BitScore) => 0,
            ParameterSlot::Token(TokenWeight::DatabaseScore) => 1,
            ParameterSlot::Token(TokenWeight::OverlapScore) => 2,
            ParameterSlot::DatabaseWeight(db) => 3 + 2 * db,
            ParameterSlot::DatabaseBitScoreWeight(db) => 4 + 2 * db,
        }
    }
}

/// The unit of optimization.
///
/// Evaluated vectors are never changed in place; every operator works on a
/// clone. Cloning deep-copies the per-database map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameters {
    /// Token-score weights, summing to one within four decimal places.
    pub token_weights: TokenWeights,
    /// Per-database weights keyed by database identifier.
    #[serde(default)]
    pub databases: BTreeMap<String, DatabaseParameters>,
    /// Fitness, absent until evaluated.
    #[serde(default)]
    pub fitness: Option<Fitness>,
    /// Slot index changed by the mutation that produced this vector.
    #[serde(default)]
    pub last_mutated: Option<usize>,
    /// Provenance tag, absent for hand-built vectors.
    #[serde(default)]
    pub origin: Option<Origin>,
}

impl Parameters {
    /// Create a vector from token weights, normalizing them.
    pub fn new(mut token_weights: TokenWeights) -> Result<Self, ParameterError> {
        token_weights.normalize()?;
        Ok(Self {
            token_weights,
            databases: BTreeMap::new(),
            fitness: None,
            last_mutated: None,
            origin: None,
        })
    }

    /// Builder: set the weights of one database.
    pub fn with_database(mut self, name: impl Into<String>, params: DatabaseParameters) -> Self {
        self.databases.insert(name.into(), params);
        self
    }

    /// Weights of a database, zero-valued if never set.
    pub fn database(&self, name: &str) -> DatabaseParameters {
        self.databases.get(name).copied().unwrap_or_default()
    }

    /// Mutable weights of a database, inserting a zero-valued entry on first access.
    pub fn database_mut(&mut self, name: &str) -> &mut DatabaseParameters {
        self.databases.entry(name.to_string()).or_default()
    }

    /// Average evaluation score, if evaluated.
    #[inline]
    pub fn score(&self) -> Option<f64> {
        self.fitness.map(|f| f.avg_evaluation_score)
    }

    /// Whether the evaluator has scored this vector.
    #[inline]
    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }

    /// Difference in average evaluation score relative to `previous`.
    ///
    /// This is the Δ passed to the neighbor generator on the next step.
    pub fn score_increase_over(&self, previous: &Parameters) -> Option<f64> {
        Some(self.score()? - previous.score()?)
    }

    /// Drop fitness before an operator hands the vector out as a new candidate.
    pub(crate) fn reset_fitness(&mut self) {
        self.fitness = None;
    }
}

/// Equality over weights only: fitness, lineage and origin are ignored.
///
/// A database present on one side only compares as its zero-valued default.
/// Vectors from one run are expected to share the same database set.
impl PartialEq for Parameters {
    fn eq(&self, other: &Self) -> bool {
        if self.token_weights != other.token_weights {
            return false;
        }
        self.databases
            .keys()
            .chain(other.databases.keys())
            .all(|name| self.database(name) == other.database(name))
    }
}

impl Eq for Parameters {}

impl Hash for Parameters {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for weight in self.token_weights.to_array() {
            hash_f64(weight, state);
        }
        // Default entries are equal to missing ones, so they must not contribute.
        let zero = DatabaseParameters::default();
        for (name, db) in self.databases.iter().filter(|(_, db)| **db != zero) {
            name.hash(state);
            db.weight.hash(state);
            hash_f64(db.bit_score_weight, state);
        }
    }
}

/// Hash a float so that `0.0` and `-0.0` agree, matching `==`.
fn hash_f64<H: Hasher>(value: f64, state: &mut H) {
    (value + 0.0).to_bits().hash(state);
}

/// Parameter vector invariant errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParameterError {
    #[error("Token weights sum to {sum}, cannot normalize")]
    DegenerateSimplex { sum: f64 },
    #[error("Parameter slot {index} out of range (slots: {slots})")]
    SlotOutOfRange { index: usize, slots: usize },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn sample() -> Parameters {
        Parameters::new(TokenWeights::new(0.5, 0.3, 0.2))
            .unwrap()
            .with_database(
                "db1",
                DatabaseParameters {
                    weight: 100,
                    bit_score_weight: 2.5,
                },
            )
            .with_database(
                "db2",
                DatabaseParameters {
                    weight: 50,
                    bit_score_weight: 1.0,
                },
            )
    }

    #[test]
    fn test_slot_index_mapping() {
        assert_eq!(
            ParameterSlot::from_index(0, 2).unwrap(),
            ParameterSlot::Token(TokenWeight::BitScore)
        );
        assert_eq!(
            ParameterSlot::from_index(2, 2).unwrap(),
            ParameterSlot::Token(TokenWeight::OverlapScore)
        );
        assert_eq!(
            ParameterSlot::from_index(3, 2).unwrap(),
            ParameterSlot::DatabaseWeight(0)
        );
        assert_eq!(
            ParameterSlot::from_index(4, 2).unwrap(),
            ParameterSlot::DatabaseBitScoreWeight(0)
        );
        assert_eq!(
            ParameterSlot::from_index(6, 2).unwrap(),
            ParameterSlot::DatabaseBitScoreWeight(1)
        );
        assert_eq!(
            ParameterSlot::from_index(7, 2),
            Err(ParameterError::SlotOutOfRange { index: 7, slots: 7 })
        );
    }

    #[test]
    fn test_slot_index_roundtrip() {
        for index in 0..11 {
            let slot = ParameterSlot::from_index(index, 4).unwrap();
            assert_eq!(slot.index(), index);
        }
    }

    #[test]
    fn test_database_lazy_init() {
        let mut params = sample();
        assert_eq!(params.database("unknown"), DatabaseParameters::default());
        assert!(!params.databases.contains_key("unknown"));

        let entry = params.database_mut("unknown");
        assert_eq!(entry.weight, 0);
        assert_eq!(entry.bit_score_weight, 0.0);
        assert!(params.databases.contains_key("unknown"));
    }

    #[test]
    fn test_clone_is_deep() {
        let parent = sample();
        let mut child = parent.clone();
        child.database_mut("db1").weight = 7;
        assert_eq!(parent.database("db1").weight, 100);
        assert_eq!(child.database("db1").weight, 7);
    }

    #[test]
    fn test_equality_ignores_metadata() {
        let a = sample();
        let mut b = sample();
        b.fitness = Some(Fitness::new(0.8, 0.7, 0.9));
        b.last_mutated = Some(4);
        b.origin = Some(Origin::Mutation);
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn test_equality_detects_weight_changes() {
        let a = sample();
        let mut b = sample();
        b.database_mut("db2").bit_score_weight = 1.5;
        assert_ne!(a, b);

        let mut c = sample();
        c.token_weights.overlap_score = 0.3;
        assert_ne!(a, c);
    }

    // Vectors of one run share their database set; a key present on only one
    // side is compared against a zero-valued entry, in both directions.
    #[test]
    fn test_equality_with_differing_database_sets() {
        let a = sample();
        let b = sample().with_database(
            "db3",
            DatabaseParameters {
                weight: 10,
                bit_score_weight: 1.0,
            },
        );
        assert_ne!(a, b);
        assert_ne!(b, a);

        let mut c = sample();
        c.database_mut("db3");
        assert_eq!(a, c);
        assert_eq!(c, a);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&c));
    }

    #[test]
    fn test_score_increase() {
        let mut old = sample();
        let mut new = sample();
        assert_eq!(new.score_increase_over(&old), None);

        old.fitness = Some(Fitness::new(0.5, 0.5, 0.5));
        assert_eq!(new.score_increase_over(&old), None);

        new.fitness = Some(Fitness::new(0.75, 0.6, 0.6));
        assert_eq!(new.score_increase_over(&old), Some(0.25));
        assert_eq!(old.score_increase_over(&new), Some(-0.25));
    }

    #[test]
    fn test_origin_serialization() {
        let mut params = sample();
        params.origin = Some(Origin::Recombination);
        let json = serde_json::to_string(&params).unwrap();
        assert!(json.contains("\"recombination\""));

        let parsed: Parameters = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.origin, Some(Origin::Recombination));
        assert_eq!(parsed, params);
        assert_eq!(Origin::Mutation.to_string(), "mutation");
    }
}
