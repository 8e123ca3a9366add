//! Selection order over evaluated parameter vectors.

use std::cmp::Ordering;

use crate::schema::{Parameters, TokenWeight};

/// Compare two vectors for selection.
///
/// Ascending by average evaluation score, ties broken by the token weights
/// (bit-score, database-score, overlap-score), then per database in the given
/// sorted order by bit-score weight and integer weight. If either vector is
/// unevaluated the result is `Equal`. A NaN score ranks below every number.
pub fn compare_parameters(a: &Parameters, b: &Parameters, databases: &[String]) -> Ordering {
    let (Some(score_a), Some(score_b)) = (a.score(), b.score()) else {
        return Ordering::Equal;
    };

    let mut ordering = cmp_score(score_a, score_b);
    for weight in TokenWeight::ALL {
        ordering = ordering
            .then_with(|| cmp_f64(a.token_weights.get(weight), b.token_weights.get(weight)));
    }
    for name in databases {
        let (db_a, db_b) = (a.database(name), b.database(name));
        ordering = ordering
            .then_with(|| cmp_f64(db_a.bit_score_weight, db_b.bit_score_weight))
            .then_with(|| db_a.weight.cmp(&db_b.weight));
    }
    ordering
}

fn cmp_score(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => cmp_f64(a, b),
    }
}

// Adding 0.0 maps -0.0 to 0.0 so `total_cmp` agrees with `==` on weights.
fn cmp_f64(a: f64, b: f64) -> Ordering {
    (a + 0.0).total_cmp(&(b + 0.0))
}

/// Sort best first. Unevaluated vectors go last, keeping their relative order.
pub fn sort_best_first(population: &mut [Parameters], databases: &[String]) {
    population.sort_by(|a, b| {
        b.is_evaluated()
            .cmp(&a.is_evaluated())
            .then_with(|| compare_parameters(b, a, databases))
    });
}

/// The best evaluated vector, ignoring unevaluated ones.
pub fn best_of<'a>(population: &'a [Parameters], databases: &[String]) -> Option<&'a Parameters> {
    population
        .iter()
        .filter(|p| p.is_evaluated())
        .max_by(|a, b| compare_parameters(a, b, databases))
}
