//! Normalization of the token-weight simplex.

use crate::schema::{ParameterError, TokenWeights};

/// Decimal places kept by normalization.
pub const WEIGHT_DECIMAL_PLACES: i32 = 4;

/// Largest deviation of a normalized triple's sum from one.
///
/// Each of the three weights and the divisor are rounded to four places.
pub const SIMPLEX_TOLERANCE: f64 = 5e-4;

/// Round `value` to `places` decimal places, halves away from zero.
pub fn round_to_decimal_places(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

impl TokenWeights {
    /// Sum of the three weights.
    #[inline]
    pub fn sum(&self) -> f64 {
        self.bit_score + self.database_score + self.overlap_score
    }

    /// Rescale the weights to sum to one.
    ///
    /// The sum is rounded to four places first, then each weight is divided by
    /// it and rounded to four places. A sum that rounds to zero leaves the
    /// weights untouched and is reported as [`ParameterError::DegenerateSimplex`].
    pub fn normalize(&mut self) -> Result<(), ParameterError> {
        let sum = round_to_decimal_places(self.sum(), WEIGHT_DECIMAL_PLACES);
        if sum == 0.0 || !sum.is_finite() {
            log::warn!("Cannot normalize token weights {:?}: sum {}", self, sum);
            return Err(ParameterError::DegenerateSimplex { sum });
        }
        self.bit_score = round_to_decimal_places(self.bit_score / sum, WEIGHT_DECIMAL_PLACES);
        self.database_score =
            round_to_decimal_places(self.database_score / sum, WEIGHT_DECIMAL_PLACES);
        self.overlap_score =
            round_to_decimal_places(self.overlap_score / sum, WEIGHT_DECIMAL_PLACES);
        Ok(())
    }

    /// Whether the weights are non-negative and sum to one within rounding.
    pub fn is_normalized(&self) -> bool {
        self.to_array().iter().all(|w| *w >= 0.0) && (self.sum() - 1.0).abs() <= SIMPLEX_TOLERANCE
    }
}
