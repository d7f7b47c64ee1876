// Rest-state calibration: bisection for the bend angle at which the
// chord length equals the unstrung string length.
use crate::constants::{
    BEND_ANGLE_EPSILON, BISECTION_BRACKET_TOLERANCE, MAX_BISECTION_ITERATIONS,
};
use crate::geometry::GeometryModel;
use crate::inputs::{BowError, BowParameters};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Result of rest-angle calibration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationResult {
    /// Rest angle θ₀ with ℓ(θ₀) = l0
    pub rest_angle: f64,
    pub iterations_used: usize,
    /// Width of the final bisection bracket
    pub bracket_width: f64,
    /// Residual |ℓ(θ₀) − l0|
    pub chord_error: f64,
}

/// Find the unstrung rest angle θ₀ in (ε, π − ε) by bisection.
///
/// Exploits that θ ↦ ℓ(θ) is strictly decreasing: a straighter limb spans
/// a longer chord. The bracket must satisfy ℓ(lo) > l0 > ℓ(hi), which
/// holds for any valid l0 < L in the arc-angle formulation; the
/// half-angle formulation additionally needs l0 > 2L/π (its chord bottoms
/// out there at θ = π). A failed bracket is a `BowError::Convergence`.
///
/// Bisection halves the bracket until it is narrower than
/// `BISECTION_BRACKET_TOLERANCE`, capped at `MAX_BISECTION_ITERATIONS`.
pub fn find_rest_angle(
    geometry: &dyn GeometryModel,
    params: &BowParameters,
) -> Result<CalibrationResult, BowError> {
    params.validate()?;

    let l0 = params.string_length;
    let mut lo = BEND_ANGLE_EPSILON;
    let mut hi = PI - BEND_ANGLE_EPSILON;

    let chord_lo = geometry.chord_length(lo, params);
    let chord_hi = geometry.chord_length(hi, params);
    if !(chord_lo > l0 && chord_hi < l0) {
        return Err(BowError::Convergence(format!(
            "rest angle not bracketed: chord({lo:.3e}) = {chord_lo}, chord({hi:.6}) = {chord_hi}, string length = {l0}"
        )));
    }

    let mut iterations = 0;
    while (hi - lo) > BISECTION_BRACKET_TOLERANCE && iterations < MAX_BISECTION_ITERATIONS {
        iterations += 1;
        let mid = 0.5 * (lo + hi);
        if geometry.chord_length(mid, params) > l0 {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    let rest_angle = 0.5 * (lo + hi);
    Ok(CalibrationResult {
        rest_angle,
        iterations_used: iterations,
        bracket_width: hi - lo,
        chord_error: (geometry.chord_length(rest_angle, params) - l0).abs(),
    })
}
