// Limb geometry: pure mappings from a bend angle to chord length and
// draw distance for a uniformly bending circular-arc limb.
use crate::constants::MIN_DIVISION_THRESHOLD;
use crate::inputs::{BowError, BowParameters};
use serde::{Deserialize, Serialize};

/// Geometry capability: given a bend angle in (0, π), produce the chord
/// length spanned by the string and the draw distance of the string's
/// midpoint.
///
/// Implementations are pure; all limb parameters come in by reference.
pub trait GeometryModel {
    /// Straight-line distance between the limb tips at bend angle `theta`.
    fn chord_length(&self, theta: f64, params: &BowParameters) -> f64;

    /// Displacement of the string midpoint along the draw axis at bend
    /// angle `theta`. Fails with `BowError::Domain` when the chord is
    /// longer than the string (ℓ(θ) > l0), i.e. the string cannot close.
    fn draw_distance(&self, theta: f64, params: &BowParameters) -> Result<f64, BowError>;

    /// Closed-form slopes (dℓ/dθ, dx/dθ) where the formulation has them.
    ///
    /// Returns `None` when the formulation has no closed forms, or when
    /// the angle lies outside the string-closure domain; the analytic
    /// force strategy requires `Some` and rejects geometries without it.
    fn slopes(&self, _theta: f64, _params: &BowParameters) -> Option<(f64, f64)> {
        None
    }
}

/// Half-chord projection onto the draw axis, shared by both formulations:
/// h = ½·√(l0² − ℓ²). Domain requires ℓ ≤ l0.
fn half_chord_projection(
    theta: f64,
    chord: f64,
    params: &BowParameters,
) -> Result<f64, BowError> {
    let l0 = params.string_length;
    if chord > l0 {
        return Err(BowError::Domain {
            theta,
            chord,
            string_length: l0,
        });
    }
    // max(0) absorbs the fp-negative gap right at the rest state
    let gap = (l0 * l0 - chord * chord).max(0.0);
    Ok(0.5 * gap.sqrt())
}

/// Half-angle formulation
///
/// The bend parameter θ is the full arc angle of the curled limb:
///   ℓ(θ) = (2L/θ)·sin(θ/2)
///   x(θ) = s(θ) + h(θ)
/// where s(θ) = (L/θ)·(1 − cos(θ/2)) is the limb-tip sag along the draw
/// axis and h(θ) = ½·√(l0² − ℓ(θ)²) the half-chord projection.
///
/// Note ℓ has its minimum 2L/π at θ = π, so a rest angle only exists for
/// l0 in (2L/π, L); shorter strings fail calibration.
#[derive(Debug, Clone, Copy, Default)]
pub struct HalfAngleGeometry;

impl GeometryModel for HalfAngleGeometry {
    fn chord_length(&self, theta: f64, params: &BowParameters) -> f64 {
        (2.0 * params.limb_length / theta) * (theta / 2.0).sin()
    }

    fn draw_distance(&self, theta: f64, params: &BowParameters) -> Result<f64, BowError> {
        let chord = self.chord_length(theta, params);
        let h = half_chord_projection(theta, chord, params)?;
        let sag = (params.limb_length / theta) * (1.0 - (theta / 2.0).cos());
        Ok(sag + h)
    }
}

/// Arc-angle formulation
///
/// The bend parameter a is the half arc angle:
///   ℓ(a) = L·sin(a)/a
///   d(a) = ½·√(l0² − ℓ(a)²)
/// with closed-form slopes
///   dℓ/da = L·(a·cos a − sin a)/a²
///   dd/da = −ℓ·(dℓ/da)/(4d)
#[derive(Debug, Clone, Copy, Default)]
pub struct ArcAngleGeometry;

impl GeometryModel for ArcAngleGeometry {
    fn chord_length(&self, theta: f64, params: &BowParameters) -> f64 {
        params.limb_length * theta.sin() / theta
    }

    fn draw_distance(&self, theta: f64, params: &BowParameters) -> Result<f64, BowError> {
        let chord = self.chord_length(theta, params);
        half_chord_projection(theta, chord, params)
    }

    fn slopes(&self, theta: f64, params: &BowParameters) -> Option<(f64, f64)> {
        let chord = self.chord_length(theta, params);
        let chord_slope =
            params.limb_length * (theta * theta.cos() - theta.sin()) / (theta * theta);
        let draw = half_chord_projection(theta, chord, params).ok()?;
        // dd/da diverges as d -> 0 at the rest state; the +inf limit makes
        // the derived force go to zero there, which is the physical limit
        let draw_slope = if draw > MIN_DIVISION_THRESHOLD {
            -chord * chord_slope / (4.0 * draw)
        } else {
            f64::INFINITY
        };
        Some((chord_slope, draw_slope))
    }
}

/// Geometry formulation selector for configuration and CLI use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeometryKind {
    HalfAngle,
    ArcAngle,
}

impl GeometryKind {
    pub fn model(self) -> &'static dyn GeometryModel {
        match self {
            GeometryKind::HalfAngle => &HalfAngleGeometry,
            GeometryKind::ArcAngle => &ArcAngleGeometry,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inputs::StiffnessSpec;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn test_params(string_length: f64) -> BowParameters {
        BowParameters::new(1.0, string_length, StiffnessSpec::Direct(100.0)).unwrap()
    }

    #[test]
    fn test_chord_approaches_limb_length_at_small_bend() {
        let params = test_params(0.9);
        // A nearly straight limb spans almost its full arc length
        assert_relative_eq!(
            HalfAngleGeometry.chord_length(1e-6, &params),
            1.0,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            ArcAngleGeometry.chord_length(1e-6, &params),
            1.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_chord_strictly_decreasing() {
        let params = test_params(0.9);
        for geometry in [
            &HalfAngleGeometry as &dyn GeometryModel,
            &ArcAngleGeometry as &dyn GeometryModel,
        ] {
            let mut previous = f64::INFINITY;
            for i in 1..200 {
                let theta = i as f64 * (PI - 2e-6) / 200.0 + 1e-6;
                let chord = geometry.chord_length(theta, &params);
                assert!(
                    chord < previous,
                    "chord not decreasing at theta={theta}: {chord} >= {previous}"
                );
                previous = chord;
            }
        }
    }

    #[test]
    fn test_formulations_agree_on_chord() {
        // The half-angle chord at arc angle θ equals the arc-angle chord
        // at a = θ/2: (2L/θ)·sin(θ/2) = L·sin(a)/a
        let params = test_params(0.9);
        for i in 1..50 {
            let a = i as f64 * 1.5 / 50.0 + 0.01;
            assert_relative_eq!(
                HalfAngleGeometry.chord_length(2.0 * a, &params),
                ArcAngleGeometry.chord_length(a, &params),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_draw_distance_rejects_open_string() {
        // Near zero bend the chord is close to L > l0 and the string
        // cannot span it
        let params = test_params(0.75);
        let result = ArcAngleGeometry.draw_distance(0.1, &params);
        assert!(matches!(result, Err(BowError::Domain { .. })));
    }

    #[test]
    fn test_draw_distance_bounded_by_half_string() {
        let params = test_params(0.75);
        for i in 0..100 {
            let a = 1.3 + i as f64 * (PI - 1e-4 - 1.3) / 100.0;
            let d = ArcAngleGeometry.draw_distance(a, &params).unwrap();
            assert!(d > 0.0);
            assert!(d <= params.string_length / 2.0 + 1e-12);
        }
    }

    #[test]
    fn test_half_angle_draw_includes_sag() {
        // x = s + h must exceed the bare half-chord projection
        let params = test_params(0.9);
        let theta = 2.0;
        let chord = HalfAngleGeometry.chord_length(theta, &params);
        let h = 0.5 * (params.string_length.powi(2) - chord * chord).sqrt();
        let x = HalfAngleGeometry.draw_distance(theta, &params).unwrap();
        assert!(x > h);
    }

    #[test]
    fn test_arc_angle_slopes_match_finite_differences() {
        let params = test_params(0.75);
        let step = 1e-7;
        for a in [1.5, 1.8, 2.2, 2.5] {
            let (chord_slope, draw_slope) = ArcAngleGeometry.slopes(a, &params).unwrap();

            let chord_fd = (ArcAngleGeometry.chord_length(a + step, &params)
                - ArcAngleGeometry.chord_length(a - step, &params))
                / (2.0 * step);
            assert_relative_eq!(chord_slope, chord_fd, epsilon = 1e-5);

            let draw_fd = (ArcAngleGeometry.draw_distance(a + step, &params).unwrap()
                - ArcAngleGeometry.draw_distance(a - step, &params).unwrap())
                / (2.0 * step);
            assert_relative_eq!(draw_slope, draw_fd, max_relative = 1e-4);
        }
    }

    #[test]
    fn test_half_angle_has_no_closed_form_slopes() {
        let params = test_params(0.9);
        assert!(HalfAngleGeometry.slopes(2.0, &params).is_none());
    }
}
