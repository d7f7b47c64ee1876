// Stored elastic energy and draw force. Force is the derivative of
// energy with respect to draw distance, obtained through the chain rule
// F = (dU/dθ)/(dx/dθ) either from closed forms or from finite
// differences over a sampled sweep.
use crate::constants::MIN_DIVISION_THRESHOLD;
use crate::geometry::GeometryModel;
use crate::inputs::{BowError, BowParameters};
use serde::{Deserialize, Serialize};

/// Energy convention selector for configuration and CLI use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergyConventionKind {
    /// Energy measured relative to the calibrated rest angle
    Relative,
    /// Energy as a function of bend alone, rest state implicitly at zero
    Absolute,
}

/// Resolved energy convention
///
/// The two source conventions use unrelated stiffness scales; they are
/// alternative models, not unit conversions of each other.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnergyConvention {
    /// U(θ) = (B/2L)·(θ² − θ₀²), zero at the calibrated rest angle
    Relative { rest_angle: f64 },
    /// U(a) = 2B·a²/L
    Absolute,
}

impl EnergyConvention {
    /// Stored elastic energy at bend angle `theta`, in joules.
    pub fn energy(&self, theta: f64, params: &BowParameters) -> f64 {
        let b = params.bending_stiffness;
        let l = params.limb_length;
        match *self {
            EnergyConvention::Relative { rest_angle } => {
                (b / (2.0 * l)) * (theta * theta - rest_angle * rest_angle)
            }
            EnergyConvention::Absolute => 2.0 * b * theta * theta / l,
        }
    }

    /// dU/dθ at bend angle `theta`.
    pub fn energy_slope(&self, theta: f64, params: &BowParameters) -> f64 {
        let b = params.bending_stiffness;
        let l = params.limb_length;
        match *self {
            EnergyConvention::Relative { .. } => b * theta / l,
            EnergyConvention::Absolute => 4.0 * b * theta / l,
        }
    }
}

/// Force derivative strategy selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForceStrategy {
    /// Centered finite differences of the sampled energy and draw-distance
    /// arrays; discretization error shrinks with sample density
    Numerical,
    /// Closed-form slopes from the geometry; exact, but only available
    /// for formulations that provide them
    Analytic,
}

/// Draw force from closed-form slopes: F = (dU/dθ)/(dx/dθ).
///
/// Fails with `BowError::Configuration` when the geometry has no closed
/// forms, and with `BowError::Domain` when the angle fails string
/// closure. Where |dx/dθ| falls below the division threshold (the
/// maximal-bend singularity) the sample comes back as NaN rather than an
/// error so the rest of a curve still renders; an infinite dx/dθ at the
/// rest state yields the correct zero-force limit.
pub fn analytic_force(
    geometry: &dyn GeometryModel,
    convention: &EnergyConvention,
    theta: f64,
    params: &BowParameters,
) -> Result<f64, BowError> {
    let draw_slope = match geometry.slopes(theta, params) {
        Some((_, dx)) => dx,
        None => {
            // Slopes are also absent for a domain-violating angle; let
            // the draw distance report that case as what it is
            geometry.draw_distance(theta, params)?;
            return Err(BowError::Configuration(
                "analytic force strategy requires a geometry with closed-form slopes".to_string(),
            ));
        }
    };
    let energy_slope = convention.energy_slope(theta, params);
    if draw_slope.is_finite() && draw_slope.abs() < MIN_DIVISION_THRESHOLD {
        return Ok(f64::NAN);
    }
    Ok(energy_slope / draw_slope)
}

/// Discrete gradient dy/dx over sampled arrays.
///
/// Centered differences at interior points, one-sided at the edges.
/// Supports non-uniform spacing (a sweep with domain-excluded samples is
/// no longer uniform in θ). Degenerate spacing yields NaN for that
/// sample; arrays shorter than two elements yield all-NaN.
pub fn gradient(y: &[f64], x: &[f64]) -> Vec<f64> {
    let n = y.len();
    if n != x.len() || n < 2 {
        return vec![f64::NAN; n];
    }

    let slope = |dy: f64, dx: f64| {
        if dx.abs() < MIN_DIVISION_THRESHOLD {
            f64::NAN
        } else {
            dy / dx
        }
    };

    let mut out = Vec::with_capacity(n);
    out.push(slope(y[1] - y[0], x[1] - x[0]));
    for i in 1..n - 1 {
        out.push(slope(y[i + 1] - y[i - 1], x[i + 1] - x[i - 1]));
    }
    out.push(slope(y[n - 1] - y[n - 2], x[n - 1] - x[n - 2]));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::find_rest_angle;
    use crate::geometry::{ArcAngleGeometry, HalfAngleGeometry};
    use crate::inputs::StiffnessSpec;
    use approx::assert_relative_eq;

    fn params(string_length: f64, stiffness: f64) -> BowParameters {
        BowParameters::new(1.0, string_length, StiffnessSpec::Direct(stiffness)).unwrap()
    }

    #[test]
    fn test_relative_energy_zero_at_rest() {
        let p = params(0.9, 100.0);
        let rest = find_rest_angle(&HalfAngleGeometry, &p).unwrap();
        let convention = EnergyConvention::Relative {
            rest_angle: rest.rest_angle,
        };
        assert!(convention.energy(rest.rest_angle, &p).abs() < 1e-6);
    }

    #[test]
    fn test_relative_energy_increases_with_bend() {
        let p = params(0.9, 100.0);
        let convention = EnergyConvention::Relative { rest_angle: 1.5 };
        let u1 = convention.energy(1.6, &p);
        let u2 = convention.energy(2.0, &p);
        assert!(u1 > 0.0);
        assert!(u2 > u1);
    }

    #[test]
    fn test_absolute_energy_closed_form() {
        // U(a) = 2B·a²/L with B = 100, L = 1, a = 0.5 -> 50
        let p = params(0.75, 100.0);
        let convention = EnergyConvention::Absolute;
        assert_relative_eq!(convention.energy(0.5, &p), 50.0, epsilon = 1e-12);
    }

    #[test]
    fn test_energy_slopes_match_finite_differences() {
        let p = params(0.75, 78.54);
        let step = 1e-7;
        for convention in [
            EnergyConvention::Relative { rest_angle: 1.2 },
            EnergyConvention::Absolute,
        ] {
            for theta in [0.8, 1.5, 2.4] {
                let fd = (convention.energy(theta + step, &p)
                    - convention.energy(theta - step, &p))
                    / (2.0 * step);
                assert_relative_eq!(
                    convention.energy_slope(theta, &p),
                    fd,
                    max_relative = 1e-6
                );
            }
        }
    }

    #[test]
    fn test_analytic_force_positive_in_draw_range() {
        let p = params(0.75, 78.54);
        let convention = EnergyConvention::Absolute;
        for a in [1.4, 1.8, 2.2, 2.6, 3.0] {
            let f = analytic_force(&ArcAngleGeometry, &convention, a, &p).unwrap();
            assert!(f >= 0.0, "force {f} negative at a={a}");
            assert!(f.is_finite());
        }
    }

    #[test]
    fn test_analytic_force_reports_domain_violation() {
        // Below the rest angle the arc formulation has no real draw
        // distance; that must not masquerade as a missing-closed-forms
        // configuration error
        let p = params(0.75, 78.54);
        let result = analytic_force(&ArcAngleGeometry, &EnergyConvention::Absolute, 0.1, &p);
        assert!(matches!(result, Err(BowError::Domain { .. })));
    }

    #[test]
    fn test_analytic_force_rejects_half_angle_geometry() {
        let p = params(0.9, 100.0);
        let convention = EnergyConvention::Relative { rest_angle: 1.5 };
        let result = analytic_force(&HalfAngleGeometry, &convention, 2.0, &p);
        assert!(matches!(result, Err(BowError::Configuration(_))));
    }

    #[test]
    fn test_gradient_exact_on_linear_data() {
        let x: Vec<f64> = (0..10).map(|i| i as f64 * 0.1).collect();
        let y: Vec<f64> = x.iter().map(|v| 3.0 * v - 1.0).collect();
        for g in gradient(&y, &x) {
            assert_relative_eq!(g, 3.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_gradient_centered_on_quadratic_data() {
        // Centered differences are exact for quadratics at interior points
        let x: Vec<f64> = (0..20).map(|i| i as f64 * 0.05).collect();
        let y: Vec<f64> = x.iter().map(|v| v * v).collect();
        let g = gradient(&y, &x);
        for i in 1..19 {
            assert_relative_eq!(g[i], 2.0 * x[i], epsilon = 1e-10);
        }
    }

    #[test]
    fn test_gradient_degenerate_input() {
        assert!(gradient(&[1.0], &[0.0]).iter().all(|v| v.is_nan()));
        assert!(gradient(&[], &[]).is_empty());
        let g = gradient(&[1.0, 2.0], &[0.5, 0.5]);
        assert!(g.iter().all(|v| v.is_nan()));
    }
}
