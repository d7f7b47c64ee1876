// Draw-curve construction: sweep the bend angle, evaluate geometry and
// energy at each sample, derive force, sort by draw distance, and
// optionally derive launch velocity and projectile range.
use crate::calibration::{find_rest_angle, CalibrationResult};
use crate::constants::{BEND_ANGLE_EPSILON, MIN_DIVISION_THRESHOLD, SWEEP_MARGIN};
use crate::energy::{analytic_force, gradient, EnergyConvention, EnergyConventionKind, ForceStrategy};
use crate::geometry::GeometryModel;
use crate::inputs::{BowError, BowInputs, BowParameters};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::f64::consts::PI;

/// Bend-angle sweep description: uniform sampling over a sub-range of
/// (0, π), keeping a margin off both endpoints (the chord flattens out
/// near θ = 0 and the draw slope can vanish near θ = π).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepConfig {
    pub start: f64,
    pub end: f64,
    pub samples: usize,
}

impl SweepConfig {
    pub fn validate(&self) -> Result<(), BowError> {
        if self.samples < 2 {
            return Err(BowError::Configuration(format!(
                "sweep needs at least 2 samples, got {}",
                self.samples
            )));
        }
        if !(self.start.is_finite() && self.end.is_finite())
            || self.start <= 0.0
            || self.end >= PI
            || self.start >= self.end
        {
            return Err(BowError::Configuration(format!(
                "sweep bounds must satisfy 0 < start < end < π, got [{}, {}]",
                self.start, self.end
            )));
        }
        Ok(())
    }
}

/// Ordered draw curve: parallel arrays sorted ascending by draw distance.
///
/// Singular force samples carry NaN; domain-excluded bend angles are not
/// present at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawCurve {
    /// Bend angle per sample, in sorted-curve order
    pub bend_angles: Vec<f64>,
    /// Draw distance x, ascending
    pub draw_distances: Vec<f64>,
    /// Stored elastic energy U
    pub energies: Vec<f64>,
    /// Draw force F = dU/dx
    pub forces: Vec<f64>,
}

impl DrawCurve {
    pub fn len(&self) -> usize {
        self.draw_distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draw_distances.is_empty()
    }

    /// Number of samples whose force came back NaN (flagged singularities)
    pub fn singular_count(&self) -> usize {
        self.forces.iter().filter(|f| f.is_nan()).count()
    }
}

/// Launch derivation: velocity v = √(2U/m) and range R = v²·sin(2φ)/g,
/// treating all draw energy as arrow kinetic energy. Idealized: no
/// limb-mass or efficiency loss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchCurve {
    pub draw_distances: Vec<f64>,
    pub velocities: Vec<f64>,
    pub ranges: Vec<f64>,
}

/// Sweep the bend angle and assemble the sorted draw curve.
///
/// Samples violating the string-closure domain (ℓ(θ) > l0) are skipped;
/// a sweep that retains fewer than two samples is a configuration error
/// since no curve can be built from it. With the numerical force
/// strategy the gradients are taken in θ order, before sorting.
pub fn build_draw_curve(
    geometry: &dyn GeometryModel,
    convention: &EnergyConvention,
    strategy: ForceStrategy,
    params: &BowParameters,
    sweep: &SweepConfig,
) -> Result<DrawCurve, BowError> {
    params.validate()?;
    sweep.validate()?;

    let step = (sweep.end - sweep.start) / (sweep.samples - 1) as f64;
    let mut bend_angles = Vec::with_capacity(sweep.samples);
    let mut draw_distances = Vec::with_capacity(sweep.samples);
    let mut energies = Vec::with_capacity(sweep.samples);

    for i in 0..sweep.samples {
        let theta = sweep.start + i as f64 * step;
        match geometry.draw_distance(theta, params) {
            Ok(x) => {
                bend_angles.push(theta);
                draw_distances.push(x);
                energies.push(convention.energy(theta, params));
            }
            Err(BowError::Domain { .. }) => continue,
            Err(e) => return Err(e),
        }
    }

    if bend_angles.len() < 2 {
        return Err(BowError::Configuration(format!(
            "sweep [{}, {}] retained {} valid sample(s); the string cannot close over this range",
            sweep.start,
            sweep.end,
            bend_angles.len()
        )));
    }

    let forces = match strategy {
        ForceStrategy::Numerical => {
            let energy_slopes = gradient(&energies, &bend_angles);
            let draw_slopes = gradient(&draw_distances, &bend_angles);
            energy_slopes
                .iter()
                .zip(&draw_slopes)
                .map(|(du, dx)| {
                    if dx.abs() < MIN_DIVISION_THRESHOLD {
                        f64::NAN
                    } else {
                        du / dx
                    }
                })
                .collect()
        }
        ForceStrategy::Analytic => bend_angles
            .iter()
            .map(|&theta| analytic_force(geometry, convention, theta, params))
            .collect::<Result<Vec<_>, _>>()?,
    };

    // θ ↦ x is not guaranteed monotonic near the sweep boundaries, so the
    // triples are reordered by draw distance for downstream consumers
    let mut order: Vec<usize> = (0..bend_angles.len()).collect();
    order.sort_by(|&i, &j| {
        draw_distances[i]
            .partial_cmp(&draw_distances[j])
            .unwrap_or(Ordering::Equal)
    });

    Ok(DrawCurve {
        bend_angles: order.iter().map(|&i| bend_angles[i]).collect(),
        draw_distances: order.iter().map(|&i| draw_distances[i]).collect(),
        energies: order.iter().map(|&i| energies[i]).collect(),
        forces: order.iter().map(|&i| forces[i]).collect(),
    })
}

/// Derive launch velocity and projectile range per curve sample.
///
/// Samples with negative stored energy (possible below the rest state
/// under the relative convention) come back NaN.
pub fn derive_launch(
    curve: &DrawCurve,
    arrow_mass: f64,
    launch_angle_rad: f64,
    gravity: f64,
) -> Result<LaunchCurve, BowError> {
    if !arrow_mass.is_finite() || arrow_mass <= 0.0 {
        return Err(BowError::Configuration(format!(
            "arrow mass must be positive and finite, got {arrow_mass}"
        )));
    }
    if !gravity.is_finite() || gravity <= 0.0 {
        return Err(BowError::Configuration(format!(
            "gravitational acceleration must be positive and finite, got {gravity}"
        )));
    }

    let velocities: Vec<f64> = curve
        .energies
        .iter()
        .map(|&u| (2.0 * u / arrow_mass).sqrt())
        .collect();
    let range_factor = (2.0 * launch_angle_rad).sin() / gravity;
    let ranges: Vec<f64> = velocities
        .iter()
        .map(|&v| v * v * range_factor)
        .collect();

    Ok(LaunchCurve {
        draw_distances: curve.draw_distances.clone(),
        velocities,
        ranges,
    })
}

/// Full pipeline over a `BowInputs` record: validate, calibrate, resolve
/// the sweep, and build the curve.
#[derive(Debug, Clone)]
pub struct BowSolver {
    inputs: BowInputs,
}

/// Everything a run produces, for presenters and the CLI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BowSolution {
    pub parameters: BowParameters,
    /// Rest-state calibration; absent only when the absolute convention
    /// runs a configuration whose rest angle cannot be bracketed
    pub calibration: Option<CalibrationResult>,
    pub sweep: SweepConfig,
    pub curve: DrawCurve,
}

impl BowSolver {
    pub fn new(inputs: BowInputs) -> Self {
        BowSolver { inputs }
    }

    pub fn inputs(&self) -> &BowInputs {
        &self.inputs
    }

    /// Calibrate once, sweep once: parameters → rest angle → curve.
    pub fn solve(&self) -> Result<BowSolution, BowError> {
        let params = self.inputs.parameters()?;
        let geometry = self.inputs.geometry.model();

        let calibration = match find_rest_angle(geometry, &params) {
            Ok(result) => Some(result),
            // The absolute convention does not consume the rest angle, so
            // a bracket failure only matters if the sweep needed it too
            Err(e) => match self.inputs.energy_convention {
                EnergyConventionKind::Relative => return Err(e),
                EnergyConventionKind::Absolute => None,
            },
        };

        let convention = match self.inputs.energy_convention {
            EnergyConventionKind::Relative => EnergyConvention::Relative {
                // Relative calibration verified above
                rest_angle: calibration.as_ref().map(|c| c.rest_angle).unwrap_or(0.0),
            },
            EnergyConventionKind::Absolute => EnergyConvention::Absolute,
        };

        let default_start = match convention {
            EnergyConvention::Relative { rest_angle } => rest_angle + SWEEP_MARGIN,
            EnergyConvention::Absolute => BEND_ANGLE_EPSILON.max(SWEEP_MARGIN),
        };
        let sweep = SweepConfig {
            start: self.inputs.sweep_start.unwrap_or(default_start),
            end: self.inputs.sweep_end.unwrap_or(PI - SWEEP_MARGIN),
            samples: self.inputs.sample_count,
        };

        let curve = build_draw_curve(
            geometry,
            &convention,
            self.inputs.force_strategy,
            &params,
            &sweep,
        )?;

        Ok(BowSolution {
            parameters: params,
            calibration,
            sweep,
            curve,
        })
    }

    /// Convenience wrapper: solve, then derive the launch table with the
    /// configured arrow mass, launch angle, and gravity.
    pub fn solve_with_launch(&self) -> Result<(BowSolution, LaunchCurve), BowError> {
        let solution = self.solve()?;
        let launch = derive_launch(
            &solution.curve,
            self.inputs.arrow_mass,
            self.inputs.launch_angle_deg.to_radians(),
            self.inputs.gravity,
        )?;
        Ok((solution, launch))
    }
}
