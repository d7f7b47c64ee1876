// Configuration surface for the bow model: validated parameters and the
// input record consumed by the solver and the CLI.
use crate::constants::*;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

/// Error type for bow model operations
#[derive(Debug, Clone, PartialEq)]
pub enum BowError {
    /// Invalid parameter set; raised before any sweep begins
    Configuration(String),
    /// Rest-angle bisection could not bracket a root
    Convergence(String),
    /// Bend angle outside the range where the string can span the chord
    /// (ℓ(θ) > l0); recovered per-sample inside a sweep
    Domain {
        theta: f64,
        chord: f64,
        string_length: f64,
    },
}

impl fmt::Display for BowError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BowError::Configuration(msg) => write!(f, "configuration error: {msg}"),
            BowError::Convergence(msg) => write!(f, "convergence error: {msg}"),
            BowError::Domain {
                theta,
                chord,
                string_length,
            } => write!(
                f,
                "domain error: chord {chord} exceeds string length {string_length} at bend angle {theta}"
            ),
        }
    }
}

impl Error for BowError {}

impl From<String> for BowError {
    fn from(msg: String) -> Self {
        BowError::Configuration(msg)
    }
}

/// Bending stiffness specification
///
/// Either B = E·I given directly, or derived from Young's modulus and a
/// circular cross-section radius via the second moment of area
/// I = (π/4)·r⁴.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StiffnessSpec {
    /// Bending stiffness B in N·m²
    Direct(f64),
    /// Young's modulus E in Pa and cross-section radius r in meters
    Section { youngs_modulus: f64, radius: f64 },
}

impl StiffnessSpec {
    /// Resolve to a bending stiffness B in N·m²
    pub fn bending_stiffness(&self) -> f64 {
        match *self {
            StiffnessSpec::Direct(b) => b,
            StiffnessSpec::Section {
                youngs_modulus,
                radius,
            } => {
                let second_moment = std::f64::consts::FRAC_PI_4 * radius.powi(4);
                youngs_modulus * second_moment
            }
        }
    }
}

/// Validated core parameters, created once and passed by reference
/// to every geometry, calibration, and energy call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BowParameters {
    /// Limb arc length L in meters
    pub limb_length: f64,
    /// Unstrung string length l0 in meters, 0 < l0 < L
    pub string_length: f64,
    /// Bending stiffness B in N·m²
    pub bending_stiffness: f64,
}

impl BowParameters {
    pub fn new(
        limb_length: f64,
        string_length: f64,
        stiffness: StiffnessSpec,
    ) -> Result<Self, BowError> {
        let params = BowParameters {
            limb_length,
            string_length,
            bending_stiffness: stiffness.bending_stiffness(),
        };
        params.validate()?;
        Ok(params)
    }

    /// Check the parameter invariants: L > 0, 0 < l0 < L, B > 0, all finite.
    pub fn validate(&self) -> Result<(), BowError> {
        if !self.limb_length.is_finite() || self.limb_length <= 0.0 {
            return Err(BowError::Configuration(format!(
                "limb arc length must be positive and finite, got {}",
                self.limb_length
            )));
        }
        if !self.string_length.is_finite() || self.string_length <= 0.0 {
            return Err(BowError::Configuration(format!(
                "string length must be positive and finite, got {}",
                self.string_length
            )));
        }
        if self.string_length >= self.limb_length {
            return Err(BowError::Configuration(format!(
                "string length {} must be shorter than the limb arc length {}",
                self.string_length, self.limb_length
            )));
        }
        if !self.bending_stiffness.is_finite() || self.bending_stiffness <= 0.0 {
            return Err(BowError::Configuration(format!(
                "bending stiffness must be positive and finite, got {}",
                self.bending_stiffness
            )));
        }
        Ok(())
    }
}

/// Complete input record for a bow model run
///
/// Scalar parameters plus the strategy selectors (geometry formulation,
/// energy convention, force derivative strategy). Defaults match the
/// reference self-bow configuration: L = 1.0 m, l0 = 0.9 m, B = 100 N·m²,
/// 20 g arrow launched at 45° under g = 9.81 m/s².
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BowInputs {
    /// Limb arc length L in meters
    pub limb_length: f64,
    /// Unstrung string length l0 in meters
    pub string_length: f64,
    /// Bending stiffness, direct or via modulus + radius
    pub stiffness: StiffnessSpec,
    /// Arrow mass in kg for the launch derivation
    pub arrow_mass: f64,
    /// Launch angle in degrees for the range formula
    pub launch_angle_deg: f64,
    /// Gravitational acceleration in m/s²
    pub gravity: f64,
    /// Number of bend-angle samples per sweep
    pub sample_count: usize,
    /// Lower sweep bound in radians; defaults to just above the rest
    /// angle (relative convention) or just above zero (absolute)
    pub sweep_start: Option<f64>,
    /// Upper sweep bound in radians; defaults to just below π
    pub sweep_end: Option<f64>,
    /// Geometry formulation
    pub geometry: crate::geometry::GeometryKind,
    /// Energy convention
    pub energy_convention: crate::energy::EnergyConventionKind,
    /// Force derivative strategy
    pub force_strategy: crate::energy::ForceStrategy,
}

impl Default for BowInputs {
    fn default() -> Self {
        BowInputs {
            limb_length: DEFAULT_LIMB_LENGTH_M,
            string_length: DEFAULT_STRING_LENGTH_M,
            stiffness: StiffnessSpec::Direct(DEFAULT_BENDING_STIFFNESS),
            arrow_mass: DEFAULT_ARROW_MASS_KG,
            launch_angle_deg: DEFAULT_LAUNCH_ANGLE_DEG,
            gravity: G_ACCEL_MPS2,
            sample_count: DEFAULT_SWEEP_SAMPLES,
            sweep_start: None,
            sweep_end: None,
            geometry: crate::geometry::GeometryKind::HalfAngle,
            energy_convention: crate::energy::EnergyConventionKind::Relative,
            force_strategy: crate::energy::ForceStrategy::Numerical,
        }
    }
}

impl BowInputs {
    /// Validate and resolve the core parameter set.
    pub fn parameters(&self) -> Result<BowParameters, BowError> {
        if !self.arrow_mass.is_finite() || self.arrow_mass <= 0.0 {
            return Err(BowError::Configuration(format!(
                "arrow mass must be positive and finite, got {}",
                self.arrow_mass
            )));
        }
        if !self.gravity.is_finite() || self.gravity <= 0.0 {
            return Err(BowError::Configuration(format!(
                "gravitational acceleration must be positive and finite, got {}",
                self.gravity
            )));
        }
        BowParameters::new(self.limb_length, self.string_length, self.stiffness)
    }
}
