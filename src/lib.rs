//! # Bow Mechanics
//!
//! Mechanical model of a simplified archery bow limb bent as a uniform
//! circular arc: draw force, stored elastic energy, and projectile range
//! as functions of draw distance.
//!
//! The pipeline is calibrate → sweep → sort → derive: a bisection
//! root-find fixes the unstrung rest angle, a bend-angle sweep evaluates
//! chord length, draw distance, and energy per sample, and force comes
//! from the energy derivative via the chain rule, either in closed form
//! or by finite differences. Results are plain sorted arrays for
//! downstream plotting or interpolation.

// Re-export the main types and functions
pub use calibration::{find_rest_angle, CalibrationResult};
pub use curve::{
    build_draw_curve, derive_launch, BowSolution, BowSolver, DrawCurve, LaunchCurve, SweepConfig,
};
pub use energy::{analytic_force, gradient, EnergyConvention, EnergyConventionKind, ForceStrategy};
pub use geometry::{ArcAngleGeometry, GeometryKind, GeometryModel, HalfAngleGeometry};
pub use inputs::{BowError, BowInputs, BowParameters, StiffnessSpec};

// Module declarations
pub mod constants;
mod calibration;
mod curve;
mod energy;
mod geometry;
mod inputs;
