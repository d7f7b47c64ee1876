/// Physical constants and model defaults used in bow mechanics calculations

/// Gravitational acceleration in m/s²
///
/// Used by the projectile range derivation R = v²·sin(2φ)/g.
pub const G_ACCEL_MPS2: f64 = 9.81;

/// Default limb arc length in meters
///
/// The limb is modeled as a circular arc of fixed length that curls
/// uniformly as the bow is drawn.
pub const DEFAULT_LIMB_LENGTH_M: f64 = 1.0;

/// Default unstrung string length in meters
///
/// Must be shorter than the limb arc length, otherwise the string cannot
/// bend the limb at all and no rest angle exists.
pub const DEFAULT_STRING_LENGTH_M: f64 = 0.9;

/// Default bending stiffness B = E·I in N·m²
///
/// Value: 100.0, a deliberately round figure for a uniform circular
/// cross-section. Real self bows taper toward the tips and store less
/// energy per unit bend; with this stiffness the model describes a
/// known-overpowered bow. Alternatively derive B from Young's modulus and
/// cross-section radius via I = (π/4)·r⁴.
pub const DEFAULT_BENDING_STIFFNESS: f64 = 100.0;

/// Default arrow mass in kg (20 grams)
pub const DEFAULT_ARROW_MASS_KG: f64 = 0.02;

/// Default launch angle in degrees for the range derivation
pub const DEFAULT_LAUNCH_ANGLE_DEG: f64 = 45.0;

/// Default number of bend-angle samples per sweep
pub const DEFAULT_SWEEP_SAMPLES: usize = 2000;

// Numerical stability constants

/// Margin off the bend-angle interval endpoints (0, π) used when
/// bracketing the rest angle
pub const BEND_ANGLE_EPSILON: f64 = 1e-6;

/// Margin off singular sweep endpoints (rest state, maximal bend)
pub const SWEEP_MARGIN: f64 = 1e-4;

/// Bisection stops once the bracket width drops below this
///
/// A bracket this narrow puts the chord-length residual well under 1e-9
/// for any valid parameter set; iterating further wastes work without
/// changing the result at f64 precision.
pub const BISECTION_BRACKET_TOLERANCE: f64 = 1e-12;

/// Hard cap on bisection iterations
pub const MAX_BISECTION_ITERATIONS: usize = 100;

/// Minimum threshold for preventing division by zero in general calculations
pub const MIN_DIVISION_THRESHOLD: f64 = 1e-12;

/// General numerical tolerance for floating point comparisons
pub const NUMERICAL_TOLERANCE: f64 = 1e-9;
