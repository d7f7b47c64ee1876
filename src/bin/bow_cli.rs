use bow_mechanics::{
    derive_launch, BowInputs, BowSolution, BowSolver, EnergyConventionKind, ForceStrategy,
    GeometryKind, LaunchCurve, StiffnessSpec,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::error::Error;

#[derive(Parser)]
#[command(name = "bow")]
#[command(version = "0.1.0")]
#[command(about = "Bow limb mechanics calculator: draw force, stored energy, and range curves", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the draw curve: force and stored energy vs draw distance
    Curve {
        #[command(flatten)]
        model: ModelArgs,

        /// Output format
        #[arg(short = 'o', long, value_enum, default_value = "table")]
        output: OutputFormat,

        /// Print every curve sample in table output
        #[arg(long)]
        full: bool,
    },

    /// Compute launch velocity and projectile range vs draw distance
    Range {
        #[command(flatten)]
        model: ModelArgs,

        /// Arrow mass (kg)
        #[arg(short = 'm', long, default_value = "0.02")]
        mass: f64,

        /// Launch angle (degrees)
        #[arg(short = 'a', long, default_value = "45.0")]
        angle: f64,

        /// Gravitational acceleration (m/s²)
        #[arg(long, default_value = "9.81")]
        gravity: f64,

        /// Output format
        #[arg(short = 'o', long, value_enum, default_value = "table")]
        output: OutputFormat,

        /// Print every curve sample in table output
        #[arg(long)]
        full: bool,
    },

    /// Find the unstrung rest angle for a parameter set
    Calibrate {
        #[command(flatten)]
        model: ModelArgs,

        /// Output format
        #[arg(short = 'o', long, value_enum, default_value = "table")]
        output: OutputFormat,
    },

    /// Describe the model and its documented approximations
    Info,
}

#[derive(Args, Debug, Clone)]
struct ModelArgs {
    /// Limb arc length L (m)
    #[arg(short = 'L', long, default_value = "1.0")]
    limb_length: f64,

    /// Unstrung string length l0 (m), must be shorter than L
    #[arg(short = 's', long, default_value = "0.9")]
    string_length: f64,

    /// Bending stiffness B = E·I (N·m²)
    #[arg(short = 'b', long)]
    stiffness: Option<f64>,

    /// Young's modulus E (Pa); use together with --radius instead of --stiffness
    #[arg(long)]
    modulus: Option<f64>,

    /// Circular cross-section radius r (m); use together with --modulus
    #[arg(long)]
    radius: Option<f64>,

    /// Number of bend-angle samples
    #[arg(short = 'n', long, default_value = "2000")]
    samples: usize,

    /// Lower sweep bound (radians); defaults to just above the rest angle
    #[arg(long)]
    sweep_start: Option<f64>,

    /// Upper sweep bound (radians); defaults to just below π
    #[arg(long)]
    sweep_end: Option<f64>,

    /// Geometry formulation
    #[arg(short = 'g', long, value_enum, default_value = "half-angle")]
    geometry: GeometryArg,

    /// Energy convention
    #[arg(short = 'e', long, value_enum, default_value = "relative")]
    convention: ConventionArg,

    /// Force derivative strategy
    #[arg(short = 'f', long, value_enum, default_value = "numerical")]
    force: ForceArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum GeometryArg {
    HalfAngle,
    ArcAngle,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ConventionArg {
    Relative,
    Absolute,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ForceArg {
    Numerical,
    Analytic,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl ModelArgs {
    fn to_inputs(&self) -> Result<BowInputs, Box<dyn Error>> {
        let stiffness = match (self.stiffness, self.modulus, self.radius) {
            (Some(_), Some(_), _) | (Some(_), _, Some(_)) => {
                return Err("give either --stiffness or --modulus/--radius, not both".into())
            }
            (Some(b), None, None) => StiffnessSpec::Direct(b),
            (None, Some(e), Some(r)) => StiffnessSpec::Section {
                youngs_modulus: e,
                radius: r,
            },
            (None, Some(_), None) | (None, None, Some(_)) => {
                return Err("--modulus and --radius must be given together".into())
            }
            (None, None, None) => StiffnessSpec::Direct(100.0),
        };

        Ok(BowInputs {
            limb_length: self.limb_length,
            string_length: self.string_length,
            stiffness,
            sample_count: self.samples,
            sweep_start: self.sweep_start,
            sweep_end: self.sweep_end,
            geometry: match self.geometry {
                GeometryArg::HalfAngle => GeometryKind::HalfAngle,
                GeometryArg::ArcAngle => GeometryKind::ArcAngle,
            },
            energy_convention: match self.convention {
                ConventionArg::Relative => EnergyConventionKind::Relative,
                ConventionArg::Absolute => EnergyConventionKind::Absolute,
            },
            force_strategy: match self.force {
                ForceArg::Numerical => ForceStrategy::Numerical,
                ForceArg::Analytic => ForceStrategy::Analytic,
            },
            ..BowInputs::default()
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CurvePoint {
    draw: f64,
    energy: f64,
    force: f64,
}

#[derive(Debug, Serialize, Deserialize)]
struct CurveReport {
    rest_angle: Option<f64>,
    samples: usize,
    singular_samples: usize,
    max_draw: f64,
    max_energy: f64,
    points: Vec<CurvePoint>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RangePoint {
    draw: f64,
    velocity: f64,
    range: f64,
}

#[derive(Debug, Serialize, Deserialize)]
struct RangeReport {
    rest_angle: Option<f64>,
    samples: usize,
    max_velocity: f64,
    max_range: f64,
    points: Vec<RangePoint>,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Curve {
            model,
            output,
            full,
        } => run_curve(&model, output, full),
        Commands::Range {
            model,
            mass,
            angle,
            gravity,
            output,
            full,
        } => run_range(&model, mass, angle, gravity, output, full),
        Commands::Calibrate { model, output } => run_calibrate(&model, output),
        Commands::Info => {
            print_info();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run_curve(model: &ModelArgs, format: OutputFormat, full: bool) -> Result<(), Box<dyn Error>> {
    let solution = BowSolver::new(model.to_inputs()?).solve()?;
    let report = curve_report(&solution);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Csv => {
            println!("draw,energy,force");
            for p in &report.points {
                println!("{:.6},{:.6},{:.6}", p.draw, p.energy, p.force);
            }
        }
        OutputFormat::Table => {
            println!("DRAW CURVE");
            println!("----------");
            if let Some(rest) = report.rest_angle {
                println!("Rest angle:        {rest:.6} rad");
            }
            println!("Samples:           {}", report.samples);
            println!("Singular samples:  {}", report.singular_samples);
            println!("Max draw:          {:.4} m", report.max_draw);
            println!("Max stored energy: {:.4} J", report.max_energy);

            if full {
                println!();
                println!("{:>12} {:>14} {:>14}", "Draw (m)", "Energy (J)", "Force (N)");
                for p in &report.points {
                    println!("{:>12.5} {:>14.5} {:>14.5}", p.draw, p.energy, p.force);
                }
            }
        }
    }

    Ok(())
}

fn run_range(
    model: &ModelArgs,
    mass: f64,
    angle: f64,
    gravity: f64,
    format: OutputFormat,
    full: bool,
) -> Result<(), Box<dyn Error>> {
    let solution = BowSolver::new(model.to_inputs()?).solve()?;
    let launch = derive_launch(&solution.curve, mass, angle.to_radians(), gravity)?;
    let report = range_report(&solution, &launch);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Csv => {
            println!("draw,velocity,range");
            for p in &report.points {
                println!("{:.6},{:.6},{:.6}", p.draw, p.velocity, p.range);
            }
        }
        OutputFormat::Table => {
            println!("LAUNCH RANGE");
            println!("------------");
            if let Some(rest) = report.rest_angle {
                println!("Rest angle:     {rest:.6} rad");
            }
            println!("Samples:        {}", report.samples);
            println!("Arrow mass:     {mass} kg");
            println!("Launch angle:   {angle}°");
            println!("Max velocity:   {:.2} m/s", report.max_velocity);
            println!("Max range:      {:.2} m", report.max_range);

            if full {
                println!();
                println!(
                    "{:>12} {:>16} {:>12}",
                    "Draw (m)", "Velocity (m/s)", "Range (m)"
                );
                for p in &report.points {
                    println!("{:>12.5} {:>16.3} {:>12.3}", p.draw, p.velocity, p.range);
                }
            }
        }
    }

    Ok(())
}

fn run_calibrate(model: &ModelArgs, format: OutputFormat) -> Result<(), Box<dyn Error>> {
    let inputs = model.to_inputs()?;
    let params = inputs.parameters()?;
    let calibration = bow_mechanics::find_rest_angle(inputs.geometry.model(), &params)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&calibration)?),
        OutputFormat::Csv => {
            println!("rest_angle,iterations,bracket_width,chord_error");
            println!(
                "{:.12},{},{:.3e},{:.3e}",
                calibration.rest_angle,
                calibration.iterations_used,
                calibration.bracket_width,
                calibration.chord_error
            );
        }
        OutputFormat::Table => {
            println!("CALIBRATION");
            println!("-----------");
            println!("Rest angle:     {:.9} rad", calibration.rest_angle);
            println!("Iterations:     {}", calibration.iterations_used);
            println!("Bracket width:  {:.3e}", calibration.bracket_width);
            println!("Chord residual: {:.3e}", calibration.chord_error);
        }
    }

    Ok(())
}

fn curve_report(solution: &BowSolution) -> CurveReport {
    let curve = &solution.curve;
    CurveReport {
        rest_angle: solution.calibration.map(|c| c.rest_angle),
        samples: curve.len(),
        singular_samples: curve.singular_count(),
        max_draw: curve.draw_distances.last().copied().unwrap_or(0.0),
        max_energy: curve
            .energies
            .iter()
            .fold(f64::NEG_INFINITY, |a, &b| a.max(b)),
        points: curve
            .draw_distances
            .iter()
            .zip(&curve.energies)
            .zip(&curve.forces)
            .map(|((&draw, &energy), &force)| CurvePoint {
                draw,
                energy,
                force,
            })
            .collect(),
    }
}

fn range_report(solution: &BowSolution, launch: &LaunchCurve) -> RangeReport {
    RangeReport {
        rest_angle: solution.calibration.map(|c| c.rest_angle),
        samples: launch.draw_distances.len(),
        max_velocity: launch
            .velocities
            .iter()
            .filter(|v| v.is_finite())
            .fold(f64::NEG_INFINITY, |a, &b| a.max(b)),
        max_range: launch
            .ranges
            .iter()
            .filter(|r| r.is_finite())
            .fold(f64::NEG_INFINITY, |a, &b| a.max(b)),
        points: launch
            .draw_distances
            .iter()
            .zip(&launch.velocities)
            .zip(&launch.ranges)
            .map(|((&draw, &velocity), &range)| RangePoint {
                draw,
                velocity,
                range,
            })
            .collect(),
    }
}

fn print_info() {
    println!("Bow Mechanics v0.1.0");
    println!();
    println!("Models a bow limb as a circular arc of fixed length that bends");
    println!("uniformly. A bisection root-find calibrates the unstrung rest");
    println!("angle; a bend-angle sweep then produces draw distance, stored");
    println!("elastic energy, and draw force per sample, sorted by draw");
    println!("distance for plotting.");
    println!();
    println!("Documented approximations:");
    println!("  - Uniform curvature, no limb taper or limb mass");
    println!("  - Launch range assumes all draw energy becomes arrow kinetic");
    println!("    energy (closed-form vacuum range, no drag)");
    println!("  - Numerical force carries discretization error inversely");
    println!("    proportional to sample density");
    println!();
    println!("Subcommands: curve, range, calibrate, info");
}
