//! lateral-zones - Stratigraphic Zone Intersection Runner
//!
//! Generates a synthetic field of dipping horizons and horizontal wells,
//! zones every well, merges the results into in-memory master tables and
//! prints the per-well lateral percentages.
//!
//! # Usage
//!
//! ```bash
//! # Default field, fixed seed
//! lateral-zones --seed 7
//!
//! # Larger field, machine-readable output
//! lateral-zones --wells 200 --horizons 5 --json > zones.json
//!
//! # Explicit config file
//! lateral-zones --config ./zone_config.toml
//! ```
//!
//! # Environment Variables
//!
//! - `LATERAL_ZONES_CONFIG`: Path to the engine config TOML
//! - `RUST_LOG`: Logging level (default: info)

use std::f64::consts::{FRAC_PI_2, TAU};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::prelude::*;
use rand_distr::{Distribution, Normal};
use tracing::{info, warn};

use lateral_zones::config::{self, EngineConfig};
use lateral_zones::{
    BatchReport, HorizonSample, HorizonSurface, InMemoryMaster, SurveyPoint, WellStatus,
    WellTrajectory, ZoneEngine,
};

// ============================================================================
// Field Constants
// ============================================================================

/// Elevation of the shallowest synthetic horizon
const FIRST_HORIZON_ELEVATION: f64 = -2000.0;
/// Vertical spacing between synthetic horizons
const HORIZON_SPACING: f64 = 40.0;
/// Side length of the square field
const FIELD_EXTENT: f64 = 20_000.0;
/// Build-section radius (vertical to horizontal)
const BUILD_RADIUS: f64 = 600.0;
/// Station spacing along the lateral
const LATERAL_STEP: f64 = 100.0;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "lateral-zones")]
#[command(about = "Zone horizontal wells against stratigraphic horizons")]
#[command(version)]
struct CliArgs {
    /// Number of synthetic wells
    #[arg(short, long, default_value = "25", value_parser = clap::value_parser!(u32).range(1..=10_000))]
    wells: u32,

    /// Number of synthetic horizons
    #[arg(long, default_value = "3", value_parser = clap::value_parser!(u32).range(1..=20))]
    horizons: u32,

    /// Scattered samples per horizon
    #[arg(long, default_value = "2000")]
    samples: usize,

    /// Zone-set name stamped onto every output row
    #[arg(long, default_value = "synthetic")]
    zone_set: String,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Engine config file (overrides LATERAL_ZONES_CONFIG)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Run the batch twice to show the second merge changes nothing
    #[arg(long)]
    rerun: bool,

    /// Print the batch report as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Emit logs as JSON lines
    #[arg(long, env = "LATERAL_ZONES_JSON_LOGS")]
    json_logs: bool,
}

// ============================================================================
// Synthetic Field
// ============================================================================

struct FieldGenerator {
    rng: StdRng,
    horizon_noise: Normal<f64>,
}

impl FieldGenerator {
    fn new(seed: Option<u64>) -> Result<Self> {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        let horizon_noise = Normal::new(0.0, 1.5)
            .map_err(|e| anyhow::anyhow!("Invalid horizon noise distribution: {e}"))?;
        Ok(Self { rng, horizon_noise })
    }

    /// Gently dipping planes with a little elevation noise.
    fn horizons(&mut self, count: u32, samples: usize) -> Vec<HorizonSurface> {
        let dip_x = self.rng.gen_range(-0.004..0.004);
        let dip_y = self.rng.gen_range(-0.004..0.004);

        (0..count)
            .map(|h| {
                let base = FIRST_HORIZON_ELEVATION - f64::from(h) * HORIZON_SPACING;
                // Each horizon tilts slightly differently so bands thin and thicken
                let local_dip = self.rng.gen_range(-0.0015..0.0015);
                let points = (0..samples)
                    .map(|_| {
                        let x = self.rng.gen_range(0.0..FIELD_EXTENT);
                        let y = self.rng.gen_range(0.0..FIELD_EXTENT);
                        let z = base
                            + (dip_x + local_dip) * (x - FIELD_EXTENT / 2.0)
                            + dip_y * (y - FIELD_EXTENT / 2.0)
                            + self.horizon_noise.sample(&mut self.rng);
                        HorizonSample::new(x, y, z)
                    })
                    .collect();
                HorizonSurface::new(format!("H{}", h + 1), points)
            })
            .collect()
    }

    /// Vertical hole, circular build, then an undulating lateral.
    fn well(&mut self, index: u32, horizons: u32) -> Result<WellTrajectory> {
        let x0 = self.rng.gen_range(0.2 * FIELD_EXTENT..0.8 * FIELD_EXTENT);
        let y0 = self.rng.gen_range(0.2 * FIELD_EXTENT..0.8 * FIELD_EXTENT);
        let azimuth = self.rng.gen_range(0.0..TAU);
        let (dir_x, dir_y) = (azimuth.cos(), azimuth.sin());

        let stack_depth = f64::from(horizons) * HORIZON_SPACING;
        let landing = FIRST_HORIZON_ELEVATION - self.rng.gen_range(-0.25 * HORIZON_SPACING..stack_depth);
        let lateral_length = self.rng.gen_range(3000.0..8000.0);
        let trend = self.rng.gen_range(-0.004..0.004);
        let amplitude = self.rng.gen_range(0.0..10.0);
        let wavelength = self.rng.gen_range(6000.0..12_000.0);

        let mut points: Vec<(f64, f64, f64)> = Vec::new();

        // Vertical section down to kickoff
        let kickoff = landing + BUILD_RADIUS;
        let mut tvd = 0.0;
        while tvd > kickoff {
            points.push((x0, y0, tvd));
            tvd -= 500.0;
        }

        // Build section in 10 degree steps
        for step in 0..=9 {
            let theta = f64::from(step) * FRAC_PI_2 / 9.0;
            let offset = BUILD_RADIUS * (1.0 - theta.cos());
            points.push((x0 + dir_x * offset, y0 + dir_y * offset, kickoff - BUILD_RADIUS * theta.sin()));
        }

        // Lateral
        let (lx, ly) = (x0 + dir_x * BUILD_RADIUS, y0 + dir_y * BUILD_RADIUS);
        let mut s = LATERAL_STEP;
        while s <= lateral_length {
            let z = landing + trend * s + amplitude * (TAU * s / wavelength).sin();
            points.push((lx + dir_x * s, ly + dir_y * s, z));
            s += LATERAL_STEP;
        }

        let mut md = 0.0;
        let survey: Vec<SurveyPoint> = points
            .iter()
            .enumerate()
            .map(|(i, &(x, y, tvd))| {
                if i > 0 {
                    let (px, py, pz) = points[i - 1];
                    md += ((x - px).powi(2) + (y - py).powi(2) + (tvd - pz).powi(2)).sqrt();
                }
                SurveyPoint { md, tvd, x, y }
            })
            .collect();

        let well_id = format!("SYN-{:04}", index + 1);
        WellTrajectory::from_survey(&well_id, &survey)
            .with_context(|| format!("Synthetic trajectory for {well_id} is invalid"))
    }
}

// ============================================================================
// Output
// ============================================================================

fn print_table(report: &BatchReport) {
    println!("{:<10} {:>10} {:>9}  {}", "WELL", "LATERAL", "INTERVALS", "PERCENTAGES");
    for outcome in &report.outcomes {
        let length = outcome
            .lateral_length
            .map_or_else(|| "-".to_string(), |l| format!("{l:.1}"));
        let shares = match outcome.status {
            WellStatus::Zoned => outcome
                .percentages
                .iter()
                .map(|p| match p.percentage {
                    Some(pct) => format!("{} {:.1}%", p.grid_name, pct),
                    None => format!("{} n/a", p.grid_name),
                })
                .collect::<Vec<_>>()
                .join(" | "),
            WellStatus::NoLateral => "no lateral".to_string(),
            WellStatus::Cancelled => "cancelled".to_string(),
        };
        println!(
            "{:<10} {:>10} {:>9}  {}",
            outcome.well_id,
            length,
            outcome.intervals.len(),
            shares
        );
    }

    let issues: Vec<_> = report.issues().collect();
    if !issues.is_empty() {
        println!();
        println!("ISSUES ({})", issues.len());
        for issue in issues {
            println!("  {issue}");
        }
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    // Logs go to stderr so stdout stays clean for the table or JSON
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(args.json_logs);

    let engine_config = match &args.config {
        Some(path) => EngineConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => EngineConfig::load(),
    };
    config::init(engine_config);

    let mut generator = FieldGenerator::new(args.seed)?;
    let surfaces = generator.horizons(args.horizons, args.samples);
    let wells = (0..args.wells)
        .map(|i| generator.well(i, args.horizons))
        .collect::<Result<Vec<_>>>()?;

    info!(
        wells = wells.len(),
        horizons = surfaces.len(),
        samples = args.samples,
        seed = ?args.seed,
        "Synthetic field generated"
    );

    let engine = ZoneEngine::from_surfaces(config::get().clone(), &surfaces);
    let mut master = InMemoryMaster::new();

    let report = engine.run_batch(&wells, &args.zone_set, None);
    report
        .merge_into(&mut master, &config::get().merge)
        .context("Merge into master tables failed")?;

    if args.rerun {
        let again = engine.run_batch(&wells, &args.zone_set, None);
        let stats = again
            .merge_into(&mut master, &config::get().merge)
            .context("Second merge into master tables failed")?;
        if !stats.is_noop() {
            warn!(?stats, "Second run changed the master tables");
        }
    }

    info!(
        interval_rows = master.interval_count(),
        well_rows = master.well_count(),
        "Master tables ready"
    );

    if args.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{json}");
    } else {
        print_table(&report);
    }

    Ok(())
}
