//! Meshwalk testbed
//!
//! Runs the demo course headless from a scripted input timeline and logs the
//! player's trajectory and contact events.
//!
//! Use `--config <path>` (or `MESHWALK_CONFIG`) to load a TOML run config.
//! Log verbosity follows `RUST_LOG` and defaults to `info`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use testbed::{Testbed, TestbedConfig};
use tracing_subscriber::EnvFilter;

/// Meshwalk character physics testbed
#[derive(Parser, Debug)]
#[command(name = "testbed")]
#[command(about = "Scripted headless runs of the meshwalk character physics")]
struct Args {
    /// TOML run config; a missing file falls back to defaults
    #[arg(long, env = "MESHWALK_CONFIG")]
    config: Option<PathBuf>,

    /// Override the run length in seconds
    #[arg(long)]
    duration: Option<f64>,

    /// Override the fixed step in seconds
    #[arg(long)]
    dt: Option<f64>,
}

fn load_config(path: Option<&PathBuf>) -> Result<TestbedConfig> {
    match path {
        Some(path) if path.exists() => {
            tracing::info!(path = %path.display(), "loading config");
            TestbedConfig::load(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))
        }
        Some(path) => {
            tracing::warn!(path = %path.display(), "config not found, using defaults");
            Ok(TestbedConfig::default())
        }
        None => Ok(TestbedConfig::default()),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut config = load_config(args.config.as_ref())?;
    if let Some(duration) = args.duration {
        config.duration = Some(duration);
    }
    if let Some(dt) = args.dt {
        config.dt = dt;
    }
    anyhow::ensure!(config.dt > 0.0, "dt must be positive, got {}", config.dt);

    let duration = config.run_duration();
    tracing::info!(dt = config.dt, duration, inputs = config.script.len(), "starting run");

    let mut testbed = Testbed::new(&config).context("Failed to build demo course")?;
    let summary = testbed.run(duration)?;

    let course = testbed.course();
    for surface in [course.ground, course.ramp, course.wall, course.bridge, course.trigger] {
        let touches = summary.count(|event| event.surface() == surface);
        tracing::info!(surface = course.name_of(surface), touches, "contact totals");
    }
    tracing::info!(
        ticks = summary.ticks,
        elapsed = summary.elapsed,
        position = %summary.final_body.position,
        eye = %summary.eye,
        grounded = summary.final_body.is_grounded(),
        "run complete"
    );

    Ok(())
}
