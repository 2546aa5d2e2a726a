//! Replays recorded head pose traces through the gesture classifier.

use anyhow::{Context, Result};
use clap::Parser;
use head_gesture::{
    app::{AppConfig, ReplayApp},
    config::{Config, EXAMPLE_CONFIG},
    gesture::ActionPolicy,
};
use log::info;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Pose trace to replay (`timestamp yaw pitch roll` or `timestamp -` per line)
    #[arg(short, long, required_unless_present = "print_config")]
    trace: Option<PathBuf>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<PathBuf>,

    /// Action policy (debounced, immediate)
    #[arg(short, long)]
    policy: Option<ActionPolicy>,

    /// Angle pre-filter, e.g. none, exponential:0.5, median:5, hampel:5:3.0
    #[arg(short, long)]
    filter: Option<String>,

    /// Minimum confidence (0.0-1.0) for an action
    #[arg(long)]
    confidence_threshold: Option<f64>,

    /// Minimum time between debounced actions in milliseconds
    #[arg(long)]
    cooldown: Option<f64>,

    /// Calibrate the neutral pose from the first frames of the trace
    #[arg(long)]
    calibrate: bool,

    /// Reset the tracker after every action, like moving to the next question
    #[arg(long)]
    reset_after_action: bool,

    /// Print an example configuration file and exit
    #[arg(long)]
    print_config: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    if args.print_config {
        print!("{EXAMPLE_CONFIG}");
        return Ok(());
    }

    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            Config::from_file(path).with_context(|| format!("loading {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(policy) = args.policy {
        config.action.policy = policy;
    }
    if let Some(filter) = args.filter {
        config.filter.kind = filter;
    }
    if args.calibrate {
        config.calibration.on_start = true;
    }

    let mut tracker = config.build_tracker().context("invalid configuration")?;
    if let Some(threshold) = args.confidence_threshold {
        tracker.classifier_mut().set_confidence_threshold(threshold);
    }
    if let Some(cooldown) = args.cooldown {
        tracker.classifier_mut().set_action_cooldown(cooldown);
    }

    let trace_path = args.trace.context("no trace given")?;
    let mut app = ReplayApp::new(
        AppConfig {
            trace_path,
            reset_after_action: args.reset_after_action,
        },
        tracker,
    );
    let summary = app.run()?;

    for fired in &summary.actions {
        println!("{:>10.0}ms  {}", fired.timestamp, fired.action);
    }
    println!(
        "{} frames, {} without face, {} stable, {} transitions, {} actions",
        summary.frames,
        summary.faces_lost,
        summary.stable_frames,
        summary.transitions,
        summary.actions.len()
    );
    if summary.calibration_failures > 0 {
        println!("{} frames rejected during calibration", summary.calibration_failures);
    }

    Ok(())
}
