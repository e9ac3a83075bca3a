//! # errcheck Demo Binary
//!
//! Runs simulated device bring-up sequences written with checked calls and
//! reports the first failure of each.
//!
//! # Usage
//!
//! ```bash
//! # All scenarios with the built-in defaults
//! errcheck_demo
//!
//! # Radio loop only, with a configuration file
//! errcheck_demo --config config/demo.toml --scenario radio
//!
//! # Arm a runtime injection before starting
//! errcheck_demo --inject sensor
//!
//! # Type codes on stdin while the radio loop runs
//! errcheck_demo --scenario radio --cycles 100 --interactive
//!
//! # Build-time injection: the POWER site fails without being called
//! cargo run -p errcheck_demo --features inject-power
//! ```

#![deny(warnings)]

use clap::Parser;
use errcheck::{Diagnostics, ErrorCode};
use errcheck_common::config::ConfigLoader;
use errcheck_common::consts::DEFAULT_CONFIG_PATH;
use errcheck_demo::codes::{describe, parse_code};
use errcheck_demo::controller::{InjectionSchedule, spawn_console_controller};
use errcheck_demo::scenarios::{RadioLoop, Scenario, run_scenarios};
use errcheck_demo::sites::ForcedSites;
use errcheck_demo::{Board, DemoConfig, DemoError, InitError};
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;
use tracing::{Level, error, info, warn};
use tracing_subscriber::EnvFilter;

/// errcheck demo - simulated device bring-up with fail-fast checked calls
#[derive(Parser, Debug)]
#[command(name = "errcheck_demo")]
#[command(version)]
#[command(about = "Simulated device bring-up with fail-fast checked calls")]
#[command(long_about = None)]
struct Args {
    /// Path to the TOML configuration [default: /etc/errcheck/demo.toml if present]
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Scenario to run
    #[arg(short, long, value_enum, default_value_t = Scenario::All)]
    scenario: Scenario,

    /// Arm a runtime injection before the first scenario (name or raw byte)
    #[arg(short, long, value_name = "CODE")]
    inject: Option<String>,

    /// Override the radio loop length
    #[arg(long)]
    cycles: Option<u64>,

    /// Read injection codes from stdin while running
    #[arg(long)]
    interactive: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long)]
    json: bool,
}

static FAILURES: AtomicU32 = AtomicU32::new(0);

fn count_failure(_code: InitError) {
    FAILURES.fetch_add(1, Ordering::Relaxed);
}

fn main() {
    if let Err(e) = run() {
        error!("demo failed: {}", e);
        std::process::exit(1);
    }
}

/// Simulated hardware failures are reported, not returned.
fn run() -> Result<(), DemoError> {
    let args = Args::parse();

    let path = args.config.clone().or_else(|| {
        let default = PathBuf::from(DEFAULT_CONFIG_PATH);
        default.exists().then_some(default)
    });
    let loaded = match &path {
        Some(path) => DemoConfig::load(path),
        None => Ok(DemoConfig::default()),
    };
    // Tracing comes up even when the file is broken, so the error is logged.
    setup_tracing(&args, loaded.as_ref().unwrap_or(&DemoConfig::default()));
    let config = loaded?;
    config.validate()?;
    if let Some(path) = &path {
        info!("Loaded config from {}", path.display());
    }

    info!(
        "{} v{} starting",
        config.shared.service_name,
        env!("CARGO_PKG_VERSION")
    );
    for code in ForcedSites::COMPILED.codes() {
        warn!(
            code = code.name(),
            "build forces {} sites to fail",
            describe(code)
        );
    }

    let diag = Arc::new(
        Diagnostics::<InitError>::new()
            .with_sentinel(config.demo.sentinel)
            .with_hook(count_failure),
    );

    if let Some(text) = &args.inject {
        let code = parse_code(text)
            .filter(|code| !code.is_none())
            .ok_or_else(|| DemoError::UnknownCode(text.clone()))?;
        diag.trigger().arm(code);
        info!(code = code.name(), "runtime injection armed");
    }

    let running = Arc::new(AtomicBool::new(true));
    let flag = Arc::clone(&running);
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        flag.store(false, Ordering::SeqCst);
    })?;

    if args.interactive {
        info!("reading injection codes from stdin ('off' disarms, 'quit' stops)");
        // Detached: a blocked stdin read must not hold up exit.
        drop(spawn_console_controller(
            Arc::clone(&diag),
            BufReader::new(std::io::stdin()),
        ));
    }

    let mut board = Board::from_config(&config.demo);
    let mut schedule = InjectionSchedule::from_config(&config.demo.schedule)?;
    let radio = RadioLoop {
        cycles: args.cycles.unwrap_or(config.demo.cycles),
        period: Duration::from_millis(config.demo.cycle_period_ms),
    };

    let reports = run_scenarios(
        args.scenario,
        &mut board,
        &diag,
        &mut schedule,
        radio,
        &running,
    );

    for report in &reports {
        match report.cause {
            None => info!(
                scenario = report.scenario.as_str(),
                status = report.status,
                "ok"
            ),
            Some(code) => warn!(
                scenario = report.scenario.as_str(),
                status = report.status,
                code = code.name(),
                raw = code.to_raw(),
                "failed"
            ),
        }
    }
    info!(
        passed = reports.iter().filter(|r| r.passed()).count(),
        total = reports.len(),
        failures = FAILURES.load(Ordering::Relaxed),
        "{} shutdown complete",
        config.shared.service_name
    );

    Ok(())
}

/// Setup tracing subscriber: `-v` wins, else the configured level.
fn setup_tracing(args: &Args, config: &DemoConfig) {
    let filter = if args.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.shared.log_level.as_directive()))
    };

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }
}
