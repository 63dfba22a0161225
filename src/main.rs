//! bcscan - barcode/QR scanner for BaseConnect protective equipment
//!
//! This is the binary entry point. All logic lives in the library.

use std::path::PathBuf;

use baseconnect_app::config::{self, Settings};
use baseconnect_core::FacingMode;
use baseconnect_scan::{CliOverrides, HeadlessOptions, RunMode};
use clap::Parser;

/// Scan an equipment barcode or QR code and show its record
#[derive(Parser, Debug)]
#[command(name = "bcscan")]
#[command(about = "Barcode/QR scanner for BaseConnect protective equipment", long_about = None)]
struct Args {
    /// Config file (default: <config dir>/baseconnect/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Camera to open first: environment (rear) or user (front)
    #[arg(long, value_name = "MODE")]
    facing: Option<FacingMode>,

    /// Replay images from this directory instead of opening a camera
    #[arg(long, value_name = "DIR")]
    frames: Option<PathBuf>,

    /// Look codes up in a JSON export instead of the record store
    #[arg(long, value_name = "FILE")]
    catalog: Option<PathBuf>,

    /// Milliseconds between decode attempts
    #[arg(long, value_name = "MS")]
    poll_interval: Option<u64>,

    /// Run in headless mode (NDJSON events on stdout, commands on stdin)
    #[arg(long)]
    headless: bool,

    /// With --headless: quit once the first result or camera error is reached
    #[arg(long, requires = "headless")]
    once: bool,

    /// Write a commented default config file and exit
    #[arg(long)]
    init_config: bool,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let config_path = args.config.clone().or_else(config::config_path);

    if args.init_config {
        let Some(path) = config_path else {
            eprintln!("❌ No config directory on this system; pass --config <FILE>");
            std::process::exit(1);
        };
        if config::init_config(&path)? {
            eprintln!("✅ Wrote {}", path.display());
        } else {
            eprintln!("Config already exists at {}, left untouched", path.display());
        }
        return Ok(());
    }

    baseconnect_core::logging::init()?;

    let mut settings = match &config_path {
        Some(path) => config::load_settings(path),
        None => {
            let mut settings = Settings::default();
            config::apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
            settings
        }
    };
    CliOverrides {
        facing: args.facing,
        frames: args.frames,
        catalog: args.catalog,
        poll_interval_ms: args.poll_interval,
    }
    .apply(&mut settings);

    let mode = if args.headless {
        RunMode::Headless(HeadlessOptions {
            exit_after_result: args.once,
        })
    } else {
        RunMode::Tui
    };

    let handoff = match baseconnect_scan::run(settings, mode).await {
        Ok(handoff) => handoff,
        Err(e) => {
            if let Ok(log) = baseconnect_core::logging::get_current_log_file() {
                eprintln!("Details in {}", log.display());
            }
            return Err(e.into());
        }
    };

    if let Some(route) = handoff {
        // Navigation handoff for the caller (shell wrapper, launcher)
        if !args.headless {
            println!("{}", route);
        }
    }

    Ok(())
}
