//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `office_presence` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;

use office_presence::config::{Cli, Command, ServeArgs, VerifyArgs, REGISTRY_PATH_ENV};
use office_presence::initialization::init_logger_with;
use office_presence::{
    start_status_server, Config, ConnectionHint, DevicePosition, FixedPosition,
    GeolocationProvider, NoGeolocation, OfficeRegistry, OfficeVerificationEngine, ReportedIp,
    ServerState, VerificationResult,
};

/// Exit code for a completed verification that denied check-in.
const EXIT_DENIED: i32 = 2;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists)
    // This allows setting OFFICE_PRESENCE_REGISTRY in .env without exporting it manually
    // Try loading from current directory first, then from the executable's directory
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let cli = Cli::parse();

    init_logger_with(cli.log_level.clone().into(), cli.log_format.clone())
        .context("Failed to initialize logger")?;

    let config = cli
        .command
        .engine_args()
        .to_config(cli.log_level.clone(), cli.log_format.clone());

    let outcome = match cli.command {
        Command::Verify(args) => run_verify(config, args).await,
        Command::Serve(args) => run_serve(config, args).await.map(|()| true),
    };

    match outcome {
        Ok(true) => Ok(()),
        Ok(false) => process::exit(EXIT_DENIED),
        Err(e) => {
            eprintln!("office_presence error: {:#}", e);
            process::exit(1);
        }
    }
}

fn load_registry(path: &std::path::Path) -> Result<Arc<OfficeRegistry>> {
    let registry = OfficeRegistry::from_path(path).with_context(|| {
        format!(
            "Failed to load office registry (set --registry or {})",
            REGISTRY_PATH_ENV
        )
    })?;
    Ok(Arc::new(registry))
}

/// Runs one verification and prints it. Returns whether check-in is allowed.
async fn run_verify(config: Config, args: VerifyArgs) -> Result<bool> {
    let registry = load_registry(&args.engine.registry)?;

    let geolocation: Arc<dyn GeolocationProvider> = match (args.latitude, args.longitude) {
        (Some(latitude), Some(longitude)) => Arc::new(FixedPosition(DevicePosition {
            latitude,
            longitude,
            accuracy_meters: args.accuracy,
        })),
        _ => Arc::new(NoGeolocation),
    };
    let hint: ConnectionHint = args
        .connection
        .as_deref()
        .and_then(|value| value.parse().ok())
        .unwrap_or_default();

    let mut engine =
        OfficeVerificationEngine::from_config(&config, registry, geolocation, Arc::new(hint))
            .context("Failed to initialize verification engine")?;
    if let Some(ip) = args.ip {
        engine = engine.with_ip_source(Arc::new(ReportedIp::new(ip)));
    }

    let result = engine.verify().await;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).context("Failed to serialize result")?
        );
    } else {
        print_result(&result);
    }

    Ok(result.is_in_office_network)
}

async fn run_serve(config: Config, args: ServeArgs) -> Result<()> {
    let registry = load_registry(&args.engine.registry)?;
    let state =
        ServerState::new(registry, config).context("Failed to initialize verification server")?;
    start_status_server(args.port, state).await
}

fn print_result(result: &VerificationResult) {
    let office = result
        .signals
        .as_ref()
        .and_then(|signals| signals.matched_office.as_deref());

    if result.is_in_office_network {
        match office {
            Some(office) => println!("{} {}", "✅ In office:".green().bold(), office),
            None => println!("{}", "✅ In office".green().bold()),
        }
    } else {
        println!(
            "{} {}",
            "❌ Not in office:".red().bold(),
            result.error.as_deref().unwrap_or_default()
        );
    }

    if let Some(location) = &result.current_location {
        println!("   Public IP: {}", location.ip);
    }
    if let Some(signals) = &result.signals {
        println!(
            "   Signals: ip={} gps={} network={}",
            signals.ip, signals.gps, signals.network
        );
        if let Some(distance) = signals.distance_meters {
            println!("   Nearest office: {:.0} m", distance);
        }
    }
}
