//! Command-line interface.
//!
//! # Examples
//!
//! ```bash
//! # One-off check with a GPS fix and a connection hint
//! office_presence verify --registry offices.json \
//!     --latitude 37.7749 --longitude -122.4194 --accuracy 15 --connection wifi
//!
//! # Registry path from the environment (or a .env file)
//! OFFICE_PRESENCE_REGISTRY=offices.json office_presence verify --json
//!
//! # Standalone verification server
//! office_presence serve --registry offices.json --port 8085
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::constants::{
    DEFAULT_SERVER_PORT, DEFAULT_SPEED_TEST_URL, DEFAULT_USER_AGENT, GPS_TIMEOUT,
    IP_LOOKUP_TIMEOUT_MS, SPEED_TEST_TIMEOUT_MS, SPEED_THRESHOLD_MBPS,
};
use super::types::{Config, LogFormat, LogLevel};

#[derive(Debug, Parser)]
#[command(
    name = "office_presence",
    version,
    about = "Verifies office presence from public IP, GPS and network-quality signals."
)]
pub struct Cli {
    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info, global = true)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain, global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a single verification and exit non-zero when denied
    Verify(VerifyArgs),
    /// Serve verifications over HTTP
    Serve(ServeArgs),
}

/// Settings shared by every subcommand.
#[derive(Debug, Args)]
pub struct EngineArgs {
    /// Office registry JSON file
    #[arg(long, env = "OFFICE_PRESENCE_REGISTRY", value_parser)]
    pub registry: PathBuf,

    /// Public IP lookup endpoint; repeat to try several in order
    #[arg(long = "ip-endpoint")]
    pub ip_endpoints: Vec<String>,

    /// Per-endpoint IP lookup timeout in milliseconds
    #[arg(long, default_value_t = IP_LOOKUP_TIMEOUT_MS)]
    pub ip_lookup_timeout_ms: u64,

    /// Speed-test download endpoint
    #[arg(long, default_value = DEFAULT_SPEED_TEST_URL)]
    pub speed_test_url: String,

    /// Throughput in Mbps above which the network counts as trusted
    #[arg(long, default_value_t = SPEED_THRESHOLD_MBPS)]
    pub speed_threshold_mbps: f64,

    /// Speed-test timeout in milliseconds
    #[arg(long, default_value_t = SPEED_TEST_TIMEOUT_MS)]
    pub speed_test_timeout_ms: u64,

    /// Maximum time to wait for a GPS fix, in milliseconds
    #[arg(long, default_value_t = GPS_TIMEOUT.as_millis() as u64)]
    pub gps_timeout_ms: u64,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,
}

#[derive(Debug, Args)]
pub struct VerifyArgs {
    #[command(flatten)]
    pub engine: EngineArgs,

    /// Device latitude in degrees
    #[arg(long, requires = "longitude", allow_negative_numbers = true)]
    pub latitude: Option<f64>,

    /// Device longitude in degrees
    #[arg(long, requires = "latitude", allow_negative_numbers = true)]
    pub longitude: Option<f64>,

    /// Reported GPS accuracy in meters
    #[arg(long, default_value_t = 0.0)]
    pub accuracy: f64,

    /// Connection type hint: wifi|ethernet|cellular|unknown
    #[arg(long)]
    pub connection: Option<String>,

    /// Use this public IP instead of looking it up
    #[arg(long)]
    pub ip: Option<String>,

    /// Print the full result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    #[command(flatten)]
    pub engine: EngineArgs,

    /// Port to listen on (127.0.0.1)
    #[arg(long, default_value_t = DEFAULT_SERVER_PORT)]
    pub port: u16,
}

impl EngineArgs {
    /// Library configuration for these arguments.
    pub fn to_config(&self, log_level: LogLevel, log_format: LogFormat) -> Config {
        let defaults = Config::default();
        Config {
            log_level,
            log_format,
            ip_lookup_endpoints: if self.ip_endpoints.is_empty() {
                defaults.ip_lookup_endpoints.clone()
            } else {
                self.ip_endpoints.clone()
            },
            ip_lookup_timeout_ms: self.ip_lookup_timeout_ms,
            speed_test_url: self.speed_test_url.clone(),
            speed_threshold_mbps: self.speed_threshold_mbps,
            speed_test_timeout_ms: self.speed_test_timeout_ms,
            gps_timeout_ms: self.gps_timeout_ms,
            user_agent: self.user_agent.clone(),
            ..defaults
        }
    }
}

impl Command {
    pub fn engine_args(&self) -> &EngineArgs {
        match self {
            Command::Verify(args) => &args.engine,
            Command::Serve(args) => &args.engine,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_defaults() {
        let cli = Cli::try_parse_from([
            "office_presence",
            "verify",
            "--registry",
            "offices.json",
        ])
        .unwrap();
        let Command::Verify(args) = &cli.command else {
            panic!("expected verify subcommand");
        };
        assert_eq!(args.engine.registry, PathBuf::from("offices.json"));
        assert!(args.latitude.is_none());
        assert!(!args.json);

        let config = cli
            .command
            .engine_args()
            .to_config(cli.log_level.clone(), cli.log_format.clone());
        assert_eq!(config.ip_lookup_endpoints, Config::default().ip_lookup_endpoints);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_latitude_requires_longitude() {
        let result = Cli::try_parse_from([
            "office_presence",
            "verify",
            "--registry",
            "offices.json",
            "--latitude",
            "37.7",
        ]);
        assert!(result.is_err());
    }
}
