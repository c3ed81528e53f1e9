//! Tests for CLI subcommand parsing.

use std::path::PathBuf;

use clap::Parser;
use office_presence::config::{Cli, Command, DEFAULT_SERVER_PORT, SPEED_THRESHOLD_MBPS};
use office_presence::LogFormat;

#[test]
fn test_verify_with_position_and_hint() {
    let cli = Cli::try_parse_from([
        "office_presence",
        "--log-format",
        "json",
        "verify",
        "--registry",
        "offices.json",
        "--latitude",
        "37.7749",
        "--longitude",
        "-122.4194",
        "--accuracy",
        "15",
        "--connection",
        "wifi",
        "--json",
    ])
    .unwrap();

    assert!(matches!(cli.log_format, LogFormat::Json));
    let Command::Verify(args) = cli.command else {
        panic!("expected verify subcommand");
    };
    assert_eq!(args.engine.registry, PathBuf::from("offices.json"));
    assert_eq!(args.latitude, Some(37.7749));
    assert_eq!(args.longitude, Some(-122.4194));
    assert_eq!(args.accuracy, 15.0);
    assert_eq!(args.connection.as_deref(), Some("wifi"));
    assert!(args.json);
    assert_eq!(args.engine.speed_threshold_mbps, SPEED_THRESHOLD_MBPS);
}

#[test]
fn test_repeated_ip_endpoints_keep_order() {
    let cli = Cli::try_parse_from([
        "office_presence",
        "verify",
        "--registry",
        "offices.json",
        "--ip-endpoint",
        "https://first.example/json",
        "--ip-endpoint",
        "https://second.example/json",
    ])
    .unwrap();

    let args = cli.command.engine_args();
    let config = args.to_config(cli.log_level.clone(), cli.log_format.clone());
    assert_eq!(
        config.ip_lookup_endpoints,
        vec![
            "https://first.example/json".to_string(),
            "https://second.example/json".to_string()
        ]
    );
}

#[test]
fn test_serve_defaults() {
    let cli = Cli::try_parse_from(["office_presence", "serve", "--registry", "offices.json"])
        .unwrap();
    let Command::Serve(args) = cli.command else {
        panic!("expected serve subcommand");
    };
    assert_eq!(args.port, DEFAULT_SERVER_PORT);
}

#[test]
fn test_invalid_log_level_is_rejected() {
    let result = Cli::try_parse_from([
        "office_presence",
        "--log-level",
        "verbose",
        "verify",
        "--registry",
        "offices.json",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_unknown_subcommand_is_rejected() {
    assert!(Cli::try_parse_from(["office_presence", "scan", "urls.txt"]).is_err());
}
