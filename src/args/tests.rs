use std::time::Duration;

use super::parsers::parse_duration_arg;
use super::test_support::parse_test_args;
use super::{Command, ServeArgs};
use crate::error::{AppError, AppResult, ValidationError};

#[test]
fn parse_args_without_subcommand() -> AppResult<()> {
    let (cli, _) = parse_test_args(["watchline", "--verbose"])?;
    if cli.command.is_some() {
        return Err(AppError::validation("Expected no subcommand"));
    }
    if !cli.verbose || cli.no_color {
        return Err(AppError::validation("Unexpected global flags"));
    }
    Ok(())
}

#[test]
fn parse_args_serve_defaults() -> AppResult<()> {
    let (cli, _) = parse_test_args(["watchline", "serve"])?;
    match cli.command {
        Some(Command::Serve(serve)) => {
            if serve.http_listen.to_string() != "127.0.0.1:3001" {
                return Err(AppError::validation(format!(
                    "Unexpected http listen: {}",
                    serve.http_listen
                )));
            }
            if serve.ws_listen.to_string() != "127.0.0.1:3002" {
                return Err(AppError::validation(format!(
                    "Unexpected ws listen: {}",
                    serve.ws_listen
                )));
            }
            if serve.fanout {
                return Err(AppError::validation("Fan-out should default to off"));
            }
            Ok(())
        }
        _ => Err(AppError::validation("Expected serve subcommand")),
    }
}

#[test]
fn parse_args_serve_port_override() -> AppResult<()> {
    let (cli, _) = parse_test_args([
        "watchline",
        "serve",
        "--http-listen",
        "0.0.0.0:8080",
        "--port",
        "9000",
        "--fanout",
    ])?;
    match cli.command {
        Some(Command::Serve(serve)) => {
            if serve.effective_http_listen().to_string() != "0.0.0.0:9000" {
                return Err(AppError::validation(format!(
                    "Unexpected effective address: {}",
                    serve.effective_http_listen()
                )));
            }
            if !serve.fanout {
                return Err(AppError::validation("Expected fan-out on"));
            }
            Ok(())
        }
        _ => Err(AppError::validation("Expected serve subcommand")),
    }
}

#[test]
fn parse_args_rejects_bad_listen_addr() -> AppResult<()> {
    if parse_test_args(["watchline", "serve", "--ws-listen", "localhost"]).is_ok() {
        return Err(AppError::validation("Expected invalid address error"));
    }
    Ok(())
}

#[test]
fn parse_args_watch_options() -> AppResult<()> {
    let (cli, _) = parse_test_args([
        "watchline",
        "watch",
        "--video-id",
        "video1",
        "--script",
        "session.jsonl",
        "--sample-interval",
        "250ms",
        "--no-color",
    ])?;
    if !cli.no_color {
        return Err(AppError::validation("Global flag after subcommand ignored"));
    }
    match cli.command {
        Some(Command::Watch(watch)) => {
            if watch.url != "ws://127.0.0.1:3002" {
                return Err(AppError::validation("Unexpected default url"));
            }
            if watch.video_id.as_deref() != Some("video1") {
                return Err(AppError::validation("Unexpected video id"));
            }
            if watch.sample_interval != Duration::from_millis(250) {
                return Err(AppError::validation("Unexpected sample interval"));
            }
            Ok(())
        }
        _ => Err(AppError::validation("Expected watch subcommand")),
    }
}

#[test]
fn env_defaults_match_cli_defaults() -> AppResult<()> {
    let (cli, _) = parse_test_args(["watchline", "serve"])?;
    let Some(Command::Serve(parsed)) = cli.command else {
        return Err(AppError::validation("Expected serve subcommand"));
    };
    let implicit = ServeArgs::from_env_defaults();
    if parsed.http_listen != implicit.http_listen || parsed.ws_listen != implicit.ws_listen {
        return Err(AppError::validation("Implicit serve defaults diverge"));
    }
    Ok(())
}

#[test]
fn parse_duration_units() -> AppResult<()> {
    let cases = [
        ("250ms", Duration::from_millis(250)),
        ("5", Duration::from_secs(5)),
        ("5s", Duration::from_secs(5)),
        ("2m", Duration::from_secs(120)),
        ("1h", Duration::from_secs(3600)),
    ];
    for (input, expected) in cases {
        let parsed = parse_duration_arg(input)?;
        if parsed != expected {
            return Err(AppError::validation(format!(
                "{} parsed to {:?}",
                input, parsed
            )));
        }
    }
    Ok(())
}

#[test]
fn parse_duration_rejects_bad_values() -> AppResult<()> {
    if !matches!(parse_duration_arg(""), Err(ValidationError::DurationEmpty)) {
        return Err(AppError::validation("Expected DurationEmpty"));
    }
    if !matches!(
        parse_duration_arg("ms"),
        Err(ValidationError::InvalidDurationFormat { .. })
    ) {
        return Err(AppError::validation("Expected InvalidDurationFormat"));
    }
    if !matches!(
        parse_duration_arg("3d"),
        Err(ValidationError::InvalidDurationUnit { .. })
    ) {
        return Err(AppError::validation("Expected InvalidDurationUnit"));
    }
    if !matches!(parse_duration_arg("0ms"), Err(ValidationError::DurationZero)) {
        return Err(AppError::validation("Expected DurationZero"));
    }
    Ok(())
}
