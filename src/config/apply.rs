use std::path::PathBuf;

use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{ServeArgs, WatchArgs, parse_listen_addr};
use crate::error::{AppError, AppResult, ConfigError, ValidationError};

use super::types::{ServeConfig, WatchConfig};

fn is_cli(matches: Option<&ArgMatches>, name: &str) -> bool {
    matches.is_some_and(|matches| matches.value_source(name) == Some(ValueSource::CommandLine))
}

fn invalid_field(field: &'static str) -> impl FnOnce(ValidationError) -> AppError {
    move |source| AppError::config(ConfigError::InvalidField { field, source })
}

/// Applies `[serve]` values where the flag was not given on the command line.
///
/// `matches` are the `serve` subcommand matches, `None` when the subcommand
/// was implied.
///
/// # Errors
///
/// Returns an error when a configured address is invalid.
pub fn apply_serve_config(
    args: &mut ServeArgs,
    matches: Option<&ArgMatches>,
    config: &ServeConfig,
) -> AppResult<()> {
    if !is_cli(matches, "http_listen")
        && let Some(value) = config.http_listen.as_deref()
    {
        args.http_listen = parse_listen_addr(value).map_err(invalid_field("serve.http_listen"))?;
    }

    if !is_cli(matches, "ws_listen")
        && let Some(value) = config.ws_listen.as_deref()
    {
        args.ws_listen = parse_listen_addr(value).map_err(invalid_field("serve.ws_listen"))?;
    }

    if !is_cli(matches, "fanout")
        && let Some(fanout) = config.fanout
    {
        args.fanout = fanout;
    }

    Ok(())
}

/// Applies `[watch]` values where the flag was not given on the command line.
///
/// # Errors
///
/// Returns an error when the configured sample interval is invalid.
pub fn apply_watch_config(
    args: &mut WatchArgs,
    matches: Option<&ArgMatches>,
    config: &WatchConfig,
) -> AppResult<()> {
    if !is_cli(matches, "url")
        && let Some(url) = config.url.clone()
    {
        args.url = url;
    }

    if !is_cli(matches, "video_id")
        && let Some(video_id) = config.video_id.clone()
    {
        args.video_id = Some(video_id);
    }

    if !is_cli(matches, "script")
        && let Some(script) = config.script.as_deref()
    {
        args.script = Some(PathBuf::from(script));
    }

    if !is_cli(matches, "sample_interval")
        && let Some(interval) = config.sample_interval.as_ref()
    {
        args.sample_interval = interval
            .to_duration()
            .map_err(invalid_field("watch.sample_interval"))?;
    }

    Ok(())
}
