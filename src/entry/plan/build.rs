use clap::ArgMatches;
use tracing::{debug, error};

use crate::app::WatchPlan;
use crate::args::{Cli, Command, ServeArgs, WatchArgs};
use crate::config::types::ConfigFile;
use crate::config::{apply_serve_config, apply_watch_config, load_config};
use crate::error::{AppError, AppResult, ValidationError};
use crate::session::PlaybackScript;
use crate::sync::{ServerSettings, parse_live_url};

use super::types::RunPlan;

pub(crate) fn build_plan(cli: Cli, matches: &ArgMatches) -> AppResult<RunPlan> {
    let config = load_config(cli.config.as_deref())?.unwrap_or_default();
    match cli.command {
        None => {
            debug!("No subcommand given, serving");
            build_serve_plan(ServeArgs::from_env_defaults(), None, &config)
        }
        Some(Command::Serve(args)) => {
            build_serve_plan(args, matches.subcommand_matches("serve"), &config)
        }
        Some(Command::Watch(args)) => {
            build_watch_plan(args, matches.subcommand_matches("watch"), &config)
        }
    }
}

fn build_serve_plan(
    mut args: ServeArgs,
    matches: Option<&ArgMatches>,
    config: &ConfigFile,
) -> AppResult<RunPlan> {
    if let Some(section) = config.serve.as_ref() {
        apply_serve_config(&mut args, matches, section)?;
    }
    Ok(RunPlan::Serve(ServerSettings {
        http_listen: args.effective_http_listen(),
        ws_listen: args.ws_listen,
        fanout: args.fanout,
    }))
}

fn build_watch_plan(
    mut args: WatchArgs,
    matches: Option<&ArgMatches>,
    config: &ConfigFile,
) -> AppResult<RunPlan> {
    if let Some(section) = config.watch.as_ref() {
        apply_watch_config(&mut args, matches, section)?;
    }

    let video_id = match args.video_id {
        Some(video_id) if !video_id.trim().is_empty() => video_id,
        Some(_) => return Err(AppError::validation(ValidationError::EmptyVideoId)),
        None => {
            error!("Missing video id (set --video-id or provide in config).");
            return Err(AppError::validation(ValidationError::MissingVideoId));
        }
    };
    let Some(script_path) = args.script else {
        error!("Missing playback script (set --script or provide in config).");
        return Err(AppError::validation(ValidationError::MissingScript));
    };
    let url = parse_live_url(&args.url)?;
    let script = PlaybackScript::load(&script_path)?;
    debug!(
        "Loaded {} playback step(s) from {}",
        script.steps.len(),
        script_path.display()
    );

    Ok(RunPlan::Watch(WatchPlan {
        url,
        video_id,
        script,
        sample_interval: args.sample_interval,
    }))
}
