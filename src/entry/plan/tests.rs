use std::time::Duration;

use tempfile::tempdir;

use super::build_plan;
use super::types::RunPlan;
use crate::args::test_support::parse_test_args;
use crate::error::{AppError, ValidationError};

fn plan_for(args: &[&str]) -> Result<RunPlan, AppError> {
    let (cli, matches) = parse_test_args(args.iter().copied())?;
    build_plan(cli, &matches)
}

#[test]
fn serve_plan_merges_config_and_cli() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let config_path = dir.path().join("serve.toml");
    std::fs::write(
        &config_path,
        "[serve]\nws_listen = \"127.0.0.1:7002\"\nfanout = true\n",
    )
    .map_err(|err| format!("write failed: {}", err))?;
    let config_arg = config_path.to_string_lossy().into_owned();

    let plan = plan_for(&[
        "watchline",
        "--config",
        &config_arg,
        "serve",
        "--http-listen",
        "127.0.0.1:7001",
        "--port",
        "7001",
    ])
    .map_err(|err| err.to_string())?;
    let RunPlan::Serve(settings) = plan else {
        return Err("Expected serve plan".to_owned());
    };
    if settings.http_listen.to_string() != "127.0.0.1:7001"
        || settings.ws_listen.to_string() != "127.0.0.1:7002"
        || !settings.fanout
    {
        return Err(format!("Unexpected settings: {:?}", settings));
    }
    Ok(())
}

#[test]
fn watch_plan_loads_script() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let script_path = dir.path().join("session.jsonl");
    std::fs::write(
        &script_path,
        "{\"at_ms\": 0, \"action\": \"play\"}\n{\"at_ms\": 3000, \"action\": \"pause\"}\n",
    )
    .map_err(|err| format!("write failed: {}", err))?;
    let script_arg = script_path.to_string_lossy().into_owned();

    let plan = plan_for(&[
        "watchline",
        "watch",
        "--video-id",
        "video1",
        "--script",
        &script_arg,
        "--sample-interval",
        "500ms",
    ])
    .map_err(|err| err.to_string())?;
    let RunPlan::Watch(watch) = plan else {
        return Err("Expected watch plan".to_owned());
    };
    if watch.video_id != "video1" || watch.script.steps.len() != 2 {
        return Err("Unexpected watch plan contents".to_owned());
    }
    if watch.sample_interval != Duration::from_millis(500) {
        return Err("Unexpected sample interval".to_owned());
    }
    if watch.url.as_str() != "ws://127.0.0.1:3002/" {
        return Err(format!("Unexpected url: {}", watch.url));
    }
    Ok(())
}

#[test]
fn watch_plan_requires_video_and_script() -> Result<(), String> {
    match plan_for(&["watchline", "watch", "--script", "unused.jsonl"]) {
        Err(AppError::Validation(ValidationError::MissingVideoId)) => {}
        Err(err) => return Err(format!("Expected MissingVideoId, got {}", err)),
        Ok(_) => return Err("Expected MissingVideoId".to_owned()),
    }
    match plan_for(&["watchline", "watch", "--video-id", "video1"]) {
        Err(AppError::Validation(ValidationError::MissingScript)) => {}
        Err(err) => return Err(format!("Expected MissingScript, got {}", err)),
        Ok(_) => return Err("Expected MissingScript".to_owned()),
    }
    match plan_for(&[
        "watchline",
        "watch",
        "--video-id",
        "video1",
        "--script",
        "unused.jsonl",
        "--url",
        "http://127.0.0.1:3002",
    ]) {
        Err(AppError::Validation(ValidationError::UnsupportedWsScheme { .. })) => Ok(()),
        Err(err) => Err(format!("Expected UnsupportedWsScheme, got {}", err)),
        Ok(_) => Err("Expected UnsupportedWsScheme".to_owned()),
    }
}
