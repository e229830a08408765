
use std::fs;

use tempfile::tempdir;

use support_cli::{free_port, http_get, run_watchline, spawn_server};

#[test]
fn e2e_cli_help_lists_subcommands() -> Result<(), String> {
    let output = run_watchline(["--help"])?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    if !output.status.success() || !stdout.contains("serve") || !stdout.contains("watch") {
        return Err(format!("unexpected help output: {}", stdout));
    }
    Ok(())
}

#[test]
fn e2e_cli_watch_requires_video_id() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let script = dir.path().join("session.jsonl");
    fs::write(&script, "{\"at_ms\": 0, \"action\": \"play\"}\n")
        .map_err(|err| format!("write failed: {}", err))?;

    let script_arg = script.to_string_lossy().into_owned();
    let output = run_watchline(["watch", "--script", script_arg.as_str()])?;
    let combined = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    if output.status.success() || !combined.contains("MissingVideoId") {
        return Err(format!("unexpected result: {}", combined));
    }
    Ok(())
}

#[test]
fn e2e_cli_watch_against_serve() -> Result<(), String> {
    let http_port = free_port()?;
    let ws_port = free_port()?;
    let _server = spawn_server(http_port, ws_port)?;

    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let script = dir.path().join("session.jsonl");
    fs::write(
        &script,
        "# five seconds of a ten minute video\n\
         {\"at_ms\": 0, \"action\": \"duration\", \"seconds\": 600}\n\
         {\"at_ms\": 0, \"action\": \"play\"}\n\
         {\"at_ms\": 500, \"action\": \"pause\"}\n",
    )
    .map_err(|err| format!("write failed: {}", err))?;

    let url = format!("ws://127.0.0.1:{}", ws_port);
    let script_arg = script.to_string_lossy().into_owned();
    let output = run_watchline([
        "watch",
        "--url",
        url.as_str(),
        "--video-id",
        "intro",
        "--script",
        script_arg.as_str(),
        "--sample-interval",
        "100ms",
        "--no-color",
    ])?;
    if !output.status.success() {
        return Err(format!(
            "stdout: {}\nstderr: {}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        ));
    }

    let body = http_get(http_port, "/progress/intro")?;
    if !body.starts_with(r#"{"intervals":[{"start":0."#) {
        return Err(format!("unexpected snapshot: {}", body));
    }
    Ok(())
}
