use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use super::defaults::{DEFAULT_HTTP_LISTEN, DEFAULT_WATCH_URL, DEFAULT_WS_LISTEN};
use super::parsers::{parse_duration_arg, parse_listen_addr, parse_port};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Tracks which parts of a video were actually watched and keeps clients in sync over a live channel."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to config file (TOML or JSON); defaults to ./watchline.toml or ./watchline.json
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored log output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the sync server (default)
    Serve(ServeArgs),
    /// Replay a playback script against a running server
    Watch(WatchArgs),
}

#[derive(Debug, Args, Clone, PartialEq, Eq)]
pub struct ServeArgs {
    /// Address for the snapshot/reset HTTP endpoint
    #[arg(long = "http-listen", default_value_t = DEFAULT_HTTP_LISTEN, value_parser = parse_listen_addr)]
    pub http_listen: SocketAddr,

    /// Override the HTTP port
    #[arg(long, env = "PORT", value_parser = parse_port)]
    pub port: Option<u16>,

    /// Address for the WebSocket live channel
    #[arg(long = "ws-listen", default_value_t = DEFAULT_WS_LISTEN, value_parser = parse_listen_addr)]
    pub ws_listen: SocketAddr,

    /// Send every update for a video to all connections observing it
    #[arg(long)]
    pub fanout: bool,
}

impl ServeArgs {
    /// Settings used when no subcommand is given.
    #[must_use]
    pub fn from_env_defaults() -> Self {
        Self {
            http_listen: DEFAULT_HTTP_LISTEN,
            port: std::env::var("PORT")
                .ok()
                .and_then(|value| parse_port(&value).ok()),
            ws_listen: DEFAULT_WS_LISTEN,
            fanout: false,
        }
    }

    /// HTTP address after applying the port override.
    #[must_use]
    pub fn effective_http_listen(&self) -> SocketAddr {
        let mut addr = self.http_listen;
        if let Some(port) = self.port {
            addr.set_port(port);
        }
        addr
    }
}

#[derive(Debug, Args, Clone, PartialEq, Eq)]
pub struct WatchArgs {
    /// Live channel URL of the server
    #[arg(long, default_value = DEFAULT_WATCH_URL)]
    pub url: String,

    /// Video identifier to track
    #[arg(long = "video-id")]
    pub video_id: Option<String>,

    /// JSON-lines playback script to replay
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// Position sampling cadence while playing (supports ms/s/m/h)
    #[arg(long = "sample-interval", default_value = "1s", value_parser = parse_duration_arg)]
    pub sample_interval: Duration,
}
