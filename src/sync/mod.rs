//! Client/server synchronization of watched coverage.
//!
//! The server exposes two listeners: a WebSocket live channel where clients
//! push [`Submission`]s and receive `progress-update` frames, and a small
//! HTTP endpoint for `GET`/`DELETE /progress/{videoId}`.
mod client;
mod fanout;
mod http;
mod live;
mod messages;
mod server;
mod service;


pub use client::{LiveSink, LiveUpdates, connect_live, parse_live_url};
pub use fanout::{ConnectionId, Fanout, Outbound};
pub use messages::{
    ResetResponse, ServerMessage, SnapshotResponse, Submission, decode_server_message,
    decode_submission, encode_server_message,
};
pub use server::{ServerSettings, SyncServer};
pub use service::SyncService;
