use std::time::Duration;

use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, warn};
use url::Url;

use crate::error::{AppError, AppResult, SyncError, ValidationError};
use crate::intervals::{Interval, IntervalSet};
use crate::session::SubmissionSink;

use super::messages::{ServerMessage, Submission, decode_server_message};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

type LiveStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Sending half of a live-channel connection.
pub struct LiveSink {
    writer: SplitSink<LiveStream, Message>,
}

/// Receiving half: merged sets pushed by the server.
pub struct LiveUpdates {
    pub updates: mpsc::UnboundedReceiver<IntervalSet>,
    pub reader: JoinHandle<()>,
}

/// Parses and checks a live-channel URL.
///
/// # Errors
///
/// Returns an error when the URL does not parse or is not `ws://`/`wss://`.
pub fn parse_live_url(value: &str) -> Result<Url, ValidationError> {
    let url = Url::parse(value).map_err(|err| ValidationError::InvalidWsUrl {
        url: value.to_owned(),
        source: err,
    })?;
    match url.scheme() {
        "ws" | "wss" => Ok(url),
        _ => Err(ValidationError::UnsupportedWsScheme {
            url: value.to_owned(),
        }),
    }
}

/// Opens a live-channel connection.
///
/// # Errors
///
/// Returns an error when the handshake fails or times out.
pub async fn connect_live(url: &Url) -> AppResult<(LiveSink, LiveUpdates)> {
    let connected = timeout(CONNECT_TIMEOUT, connect_async(url.as_str()))
        .await
        .map_err(|_elapsed| {
            AppError::sync(SyncError::Io {
                context: "live connect timeout",
                source: std::io::Error::from(std::io::ErrorKind::TimedOut),
            })
        })?;
    let (stream, _response) = connected.map_err(|err| {
        AppError::sync(SyncError::Connect {
            url: url.to_string(),
            source: err,
        })
    })?;
    debug!("Connected to live channel {}", url);

    let (writer, reader) = stream.split();
    let (updates_tx, updates) = mpsc::unbounded_channel();
    let reader = tokio::spawn(read_updates(reader, updates_tx));
    Ok((LiveSink { writer }, LiveUpdates { updates, reader }))
}

async fn read_updates(
    mut reader: SplitStream<LiveStream>,
    updates_tx: mpsc::UnboundedSender<IntervalSet>,
) {
    while let Some(frame) = reader.next().await {
        let text = match frame {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Ok(Message::Binary(_) | Message::Ping(_) | Message::Pong(_) | Message::Frame(_)) => {
                continue;
            }
            Err(err) => {
                debug!("Live channel read error: {}", err);
                break;
            }
        };
        match decode_server_message(&text) {
            Ok(ServerMessage::ProgressUpdate { intervals }) => {
                if updates_tx.send(intervals).is_err() {
                    break;
                }
            }
            Err(err) => warn!("Ignoring server frame: {}", err),
        }
    }
}

#[async_trait]
impl SubmissionSink for LiveSink {
    async fn submit(&mut self, video_id: &str, interval: Interval) -> AppResult<()> {
        let submission = Submission {
            video_id: video_id.to_owned(),
            interval,
        };
        let payload = serde_json::to_string(&submission).map_err(|err| {
            AppError::sync(SyncError::Serialize {
                context: "submission",
                source: err,
            })
        })?;
        self.writer
            .send(Message::Text(payload))
            .await
            .map_err(|err| match err {
                tokio_tungstenite::tungstenite::Error::ConnectionClosed
                | tokio_tungstenite::tungstenite::Error::AlreadyClosed => {
                    AppError::sync(SyncError::ConnectionClosed)
                }
                other => AppError::sync(SyncError::WebSocket {
                    context: "send submission",
                    source: other,
                }),
            })
    }

    async fn finish(&mut self) -> AppResult<()> {
        self.writer.close().await.map_err(|err| {
            AppError::sync(SyncError::WebSocket {
                context: "close live channel",
                source: err,
            })
        })
    }
}
