use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult, SyncError};
use crate::shutdown::{ShutdownReceiver, ShutdownSender};

use super::messages::{ServerMessage, decode_submission, encode_server_message};
use super::service::SyncService;

pub(super) async fn accept_live_connections(
    listener: TcpListener,
    service: Arc<SyncService>,
    shutdown_tx: ShutdownSender,
    mut shutdown_rx: ShutdownReceiver,
) {
    loop {
        let (stream, peer) = tokio::select! {
            _ = shutdown_rx.recv() => break,
            accepted = listener.accept() => match accepted {
                Ok(result) => result,
                Err(err) => {
                    warn!("Failed to accept live connection: {}", err);
                    continue;
                }
            },
        };
        let service = Arc::clone(&service);
        let connection_shutdown = shutdown_tx.subscribe();
        tokio::spawn(async move {
            if let Err(err) = handle_live_connection(stream, peer, service, connection_shutdown).await
            {
                debug!("Live connection {} ended with error: {}", peer, err);
            }
        });
    }
    info!("Live channel stopped accepting connections");
}

async fn handle_live_connection(
    stream: TcpStream,
    peer: SocketAddr,
    service: Arc<SyncService>,
    mut shutdown_rx: ShutdownReceiver,
) -> AppResult<()> {
    let websocket = accept_async(stream).await.map_err(|err| {
        AppError::sync(SyncError::WebSocket {
            context: "live handshake",
            source: err,
        })
    })?;
    let connection = service.open_connection();
    debug!("Live connection {} opened as #{}", peer, connection.0);

    let (mut writer, mut reader) = websocket.split();
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<ServerMessage>();

    let writer_task: JoinHandle<AppResult<()>> = tokio::spawn(async move {
        while let Some(message) = out_rx.recv().await {
            let payload = encode_server_message(&message)?;
            writer.send(Message::Text(payload)).await.map_err(|err| {
                AppError::sync(SyncError::WebSocket {
                    context: "send progress update",
                    source: err,
                })
            })?;
        }
        drop(writer.close().await);
        Ok(())
    });

    let mut observed: HashSet<String> = HashSet::new();
    loop {
        let frame = tokio::select! {
            _ = shutdown_rx.recv() => break,
            frame = reader.next() => frame,
        };
        let text = match frame {
            None => break,
            Some(Err(err)) => {
                debug!("Live connection #{} read error: {}", connection.0, err);
                break;
            }
            Some(Ok(Message::Text(text))) => text,
            Some(Ok(Message::Binary(bytes))) => match String::from_utf8(bytes) {
                Ok(text) => text,
                Err(err) => {
                    warn!(
                        "Dropping non-UTF-8 frame on live connection #{}: {}",
                        connection.0, err
                    );
                    continue;
                }
            },
            Some(Ok(Message::Close(_))) => break,
            Some(Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_))) => continue,
        };

        let submission = match decode_submission(&text) {
            Ok(submission) => submission,
            Err(err) => {
                warn!(
                    "Dropping submission on live connection #{}: {}",
                    connection.0, err
                );
                continue;
            }
        };

        if !observed.contains(&submission.video_id)
            && service.subscribe(&submission.video_id, connection, out_tx.clone())
        {
            observed.insert(submission.video_id.clone());
        }

        let merged = service.apply(connection, &submission, &out_tx);
        debug!(
            "Video {} now has {} watched segment(s)",
            submission.video_id,
            merged.len()
        );
        if out_tx.is_closed() {
            break;
        }
    }

    for video_id in &observed {
        service.unsubscribe(video_id, connection);
    }
    drop(out_tx);
    let written = writer_task.await;
    debug!("Live connection #{} closed", connection.0);
    written?
}
