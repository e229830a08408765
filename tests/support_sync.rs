use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use watchline::error::AppResult;
use watchline::shutdown::ShutdownSender;
use watchline::shutdown_handlers::shutdown_channel;
use watchline::store::MemoryStore;
use watchline::sync::{ServerSettings, SyncServer};

pub const WAIT: Duration = Duration::from_secs(5);

pub type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub struct RunningServer {
    pub http_addr: SocketAddr,
    pub ws_url: String,
    shutdown_tx: ShutdownSender,
    task: JoinHandle<AppResult<()>>,
}

impl RunningServer {
    /// Stops the server and waits for both accept loops.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails or does not stop in time.
    pub async fn stop(self) -> Result<(), String> {
        drop(self.shutdown_tx.send(()));
        timeout(WAIT, self.task)
            .await
            .map_err(|_elapsed| "server did not stop".to_owned())?
            .map_err(|err| format!("server task failed: {}", err))?
            .map_err(|err| format!("server failed: {}", err))
    }
}

/// Run an async test on a fresh current-thread runtime.
///
/// # Errors
///
/// Returns an error if the runtime cannot be built or the test fails.
pub fn run_async_test<F>(future: F) -> Result<(), String>
where
    F: Future<Output = Result<(), String>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| format!("failed to build runtime: {}", err))?;
    runtime.block_on(future)
}

/// Run an async test on a multi-thread runtime with `workers` threads.
///
/// # Errors
///
/// Returns an error if the runtime cannot be built or the test fails.
pub fn run_multi_thread_test<F>(workers: usize, future: F) -> Result<(), String>
where
    F: Future<Output = Result<(), String>>,
{
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(workers)
        .enable_all()
        .build()
        .map_err(|err| format!("failed to build runtime: {}", err))?;
    runtime.block_on(future)
}

/// Bind a sync server on ephemeral loopback ports and start serving.
///
/// # Errors
///
/// Returns an error if binding fails.
pub async fn start_server(fanout: bool) -> Result<RunningServer, String> {
    let any_port: SocketAddr = "127.0.0.1:0"
        .parse()
        .map_err(|err| format!("bad address: {}", err))?;
    let settings = ServerSettings {
        http_listen: any_port,
        ws_listen: any_port,
        fanout,
    };
    let server = SyncServer::bind(settings, Arc::new(MemoryStore::new()))
        .await
        .map_err(|err| format!("bind failed: {}", err))?;
    let http_addr = server.http_addr().map_err(|err| err.to_string())?;
    let ws_addr = server.ws_addr().map_err(|err| err.to_string())?;
    let (shutdown_tx, _) = shutdown_channel();
    let task = tokio::spawn(server.run(shutdown_tx.clone()));
    Ok(RunningServer {
        http_addr,
        ws_url: format!("ws://{}", ws_addr),
        shutdown_tx,
        task,
    })
}

/// Open a raw live-channel socket.
///
/// # Errors
///
/// Returns an error if the handshake fails.
pub async fn open_socket(ws_url: &str) -> Result<Socket, String> {
    let (socket, _) = connect_async(ws_url)
        .await
        .map_err(|err| format!("connect failed: {}", err))?;
    Ok(socket)
}

/// Send one submission frame.
///
/// # Errors
///
/// Returns an error if the frame cannot be sent.
pub async fn submit(socket: &mut Socket, video_id: &str, start: f64, end: f64) -> Result<(), String> {
    let frame = serde_json::json!({
        "videoId": video_id,
        "interval": { "start": start, "end": end },
    });
    socket
        .send(Message::Text(frame.to_string()))
        .await
        .map_err(|err| format!("send failed: {}", err))
}

/// Wait for the next `progress-update` and return its `(start, end)` pairs.
///
/// # Errors
///
/// Returns an error on timeout, close, or an unexpected frame.
pub async fn next_progress(socket: &mut Socket) -> Result<Vec<(f64, f64)>, String> {
    let frame = timeout(WAIT, socket.next())
        .await
        .map_err(|_elapsed| "timed out waiting for progress".to_owned())?;
    match frame {
        Some(Ok(Message::Text(text))) => parse_progress(&text),
        other => Err(format!("unexpected frame: {:?}", other)),
    }
}

/// Parse a `progress-update` frame into its `(start, end)` pairs.
///
/// # Errors
///
/// Returns an error for malformed JSON or another message type.
pub fn parse_progress(text: &str) -> Result<Vec<(f64, f64)>, String> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|err| format!("bad json {}: {}", text, err))?;
    if value.get("type").and_then(serde_json::Value::as_str) != Some("progress-update") {
        return Err(format!("unexpected message type: {}", text));
    }
    let intervals = value
        .get("intervals")
        .and_then(serde_json::Value::as_array)
        .ok_or_else(|| format!("missing intervals: {}", text))?;
    intervals.iter().map(pair_of).collect()
}

fn pair_of(value: &serde_json::Value) -> Result<(f64, f64), String> {
    let start = value.get("start").and_then(serde_json::Value::as_f64);
    let end = value.get("end").and_then(serde_json::Value::as_f64);
    match (start, end) {
        (Some(start), Some(end)) => Ok((start, end)),
        _ => Err(format!("bad interval: {}", value)),
    }
}

/// Assert that no frame arrives within `window`.
///
/// # Errors
///
/// Returns an error if a frame arrives.
pub async fn expect_silence(socket: &mut Socket, window: Duration) -> Result<(), String> {
    match timeout(window, socket.next()).await {
        Err(_elapsed) => Ok(()),
        Ok(frame) => Err(format!("unexpected frame: {:?}", frame)),
    }
}

/// Issue one HTTP/1.1 request and return `(status, body)`.
///
/// # Errors
///
/// Returns an error if the exchange fails or the response is malformed.
pub async fn http_request(
    addr: SocketAddr,
    method: &str,
    path: &str,
) -> Result<(u16, String), String> {
    let mut stream = TcpStream::connect(addr)
        .await
        .map_err(|err| format!("connect failed: {}", err))?;
    let request = format!(
        "{} {} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        method, path
    );
    stream
        .write_all(request.as_bytes())
        .await
        .map_err(|err| format!("write failed: {}", err))?;
    let mut response = String::new();
    timeout(WAIT, stream.read_to_string(&mut response))
        .await
        .map_err(|_elapsed| "timed out reading response".to_owned())?
        .map_err(|err| format!("read failed: {}", err))?;

    let (head, body) = response
        .split_once("\r\n\r\n")
        .ok_or_else(|| format!("malformed response: {}", response))?;
    let status = head
        .split_whitespace()
        .nth(1)
        .and_then(|code| code.parse::<u16>().ok())
        .ok_or_else(|| format!("missing status: {}", head))?;
    Ok((status, body.to_owned()))
}
