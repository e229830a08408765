use std::collections::HashMap;
use std::sync::Arc;

use percent_encoding::percent_decode_str;
use serde::Serialize;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult, SyncError};
use crate::shutdown::ShutdownReceiver;

use super::service::SyncService;

/// Path prefix of the snapshot/reset resource.
const PROGRESS_PREFIX: &str = "/progress/";
const ALLOWED_METHODS: &str = "GET, DELETE, OPTIONS";

pub(super) struct HttpRequest {
    pub(super) method: String,
    pub(super) path: String,
    pub(super) headers: HashMap<String, String>,
    pub(super) body: Vec<u8>,
}

#[derive(Debug)]
pub(super) struct HttpError {
    pub(super) status: u16,
    pub(super) message: String,
}

impl HttpError {
    pub(super) fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

pub(super) async fn accept_http_connections(
    listener: TcpListener,
    service: Arc<SyncService>,
    mut shutdown_rx: ShutdownReceiver,
) {
    loop {
        let (socket, peer) = tokio::select! {
            _ = shutdown_rx.recv() => break,
            accepted = listener.accept() => match accepted {
                Ok(result) => result,
                Err(err) => {
                    warn!("Failed to accept HTTP connection: {}", err);
                    continue;
                }
            },
        };
        let service = Arc::clone(&service);
        tokio::spawn(async move {
            if let Err(err) = handle_http_connection(socket, &service).await {
                debug!("HTTP connection {} ended with error: {}", peer, err);
            }
        });
    }
    info!("HTTP endpoint stopped accepting connections");
}

async fn handle_http_connection(mut socket: TcpStream, service: &SyncService) -> AppResult<()> {
    let request = match read_http_request(&mut socket).await {
        Ok(request) => request,
        Err(err) => return write_error_response(&mut socket, err.status, &err.message).await,
    };
    debug!(
        "HTTP {} {} ({} header(s), {} body byte(s))",
        request.method,
        request.path,
        request.headers.len(),
        request.body.len()
    );

    if request.method == "OPTIONS" {
        return write_response(&mut socket, 204, None).await;
    }

    let video_id = match progress_video_id(&request.path) {
        Ok(video_id) => video_id,
        Err(err) => return write_error_response(&mut socket, err.status, &err.message).await,
    };

    match request.method.as_str() {
        "GET" => {
            let snapshot = service.snapshot(&video_id);
            write_json_response(&mut socket, 200, &snapshot).await
        }
        "DELETE" => {
            let confirmation = service.reset(&video_id);
            info!("Cleared progress for video {}", video_id);
            write_json_response(&mut socket, 200, &confirmation).await
        }
        _ => write_error_response(&mut socket, 405, "Method not allowed").await,
    }
}

/// Extracts the decoded `{videoId}` from `/progress/{videoId}`.
pub(super) fn progress_video_id(target: &str) -> Result<String, HttpError> {
    let path = target
        .split_once('?')
        .map_or(target, |(path, _query)| path);
    let Some(raw_id) = path.strip_prefix(PROGRESS_PREFIX) else {
        return Err(HttpError::new(404, "Not found"));
    };
    if raw_id.is_empty() || raw_id.contains('/') {
        return Err(HttpError::new(404, "Not found"));
    }
    let video_id = percent_decode_str(raw_id)
        .decode_utf8()
        .map_err(|err| HttpError::new(400, format!("Invalid video id encoding: {}", err)))?;
    Ok(video_id.into_owned())
}

pub(super) async fn read_http_request(socket: &mut TcpStream) -> Result<HttpRequest, HttpError> {
    const MAX_REQUEST_BYTES: usize = 1024 * 1024;
    let mut buffer: Vec<u8> = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];
    let header_end;

    loop {
        let bytes = socket
            .read(&mut chunk)
            .await
            .map_err(|err| HttpError::new(400, format!("Failed to read request: {}", err)))?;
        if bytes == 0 {
            return Err(HttpError::new(400, "Empty request"));
        }
        let read_slice = chunk
            .get(..bytes)
            .ok_or_else(|| HttpError::new(400, "Invalid read length"))?;
        buffer.extend_from_slice(read_slice);
        if buffer.len() > MAX_REQUEST_BYTES {
            return Err(HttpError::new(413, "Request too large"));
        }
        if let Some(pos) = find_header_end(&buffer) {
            header_end = pos;
            break;
        }
    }

    let header_bytes = buffer
        .get(..header_end)
        .ok_or_else(|| HttpError::new(400, "Malformed request headers"))?;
    let header_text = std::str::from_utf8(header_bytes)
        .map_err(|err| HttpError::new(400, format!("Invalid request encoding: {}", err)))?;
    let mut lines = header_text.split("\r\n");
    let request_line = lines
        .next()
        .ok_or_else(|| HttpError::new(400, "Missing request line"))?;
    let mut parts = request_line.split_whitespace();
    let method = parts
        .next()
        .ok_or_else(|| HttpError::new(400, "Missing HTTP method"))?;
    let path = parts
        .next()
        .ok_or_else(|| HttpError::new(400, "Missing request path"))?;

    let mut headers = HashMap::new();
    for line in lines {
        if line.is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            return Err(HttpError::new(400, "Malformed header"));
        };
        headers.insert(key.trim().to_ascii_lowercase(), value.trim().to_owned());
    }

    let content_length = headers
        .get("content-length")
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(0);
    if content_length > MAX_REQUEST_BYTES {
        return Err(HttpError::new(413, "Request body too large"));
    }
    let body_start = header_end
        .checked_add(4)
        .ok_or_else(|| HttpError::new(400, "Malformed request headers"))?;
    let mut body = buffer.get(body_start..).unwrap_or_default().to_vec();
    while body.len() < content_length {
        let bytes = socket
            .read(&mut chunk)
            .await
            .map_err(|err| HttpError::new(400, format!("Failed to read body: {}", err)))?;
        if bytes == 0 {
            break;
        }
        let read_slice = chunk
            .get(..bytes)
            .ok_or_else(|| HttpError::new(400, "Invalid read length"))?;
        body.extend_from_slice(read_slice);
    }
    body.truncate(content_length);

    Ok(HttpRequest {
        method: method.to_ascii_uppercase(),
        path: path.to_owned(),
        headers,
        body,
    })
}

fn find_header_end(buffer: &[u8]) -> Option<usize> {
    buffer.windows(4).position(|window| window == b"\r\n\r\n")
}

const fn status_text(status: u16) -> &'static str {
    match status {
        200 => "OK",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        413 => "Payload Too Large",
        _ => "Internal Server Error",
    }
}

pub(super) async fn write_json_response<T>(
    socket: &mut TcpStream,
    status: u16,
    response: &T,
) -> AppResult<()>
where
    T: Serialize,
{
    let body = serde_json::to_vec(response).map_err(|err| {
        AppError::sync(SyncError::Serialize {
            context: "http response",
            source: err,
        })
    })?;
    write_response(socket, status, Some(body.as_slice())).await
}

pub(super) async fn write_error_response(
    socket: &mut TcpStream,
    status: u16,
    message: &str,
) -> AppResult<()> {
    #[derive(Serialize)]
    struct ErrorResponse<'msg> {
        error: &'msg str,
    }
    write_json_response(socket, status, &ErrorResponse { error: message }).await
}

async fn write_response(socket: &mut TcpStream, status: u16, body: Option<&[u8]>) -> AppResult<()> {
    let body = body.unwrap_or_default();
    let content_type = if body.is_empty() {
        ""
    } else {
        "Content-Type: application/json\r\n"
    };
    let response = format!(
        "HTTP/1.1 {} {}\r\n{}Content-Length: {}\r\nAccess-Control-Allow-Origin: *\r\nAccess-Control-Allow-Methods: {}\r\nAccess-Control-Allow-Headers: Content-Type\r\nConnection: close\r\n\r\n",
        status,
        status_text(status),
        content_type,
        body.len(),
        ALLOWED_METHODS
    );
    socket.write_all(response.as_bytes()).await.map_err(|err| {
        AppError::sync(SyncError::Io {
            context: "write http response",
            source: err,
        })
    })?;
    socket.write_all(body).await.map_err(|err| {
        AppError::sync(SyncError::Io {
            context: "write http response body",
            source: err,
        })
    })?;
    Ok(())
}
