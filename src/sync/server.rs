use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::error::{AppError, AppResult, SyncError};
use crate::shutdown::ShutdownSender;
use crate::store::ProgressStore;

use super::http::accept_http_connections;
use super::live::accept_live_connections;
use super::service::SyncService;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerSettings {
    pub http_listen: SocketAddr,
    pub ws_listen: SocketAddr,
    pub fanout: bool,
}

/// Bound HTTP and live-channel listeners sharing one [`SyncService`].
pub struct SyncServer {
    http: TcpListener,
    ws: TcpListener,
    service: Arc<SyncService>,
}

impl SyncServer {
    /// Binds both listeners.
    ///
    /// # Errors
    ///
    /// Returns an error when either address cannot be bound.
    pub async fn bind(settings: ServerSettings, store: Arc<dyn ProgressStore>) -> AppResult<Self> {
        let http = bind_listener(settings.http_listen).await?;
        let ws = bind_listener(settings.ws_listen).await?;
        Ok(Self {
            http,
            ws,
            service: Arc::new(SyncService::new(store, settings.fanout)),
        })
    }

    /// # Errors
    ///
    /// Returns an error when the socket has no local address.
    pub fn http_addr(&self) -> AppResult<SocketAddr> {
        Ok(self.http.local_addr()?)
    }

    /// # Errors
    ///
    /// Returns an error when the socket has no local address.
    pub fn ws_addr(&self) -> AppResult<SocketAddr> {
        Ok(self.ws.local_addr()?)
    }

    #[must_use]
    pub fn service(&self) -> Arc<SyncService> {
        Arc::clone(&self.service)
    }

    /// Serves until `shutdown_tx` fires.
    ///
    /// # Errors
    ///
    /// Returns an error when an accept loop task panics.
    pub async fn run(self, shutdown_tx: ShutdownSender) -> AppResult<()> {
        info!(
            "Serving snapshots on http://{} and live channel on ws://{} (fan-out {})",
            self.http_addr()?,
            self.ws_addr()?,
            if self.service.fanout_enabled() {
                "on"
            } else {
                "off"
            }
        );
        let http_task = tokio::spawn(accept_http_connections(
            self.http,
            Arc::clone(&self.service),
            shutdown_tx.subscribe(),
        ));
        let live_task = tokio::spawn(accept_live_connections(
            self.ws,
            Arc::clone(&self.service),
            shutdown_tx.clone(),
            shutdown_tx.subscribe(),
        ));
        let (http_done, live_done) = tokio::join!(http_task, live_task);
        http_done?;
        live_done?;
        info!(
            "Sync server stopped with {} tracked video(s)",
            self.service.store().video_count()
        );
        Ok(())
    }
}

async fn bind_listener(addr: SocketAddr) -> AppResult<TcpListener> {
    TcpListener::bind(addr).await.map_err(|err| {
        AppError::sync(SyncError::Bind {
            addr: addr.to_string(),
            source: err,
        })
    })
}
