use std::sync::Arc;

use crate::error::AppResult;
use crate::shutdown_handlers::{setup_signal_shutdown_handler, shutdown_channel};
use crate::store::MemoryStore;
use crate::sync::{ServerSettings, SyncServer};

pub(crate) async fn run_serve(settings: ServerSettings) -> AppResult<()> {
    let server = SyncServer::bind(settings, Arc::new(MemoryStore::new())).await?;
    let (shutdown_tx, _) = shutdown_channel();
    let signal_handle = setup_signal_shutdown_handler(&shutdown_tx);
    let served = server.run(shutdown_tx.clone()).await;
    drop(shutdown_tx.send(()));
    signal_handle.await?;
    served
}
