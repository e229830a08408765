mod app;
mod args;
mod config;
mod entry;
mod error;
mod intervals;
mod logger;
mod session;
mod shutdown;
mod shutdown_handlers;
mod store;
mod sync;

use error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
