mod serve;
mod watch;

pub(crate) use serve::run_serve;
pub(crate) use watch::{WatchPlan, run_watch};
