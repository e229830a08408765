use crate::app::WatchPlan;
use crate::sync::ServerSettings;

pub(in crate::entry) enum RunPlan {
    Serve(ServerSettings),
    Watch(WatchPlan),
}
