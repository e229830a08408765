use crate::app::{run_serve, run_watch};
use crate::error::AppResult;

use super::types::RunPlan;

pub(crate) async fn execute_plan(plan: RunPlan) -> AppResult<()> {
    match plan {
        RunPlan::Serve(settings) => run_serve(settings).await,
        RunPlan::Watch(plan) => run_watch(plan).await,
    }
}
