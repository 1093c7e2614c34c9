pub mod scheduler;
pub mod tasks;

use thiserror::Error;
use tracing::info;

use crate::state::AppState;

#[derive(Debug, Error)]
pub enum JobError {
    #[error("job {0} has a zero interval")]
    InvalidInterval(&'static str),
}

pub async fn start(state: AppState) -> Result<(), JobError> {
    let sweep_interval = state.config.cache_sweep_interval;
    let sweep_state = state;
    scheduler::run_interval("cache_sweep", sweep_interval, move || {
        let state = sweep_state.clone();
        async move {
            let stats = tasks::cache_sweep::run(&state).await;
            if stats.evicted > 0 {
                info!(?stats, "cache sweep complete");
            }
            Ok(())
        }
    })
    .await
}
