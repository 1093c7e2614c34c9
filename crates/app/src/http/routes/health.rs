use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub started_at: DateTime<Utc>,
    pub cache: CacheStatus,
}

#[derive(Debug, Serialize)]
pub struct CacheStatus {
    pub entries: usize,
    pub in_flight: usize,
    pub capacity: usize,
    pub ttl_secs: u64,
    pub last_sweep: Option<DateTime<Utc>>,
    pub swept_total: usize,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let (entries, in_flight) = {
        let cache = state.cache.read().await;
        (cache.len(), cache.in_flight_count())
    };
    let sweep = state.cache_health.lock().await.clone();
    Json(HealthResponse {
        status: "ok",
        started_at: state.started_at,
        cache: CacheStatus {
            entries,
            in_flight,
            capacity: state.config.cache_capacity,
            ttl_secs: state.config.cache_ttl.as_secs(),
            last_sweep: sweep.last_sweep,
            swept_total: sweep.swept_total,
        },
    })
}
