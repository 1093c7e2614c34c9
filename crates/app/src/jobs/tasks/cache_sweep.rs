use std::time::Instant;

use chrono::Utc;
use tracing::debug;

use crate::state::AppState;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct CacheSweepStats {
    pub evicted: usize,
    pub remaining: usize,
    pub in_flight: usize,
}

pub async fn run(state: &AppState) -> CacheSweepStats {
    let stats = {
        let mut cache = state.cache.write().await;
        let evicted = cache.sweep(Instant::now());
        CacheSweepStats {
            evicted,
            remaining: cache.len(),
            in_flight: cache.in_flight_count(),
        }
    };
    let mut health = state.cache_health.lock().await;
    health.last_sweep = Some(Utc::now());
    health.swept_total += stats.evicted;
    debug!(?stats, "cache swept");
    stats
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use threadview_core::domain::comments::CommentEnvelope;
    use threadview_core::pipeline::QueryKind;
    use threadview_core::types::permalink::Permalink;

    use super::{run, CacheSweepStats};
    use crate::config::AppConfig;
    use crate::query_cache::QueryKey;
    use crate::wiring::build_state;

    #[tokio::test]
    async fn sweep_records_health() {
        let mut config = AppConfig::for_tests();
        config.cache_ttl = Duration::from_secs(1);
        let state = build_state(config).unwrap();
        let stale = Instant::now() - Duration::from_secs(5);
        state.cache.write().await.store_page(
            QueryKey::new(
                Permalink::try_from("/r/a/comments/1/x").unwrap(),
                QueryKind::FlatLazy,
            ),
            CommentEnvelope::default(),
            stale,
        );

        let stats = run(&state).await;
        assert_eq!(
            stats,
            CacheSweepStats {
                evicted: 1,
                remaining: 0,
                in_flight: 0,
            }
        );
        let health = state.cache_health.lock().await;
        assert!(health.last_sweep.is_some());
        assert_eq!(health.swept_total, 1);
    }
}
