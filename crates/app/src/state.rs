use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};

use crate::config::AppConfig;
use crate::loader::CommentLoader;
use crate::query_cache::QueryCache;
use threadview_infra::reddit::RedditClient;

#[derive(Debug, Default, Clone)]
pub struct CacheHealth {
    pub last_sweep: Option<DateTime<Utc>>,
    pub swept_total: usize,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub loader: Arc<CommentLoader<RedditClient>>,
    pub cache: Arc<RwLock<QueryCache>>,
    pub cache_health: Arc<Mutex<CacheHealth>>,
    pub started_at: DateTime<Utc>,
}
