use std::sync::Arc;

use chrono::Utc;
use reqwest::Client;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};

use crate::config::AppConfig;
use crate::loader::CommentLoader;
use crate::query_cache::QueryCache;
use crate::state::{AppState, CacheHealth};
use threadview_infra::reddit::RedditClient;

#[derive(Debug, Error)]
pub enum WiringError {
    #[error("http client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

pub fn build_state(config: AppConfig) -> Result<AppState, WiringError> {
    let http = Client::builder()
        .timeout(config.request_timeout)
        .gzip(true)
        .build()?;
    let reddit = RedditClient::new(http, &config.api_base_url, config.user_agent.clone());
    let cache = Arc::new(RwLock::new(QueryCache::new(
        config.cache_capacity,
        config.cache_ttl,
    )));
    let loader = CommentLoader::new(reddit, cache.clone(), config.page_limit);
    Ok(AppState {
        config: Arc::new(config),
        loader: Arc::new(loader),
        cache,
        cache_health: Arc::new(Mutex::new(CacheHealth::default())),
        started_at: Utc::now(),
    })
}
