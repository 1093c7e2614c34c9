use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::query_cache::{QueryCache, QueryKey};
use threadview_core::domain::comments::CommentEnvelope;
use threadview_core::domain::query::FetchError;
use threadview_core::pipeline::{
    on_open, reconcile, CommentsView, Layout, NextPage, PipelineOptions, QueryKind,
};
use threadview_core::types::permalink::Permalink;
use threadview_infra::reddit::{ListingParams, RedditClient};

pub trait CommentSource {
    fn fetch(
        &self,
        permalink: &Permalink,
        params: &ListingParams,
    ) -> impl Future<Output = Result<CommentEnvelope, FetchError>> + Send;
}

impl CommentSource for RedditClient {
    async fn fetch(
        &self,
        permalink: &Permalink,
        params: &ListingParams,
    ) -> Result<CommentEnvelope, FetchError> {
        self.fetch_comments(permalink, params)
            .await
            .map_err(FetchError::from)
    }
}

pub struct CommentLoader<S> {
    source: S,
    cache: Arc<RwLock<QueryCache>>,
    page_limit: u32,
}

impl<S: CommentSource> CommentLoader<S> {
    pub fn new(source: S, cache: Arc<RwLock<QueryCache>>, page_limit: u32) -> Self {
        Self {
            source,
            cache,
            page_limit,
        }
    }

    pub async fn load(&self, options: &PipelineOptions) -> CommentsView {
        let request = {
            let cache = self.cache.read().await;
            let now = Instant::now();
            on_open(options, |kind| {
                cache.is_cached(&QueryKey::new(options.permalink.clone(), kind), now)
            })
        };
        if let Some(request) = request {
            info!(permalink = %options.permalink, kind = ?request.kind(), "fetching comments");
            self.fetch(options, request.kind(), None).await;
        }
        self.view(options).await
    }

    pub async fn load_more(&self, options: &PipelineOptions) -> CommentsView {
        let view = self.load(options).await;
        let NextPage::Fetch { target, cursor } = view.next_page.clone() else {
            return view;
        };
        self.fetch(options, QueryKind::infinite(target), cursor).await;
        self.view(options).await
    }

    pub async fn view(&self, options: &PipelineOptions) -> CommentsView {
        let results = self.cache.read().await.snapshot(
            &options.permalink,
            options.config.layout(),
            Instant::now(),
        );
        reconcile(&options.config, &results)
    }

    async fn fetch(&self, options: &PipelineOptions, kind: QueryKind, after: Option<String>) {
        let key = QueryKey::new(options.permalink.clone(), kind);
        {
            let mut cache = self.cache.write().await;
            if after.is_some() && cache.next_cursor(&key, Instant::now()) != after {
                debug!(permalink = %options.permalink, ?kind, "cursor already consumed; skipped");
                return;
            }
            if !cache.begin(&key) {
                debug!(permalink = %options.permalink, ?kind, "fetch already in flight; skipped");
                return;
            }
        }
        let mut in_flight = InFlight {
            cache: Arc::clone(&self.cache),
            key: Some(key.clone()),
        };
        let params = self.params(options, kind, after);
        let result = self.source.fetch(&options.permalink, &params).await;

        let mut cache = self.cache.write().await;
        in_flight.key = None;
        cache.finish(&key);
        let now = Instant::now();
        match result {
            Ok(envelope) => cache.store_page(key, envelope, now),
            Err(err) => {
                warn!(
                    permalink = %options.permalink,
                    ?kind,
                    error = %err.message,
                    status = ?err.status,
                    "comments fetch failed"
                );
                cache.store_error(key, err, now);
            }
        }
    }

    fn params(&self, options: &PipelineOptions, kind: QueryKind, after: Option<String>) -> ListingParams {
        // Upstream depth counts the top level, so nested mode needs one more
        // level than the deepest index it renders.
        let depth = match kind.layout() {
            Layout::Nested => options.config.max_depth.get() + 1,
            Layout::Flat => 1,
        };
        ListingParams {
            limit: Some(self.page_limit),
            after,
            depth: Some(depth),
        }
    }
}

struct InFlight {
    cache: Arc<RwLock<QueryCache>>,
    key: Option<QueryKey>,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        let Some(key) = self.key.take() else {
            return;
        };
        debug!(permalink = %key.permalink, kind = ?key.kind, "fetch abandoned");
        if let Ok(mut cache) = self.cache.try_write() {
            cache.finish(&key);
            return;
        }
        let cache = Arc::clone(&self.cache);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    cache.write().await.finish(&key);
                });
            }
            Err(_) => warn!(permalink = %key.permalink, "in-flight mark left behind"),
        }
    }
}
