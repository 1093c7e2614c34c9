use thiserror::Error;
use tracing::debug;

use threadview_core::domain::comments::CommentEnvelope;
use threadview_core::domain::query::FetchError;
use threadview_core::types::permalink::Permalink;

pub const DEFAULT_BASE_URL: &str = "https://www.reddit.com";
const MAX_ERROR_BODY_CHARS: usize = 200;

#[derive(Debug, Error)]
pub enum RedditError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("upstream returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid listing payload: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<RedditError> for FetchError {
    fn from(err: RedditError) -> Self {
        match &err {
            RedditError::Status { status, .. } => FetchError::with_status(err.to_string(), *status),
            RedditError::Http(inner) => match inner.status() {
                Some(status) => FetchError::with_status(err.to_string(), status.as_u16()),
                None => FetchError::new(err.to_string()),
            },
            RedditError::Decode(_) => FetchError::new(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingParams {
    pub limit: Option<u32>,
    pub after: Option<String>,
    pub depth: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct RedditClient {
    http: reqwest::Client,
    base_url: String,
    user_agent: String,
}

impl RedditClient {
    pub fn new(http: reqwest::Client, base_url: &str, user_agent: String) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            user_agent,
        }
    }

    pub async fn fetch_comments(
        &self,
        permalink: &Permalink,
        params: &ListingParams,
    ) -> Result<CommentEnvelope, RedditError> {
        let url = self.endpoint(permalink);
        debug!(%url, after = ?params.after, "fetching comments listing");
        let response = self
            .http
            .get(&url)
            .header("User-Agent", &self.user_agent)
            .header("Accept", "application/json")
            .query(&query_pairs(params))
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(RedditError::Status {
                status: status.as_u16(),
                body: truncate_chars(&body, MAX_ERROR_BODY_CHARS),
            });
        }
        Ok(serde_json::from_str(&body)?)
    }

    fn endpoint(&self, permalink: &Permalink) -> String {
        format!("{}{}.json", self.base_url, permalink)
    }
}

fn query_pairs(params: &ListingParams) -> Vec<(&'static str, String)> {
    let mut pairs = vec![("raw_json", "1".to_string())];
    if let Some(limit) = params.limit {
        pairs.push(("limit", limit.to_string()));
    }
    if let Some(after) = params.after.as_ref().filter(|cursor| !cursor.is_empty()) {
        pairs.push(("after", after.clone()));
    }
    if let Some(depth) = params.depth {
        pairs.push(("depth", depth.to_string()));
    }
    pairs
}

fn truncate_chars(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}
