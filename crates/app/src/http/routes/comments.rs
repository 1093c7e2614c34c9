use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AppConfig;
use crate::state::AppState;
use threadview_core::domain::comments::DisplayComment;
use threadview_core::error::CoreError;
use threadview_core::pipeline::{CommentsView, PipelineConfig, PipelineOptions};
use threadview_core::types::depth::MaxDepth;
use threadview_core::types::permalink::Permalink;

#[derive(Debug, Default, Deserialize)]
pub struct CommentsParams {
    pub permalink: Option<String>,
    pub nested: Option<bool>,
    pub infinite: Option<bool>,
    pub max_depth: Option<i64>,
    pub open: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ProvidedComments {
    pub comments: Vec<DisplayComment>,
}

#[derive(Debug, Error)]
pub enum CommentsApiError {
    #[error("permalink is required")]
    MissingPermalink,
    #[error(transparent)]
    Invalid(#[from] CoreError),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

pub async fn get_comments(
    State(state): State<AppState>,
    Query(params): Query<CommentsParams>,
) -> Result<Json<CommentsView>, CommentsApiError> {
    let options = build_options(&state.config, params, None)?;
    Ok(Json(state.loader.load(&options).await))
}

pub async fn post_more(
    State(state): State<AppState>,
    Query(params): Query<CommentsParams>,
) -> Result<Json<CommentsView>, CommentsApiError> {
    let options = build_options(&state.config, params, None)?;
    Ok(Json(state.loader.load_more(&options).await))
}

pub async fn post_provided(
    State(state): State<AppState>,
    Query(params): Query<CommentsParams>,
    Json(body): Json<ProvidedComments>,
) -> Result<Json<CommentsView>, CommentsApiError> {
    let options = build_options(&state.config, params, Some(body.comments))?;
    Ok(Json(state.loader.load(&options).await))
}

fn build_options(
    config: &AppConfig,
    params: CommentsParams,
    provided: Option<Vec<DisplayComment>>,
) -> Result<PipelineOptions, CommentsApiError> {
    let raw = params.permalink.unwrap_or_default();
    if raw.trim().is_empty() {
        return Err(CommentsApiError::MissingPermalink);
    }
    let permalink = Permalink::try_from(raw.as_str())?;
    let max_depth = match params.max_depth {
        Some(depth) => MaxDepth::try_from(depth)?,
        None => config.max_comment_depth,
    };
    let mut pipeline = PipelineConfig::default()
        .nested(params.nested.unwrap_or(false))
        .infinite(params.infinite.unwrap_or(false))
        .with_max_depth(max_depth);
    if let Some(comments) = provided {
        pipeline = pipeline.with_provided(comments);
    }
    let mut options = PipelineOptions::new(permalink, pipeline);
    options.open = params.open.unwrap_or(true);
    Ok(options)
}

impl IntoResponse for CommentsApiError {
    fn into_response(self) -> axum::response::Response {
        let body = Json(ErrorBody {
            error: self.to_string(),
        });
        (StatusCode::BAD_REQUEST, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    use super::{build_options, CommentsApiError, CommentsParams};
    use crate::config::AppConfig;
    use threadview_core::pipeline::{FetchMode, Layout};

    fn params(permalink: &str) -> CommentsParams {
        CommentsParams {
            permalink: Some(permalink.to_string()),
            ..CommentsParams::default()
        }
    }

    #[test]
    fn defaults_come_from_config() {
        let config = AppConfig::for_tests();
        let options = build_options(&config, params("/r/rust/comments/abc/t/"), None).unwrap();
        assert_eq!(options.permalink.as_str(), "/r/rust/comments/abc/t");
        assert!(options.open);
        assert_eq!(options.config.layout(), Layout::Flat);
        assert_eq!(options.config.fetch_mode(), FetchMode::Lazy);
        assert_eq!(options.config.max_depth, config.max_comment_depth);
    }

    #[test]
    fn flags_and_provided_comments_are_applied() {
        let mut query = params("/r/rust/comments/abc/t");
        query.nested = Some(true);
        query.max_depth = Some(2);
        query.open = Some(false);
        let options = build_options(&AppConfig::for_tests(), query, Some(Vec::new())).unwrap();
        assert_eq!(options.config.layout(), Layout::Nested);
        assert_eq!(options.config.fetch_mode(), FetchMode::Provided);
        assert_eq!(options.config.max_depth.get(), 2);
        assert!(!options.open);
    }

    #[test]
    fn rejects_bad_input() {
        let config = AppConfig::for_tests();
        assert!(matches!(
            build_options(&config, CommentsParams::default(), None),
            Err(CommentsApiError::MissingPermalink)
        ));
        assert!(matches!(
            build_options(&config, params("r/rust"), None),
            Err(CommentsApiError::Invalid(_))
        ));
        let mut deep = params("/r/rust/comments/abc/t");
        deep.max_depth = Some(-1);
        assert!(build_options(&config, deep, None).is_err());
    }

    #[test]
    fn errors_map_to_bad_request() {
        let response = CommentsApiError::MissingPermalink.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
