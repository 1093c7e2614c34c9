use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::warn;

use crate::http::routes::{comments, health};
use crate::state::AppState;

pub fn build(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_allow_origins);
    let router = Router::new()
        .route("/health", get(health::health))
        .route("/v1/comments", get(comments::get_comments))
        .route("/v1/comments/more", post(comments::post_more))
        .route("/v1/comments/provided", post(comments::post_provided))
        .with_state(state);
    match cors {
        Some(cors) => router.layer(cors),
        None => router,
    }
}

fn cors_layer(configured: &[String]) -> Option<CorsLayer> {
    let base = CorsLayer::new().allow_methods([Method::GET, Method::POST, Method::OPTIONS]);
    if configured.iter().any(|origin| origin.trim() == "*") {
        return Some(base.allow_origin(Any).allow_headers(Any));
    }
    let origins: Vec<HeaderValue> = configured
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "invalid CORS origin ignored");
                None
            }
        })
        .collect();
    if origins.is_empty() {
        return None;
    }
    Some(
        base.allow_origin(AllowOrigin::list(origins))
            .allow_headers([CONTENT_TYPE]),
    )
}
