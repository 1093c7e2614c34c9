use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid permalink: {0}")]
    InvalidPermalink(String),
    #[error("invalid comment depth: {0}")]
    InvalidDepth(String),
}
