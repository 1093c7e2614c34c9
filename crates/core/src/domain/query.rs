use serde::Serialize;

use crate::domain::comments::CommentEnvelope;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchError {
    pub message: String,
    pub status: Option<u16>,
}

impl FetchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(message: impl Into<String>, status: u16) -> Self {
        Self {
            message: message.into(),
            status: Some(status),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryState<T> {
    pub data: Option<T>,
    pub is_loading: bool,
    pub error: Option<FetchError>,
}

impl<T> QueryState<T> {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self {
            data: None,
            is_loading: false,
            error: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InfiniteQueryState {
    pub pages: Option<Vec<CommentEnvelope>>,
    pub has_next_page: bool,
    pub is_fetching_next_page: bool,
    pub is_loading: bool,
    pub error: Option<FetchError>,
}

impl InfiniteQueryState {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchResults {
    pub nested_infinite: InfiniteQueryState,
    pub nested_lazy: QueryState<CommentEnvelope>,
    pub flat_infinite: InfiniteQueryState,
    pub flat_lazy: QueryState<CommentEnvelope>,
}
