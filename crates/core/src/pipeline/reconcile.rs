use serde::Serialize;

use crate::domain::comments::{CommentEnvelope, DisplayComment, NestedComment, RawComment};
use crate::domain::query::{FetchError, FetchResults, InfiniteQueryState, QueryState};
use crate::pipeline::config::{FetchMode, Layout, PipelineConfig};
use crate::pipeline::filter::filter_comments;
use crate::pipeline::pages::merge_pages;
use crate::pipeline::tree::TreeBuilder;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DisplayComments {
    Flat(Vec<DisplayComment>),
    Nested(Vec<NestedComment>),
}

impl DisplayComments {
    pub fn len(&self) -> usize {
        match self {
            DisplayComments::Flat(comments) => comments.len(),
            DisplayComments::Nested(comments) => comments.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum NextPage {
    None,
    Fetch {
        target: Layout,
        cursor: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentsView {
    pub display_comments: DisplayComments,
    pub has_comments_to_show: bool,
    pub show_loading: bool,
    pub next_page: NextPage,
    pub has_next_page: bool,
    pub is_fetching_next_page: bool,
    pub is_error: bool,
    pub error: Option<FetchError>,
}

#[derive(Debug, Clone, PartialEq)]
struct Status {
    loading: bool,
    error: Option<FetchError>,
    next_page: NextPage,
    has_next_page: bool,
    is_fetching_next_page: bool,
}

impl Status {
    fn lazy(query: &QueryState<CommentEnvelope>) -> Self {
        Self {
            loading: query.is_loading,
            error: query.error.clone(),
            next_page: NextPage::None,
            has_next_page: false,
            is_fetching_next_page: false,
        }
    }

    fn infinite(query: &InfiniteQueryState, target: Layout) -> Self {
        let next_page = if query.has_next_page {
            NextPage::Fetch {
                target,
                cursor: infinite_cursor(query),
            }
        } else {
            NextPage::None
        };
        Self {
            loading: query.is_loading,
            error: query.error.clone(),
            next_page,
            has_next_page: query.has_next_page,
            is_fetching_next_page: query.is_fetching_next_page,
        }
    }
}

pub fn reconcile(config: &PipelineConfig, results: &FetchResults) -> CommentsView {
    match (config.layout(), config.fetch_mode()) {
        (Layout::Nested, FetchMode::Infinite) => nested_infinite(config, results),
        (Layout::Nested, FetchMode::Lazy) => nested_lazy(config, results),
        (Layout::Nested, FetchMode::Provided) => nested_provided(config, results),
        (Layout::Flat, FetchMode::Infinite) => flat_infinite(config, results),
        (Layout::Flat, FetchMode::Lazy) => flat_lazy(config, results),
        (Layout::Flat, FetchMode::Provided) => flat_provided(config, results),
    }
}

fn nested_infinite(config: &PipelineConfig, results: &FetchResults) -> CommentsView {
    assemble(
        DisplayComments::Nested(select_nested(config, results)),
        Status::infinite(&results.nested_infinite, Layout::Nested),
    )
}

fn nested_lazy(config: &PipelineConfig, results: &FetchResults) -> CommentsView {
    assemble(
        DisplayComments::Nested(select_nested(config, results)),
        Status::lazy(&results.nested_lazy),
    )
}

fn nested_provided(config: &PipelineConfig, results: &FetchResults) -> CommentsView {
    nested_lazy(config, results)
}

fn flat_infinite(config: &PipelineConfig, results: &FetchResults) -> CommentsView {
    assemble(
        DisplayComments::Flat(select_flat(config, results)),
        Status::infinite(&results.flat_infinite, Layout::Flat),
    )
}

fn flat_lazy(config: &PipelineConfig, results: &FetchResults) -> CommentsView {
    assemble(
        DisplayComments::Flat(select_flat(config, results)),
        Status::lazy(&results.flat_lazy),
    )
}

fn flat_provided(config: &PipelineConfig, results: &FetchResults) -> CommentsView {
    flat_lazy(config, results)
}

fn assemble(display_comments: DisplayComments, status: Status) -> CommentsView {
    CommentsView {
        has_comments_to_show: !display_comments.is_empty(),
        display_comments,
        show_loading: status.loading,
        next_page: status.next_page,
        has_next_page: status.has_next_page,
        is_fetching_next_page: status.is_fetching_next_page,
        is_error: status.error.is_some(),
        error: status.error,
    }
}

// Provided comments, then paginated data, then the single-shot result. The
// first source holding any raw records wins, even if filtering empties it.
fn select_nested(config: &PipelineConfig, results: &FetchResults) -> Vec<NestedComment> {
    let builder = TreeBuilder::new(config.max_depth);
    if let Some(provided) = config.provided_comments.as_ref().filter(|c| !c.is_empty()) {
        let raw: Vec<RawComment> = provided.iter().cloned().map(RawComment::from).collect();
        return builder.build_forest(&filter_comments(&raw));
    }
    let paged = infinite_items(&results.nested_infinite);
    if !paged.is_empty() {
        return builder.build_forest(&filter_comments(&paged));
    }
    let single = lazy_items(&results.nested_lazy);
    if !single.is_empty() {
        return builder.build_forest(&filter_comments(single));
    }
    Vec::new()
}

fn select_flat(config: &PipelineConfig, results: &FetchResults) -> Vec<DisplayComment> {
    let paged = filter_comments(&infinite_items(&results.flat_infinite));
    if !paged.is_empty() {
        return paged;
    }
    let single = filter_comments(lazy_items(&results.flat_lazy));
    if !single.is_empty() {
        return single;
    }
    config.provided_comments.clone().unwrap_or_default()
}

fn infinite_items(query: &InfiniteQueryState) -> Vec<RawComment> {
    query
        .pages
        .as_deref()
        .map(|pages| merge_pages(pages.iter().map(CommentEnvelope::comments)).items)
        .unwrap_or_default()
}

fn infinite_cursor(query: &InfiniteQueryState) -> Option<String> {
    query
        .pages
        .as_deref()
        .and_then(|pages| pages.last())
        .and_then(|page| page.comments().after.clone())
}

fn lazy_items(query: &QueryState<CommentEnvelope>) -> &[RawComment] {
    query
        .data
        .as_ref()
        .map(|envelope| envelope.comments().children.as_slice())
        .unwrap_or(&[])
}
