pub mod config;
pub mod filter;
pub mod pages;
pub mod reconcile;
pub mod tree;
pub mod trigger;

pub use config::{FetchMode, Layout, PipelineConfig, PipelineOptions};
pub use filter::{filter_comments, is_moderation_artifact, is_valid_comment, Rejection};
pub use pages::{merge_pages, MergedPages};
pub use reconcile::{reconcile, CommentsView, DisplayComments, NextPage};
pub use tree::TreeBuilder;
pub use trigger::{on_open, FetchRequest, QueryKind};
