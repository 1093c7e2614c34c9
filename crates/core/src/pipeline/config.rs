use serde::Serialize;

use crate::domain::comments::DisplayComment;
use crate::types::depth::MaxDepth;
use crate::types::permalink::Permalink;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    Nested,
    Flat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchMode {
    Infinite,
    Lazy,
    Provided,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineConfig {
    pub nested_mode: bool,
    pub infinite_mode: bool,
    pub max_depth: MaxDepth,
    pub provided_comments: Option<Vec<DisplayComment>>,
}

impl PipelineConfig {
    pub fn nested(mut self, enabled: bool) -> Self {
        self.nested_mode = enabled;
        self
    }

    pub fn infinite(mut self, enabled: bool) -> Self {
        self.infinite_mode = enabled;
        self
    }

    pub fn with_max_depth(mut self, max_depth: MaxDepth) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_provided(mut self, comments: Vec<DisplayComment>) -> Self {
        self.provided_comments = Some(comments);
        self
    }

    pub fn layout(&self) -> Layout {
        if self.nested_mode {
            Layout::Nested
        } else {
            Layout::Flat
        }
    }

    pub fn fetch_mode(&self) -> FetchMode {
        if self.infinite_mode {
            FetchMode::Infinite
        } else if self.provided_comments.is_some() {
            FetchMode::Provided
        } else {
            FetchMode::Lazy
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOptions {
    pub permalink: Permalink,
    pub open: bool,
    pub config: PipelineConfig,
}

impl PipelineOptions {
    pub fn new(permalink: Permalink, config: PipelineConfig) -> Self {
        Self {
            permalink,
            open: true,
            config,
        }
    }
}
