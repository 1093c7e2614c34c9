use tracing::warn;

use crate::domain::comments::{CommentFields, DisplayComment, Listing, NestedComment};
use crate::pipeline::filter::display_fields;
use crate::types::depth::MaxDepth;

#[derive(Debug, Clone, Copy, Default)]
pub struct TreeBuilder {
    max_depth: MaxDepth,
}

impl TreeBuilder {
    pub fn new(max_depth: MaxDepth) -> Self {
        Self { max_depth }
    }

    pub fn build_forest(&self, comments: &[DisplayComment]) -> Vec<NestedComment> {
        comments
            .iter()
            .map(|comment| self.build_nested(comment, 0))
            .collect()
    }

    pub fn build_nested(&self, comment: &DisplayComment, current_depth: usize) -> NestedComment {
        self.build_node(comment.comment.clone(), comment.replies.as_ref(), current_depth)
    }

    fn build_node(
        &self,
        comment: CommentFields,
        replies: Option<&Listing>,
        current_depth: usize,
    ) -> NestedComment {
        let Some(replies) = replies.filter(|listing| !listing.is_empty()) else {
            return leaf(comment, current_depth);
        };
        if current_depth >= self.max_depth.get() {
            warn!(
                depth = current_depth,
                max_depth = self.max_depth.get(),
                comment_id = comment.id.as_deref().unwrap_or("-"),
                dropped = replies.children.len(),
                "comment depth limit reached; replies truncated"
            );
            return leaf(comment, current_depth);
        }

        // Filtering happens before nesting, so a reply list made only of
        // removed or bot comments collapses to a leaf.
        let children: Vec<NestedComment> = replies
            .children
            .iter()
            .filter_map(|child| {
                display_fields(child)
                    .ok()
                    .map(|fields| self.build_node(fields, child.replies.as_ref(), current_depth + 1))
            })
            .collect();
        if children.is_empty() {
            return leaf(comment, current_depth);
        }
        NestedComment {
            comment,
            depth: current_depth,
            has_replies: true,
            replies: Some(children),
        }
    }
}

fn leaf(comment: CommentFields, depth: usize) -> NestedComment {
    NestedComment {
        comment,
        depth,
        has_replies: false,
        replies: None,
    }
}
