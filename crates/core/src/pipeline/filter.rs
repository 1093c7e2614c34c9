use chrono::DateTime;
use thiserror::Error;

use crate::domain::comments::{CommentFields, DisplayComment, RawComment};

pub const MODERATOR_ACCOUNT: &str = "AutoModerator";

const DELETION_MARKERS: [&str; 2] = ["[deleted]", "[removed]"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("author is missing")]
    MissingAuthor,
    #[error("author was deleted")]
    DeletedAuthor,
    #[error("body is empty")]
    EmptyBody,
    #[error("body was deleted")]
    DeletedBody,
    #[error("moderation artifact")]
    ModerationArtifact,
}

pub fn is_valid_comment(record: &RawComment) -> bool {
    check_content(record).is_ok()
}

pub fn is_moderation_artifact(record: &RawComment) -> bool {
    record.author.as_deref() == Some(MODERATOR_ACCOUNT)
}

pub fn filter_comments(records: &[RawComment]) -> Vec<DisplayComment> {
    records
        .iter()
        .filter(|record| !is_moderation_artifact(record))
        .filter_map(|record| DisplayComment::try_from(record).ok())
        .collect()
}

impl TryFrom<&RawComment> for DisplayComment {
    type Error = Rejection;

    fn try_from(record: &RawComment) -> Result<Self, Self::Error> {
        Ok(DisplayComment {
            comment: display_fields(record)?,
            replies: record.replies.clone(),
        })
    }
}

pub(crate) fn display_fields(record: &RawComment) -> Result<CommentFields, Rejection> {
    if is_moderation_artifact(record) {
        return Err(Rejection::ModerationArtifact);
    }
    let author = check_content(record)?;
    Ok(CommentFields {
        id: record.id.clone(),
        author: author.to_string(),
        body: record.body.clone(),
        body_html: record.body_html.clone(),
        created_at: record
            .created_utc
            .and_then(|secs| DateTime::from_timestamp(secs, 0)),
        score: record.score.unwrap_or(0),
        permalink: record.permalink.clone(),
        parent_id: record.parent_id.clone(),
        distinguished: record.distinguished.clone(),
    })
}

fn check_content(record: &RawComment) -> Result<&str, Rejection> {
    let author = record
        .author
        .as_deref()
        .filter(|author| !author.trim().is_empty())
        .ok_or(Rejection::MissingAuthor)?;
    if is_deletion_marker(author) {
        return Err(Rejection::DeletedAuthor);
    }
    if is_blank(record.body.as_deref()) && is_blank(record.body_html.as_deref()) {
        return Err(Rejection::EmptyBody);
    }
    if record.body.as_deref().is_some_and(is_deletion_marker) {
        return Err(Rejection::DeletedBody);
    }
    Ok(author)
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|text| text.trim().is_empty())
}

fn is_deletion_marker(value: &str) -> bool {
    DELETION_MARKERS.contains(&value.trim())
}
