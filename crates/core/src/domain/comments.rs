use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::types::lenient;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawComment {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub body: Option<String>,
    #[serde(default, alias = "bodyHtml", deserialize_with = "lenient::string")]
    pub body_html: Option<String>,
    #[serde(default, alias = "createdAt", deserialize_with = "lenient::integer")]
    pub created_utc: Option<i64>,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub score: Option<i64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub permalink: Option<String>,
    #[serde(default, alias = "parentId", deserialize_with = "lenient::string")]
    pub parent_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub distinguished: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::listing",
        skip_serializing_if = "Option::is_none"
    )]
    pub replies: Option<Listing>,
}

impl RawComment {
    pub fn from_value(value: &Value) -> Self {
        RawComment::deserialize(value).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Listing {
    pub children: Vec<RawComment>,
    pub after: Option<String>,
}

impl Listing {
    // Upstream sends `""` instead of a listing when there are no replies.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let data = match object.get("data") {
            Some(Value::Object(data)) if data.contains_key("children") => data,
            _ if object.contains_key("children") => object,
            _ => return None,
        };
        let children = match data.get("children") {
            Some(Value::Array(items)) => items.iter().map(child_from_value).collect(),
            _ => Vec::new(),
        };
        let after = data
            .get("after")
            .and_then(Value::as_str)
            .filter(|cursor| !cursor.is_empty())
            .map(str::to_string);
        Some(Listing { children, after })
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

fn child_from_value(value: &Value) -> RawComment {
    if value.get("kind").is_some() {
        if let Some(data) = value.get("data").filter(|data| data.is_object()) {
            return RawComment::from_value(data);
        }
    }
    RawComment::from_value(value)
}

impl<'de> Deserialize<'de> for Listing {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = lenient::bounded_value(deserializer)?;
        Ok(Listing::from_value(&value).unwrap_or_default())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CommentEnvelope {
    Listing(Listing),
    Thread(Listing, Listing),
}

impl CommentEnvelope {
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Array(items) => {
                let listing_at = |idx: usize| {
                    items
                        .get(idx)
                        .and_then(Listing::from_value)
                        .unwrap_or_default()
                };
                CommentEnvelope::Thread(listing_at(0), listing_at(1))
            }
            other => CommentEnvelope::Listing(Listing::from_value(other).unwrap_or_default()),
        }
    }

    pub fn comments(&self) -> &Listing {
        match self {
            CommentEnvelope::Listing(listing) => listing,
            CommentEnvelope::Thread(_, comments) => comments,
        }
    }
}

impl Default for CommentEnvelope {
    fn default() -> Self {
        CommentEnvelope::Listing(Listing::default())
    }
}

impl From<Listing> for CommentEnvelope {
    fn from(listing: Listing) -> Self {
        CommentEnvelope::Listing(listing)
    }
}

impl<'de> Deserialize<'de> for CommentEnvelope {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = lenient::bounded_value(deserializer)?;
        Ok(CommentEnvelope::from_value(&value))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentFields {
    #[serde(default)]
    pub id: Option<String>,
    pub author: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub body_html: Option<String>,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub permalink: Option<String>,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub distinguished: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayComment {
    #[serde(flatten)]
    pub comment: CommentFields,
    #[serde(
        default,
        deserialize_with = "lenient::listing",
        skip_serializing_if = "Option::is_none"
    )]
    pub replies: Option<Listing>,
}

impl From<DisplayComment> for RawComment {
    fn from(display: DisplayComment) -> Self {
        let DisplayComment { comment, replies } = display;
        RawComment {
            id: comment.id,
            name: None,
            author: Some(comment.author),
            body: comment.body,
            body_html: comment.body_html,
            created_utc: comment.created_at.map(|at| at.timestamp()),
            score: Some(comment.score),
            permalink: comment.permalink,
            parent_id: comment.parent_id,
            distinguished: comment.distinguished,
            replies,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NestedComment {
    #[serde(flatten)]
    pub comment: CommentFields,
    pub depth: usize,
    pub has_replies: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replies: Option<Vec<NestedComment>>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{CommentEnvelope, Listing, RawComment};

    #[test]
    fn raw_comment_reads_wire_fields() {
        let raw: RawComment = serde_json::from_value(json!({
            "id": "c1",
            "author": "alice",
            "body": "hi",
            "body_html": "<p>hi</p>",
            "created_utc": 1700000000.0,
            "score": 12,
            "permalink": "/r/rust/comments/abc/t/c1/",
            "parent_id": "t3_abc",
            "distinguished": null,
            "replies": ""
        }))
        .unwrap();
        assert_eq!(raw.author.as_deref(), Some("alice"));
        assert_eq!(raw.body_html.as_deref(), Some("<p>hi</p>"));
        assert_eq!(raw.created_utc, Some(1_700_000_000));
        assert_eq!(raw.score, Some(12));
        assert!(raw.replies.is_none());
    }

    #[test]
    fn raw_comment_accepts_camel_case_aliases() {
        let raw: RawComment = serde_json::from_value(json!({
            "author": "bob",
            "bodyHtml": "<p>x</p>",
            "createdAt": 5,
            "parentId": "t1_a"
        }))
        .unwrap();
        assert_eq!(raw.body_html.as_deref(), Some("<p>x</p>"));
        assert_eq!(raw.created_utc, Some(5));
        assert_eq!(raw.parent_id.as_deref(), Some("t1_a"));
    }

    #[test]
    fn malformed_fields_do_not_reject_record() {
        let raw: RawComment = serde_json::from_value(json!({
            "author": ["nope"],
            "body": "still here",
            "score": "high",
            "replies": 42
        }))
        .unwrap();
        assert!(raw.author.is_none());
        assert_eq!(raw.body.as_deref(), Some("still here"));
        assert!(raw.score.is_none());
        assert!(raw.replies.is_none());
    }

    #[test]
    fn listing_reads_wrapped_and_bare_shapes() {
        let wrapped = json!({
            "kind": "Listing",
            "data": {
                "after": "t1_next",
                "children": [{"kind": "t1", "data": {"author": "a", "body": "x"}}]
            }
        });
        let listing = Listing::from_value(&wrapped).unwrap();
        assert_eq!(listing.after.as_deref(), Some("t1_next"));
        assert_eq!(listing.children[0].author.as_deref(), Some("a"));

        let bare = json!({"children": [{"author": "b", "body": "y"}], "after": null});
        let listing = Listing::from_value(&bare).unwrap();
        assert!(listing.after.is_none());
        assert_eq!(listing.children[0].author.as_deref(), Some("b"));
    }

    #[test]
    fn empty_string_replies_mean_none() {
        assert!(Listing::from_value(&json!("")).is_none());
        assert!(Listing::from_value(&json!(null)).is_none());
        assert!(Listing::from_value(&json!({"kind": "Listing"})).is_none());
    }

    #[test]
    fn non_object_children_decode_as_empty_records() {
        let listing = Listing::from_value(&json!({"children": ["junk", 3]})).unwrap();
        assert_eq!(listing.children.len(), 2);
        assert_eq!(listing.children[0], RawComment::default());
    }

    #[test]
    fn nested_replies_decode_recursively() {
        let raw = RawComment::from_value(&json!({
            "author": "a",
            "body": "root",
            "replies": {"kind": "Listing", "data": {"children": [
                {"kind": "t1", "data": {"author": "b", "body": "child"}}
            ]}}
        }));
        let replies = raw.replies.unwrap();
        assert_eq!(replies.children[0].body.as_deref(), Some("child"));
    }

    #[test]
    fn thread_envelope_uses_second_listing() {
        let envelope: CommentEnvelope = serde_json::from_value(json!([
            {"kind": "Listing", "data": {"children": [{"kind": "t3", "data": {"author": "op"}}]}},
            {"kind": "Listing", "data": {"children": [{"kind": "t1", "data": {"author": "c"}}]}}
        ]))
        .unwrap();
        assert_eq!(envelope.comments().children.len(), 1);
        assert_eq!(envelope.comments().children[0].author.as_deref(), Some("c"));
    }

    #[test]
    fn truncated_thread_envelope_is_empty() {
        let envelope: CommentEnvelope = serde_json::from_value(json!([{"children": []}])).unwrap();
        assert!(envelope.comments().is_empty());
    }

    #[test]
    fn garbage_envelope_is_empty() {
        let envelope: CommentEnvelope = serde_json::from_value(json!("oops")).unwrap();
        assert!(envelope.comments().is_empty());
        assert!(envelope.comments().after.is_none());
    }
}
