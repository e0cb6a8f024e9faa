use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{CommentId, PostId};

/// A stored comment row.
///
/// Comments are immutable once created: this crate never edits or deletes
/// them. `parent_comment_id == None` marks a top-level comment; otherwise it
/// references an earlier comment of the same post.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    /// Missing and `null` both mean "top-level".
    #[serde(default)]
    pub parent_comment_id: Option<CommentId>,
    pub content: String,
    pub author_id: String,
    /// Captured at post time, never re-derived from the author.
    pub author_display_name: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Returns `true` if this comment starts a thread.
    pub fn is_root(&self) -> bool {
        self.parent_comment_id.is_none()
    }
}

/// Insert request for a new comment row.
///
/// The store assigns `id` and `created_at`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewComment {
    pub post_id: PostId,
    pub content: String,
    pub parent_comment_id: Option<CommentId>,
    pub author_id: String,
    pub author_display_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample(parent: Option<i64>) -> Comment {
        Comment {
            id: CommentId::new(2),
            post_id: PostId::new(1),
            parent_comment_id: parent.map(CommentId::new),
            content: "hello".into(),
            author_id: "u-1".into(),
            author_display_name: "Ada".into(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn root_detection() {
        assert!(sample(None).is_root());
        assert!(!sample(Some(1)).is_root());
    }

    #[test]
    fn deserializes_store_row_with_null_parent() {
        let row = r#"{
            "id": 5,
            "post_id": 1,
            "parent_comment_id": null,
            "content": "first",
            "author_id": "u-9",
            "author_display_name": "Grace",
            "created_at": "2024-05-01T12:00:00Z"
        }"#;
        let c: Comment = serde_json::from_str(row).unwrap();
        assert_eq!(c.id, CommentId::new(5));
        assert!(c.is_root());
        assert_eq!(c.author_display_name, "Grace");
    }

    #[test]
    fn deserializes_store_row_without_parent_field() {
        let row = r#"{
            "id": 6,
            "post_id": 1,
            "content": "no parent column",
            "author_id": "u-9",
            "author_display_name": "Grace",
            "created_at": "2024-05-01T12:00:01+00:00"
        }"#;
        let c: Comment = serde_json::from_str(row).unwrap();
        assert!(c.parent_comment_id.is_none());
    }

    #[test]
    fn new_comment_uses_column_names() {
        let row = NewComment {
            post_id: PostId::new(3),
            content: "reply".into(),
            parent_comment_id: Some(CommentId::new(8)),
            author_id: "u-1".into(),
            author_display_name: "Ada".into(),
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["post_id"], 3);
        assert_eq!(json["parent_comment_id"], 8);
        assert_eq!(json["author_display_name"], "Ada");
    }
}
