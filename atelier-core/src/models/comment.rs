use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A stored comment, as returned by the comment endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub contenu: String,
    pub date: DateTime<Utc>,
    /// Owning artisan id (`artisan_id` column).
    pub artisan: i64,
}

/// Comment as embedded under an artisan's `commentaires`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentSummary {
    pub id: i64,
    pub contenu: String,
    pub date: DateTime<Utc>,
}

impl From<Comment> for CommentSummary {
    fn from(c: Comment) -> Self {
        Self {
            id: c.id,
            contenu: c.contenu,
            date: c.date,
        }
    }
}

/// Inbound comment body. `date` is never read from clients; `artisan` may be
/// an integer or a numeric string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentInput {
    pub contenu: Option<Value>,
    pub artisan: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub contenu: String,
    pub artisan: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentPatch {
    pub contenu: Option<String>,
    pub artisan: Option<i64>,
}
