use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct ReflectionRow {
    pub id: i64,
    pub quote_id: String,
    pub quote_content: String,
    pub author: String,
    pub note: String,
    pub created_at: i64,
}

impl ReflectionRow {
    pub fn with_tags(self, tags: Vec<String>) -> Reflection {
        Reflection {
            id: self.id,
            quote_id: self.quote_id,
            quote_content: self.quote_content,
            author: self.author,
            note: self.note,
            tags,
            created_at: self.created_at,
        }
    }
}

/// A stored reflection with its tag names resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reflection {
    pub id: i64,
    pub quote_id: String,
    pub quote_content: String,
    pub author: String,
    pub note: String,
    pub tags: Vec<String>,
    /// Milliseconds since the Unix epoch.
    pub created_at: i64,
}

impl Reflection {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Reflection as accepted by the importer. Extra fields from an export
/// (`id`, `quote_id`) are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct NewReflection {
    pub quote_content: String,
    pub author: String,
    pub note: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: Option<i64>,
}
