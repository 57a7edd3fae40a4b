use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A tag name, unique across the whole store.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}
