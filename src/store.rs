use std::collections::HashSet;
use std::sync::Arc;

use sqlx::{SqliteConnection, SqlitePool};
use tokio::sync::Mutex;

use crate::models::{NewReflection, Reflection, ReflectionRow, Tag};

/// Durable storage for reflections and their tags.
///
/// Cloning is cheap and every clone shares the same pool and write lock, so
/// writes issued from different tasks are applied one at a time.
#[derive(Clone)]
pub struct ReflectionStore {
    pool: SqlitePool,
    write_lock: Arc<Mutex<()>>,
}

impl ReflectionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Insert a reflection and link its tags in one transaction.
    ///
    /// Tags are trimmed, blank names are dropped and duplicates collapse to
    /// the first occurrence. Returns the generated reflection id.
    pub async fn save_reflection(
        &self,
        quote_content: &str,
        author: &str,
        note: &str,
        tags: &[String],
    ) -> Result<i64, sqlx::Error> {
        let _guard = self.write_lock.lock().await;
        let mut tx = self.pool.begin().await?;

        let id = insert_reflection(
            &mut tx,
            quote_content,
            author,
            note,
            tags,
            chrono::Utc::now().timestamp_millis(),
        )
        .await?;

        tx.commit().await?;
        tracing::debug!(reflection_id = id, tags = tags.len(), "saved reflection");
        Ok(id)
    }

    /// Every reflection, most recent first.
    pub async fn get_all_reflections(&self) -> Result<Vec<Reflection>, sqlx::Error> {
        let rows: Vec<ReflectionRow> = sqlx::query_as(
            r#"
            SELECT id, quote_id, quote_content, author, note, created_at
            FROM reflections
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut reflections = Vec::with_capacity(rows.len());
        for row in rows {
            let tags = self.tags_for(row.id).await?;
            reflections.push(row.with_tags(tags));
        }
        Ok(reflections)
    }

    pub async fn get_reflection(&self, id: i64) -> Result<Option<Reflection>, sqlx::Error> {
        let row: Option<ReflectionRow> = sqlx::query_as(
            "SELECT id, quote_id, quote_content, author, note, created_at FROM reflections WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let tags = self.tags_for(row.id).await?;
        Ok(Some(row.with_tags(tags)))
    }

    /// Every tag name ever created, oldest first. Tags outlive the
    /// reflections that introduced them.
    pub async fn get_all_tags(&self) -> Result<Vec<String>, sqlx::Error> {
        let tags: Vec<Tag> = sqlx::query_as("SELECT id, name FROM tags ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(tags.into_iter().map(|tag| tag.name).collect())
    }

    /// Remove a reflection and its tag links. Unknown ids are ignored.
    pub async fn delete_reflection(&self, id: i64) -> Result<(), sqlx::Error> {
        let _guard = self.write_lock.lock().await;
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM reflection_tags WHERE reflection_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let removed = sqlx::query("DELETE FROM reflections WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;
        tracing::debug!(reflection_id = id, removed = removed > 0, "deleted reflection");
        Ok(())
    }

    /// Insert a batch of reflections in a single transaction, keeping their
    /// original timestamps when present.
    pub async fn import(&self, reflections: &[NewReflection]) -> Result<usize, sqlx::Error> {
        let _guard = self.write_lock.lock().await;
        let now = chrono::Utc::now().timestamp_millis();
        let mut tx = self.pool.begin().await?;

        for reflection in reflections {
            insert_reflection(
                &mut tx,
                &reflection.quote_content,
                &reflection.author,
                &reflection.note,
                &reflection.tags,
                reflection.created_at.unwrap_or(now),
            )
            .await?;
        }

        tx.commit().await?;
        Ok(reflections.len())
    }

    async fn tags_for(&self, reflection_id: i64) -> Result<Vec<String>, sqlx::Error> {
        let tags: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT t.name
            FROM tags t
            JOIN reflection_tags rt ON rt.tag_id = t.id
            WHERE rt.reflection_id = ?
            ORDER BY rt.rowid
            "#,
        )
        .bind(reflection_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(tags.into_iter().map(|(name,)| name).collect())
    }
}

async fn insert_reflection(
    conn: &mut SqliteConnection,
    quote_content: &str,
    author: &str,
    note: &str,
    tags: &[String],
    created_at: i64,
) -> Result<i64, sqlx::Error> {
    let reflection_id = sqlx::query(
        r#"
        INSERT INTO reflections (quote_id, quote_content, author, note, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(derive_quote_id(author, quote_content))
    .bind(quote_content)
    .bind(author)
    .bind(note)
    .bind(created_at)
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();

    for tag_name in normalize_tags(tags) {
        sqlx::query("INSERT OR IGNORE INTO tags (name) VALUES (?)")
            .bind(&tag_name)
            .execute(&mut *conn)
            .await?;

        let (tag_id,): (i64,) = sqlx::query_as("SELECT id FROM tags WHERE name = ?")
            .bind(&tag_name)
            .fetch_one(&mut *conn)
            .await?;

        sqlx::query("INSERT INTO reflection_tags (reflection_id, tag_id) VALUES (?, ?)")
            .bind(reflection_id)
            .bind(tag_id)
            .execute(&mut *conn)
            .await?;
    }

    Ok(reflection_id)
}

/// Trim tag names, drop blanks and keep the first occurrence of each name.
/// Matching is case-sensitive.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    tags.iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty() && seen.insert(*t))
        .map(str::to_string)
        .collect()
}

/// Correlation key for reflections written against the same quote: the
/// author followed by a 32-bit polynomial hash of the quote text.
pub fn derive_quote_id(author: &str, quote_content: &str) -> String {
    let hash = quote_content
        .encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)));
    format!("{author}{hash}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_id_uses_polynomial_string_hash() {
        assert_eq!(derive_quote_id("Anon", ""), "Anon0");
        assert_eq!(derive_quote_id("Anon", "Q"), "Anon81");
        assert_eq!(derive_quote_id("Seneca", "hello"), "Seneca99162322");
    }

    #[test]
    fn quote_id_wraps_on_long_text() {
        let id = derive_quote_id("A", "The quick brown fox jumps over the lazy dog");
        assert!(id.starts_with('A'));
        assert!(id[1..].parse::<i32>().is_ok());
        assert_eq!(id, derive_quote_id("A", "The quick brown fox jumps over the lazy dog"));
    }

    #[test]
    fn normalize_tags_trims_and_dedups() {
        let tags = vec![
            " work ".to_string(),
            "family".to_string(),
            "work".to_string(),
            "   ".to_string(),
            "Work".to_string(),
        ];
        assert_eq!(normalize_tags(&tags), vec!["work", "family", "Work"]);
    }
}
