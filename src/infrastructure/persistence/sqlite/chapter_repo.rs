//! SQLite Chapter Repository

use async_trait::async_trait;
use sqlx::FromRow;
use uuid::Uuid;

use super::convert::{parse_ts, parse_uuid};
use super::database::map_constraint_err;
use super::DbPool;
use crate::application::ports::{ChapterRecord, ChapterRepositoryPort, RepositoryError};

/// SQLite Chapter Repository
pub struct SqliteChapterRepository {
    pool: DbPool,
}

impl SqliteChapterRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct ChapterRow {
    id: String,
    book_id: String,
    title: String,
    content: String,
    audio_url: Option<String>,
    sequence_index: i64,
    created_at: String,
    updated_at: String,
}

impl TryFrom<ChapterRow> for ChapterRecord {
    type Error = RepositoryError;

    fn try_from(row: ChapterRow) -> Result<Self, Self::Error> {
        Ok(ChapterRecord {
            id: parse_uuid(&row.id)?,
            book_id: parse_uuid(&row.book_id)?,
            title: row.title,
            content: row.content,
            audio_url: row.audio_url,
            sequence_index: row.sequence_index as u32,
            created_at: parse_ts(&row.created_at)?,
            updated_at: parse_ts(&row.updated_at)?,
        })
    }
}

const SELECT_COLUMNS: &str =
    "id, book_id, title, content, audio_url, sequence_index, created_at, updated_at";

#[async_trait]
impl ChapterRepositoryPort for SqliteChapterRepository {
    async fn create(&self, chapter: &ChapterRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO chapters (id, book_id, title, content, audio_url, sequence_index, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(chapter.id.to_string())
        .bind(chapter.book_id.to_string())
        .bind(&chapter.title)
        .bind(&chapter.content)
        .bind(&chapter.audio_url)
        .bind(chapter.sequence_index as i64)
        .bind(chapter.created_at.to_rfc3339())
        .bind(chapter.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| map_constraint_err(e, "chapter sequence_index taken or book missing"))?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ChapterRecord>, RepositoryError> {
        let row: Option<ChapterRow> = sqlx::query_as(&format!(
            "SELECT {} FROM chapters WHERE id = ?",
            SELECT_COLUMNS
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        row.map(ChapterRecord::try_from).transpose()
    }

    async fn find_by_book(&self, book_id: Uuid) -> Result<Vec<ChapterRecord>, RepositoryError> {
        let rows: Vec<ChapterRow> = sqlx::query_as(&format!(
            "SELECT {} FROM chapters WHERE book_id = ? ORDER BY sequence_index",
            SELECT_COLUMNS
        ))
        .bind(book_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(ChapterRecord::try_from).collect()
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM chapters WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("chapter {}", id)));
        }
        Ok(())
    }
}
