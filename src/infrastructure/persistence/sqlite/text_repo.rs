//! SQLite Text Repository
//!
//! 状态迁移全部走条件更新（WHERE status = from），
//! completed 与 Audio 插入在同一事务内完成

use async_trait::async_trait;
use chrono::Utc;
use sqlx::FromRow;
use uuid::Uuid;

use super::convert::{parse_string_list, parse_ts, parse_uuid, string_list_json};
use super::database::map_constraint_err;
use super::DbPool;
use crate::application::ports::{AudioRecord, RepositoryError, TextRecord, TextRepositoryPort};
use crate::domain::speech::TextStatus;

/// SQLite Text Repository
pub struct SqliteTextRepository {
    pool: DbPool,
}

impl SqliteTextRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

const SELECT_COLUMNS: &str = "id, user_id, title, content, language, tags, status, \
     processing_error, word_count, retry_count, created_at, updated_at";

#[derive(FromRow)]
struct TextRow {
    id: String,
    user_id: String,
    title: String,
    content: String,
    language: String,
    tags: String,
    status: String,
    processing_error: Option<String>,
    word_count: i64,
    retry_count: i64,
    created_at: String,
    updated_at: String,
}

impl TryFrom<TextRow> for TextRecord {
    type Error = RepositoryError;

    fn try_from(row: TextRow) -> Result<Self, Self::Error> {
        let status = TextStatus::from_str(&row.status).ok_or_else(|| {
            RepositoryError::SerializationError(format!("unknown text status: {}", row.status))
        })?;
        Ok(TextRecord {
            id: parse_uuid(&row.id)?,
            user_id: parse_uuid(&row.user_id)?,
            title: row.title,
            content: row.content,
            language: row.language,
            tags: parse_string_list(&row.tags)?,
            status,
            processing_error: row.processing_error,
            word_count: row.word_count as u32,
            retry_count: row.retry_count as u32,
            created_at: parse_ts(&row.created_at)?,
            updated_at: parse_ts(&row.updated_at)?,
        })
    }
}

#[async_trait]
impl TextRepositoryPort for SqliteTextRepository {
    async fn create(&self, text: &TextRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO texts (id, user_id, title, content, language, tags, status,
                               processing_error, word_count, retry_count, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(text.id.to_string())
        .bind(text.user_id.to_string())
        .bind(&text.title)
        .bind(&text.content)
        .bind(&text.language)
        .bind(string_list_json(&text.tags)?)
        .bind(text.status.as_str())
        .bind(&text.processing_error)
        .bind(text.word_count as i64)
        .bind(text.retry_count as i64)
        .bind(text.created_at.to_rfc3339())
        .bind(text.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| map_constraint_err(e, "text owner missing"))?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<TextRecord>, RepositoryError> {
        let row: Option<TextRow> =
            sqlx::query_as(&format!("SELECT {} FROM texts WHERE id = ?", SELECT_COLUMNS))
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        row.map(TextRecord::try_from).transpose()
    }

    async fn find_by_user(
        &self,
        user_id: Uuid,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<TextRecord>, RepositoryError> {
        let rows: Vec<TextRow> = sqlx::query_as(&format!(
            "SELECT {} FROM texts WHERE user_id = ? ORDER BY created_at DESC LIMIT ? OFFSET ?",
            SELECT_COLUMNS
        ))
        .bind(user_id.to_string())
        .bind(limit as i64)
        .bind(offset as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(TextRecord::try_from).collect()
    }

    async fn update_pending(
        &self,
        id: Uuid,
        title: &str,
        content: &str,
        tags: &[String],
        word_count: u32,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE texts
            SET title = ?, content = ?, tags = ?, word_count = ?, updated_at = ?
            WHERE id = ? AND status = ?
            "#,
        )
        .bind(title)
        .bind(content)
        .bind(string_list_json(tags)?)
        .bind(word_count as i64)
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .bind(TextStatus::Pending.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn transition(
        &self,
        id: Uuid,
        from: TextStatus,
        to: TextStatus,
        processing_error: Option<String>,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE texts
            SET status = ?, processing_error = ?, updated_at = ?
            WHERE id = ? AND status = ?
            "#,
        )
        .bind(to.as_str())
        .bind(&processing_error)
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .bind(from.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn complete_with_audio(
        &self,
        id: Uuid,
        audio: &AudioRecord,
    ) -> Result<bool, RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        let result = sqlx::query(
            r#"
            UPDATE texts
            SET status = ?, processing_error = NULL, updated_at = ?
            WHERE id = ? AND status = ?
            "#,
        )
        .bind(TextStatus::Completed.as_str())
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .bind(TextStatus::Processing.as_str())
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            tx.rollback()
                .await
                .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;
            return Ok(false);
        }

        sqlx::query(
            r#"
            INSERT INTO audios (id, text_id, user_id, url, voice_model, format,
                                duration_secs, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(audio.id.to_string())
        .bind(audio.text_id.to_string())
        .bind(audio.user_id.to_string())
        .bind(&audio.url)
        .bind(&audio.voice_model)
        .bind(&audio.format)
        .bind(audio.duration_secs)
        .bind(audio.created_at.to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(|e| map_constraint_err(e, "audio already exists for text"))?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(true)
    }

    async fn reopen_for_retry(
        &self,
        id: Uuid,
        max_retries: u32,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE texts
            SET status = ?, processing_error = NULL,
                retry_count = retry_count + 1, updated_at = ?
            WHERE id = ? AND status = ? AND retry_count < ?
            "#,
        )
        .bind(TextStatus::Pending.as_str())
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .bind(TextStatus::Failed.as_str())
        .bind(max_retries as i64)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        sqlx::query("DELETE FROM audios WHERE text_id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        let result = sqlx::query("DELETE FROM texts WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            tx.rollback()
                .await
                .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;
            return Err(RepositoryError::NotFound(format!("text {}", id)));
        }

        tx.commit()
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}
