//! SQLite Audio Repository

use async_trait::async_trait;
use sqlx::FromRow;
use uuid::Uuid;

use super::convert::{parse_ts, parse_uuid};
use super::DbPool;
use crate::application::ports::{AudioRecord, AudioRepositoryPort, RepositoryError};

/// SQLite Audio Repository
pub struct SqliteAudioRepository {
    pool: DbPool,
}

impl SqliteAudioRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

const SELECT_COLUMNS: &str =
    "id, text_id, user_id, url, voice_model, format, duration_secs, created_at";

#[derive(FromRow)]
struct AudioRow {
    id: String,
    text_id: String,
    user_id: String,
    url: String,
    voice_model: String,
    format: String,
    duration_secs: Option<f64>,
    created_at: String,
}

impl TryFrom<AudioRow> for AudioRecord {
    type Error = RepositoryError;

    fn try_from(row: AudioRow) -> Result<Self, Self::Error> {
        Ok(AudioRecord {
            id: parse_uuid(&row.id)?,
            text_id: parse_uuid(&row.text_id)?,
            user_id: parse_uuid(&row.user_id)?,
            url: row.url,
            voice_model: row.voice_model,
            format: row.format,
            duration_secs: row.duration_secs,
            created_at: parse_ts(&row.created_at)?,
        })
    }
}

#[async_trait]
impl AudioRepositoryPort for SqliteAudioRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AudioRecord>, RepositoryError> {
        let row: Option<AudioRow> =
            sqlx::query_as(&format!("SELECT {} FROM audios WHERE id = ?", SELECT_COLUMNS))
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        row.map(AudioRecord::try_from).transpose()
    }

    async fn find_by_text(&self, text_id: Uuid) -> Result<Option<AudioRecord>, RepositoryError> {
        let row: Option<AudioRow> = sqlx::query_as(&format!(
            "SELECT {} FROM audios WHERE text_id = ?",
            SELECT_COLUMNS
        ))
        .bind(text_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        row.map(AudioRecord::try_from).transpose()
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<AudioRecord>, RepositoryError> {
        let rows: Vec<AudioRow> = sqlx::query_as(&format!(
            "SELECT {} FROM audios WHERE user_id = ? ORDER BY created_at DESC",
            SELECT_COLUMNS
        ))
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(AudioRecord::try_from).collect()
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM audios WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("audio {}", id)));
        }
        Ok(())
    }
}
