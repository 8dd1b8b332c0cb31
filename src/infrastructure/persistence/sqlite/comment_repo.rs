//! SQLite Comment Repository

use async_trait::async_trait;
use sqlx::FromRow;
use uuid::Uuid;

use super::convert::{parse_ts, parse_uuid};
use super::database::map_constraint_err;
use super::DbPool;
use crate::application::ports::{CommentRecord, CommentRepositoryPort, RepositoryError};

/// SQLite Comment Repository
pub struct SqliteCommentRepository {
    pool: DbPool,
}

impl SqliteCommentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct CommentRow {
    id: String,
    book_id: String,
    user_id: String,
    body: String,
    created_at: String,
}

impl TryFrom<CommentRow> for CommentRecord {
    type Error = RepositoryError;

    fn try_from(row: CommentRow) -> Result<Self, Self::Error> {
        Ok(CommentRecord {
            id: parse_uuid(&row.id)?,
            book_id: parse_uuid(&row.book_id)?,
            user_id: parse_uuid(&row.user_id)?,
            body: row.body,
            created_at: parse_ts(&row.created_at)?,
        })
    }
}

#[async_trait]
impl CommentRepositoryPort for SqliteCommentRepository {
    async fn create(&self, comment: &CommentRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO comments (id, book_id, user_id, body, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(comment.id.to_string())
        .bind(comment.book_id.to_string())
        .bind(comment.user_id.to_string())
        .bind(&comment.body)
        .bind(comment.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| map_constraint_err(e, "comment book or user does not resolve"))?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CommentRecord>, RepositoryError> {
        let row: Option<CommentRow> = sqlx::query_as(
            "SELECT id, book_id, user_id, body, created_at FROM comments WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        row.map(CommentRecord::try_from).transpose()
    }

    async fn find_by_book(&self, book_id: Uuid) -> Result<Vec<CommentRecord>, RepositoryError> {
        let rows: Vec<CommentRow> = sqlx::query_as(
            "SELECT id, book_id, user_id, body, created_at FROM comments WHERE book_id = ? ORDER BY created_at",
        )
        .bind(book_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(CommentRecord::try_from).collect()
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("comment {}", id)));
        }
        Ok(())
    }
}
