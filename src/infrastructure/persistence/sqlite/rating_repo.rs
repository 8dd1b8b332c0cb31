//! SQLite Rating Repository
//!
//! 每次评分变更（创建/覆盖/删除）都在同一事务内重算所属书籍的
//! rating_avg / rating_count，聚合读不落后于评分写

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{FromRow, Sqlite, Transaction};
use uuid::Uuid;

use super::convert::{parse_ts, parse_uuid};
use super::database::map_constraint_err;
use super::DbPool;
use crate::application::ports::{RatingRecord, RatingRepositoryPort, RepositoryError};

/// SQLite Rating Repository
pub struct SqliteRatingRepository {
    pool: DbPool,
}

impl SqliteRatingRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// 事务内重算书籍聚合（精确 recompute-on-write）
    async fn reaggregate(
        tx: &mut Transaction<'_, Sqlite>,
        book_id: Uuid,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            UPDATE books SET
                rating_avg = (SELECT COALESCE(AVG(score), 0) FROM ratings WHERE book_id = ?),
                rating_count = (SELECT COUNT(*) FROM ratings WHERE book_id = ?),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(book_id.to_string())
        .bind(book_id.to_string())
        .bind(Utc::now().to_rfc3339())
        .bind(book_id.to_string())
        .execute(&mut **tx)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}

#[derive(FromRow)]
struct RatingRow {
    id: String,
    book_id: String,
    user_id: String,
    score: i64,
    created_at: String,
}

impl TryFrom<RatingRow> for RatingRecord {
    type Error = RepositoryError;

    fn try_from(row: RatingRow) -> Result<Self, Self::Error> {
        Ok(RatingRecord {
            id: parse_uuid(&row.id)?,
            book_id: parse_uuid(&row.book_id)?,
            user_id: parse_uuid(&row.user_id)?,
            score: row.score as u8,
            created_at: parse_ts(&row.created_at)?,
        })
    }
}

#[async_trait]
impl RatingRepositoryPort for SqliteRatingRepository {
    async fn create(&self, rating: &RatingRecord) -> Result<(), RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO ratings (id, book_id, user_id, score, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(rating.id.to_string())
        .bind(rating.book_id.to_string())
        .bind(rating.user_id.to_string())
        .bind(rating.score as i64)
        .bind(rating.created_at.to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(|e| map_constraint_err(e, "rating exists or book/user does not resolve"))?;

        Self::reaggregate(&mut tx, rating.book_id).await?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn update_score(
        &self,
        book_id: Uuid,
        user_id: Uuid,
        score: u8,
    ) -> Result<(), RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        let result = sqlx::query("UPDATE ratings SET score = ? WHERE book_id = ? AND user_id = ?")
            .bind(score as i64)
            .bind(book_id.to_string())
            .bind(user_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!(
                "rating {}/{}",
                book_id, user_id
            )));
        }

        Self::reaggregate(&mut tx, book_id).await?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn delete(&self, book_id: Uuid, user_id: Uuid) -> Result<(), RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        let result = sqlx::query("DELETE FROM ratings WHERE book_id = ? AND user_id = ?")
            .bind(book_id.to_string())
            .bind(user_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!(
                "rating {}/{}",
                book_id, user_id
            )));
        }

        Self::reaggregate(&mut tx, book_id).await?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn find_one(
        &self,
        book_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<RatingRecord>, RepositoryError> {
        let row: Option<RatingRow> = sqlx::query_as(
            "SELECT id, book_id, user_id, score, created_at FROM ratings WHERE book_id = ? AND user_id = ?",
        )
        .bind(book_id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        row.map(RatingRecord::try_from).transpose()
    }

    async fn find_by_book(&self, book_id: Uuid) -> Result<Vec<RatingRecord>, RepositoryError> {
        let rows: Vec<RatingRow> = sqlx::query_as(
            "SELECT id, book_id, user_id, score, created_at FROM ratings WHERE book_id = ? ORDER BY created_at",
        )
        .bind(book_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(RatingRecord::try_from).collect()
    }
}
