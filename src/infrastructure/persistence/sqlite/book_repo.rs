//! SQLite Book Repository
//!
//! 级联删除在单个事务内完成：章节、评论、评分与书籍本身一起消失

use async_trait::async_trait;
use sqlx::FromRow;
use uuid::Uuid;

use super::convert::{parse_string_list, parse_ts, parse_uuid, string_list_json};
use super::database::map_constraint_err;
use super::DbPool;
use crate::application::ports::{BookRecord, BookRepositoryPort, RepositoryError};

/// SQLite Book Repository
pub struct SqliteBookRepository {
    pool: DbPool,
}

impl SqliteBookRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct BookRow {
    id: String,
    author_id: String,
    title: String,
    description: String,
    genres: String,
    cover_url: Option<String>,
    audio_url: Option<String>,
    rating_avg: f64,
    rating_count: i64,
    created_at: String,
    updated_at: String,
}

impl TryFrom<BookRow> for BookRecord {
    type Error = RepositoryError;

    fn try_from(row: BookRow) -> Result<Self, Self::Error> {
        Ok(BookRecord {
            id: parse_uuid(&row.id)?,
            author_id: parse_uuid(&row.author_id)?,
            title: row.title,
            description: row.description,
            genres: parse_string_list(&row.genres)?,
            cover_url: row.cover_url,
            audio_url: row.audio_url,
            rating_avg: row.rating_avg,
            rating_count: row.rating_count as u32,
            created_at: parse_ts(&row.created_at)?,
            updated_at: parse_ts(&row.updated_at)?,
        })
    }
}

const SELECT_COLUMNS: &str = "id, author_id, title, description, genres, cover_url, audio_url, rating_avg, rating_count, created_at, updated_at";

#[async_trait]
impl BookRepositoryPort for SqliteBookRepository {
    async fn create(&self, book: &BookRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO books (id, author_id, title, description, genres, cover_url, audio_url, rating_avg, rating_count, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(book.id.to_string())
        .bind(book.author_id.to_string())
        .bind(&book.title)
        .bind(&book.description)
        .bind(string_list_json(&book.genres)?)
        .bind(&book.cover_url)
        .bind(&book.audio_url)
        .bind(book.rating_avg)
        .bind(book.rating_count as i64)
        .bind(book.created_at.to_rfc3339())
        .bind(book.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| map_constraint_err(e, "books.author_id does not resolve"))?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<BookRecord>, RepositoryError> {
        let row: Option<BookRow> =
            sqlx::query_as(&format!("SELECT {} FROM books WHERE id = ?", SELECT_COLUMNS))
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        row.map(BookRecord::try_from).transpose()
    }

    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<BookRecord>, RepositoryError> {
        let rows: Vec<BookRow> = sqlx::query_as(&format!(
            "SELECT {} FROM books WHERE author_id = ? ORDER BY created_at",
            SELECT_COLUMNS
        ))
        .bind(author_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(BookRecord::try_from).collect()
    }

    async fn delete_cascade(&self, id: Uuid) -> Result<(u64, u64, u64), RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        let book_id = id.to_string();

        let chapters = sqlx::query("DELETE FROM chapters WHERE book_id = ?")
            .bind(&book_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?
            .rows_affected();

        let comments = sqlx::query("DELETE FROM comments WHERE book_id = ?")
            .bind(&book_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?
            .rows_affected();

        let ratings = sqlx::query("DELETE FROM ratings WHERE book_id = ?")
            .bind(&book_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?
            .rows_affected();

        let books = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(&book_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?
            .rows_affected();

        if books == 0 {
            // 回滚已删除的子记录
            tx.rollback()
                .await
                .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;
            return Err(RepositoryError::NotFound(format!("book {}", id)));
        }

        tx.commit()
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok((chapters, comments, ratings))
    }
}
