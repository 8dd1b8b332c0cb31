//! SQLite Author Repository

use async_trait::async_trait;
use sqlx::FromRow;
use uuid::Uuid;

use super::convert::{parse_ts, parse_uuid};
use super::database::map_constraint_err;
use super::DbPool;
use crate::application::ports::{AuthorRecord, AuthorRepositoryPort, RepositoryError};

/// SQLite Author Repository
pub struct SqliteAuthorRepository {
    pool: DbPool,
}

impl SqliteAuthorRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct AuthorRow {
    id: String,
    name: String,
    birthplace: Option<String>,
    birthdate: Option<String>,
    biography: Option<String>,
    avatar_url: Option<String>,
    created_at: String,
}

impl TryFrom<AuthorRow> for AuthorRecord {
    type Error = RepositoryError;

    fn try_from(row: AuthorRow) -> Result<Self, Self::Error> {
        Ok(AuthorRecord {
            id: parse_uuid(&row.id)?,
            name: row.name,
            birthplace: row.birthplace,
            birthdate: row.birthdate.as_deref().map(parse_ts).transpose()?,
            biography: row.biography,
            avatar_url: row.avatar_url,
            created_at: parse_ts(&row.created_at)?,
        })
    }
}

#[async_trait]
impl AuthorRepositoryPort for SqliteAuthorRepository {
    async fn create(&self, author: &AuthorRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO authors (id, name, birthplace, birthdate, biography, avatar_url, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(author.id.to_string())
        .bind(&author.name)
        .bind(&author.birthplace)
        .bind(author.birthdate.map(|d| d.to_rfc3339()))
        .bind(&author.biography)
        .bind(&author.avatar_url)
        .bind(author.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AuthorRecord>, RepositoryError> {
        let row: Option<AuthorRow> = sqlx::query_as(
            "SELECT id, name, birthplace, birthdate, biography, avatar_url, created_at FROM authors WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        row.map(AuthorRecord::try_from).transpose()
    }

    async fn find_all(&self) -> Result<Vec<AuthorRecord>, RepositoryError> {
        let rows: Vec<AuthorRow> = sqlx::query_as(
            "SELECT id, name, birthplace, birthdate, biography, avatar_url, created_at FROM authors ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(AuthorRecord::try_from).collect()
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        // 名下还有书籍时外键会拒绝删除
        let result = sqlx::query("DELETE FROM authors WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| map_constraint_err(e, "author still referenced by books"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("author {}", id)));
        }
        Ok(())
    }
}
