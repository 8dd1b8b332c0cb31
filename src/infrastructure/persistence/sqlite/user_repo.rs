//! SQLite User Repository

use async_trait::async_trait;
use sqlx::FromRow;
use uuid::Uuid;

use super::convert::{parse_string_list, parse_ts, parse_uuid, string_list_json};
use super::database::map_constraint_err;
use super::DbPool;
use crate::application::ports::{RepositoryError, UserRecord, UserRepositoryPort};

/// SQLite User Repository
pub struct SqliteUserRepository {
    pool: DbPool,
}

impl SqliteUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct UserRow {
    id: String,
    account_name: String,
    display_name: String,
    email: String,
    password_hash: String,
    favorites: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<UserRow> for UserRecord {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(UserRecord {
            id: parse_uuid(&row.id)?,
            account_name: row.account_name,
            display_name: row.display_name,
            email: row.email,
            password_hash: row.password_hash,
            favorites: parse_string_list(&row.favorites)?,
            created_at: parse_ts(&row.created_at)?,
            updated_at: parse_ts(&row.updated_at)?,
        })
    }
}

const SELECT_COLUMNS: &str =
    "id, account_name, display_name, email, password_hash, favorites, created_at, updated_at";

#[async_trait]
impl UserRepositoryPort for SqliteUserRepository {
    async fn create(&self, user: &UserRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, account_name, display_name, email, password_hash, favorites, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.id.to_string())
        .bind(&user.account_name)
        .bind(&user.display_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(string_list_json(&user.favorites)?)
        .bind(user.created_at.to_rfc3339())
        .bind(user.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| map_constraint_err(e, "user account_name or email already taken"))?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, RepositoryError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {} FROM users WHERE id = ?", SELECT_COLUMNS))
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        row.map(UserRecord::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepositoryError> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {} FROM users WHERE email = ?",
            SELECT_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        row.map(UserRecord::try_from).transpose()
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        // 名下还有文本/评论/评分时外键会拒绝删除
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| map_constraint_err(e, "user still referenced by texts or comments"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("user {}", id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::sqlite::{create_pool, run_migrations, DatabaseConfig};
    use chrono::Utc;

    fn sample_user(account: &str, email: &str) -> UserRecord {
        let now = Utc::now();
        UserRecord {
            id: Uuid::new_v4(),
            account_name: account.into(),
            display_name: "Admin User".into(),
            email: email.into(),
            password_hash: "$2b$10$hash".into(),
            favorites: vec!["Khoa Học".into(), "Bí Ẩn".into()],
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        let repo = SqliteUserRepository::new(pool);

        let user = sample_user("admin", "admin@example.com");
        repo.create(&user).await.unwrap();

        let found = repo.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(found.account_name, "admin");
        assert_eq!(found.favorites, user.favorites);

        let by_email = repo.find_by_email("admin@example.com").await.unwrap();
        assert!(by_email.is_some());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        let repo = SqliteUserRepository::new(pool);

        repo.create(&sample_user("a", "same@x.com")).await.unwrap();
        let err = repo
            .create(&sample_user("b", "same@x.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Duplicate(_)));

        // 账号重复同样被拒绝
        let err = repo
            .create(&sample_user("a", "other@x.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Duplicate(_)));
    }
}
