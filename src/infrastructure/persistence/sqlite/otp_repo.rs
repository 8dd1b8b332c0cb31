//! SQLite OTP Repository
//!
//! 时间戳以 unix 秒存储，过期清扫按 expires_at 列条件删除；
//! 记录身份为 (email, issued_at)，条件删除不会误删并发签发的新记录

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use super::DbPool;
use crate::application::ports::{OtpRecord, OtpRepositoryPort, RepositoryError};

/// SQLite OTP Repository
pub struct SqliteOtpRepository {
    pool: DbPool,
}

impl SqliteOtpRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct OtpRow {
    email: String,
    code: String,
    issued_at: i64,
    expires_at: i64,
}

impl TryFrom<OtpRow> for OtpRecord {
    type Error = RepositoryError;

    fn try_from(row: OtpRow) -> Result<Self, Self::Error> {
        let ts = |secs: i64| {
            DateTime::<Utc>::from_timestamp(secs, 0).ok_or_else(|| {
                RepositoryError::SerializationError(format!("invalid timestamp {}", secs))
            })
        };
        Ok(OtpRecord {
            email: row.email,
            code: row.code,
            issued_at: ts(row.issued_at)?,
            expires_at: ts(row.expires_at)?,
        })
    }
}

#[async_trait]
impl OtpRepositoryPort for SqliteOtpRepository {
    async fn upsert(&self, record: &OtpRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO otp (email, code, issued_at, expires_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(email) DO UPDATE SET
                code = excluded.code,
                issued_at = excluded.issued_at,
                expires_at = excluded.expires_at
            "#,
        )
        .bind(&record.email)
        .bind(&record.code)
        .bind(record.issued_at.timestamp())
        .bind(record.expires_at.timestamp())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<OtpRecord>, RepositoryError> {
        let row: Option<OtpRow> =
            sqlx::query_as("SELECT email, code, issued_at, expires_at FROM otp WHERE email = ?")
                .bind(email)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        row.map(OtpRecord::try_from).transpose()
    }

    async fn delete_issued(
        &self,
        email: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM otp WHERE email = ? AND issued_at = ?")
            .bind(email)
            .bind(issued_at.timestamp())
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM otp WHERE expires_at <= ?")
            .bind(now.timestamp())
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::sqlite::{create_pool, run_migrations, DatabaseConfig};
    use chrono::Duration;

    async fn repo() -> SqliteOtpRepository {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteOtpRepository::new(pool)
    }

    fn record(email: &str, code: &str, ttl_secs: i64) -> OtpRecord {
        let issued_at = Utc::now();
        OtpRecord {
            email: email.into(),
            code: code.into(),
            issued_at,
            expires_at: issued_at + Duration::seconds(ttl_secs),
        }
    }

    #[tokio::test]
    async fn test_upsert_replaces_previous_record() {
        let repo = repo().await;
        repo.upsert(&record("a@x.com", "111111", 300)).await.unwrap();
        repo.upsert(&record("a@x.com", "222222", 300)).await.unwrap();

        let found = repo.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(found.code, "222222");
    }

    #[tokio::test]
    async fn test_delete_issued_is_conditional() {
        let repo = repo().await;
        let old = record("a@x.com", "111111", 300);
        repo.upsert(&old).await.unwrap();

        // 模拟并发签发：记录已被新的 issued_at 取代
        let mut new = record("a@x.com", "222222", 300);
        new.issued_at = old.issued_at + Duration::seconds(10);
        new.expires_at = new.issued_at + Duration::seconds(300);
        repo.upsert(&new).await.unwrap();

        // 以旧身份删除不命中，新记录不丢失
        assert!(!repo.delete_issued("a@x.com", old.issued_at).await.unwrap());
        assert!(repo.find_by_email("a@x.com").await.unwrap().is_some());

        assert!(repo.delete_issued("a@x.com", new.issued_at).await.unwrap());
        assert!(repo.find_by_email("a@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_purge_expired_keeps_live_records() {
        let repo = repo().await;
        repo.upsert(&record("old@x.com", "111111", -10)).await.unwrap();
        repo.upsert(&record("live@x.com", "222222", 300)).await.unwrap();

        let purged = repo.purge_expired(Utc::now()).await.unwrap();
        assert_eq!(purged, 1);
        assert!(repo.find_by_email("old@x.com").await.unwrap().is_none());
        assert!(repo.find_by_email("live@x.com").await.unwrap().is_some());
    }
}
