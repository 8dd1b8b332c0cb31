//! SQLite Database - 数据库连接和迁移

use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use crate::application::ports::RepositoryError;

/// 数据库配置
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// 数据库文件路径
    pub database_url: String,
    /// 最大连接数
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:./data/vobook.db?mode=rwc".to_string(),
            max_connections: 5,
        }
    }
}

impl DatabaseConfig {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            database_url: format!("sqlite:{}?mode=rwc", path.as_ref().display()),
            max_connections: 5,
        }
    }

    pub fn in_memory() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
        }
    }
}

/// 数据库连接池
pub type DbPool = Pool<Sqlite>;

/// 创建数据库连接池
///
/// WAL 模式允许并发读写；foreign_keys 开启后悬空引用在写入时
/// 由约束原子拒绝；busy_timeout 遇锁等待而不是立即失败
pub async fn create_pool(config: &DatabaseConfig) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(Duration::from_millis(5000))
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await?;

    tracing::info!("SQLite pool created with WAL mode and foreign_keys=ON");

    Ok(pool)
}

/// 把约束冲突映射为类型化仓储错误
///
/// 唯一约束 -> Duplicate，外键约束 -> DanglingReference，
/// 这样检查与写入在同一条语句内原子完成
pub(crate) fn map_constraint_err(e: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return RepositoryError::Duplicate(what.to_string());
        }
        if db.is_foreign_key_violation() {
            return RepositoryError::DanglingReference(what.to_string());
        }
    }
    RepositoryError::DatabaseError(e.to_string())
}

/// 运行数据库迁移
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::Error> {
    // users 表
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            account_name TEXT NOT NULL UNIQUE,
            display_name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            favorites TEXT NOT NULL DEFAULT '[]',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // authors 表
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS authors (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            birthplace TEXT,
            birthdate TEXT,
            biography TEXT,
            avatar_url TEXT,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // books 表（含评分聚合列）
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS books (
            id TEXT PRIMARY KEY,
            author_id TEXT NOT NULL,
            title TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            genres TEXT NOT NULL DEFAULT '[]',
            cover_url TEXT,
            audio_url TEXT,
            rating_avg REAL NOT NULL DEFAULT 0,
            rating_count INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (author_id) REFERENCES authors(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // chapters 表
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS chapters (
            id TEXT PRIMARY KEY,
            book_id TEXT NOT NULL,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            audio_url TEXT,
            sequence_index INTEGER NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (book_id) REFERENCES books(id),
            UNIQUE (book_id, sequence_index)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // comments 表
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS comments (
            id TEXT PRIMARY KEY,
            book_id TEXT NOT NULL,
            user_id TEXT NOT NULL,
            body TEXT NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY (book_id) REFERENCES books(id),
            FOREIGN KEY (user_id) REFERENCES users(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // ratings 表
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS ratings (
            id TEXT PRIMARY KEY,
            book_id TEXT NOT NULL,
            user_id TEXT NOT NULL,
            score INTEGER NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY (book_id) REFERENCES books(id),
            FOREIGN KEY (user_id) REFERENCES users(id),
            UNIQUE (book_id, user_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // otp 表：以邮箱为主键，时间戳为 unix 秒
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS otp (
            email TEXT PRIMARY KEY,
            code TEXT NOT NULL,
            issued_at INTEGER NOT NULL,
            expires_at INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // texts 表
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS texts (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            language TEXT NOT NULL DEFAULT 'vi',
            tags TEXT NOT NULL DEFAULT '[]',
            status TEXT NOT NULL DEFAULT 'pending',
            processing_error TEXT,
            word_count INTEGER NOT NULL DEFAULT 0,
            retry_count INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // audios 表：text_id 唯一，每个文本至多一个产物
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS audios (
            id TEXT PRIMARY KEY,
            text_id TEXT NOT NULL UNIQUE,
            user_id TEXT NOT NULL,
            url TEXT NOT NULL,
            voice_model TEXT NOT NULL,
            format TEXT NOT NULL DEFAULT 'mp3',
            duration_secs REAL,
            created_at TEXT NOT NULL,
            FOREIGN KEY (text_id) REFERENCES texts(id),
            FOREIGN KEY (user_id) REFERENCES users(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // 查询索引
    for stmt in [
        "CREATE INDEX IF NOT EXISTS idx_books_author_id ON books(author_id)",
        "CREATE INDEX IF NOT EXISTS idx_chapters_book_id ON chapters(book_id)",
        "CREATE INDEX IF NOT EXISTS idx_comments_book_id ON comments(book_id)",
        "CREATE INDEX IF NOT EXISTS idx_comments_user_id ON comments(user_id)",
        "CREATE INDEX IF NOT EXISTS idx_ratings_book_id ON ratings(book_id)",
        "CREATE INDEX IF NOT EXISTS idx_ratings_user_id ON ratings(user_id)",
        "CREATE INDEX IF NOT EXISTS idx_otp_expires_at ON otp(expires_at)",
        "CREATE INDEX IF NOT EXISTS idx_texts_user_id ON texts(user_id)",
        "CREATE INDEX IF NOT EXISTS idx_audios_user_id ON audios(user_id)",
    ] {
        sqlx::query(stmt).execute(pool).await?;
    }

    tracing::info!("Database migrations completed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_in_memory_db() {
        let config = DatabaseConfig::in_memory();
        let pool = create_pool(&config).await.unwrap();
        run_migrations(&pool).await.unwrap();
    }

    #[tokio::test]
    async fn test_migrations_idempotent() {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        run_migrations(&pool).await.unwrap();
    }
}
