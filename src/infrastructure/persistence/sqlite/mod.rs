//! SQLite 持久化实现
//!
//! 每个聚合一个 Repository 文件，行结构体 + TryFrom 做记录转换

mod audio_repo;
mod author_repo;
mod book_repo;
mod chapter_repo;
mod comment_repo;
mod convert;
mod database;
mod otp_repo;
mod rating_repo;
mod text_repo;
mod user_repo;

pub use audio_repo::SqliteAudioRepository;
pub use author_repo::SqliteAuthorRepository;
pub use book_repo::SqliteBookRepository;
pub use chapter_repo::SqliteChapterRepository;
pub use comment_repo::SqliteCommentRepository;
pub use database::{create_pool, run_migrations, DatabaseConfig, DbPool};
pub use otp_repo::SqliteOtpRepository;
pub use rating_repo::SqliteRatingRepository;
pub use text_repo::SqliteTextRepository;
pub use user_repo::SqliteUserRepository;
