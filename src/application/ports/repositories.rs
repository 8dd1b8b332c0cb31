//! Repository Ports - 出站端口
//!
//! 定义九个持久化集合的抽象接口
//! (users / authors / books / chapters / comments / ratings / otp / texts / audios)
//! 具体实现在 infrastructure 层（SQLite）
//!
//! 不变量检查（唯一性、悬空引用、重复评分）必须与写入原子地完成，
//! 由实现方通过事务或唯一约束保证，检查结果以类型化错误返回

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::speech::TextStatus;

/// Repository 错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    /// 唯一约束冲突（用户邮箱/账号、(book,user) 评分、(book,index) 章节）
    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    /// 外键不可解析（悬空引用）
    #[error("Dangling reference: {0}")]
    DanglingReference(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

// ============================================================================
// Content Graph - Users / Authors / Books / Chapters / Comments / Ratings
// ============================================================================

/// 用户实体（用于持久化）
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: Uuid,
    /// 登录账号，全局唯一
    pub account_name: String,
    /// 显示名
    pub display_name: String,
    /// 邮箱，全局唯一
    pub email: String,
    pub password_hash: String,
    /// 偏好的体裁标签
    pub favorites: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 作者实体
#[derive(Debug, Clone)]
pub struct AuthorRecord {
    pub id: Uuid,
    pub name: String,
    pub birthplace: Option<String>,
    pub birthdate: Option<DateTime<Utc>>,
    pub biography: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// 书籍实体
///
/// rating_avg / rating_count 为评分聚合，与 ratings 集合的每次变更
/// 在同一事务内重算
#[derive(Debug, Clone)]
pub struct BookRecord {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub description: String,
    pub genres: Vec<String>,
    pub cover_url: Option<String>,
    pub audio_url: Option<String>,
    pub rating_avg: f64,
    pub rating_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 章节实体
#[derive(Debug, Clone)]
pub struct ChapterRecord {
    pub id: Uuid,
    pub book_id: Uuid,
    pub title: String,
    pub content: String,
    pub audio_url: Option<String>,
    /// 书内顺序号，(book_id, sequence_index) 唯一
    pub sequence_index: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 评论实体
#[derive(Debug, Clone)]
pub struct CommentRecord {
    pub id: Uuid,
    pub book_id: Uuid,
    pub user_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// 评分实体，(book_id, user_id) 唯一
#[derive(Debug, Clone)]
pub struct RatingRecord {
    pub id: Uuid,
    pub book_id: Uuid,
    pub user_id: Uuid,
    pub score: u8,
    pub created_at: DateTime<Utc>,
}

/// User Repository Port
#[async_trait]
pub trait UserRepositoryPort: Send + Sync {
    /// 创建用户；account_name 或 email 已存在时返回 Duplicate
    async fn create(&self, user: &UserRecord) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, RepositoryError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepositoryError>;

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
}

/// Author Repository Port
#[async_trait]
pub trait AuthorRepositoryPort: Send + Sync {
    async fn create(&self, author: &AuthorRecord) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AuthorRecord>, RepositoryError>;

    async fn find_all(&self) -> Result<Vec<AuthorRecord>, RepositoryError>;

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
}

/// Book Repository Port
#[async_trait]
pub trait BookRepositoryPort: Send + Sync {
    /// 创建书籍；author_id 不可解析时返回 DanglingReference
    async fn create(&self, book: &BookRecord) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<BookRecord>, RepositoryError>;

    /// 作者书单（按创建时间排序，即作者维护的有序书籍引用）
    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<BookRecord>, RepositoryError>;

    /// 级联删除：同一事务内删除书籍及其全部章节、评论、评分
    ///
    /// 返回被删除的 (chapters, comments, ratings) 数量；书不存在时 NotFound
    async fn delete_cascade(&self, id: Uuid) -> Result<(u64, u64, u64), RepositoryError>;
}

/// Chapter Repository Port
#[async_trait]
pub trait ChapterRepositoryPort: Send + Sync {
    /// 创建章节；book_id 不可解析时 DanglingReference，
    /// (book_id, sequence_index) 已占用时 Duplicate
    async fn create(&self, chapter: &ChapterRecord) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ChapterRecord>, RepositoryError>;

    /// 书籍的全部章节，按 sequence_index 升序
    async fn find_by_book(&self, book_id: Uuid) -> Result<Vec<ChapterRecord>, RepositoryError>;

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
}

/// Comment Repository Port
#[async_trait]
pub trait CommentRepositoryPort: Send + Sync {
    /// 创建评论；book_id 或 user_id 不可解析时 DanglingReference
    async fn create(&self, comment: &CommentRecord) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CommentRecord>, RepositoryError>;

    async fn find_by_book(&self, book_id: Uuid) -> Result<Vec<CommentRecord>, RepositoryError>;

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
}

/// Rating Repository Port
///
/// 所有写操作在同一事务内重算所属书籍的 rating_avg / rating_count，
/// 保证聚合读不落后于评分写（read-after-write）
#[async_trait]
pub trait RatingRepositoryPort: Send + Sync {
    /// 创建评分；(book_id, user_id) 已存在时 Duplicate，
    /// 引用不可解析时 DanglingReference
    async fn create(&self, rating: &RatingRecord) -> Result<(), RepositoryError>;

    /// 覆盖已有评分的分值；记录不存在时 NotFound
    async fn update_score(
        &self,
        book_id: Uuid,
        user_id: Uuid,
        score: u8,
    ) -> Result<(), RepositoryError>;

    /// 删除评分；记录不存在时 NotFound
    async fn delete(&self, book_id: Uuid, user_id: Uuid) -> Result<(), RepositoryError>;

    async fn find_one(
        &self,
        book_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<RatingRecord>, RepositoryError>;

    async fn find_by_book(&self, book_id: Uuid) -> Result<Vec<RatingRecord>, RepositoryError>;
}

// ============================================================================
// OTP
// ============================================================================

/// OTP 记录，以邮箱为键
///
/// issued_at 同时作为记录身份：条件删除以 (email, issued_at) 为准，
/// 避免清扫/验证误删并发签发的新记录
#[derive(Debug, Clone)]
pub struct OtpRecord {
    pub email: String,
    pub code: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl OtpRecord {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// OTP Repository Port
#[async_trait]
pub trait OtpRepositoryPort: Send + Sync {
    /// 写入记录，覆盖该邮箱之前的任何记录（签发即作废旧码）
    async fn upsert(&self, record: &OtpRecord) -> Result<(), RepositoryError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<OtpRecord>, RepositoryError>;

    /// 条件删除：仅当现存记录的 issued_at 与给定值一致时删除
    ///
    /// 返回是否确实删除了记录；false 表示记录已被并发签发取代或已消费
    async fn delete_issued(
        &self,
        email: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<bool, RepositoryError>;

    /// 清除所有 expires_at <= now 的记录，返回清除数量
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError>;
}

// ============================================================================
// Speech - Texts / Audios
// ============================================================================

/// 文本实体
#[derive(Debug, Clone)]
pub struct TextRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub language: String,
    pub tags: Vec<String>,
    pub status: TextStatus,
    /// 最近一次合成失败的原因
    pub processing_error: Option<String>,
    pub word_count: u32,
    /// 已消耗的显式重试次数
    pub retry_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 音频产物实体
///
/// 仅在所属 Text 到达 completed 时创建，与状态迁移同一事务
#[derive(Debug, Clone)]
pub struct AudioRecord {
    pub id: Uuid,
    pub text_id: Uuid,
    pub user_id: Uuid,
    /// 存储位置（如 s3://... 或 firestore://...）
    pub url: String,
    pub voice_model: String,
    pub format: String,
    pub duration_secs: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// Text Repository Port
///
/// 状态迁移使用 compare-and-set：UPDATE ... WHERE status = 期望值，
/// 同一文本上的并发迁移至多一个成功
#[async_trait]
pub trait TextRepositoryPort: Send + Sync {
    /// 创建文本；user_id 不可解析时 DanglingReference
    async fn create(&self, text: &TextRecord) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<TextRecord>, RepositoryError>;

    /// 用户的文本列表，按创建时间倒序分页
    async fn find_by_user(
        &self,
        user_id: Uuid,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<TextRecord>, RepositoryError>;

    /// 编辑文本元数据与内容；仅 pending 状态命中
    async fn update_pending(
        &self,
        id: Uuid,
        title: &str,
        content: &str,
        tags: &[String],
        word_count: u32,
    ) -> Result<bool, RepositoryError>;

    /// 条件状态迁移；返回是否命中（false = 当前状态不是 from）
    async fn transition(
        &self,
        id: Uuid,
        from: TextStatus,
        to: TextStatus,
        processing_error: Option<String>,
    ) -> Result<bool, RepositoryError>;

    /// processing -> completed 并在同一事务内插入 Audio；
    /// 返回是否命中
    async fn complete_with_audio(
        &self,
        id: Uuid,
        audio: &AudioRecord,
    ) -> Result<bool, RepositoryError>;

    /// failed -> pending 的显式重试；retry_count 达到上限时不命中
    async fn reopen_for_retry(&self, id: Uuid, max_retries: u32)
        -> Result<bool, RepositoryError>;

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
}

/// Audio Repository Port
#[async_trait]
pub trait AudioRepositoryPort: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AudioRecord>, RepositoryError>;

    async fn find_by_text(&self, text_id: Uuid) -> Result<Option<AudioRecord>, RepositoryError>;

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<AudioRecord>, RepositoryError>;

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
}
