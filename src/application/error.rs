//! 应用层错误定义
//!
//! 统一的命令/查询错误类型。不变量违规一律以类型化错误同步返回，
//! 从不静默修正

use thiserror::Error;
use uuid::Uuid;

use crate::application::ports::RepositoryError;
use crate::domain::catalog::ScoreOutOfRange;
use crate::domain::speech::TextStatus;
use crate::domain::verification::VerifyFailure;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 资源未找到
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    /// 唯一性冲突（用户账号/邮箱）
    #[error("Conflict: {0}")]
    Conflict(String),

    /// 悬空引用（父实体不存在）
    #[error("Dangling reference: {0}")]
    DanglingReference(String),

    /// 资源不属于请求用户
    #[error("Forbidden: {resource} {id} not owned by requester")]
    Forbidden { resource: &'static str, id: Uuid },

    /// 书内章节顺序号已占用
    #[error("Duplicate chapter sequence {sequence_index} in book {book_id}")]
    DuplicateSequence { book_id: Uuid, sequence_index: u32 },

    /// (book, user) 已存在评分
    #[error("Duplicate rating for book {book_id} by user {user_id}")]
    DuplicateRating { book_id: Uuid, user_id: Uuid },

    /// 输入校验失败
    #[error("Validation error: {0}")]
    Validation(String),

    /// 非法状态机迁移
    #[error("Invalid transition: {from} -> {to}")]
    InvalidTransition { from: TextStatus, to: TextStatus },

    /// 显式重试次数耗尽
    #[error("Retry limit exceeded for text {text_id} (max {max_retries})")]
    RetryLimitExceeded { text_id: Uuid, max_retries: u32 },

    /// OTP 已过期
    #[error("Verification code expired")]
    Expired,

    /// OTP 不匹配
    #[error("Verification code mismatch")]
    Mismatch,

    /// 仓储错误
    #[error("Repository error: {0}")]
    Repository(String),

    /// 队列错误
    #[error("Queue error: {0}")]
    Queue(String),

    /// 外部服务错误
    #[error("External service error: {0}")]
    ExternalService(String),
}

impl ApplicationError {
    /// 创建 NotFound 错误
    pub fn not_found(resource: &'static str, id: Uuid) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    /// 创建 NotFound 错误（字符串键，如 OTP 的邮箱）
    pub fn not_found_key(resource: &'static str, key: &str) -> Self {
        Self::NotFound {
            resource,
            id: key.to_string(),
        }
    }

    /// 创建校验错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// 创建 Forbidden 错误
    pub fn forbidden(resource: &'static str, id: Uuid) -> Self {
        Self::Forbidden { resource, id }
    }
}

impl From<RepositoryError> for ApplicationError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(what) => Self::NotFound {
                resource: "entity",
                id: what,
            },
            RepositoryError::Duplicate(what) => Self::Conflict(what),
            RepositoryError::DanglingReference(what) => Self::DanglingReference(what),
            other => Self::Repository(other.to_string()),
        }
    }
}

impl From<ScoreOutOfRange> for ApplicationError {
    fn from(err: ScoreOutOfRange) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<VerifyFailure> for ApplicationError {
    fn from(err: VerifyFailure) -> Self {
        match err {
            VerifyFailure::NotFound => Self::NotFound {
                resource: "otp",
                id: String::new(),
            },
            VerifyFailure::Expired => Self::Expired,
            VerifyFailure::Mismatch => Self::Mismatch,
        }
    }
}
