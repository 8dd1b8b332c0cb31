//! Notifier Port - 验证码投递抽象
//!
//! 具体邮件传输在 infrastructure/adapters/mailer 层实现。
//! 投递失败不回滚已持久化的 OTP 记录，仅向调用方报告

use async_trait::async_trait;
use thiserror::Error;

/// 投递错误
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Delivery rejected: {0}")]
    Rejected(String),
}

/// Notifier Port
#[async_trait]
pub trait NotifierPort: Send + Sync {
    /// 向目标邮箱投递验证码
    async fn send_verification_code(&self, address: &str, code: &str)
        -> Result<(), NotifyError>;
}
