//! Synthesis Queue Port - 待合成文本队列抽象
//!
//! SubmitText / RetrySynthesis 经此端口向后台 Worker 投递文本 id

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

/// 入队错误
#[derive(Debug, Error)]
pub enum QueueError {
    /// 队列已关闭（Worker 停止）
    #[error("Synthesis queue closed")]
    Closed,

    #[error("Synthesis queue full")]
    Full,
}

/// Synthesis Queue Port
#[async_trait]
pub trait SynthesisQueuePort: Send + Sync {
    /// 投递待合成文本 id
    async fn enqueue(&self, text_id: Uuid) -> Result<(), QueueError>;
}
