//! Synthesizer Port - 语音合成引擎抽象
//!
//! 合成由外部服务执行，流水线只依赖"最终报告完成或失败"这一语义。
//! 调用方取消视同失败，经由同一条 fail 路径回报

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

/// 合成错误
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Synthesis failed: {0}")]
    EngineFailure(String),

    /// 调用方在合成期间取消
    #[error("Synthesis cancelled")]
    Cancelled,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// 合成请求
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    pub text_id: Uuid,
    pub content: String,
    /// 语言标签（如 "vi"）
    pub language: String,
}

/// 合成结果
#[derive(Debug, Clone)]
pub struct SynthesisOutcome {
    /// 产物存储位置
    pub audio_url: String,
    pub voice_model: String,
    pub format: String,
    pub duration_secs: Option<f64>,
}

/// Synthesizer Port
#[async_trait]
pub trait SynthesizerPort: Send + Sync {
    /// 合成音频；返回产物位置或失败原因
    async fn synthesize(
        &self,
        request: SynthesisRequest,
    ) -> Result<SynthesisOutcome, SynthesisError>;

    /// 检查合成服务是否可用
    async fn health_check(&self) -> bool {
        true // 默认实现
    }
}
