//! Fake TTS Client - 用于测试的合成客户端
//!
//! 不实际调用合成服务，返回固定产物或脚本化的失败

use async_trait::async_trait;

use crate::application::ports::{
    SynthesisError, SynthesisOutcome, SynthesisRequest, SynthesizerPort,
};

/// Fake TTS Client
///
/// 成功时返回按 text_id 拼接的固定产物位置
pub struct FakeTtsClient {
    voice_model: String,
    format: String,
    /// Some 时每次合成都以该原因失败
    failure: Option<String>,
}

impl FakeTtsClient {
    pub fn new() -> Self {
        Self {
            voice_model: "fake-voice-v1".to_string(),
            format: "mp3".to_string(),
            failure: None,
        }
    }

    /// 始终以给定原因失败
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            failure: Some(reason.into()),
            ..Self::new()
        }
    }
}

impl Default for FakeTtsClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SynthesizerPort for FakeTtsClient {
    async fn synthesize(
        &self,
        request: SynthesisRequest,
    ) -> Result<SynthesisOutcome, SynthesisError> {
        if let Some(reason) = &self.failure {
            return Err(SynthesisError::EngineFailure(reason.clone()));
        }

        tracing::debug!(
            text_id = %request.text_id,
            content_len = request.content.len(),
            "FakeTtsClient: returning fixed outcome"
        );

        Ok(SynthesisOutcome {
            audio_url: format!("fake://audio/{}.mp3", request.text_id),
            voice_model: self.voice_model.clone(),
            format: self.format.clone(),
            duration_secs: Some(1.5),
        })
    }

    async fn health_check(&self) -> bool {
        true
    }
}
