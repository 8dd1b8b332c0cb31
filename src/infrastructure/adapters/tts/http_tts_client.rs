//! HTTP TTS Client - 调用外部语音合成 HTTP 服务
//!
//! 实现 SynthesizerPort trait，通过 HTTP 调用外部合成服务
//!
//! 外部 TTS API:
//! POST http://localhost:8000/api/tts/synthesize
//! Request: {"text_id": "...", "content": "...", "language": "vi"}  (JSON)
//! Response: {"audio_url": "...", "voice_model": "...", "format": "mp3", "duration_secs": 12.5}

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::ports::{
    SynthesisError, SynthesisOutcome, SynthesisRequest, SynthesizerPort,
};

/// 合成请求体 (JSON)
#[derive(Debug, Serialize)]
struct TtsHttpRequest {
    text_id: String,
    content: String,
    language: String,
}

/// 合成响应体 (JSON)
#[derive(Debug, Deserialize)]
struct TtsHttpResponse {
    audio_url: String,
    voice_model: String,
    format: String,
    duration_secs: Option<f64>,
}

/// HTTP TTS 客户端配置
#[derive(Debug, Clone)]
pub struct HttpTtsClientConfig {
    /// 合成服务基础 URL
    pub base_url: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for HttpTtsClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 120,
        }
    }
}

impl HttpTtsClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// HTTP TTS 客户端
pub struct HttpTtsClient {
    client: Client,
    config: HttpTtsClientConfig,
}

impl HttpTtsClient {
    /// 创建新的 HTTP TTS 客户端
    pub fn new(config: HttpTtsClientConfig) -> Result<Self, SynthesisError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SynthesisError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn synthesize_url(&self) -> String {
        format!("{}/api/tts/synthesize", self.config.base_url)
    }

    fn health_url(&self) -> String {
        format!("{}/health", self.config.base_url)
    }
}

#[async_trait]
impl SynthesizerPort for HttpTtsClient {
    async fn synthesize(
        &self,
        request: SynthesisRequest,
    ) -> Result<SynthesisOutcome, SynthesisError> {
        let http_request = TtsHttpRequest {
            text_id: request.text_id.to_string(),
            content: request.content,
            language: request.language,
        };

        tracing::debug!(
            url = %self.synthesize_url(),
            text_id = %http_request.text_id,
            content_len = http_request.content.len(),
            "Sending synthesis request"
        );

        let response = self
            .client
            .post(&self.synthesize_url())
            .json(&http_request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SynthesisError::Timeout
                } else if e.is_connect() {
                    SynthesisError::NetworkError(format!("Cannot connect to TTS service: {}", e))
                } else {
                    SynthesisError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SynthesisError::EngineFailure(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let body: TtsHttpResponse = response
            .json()
            .await
            .map_err(|e| SynthesisError::InvalidResponse(e.to_string()))?;

        tracing::info!(
            text_id = %http_request.text_id,
            audio_url = %body.audio_url,
            duration_secs = ?body.duration_secs,
            "Synthesis completed"
        );

        Ok(SynthesisOutcome {
            audio_url: body.audio_url,
            voice_model: body.voice_model,
            format: body.format,
            duration_secs: body.duration_secs,
        })
    }

    async fn health_check(&self) -> bool {
        match self
            .client
            .get(&self.health_url())
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = HttpTtsClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.timeout_secs, 120);
    }

    #[test]
    fn test_config_builder() {
        let config = HttpTtsClientConfig::new("http://example.com:9000").with_timeout(60);
        assert_eq!(config.base_url, "http://example.com:9000");
        assert_eq!(config.timeout_secs, 60);
    }
}
