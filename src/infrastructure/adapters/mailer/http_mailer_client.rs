//! HTTP Mailer Client - 调用外部邮件投递 HTTP 服务
//!
//! 实现 NotifierPort trait
//!
//! 外部 Mail API:
//! POST http://localhost:8025/api/mail/send
//! Request: {"to": "...", "subject": "...", "body": "..."}  (JSON)

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use crate::application::ports::{NotifierPort, NotifyError};

#[derive(Debug, Serialize)]
struct MailHttpRequest {
    to: String,
    subject: String,
    body: String,
}

/// HTTP Mailer 客户端配置
#[derive(Debug, Clone)]
pub struct HttpMailerClientConfig {
    /// 邮件服务基础 URL
    pub base_url: String,
    /// 发信人显示名
    pub sender_name: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for HttpMailerClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8025".to_string(),
            sender_name: "VoBook".to_string(),
            timeout_secs: 10,
        }
    }
}

impl HttpMailerClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }
}

/// HTTP Mailer 客户端
pub struct HttpMailerClient {
    client: Client,
    config: HttpMailerClientConfig,
}

impl HttpMailerClient {
    pub fn new(config: HttpMailerClientConfig) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| NotifyError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn send_url(&self) -> String {
        format!("{}/api/mail/send", self.config.base_url)
    }
}

#[async_trait]
impl NotifierPort for HttpMailerClient {
    async fn send_verification_code(
        &self,
        address: &str,
        code: &str,
    ) -> Result<(), NotifyError> {
        let request = MailHttpRequest {
            to: address.to_string(),
            subject: format!("{} verification code", self.config.sender_name),
            body: format!("Your verification code is {}. It expires in 5 minutes.", code),
        };

        let response = self
            .client
            .post(&self.send_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    NotifyError::Timeout
                } else {
                    NotifyError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        tracing::debug!(to = %address, "Verification mail accepted");
        Ok(())
    }
}
