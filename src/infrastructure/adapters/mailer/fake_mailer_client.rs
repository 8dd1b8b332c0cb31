//! Fake Mailer Client - 用于测试的邮件客户端
//!
//! 不实际发信，只记录投递过的 (邮箱, 验证码)

use async_trait::async_trait;
use std::sync::Mutex;

use crate::application::ports::{NotifierPort, NotifyError};

/// Fake Mailer Client
pub struct FakeMailerClient {
    fail: bool,
    sent: Mutex<Vec<(String, String)>>,
}

impl FakeMailerClient {
    pub fn new() -> Self {
        Self {
            fail: false,
            sent: Mutex::new(Vec::new()),
        }
    }

    /// 每次投递都失败
    pub fn failing() -> Self {
        Self {
            fail: true,
            sent: Mutex::new(Vec::new()),
        }
    }

    /// 已投递的 (邮箱, 验证码) 列表
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

impl Default for FakeMailerClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotifierPort for FakeMailerClient {
    async fn send_verification_code(
        &self,
        address: &str,
        code: &str,
    ) -> Result<(), NotifyError> {
        if self.fail {
            return Err(NotifyError::Rejected("scripted failure".to_string()));
        }

        if let Ok(mut sent) = self.sent.lock() {
            sent.push((address.to_string(), code.to_string()));
        }
        Ok(())
    }
}
