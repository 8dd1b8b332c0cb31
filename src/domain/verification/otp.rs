//! Verification Context - OTP 验证码

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// OTP 默认有效期（秒）
pub const DEFAULT_OTP_TTL_SECS: u64 = 300;

/// 验证失败原因
///
/// 每个邮箱的验证码状态机: Issued -> {Verified, Expired, Superseded}
/// 三个终态；Superseded 由新的签发覆盖旧记录产生
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerifyFailure {
    /// 该邮箱没有待验证的记录（从未签发、已消费或已被清扫）
    #[error("Verification code not found")]
    NotFound,

    /// 记录已过期
    #[error("Verification code expired")]
    Expired,

    /// 提交的验证码与记录不符
    #[error("Verification code mismatch")]
    Mismatch,
}

/// 六位数字验证码
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpCode(String);

impl OtpCode {
    pub const LENGTH: usize = 6;

    /// 随机生成验证码
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        let n: u32 = rng.gen_range(0..1_000_000);
        Self(format!("{:06}", n))
    }

    /// 从存储值还原（不做格式校验，存储层即真相）
    pub fn from_stored(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn matches(&self, submitted: &str) -> bool {
        self.0 == submitted
    }
}

impl std::fmt::Display for OtpCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_six_digits() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let code = OtpCode::generate(&mut rng);
            assert_eq!(code.as_str().len(), OtpCode::LENGTH);
            assert!(code.as_str().chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_matches() {
        let code = OtpCode::from_stored("123456");
        assert!(code.matches("123456"));
        assert!(!code.matches("654321"));
    }
}
