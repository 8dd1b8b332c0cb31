//! Verification Commands - OTP 写操作

/// 签发验证码命令
///
/// 签发即作废该邮箱之前未消费的验证码
#[derive(Debug, Clone)]
pub struct IssueOtp {
    pub email: String,
}

/// 校验验证码命令
#[derive(Debug, Clone)]
pub struct VerifyOtp {
    pub email: String,
    pub code: String,
}
