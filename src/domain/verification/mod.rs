//! Verification Context - 邮箱 OTP 验证上下文

mod otp;

pub use otp::{OtpCode, VerifyFailure, DEFAULT_OTP_TTL_SECS};
