//! Domain Layer - 领域层
//!
//! 包含三个限界上下文:
//! - Catalog Context: 内容图谱（用户/作者/书籍/章节/评论/评分）
//! - Verification Context: 邮箱 OTP 验证
//! - Speech Context: 文本转语音流水线

pub mod catalog;
pub mod speech;
pub mod verification;
