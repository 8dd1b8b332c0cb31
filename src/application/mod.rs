//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（Repositories、Notifier、Synthesizer、SynthesisQueue）
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - key_locks: 同键互斥（同一邮箱/同一文本上的用例串行化）
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod key_locks;
pub mod ports;
pub mod queries;

pub use error::ApplicationError;
pub use key_locks::KeyLocks;
