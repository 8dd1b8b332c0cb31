//! VoBook - 多租户有声书平台数据核心
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Catalog Context: 作者/书籍/章节/评论/评分
//! - Speech Context: 文本合成流水线状态机
//! - Verification Context: 邮箱验证码
//!
//! 应用层 (application/):
//! - Ports: 端口定义（Repositories, Notifier, Synthesizer, SynthesisQueue）
//! - Commands: CQRS 命令处理器
//! - Queries: CQRS 查询处理器
//!
//! 基础设施层 (infrastructure/):
//! - Persistence: SQLite 存储
//! - Adapters: TTS Client, Mailer Client
//! - Worker: SynthesisWorker 后台合成 + OtpSweeper 过期清扫

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
