//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 数据库配置
    #[serde(default)]
    pub database: DatabaseConfig,

    /// TTS 引擎配置
    #[serde(default)]
    pub tts: TtsConfig,

    /// 邮件投递配置
    #[serde(default)]
    pub mailer: MailerConfig,

    /// OTP 配置
    #[serde(default)]
    pub otp: OtpConfig,

    /// 合成流水线配置
    #[serde(default)]
    pub synthesis: SynthesisConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 数据库配置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// 数据库文件路径
    #[serde(default = "default_db_path")]
    pub path: String,

    /// 最大连接数
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> String {
    "data/vobook.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

impl DatabaseConfig {
    /// 获取数据库 URL
    pub fn database_url(&self) -> String {
        format!("sqlite:{}?mode=rwc", self.path)
    }
}

/// TTS 引擎配置
#[derive(Debug, Clone, Deserialize)]
pub struct TtsConfig {
    /// 合成服务基础 URL
    #[serde(default = "default_tts_url")]
    pub url: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_tts_timeout")]
    pub timeout_secs: u64,
}

fn default_tts_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_tts_timeout() -> u64 {
    120
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            url: default_tts_url(),
            timeout_secs: default_tts_timeout(),
        }
    }
}

/// 邮件投递配置
#[derive(Debug, Clone, Deserialize)]
pub struct MailerConfig {
    /// 邮件服务基础 URL
    #[serde(default = "default_mailer_url")]
    pub url: String,

    /// 发信人显示名
    #[serde(default = "default_sender_name")]
    pub sender_name: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_mailer_timeout")]
    pub timeout_secs: u64,
}

fn default_mailer_url() -> String {
    "http://localhost:8025".to_string()
}

fn default_sender_name() -> String {
    "VoBook".to_string()
}

fn default_mailer_timeout() -> u64 {
    10
}

impl Default for MailerConfig {
    fn default() -> Self {
        Self {
            url: default_mailer_url(),
            sender_name: default_sender_name(),
            timeout_secs: default_mailer_timeout(),
        }
    }
}

/// OTP 配置
#[derive(Debug, Clone, Deserialize)]
pub struct OtpConfig {
    /// 验证码有效期（秒）
    #[serde(default = "default_otp_ttl")]
    pub ttl_secs: u64,

    /// 过期记录清扫间隔（秒）
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

fn default_otp_ttl() -> u64 {
    crate::domain::verification::DEFAULT_OTP_TTL_SECS
}

fn default_sweep_interval() -> u64 {
    60
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_otp_ttl(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

/// 合成流水线配置
#[derive(Debug, Clone, Deserialize)]
pub struct SynthesisConfig {
    /// 队列容量
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// 最大并发合成数
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// 每个文本允许的最大显式重试次数
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_queue_capacity() -> usize {
    256
}

fn default_max_concurrent() -> usize {
    2
}

fn default_max_retries() -> u32 {
    3
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
            max_concurrent: default_max_concurrent(),
            max_retries: default_max_retries(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别（trace, debug, info, warn, error）
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否输出 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
