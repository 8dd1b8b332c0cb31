//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `VOBOOK_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `VOBOOK_DATABASE__PATH=/data/vobook.db`
/// - `VOBOOK_TTS__URL=http://tts-server:8000`
/// - `VOBOOK_OTP__TTL_SECS=600`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 首先设置默认值（最低优先级）
    builder = builder
        .set_default("database.path", "data/vobook.db")?
        .set_default("database.max_connections", 5)?
        .set_default("tts.url", "http://localhost:8000")?
        .set_default("tts.timeout_secs", 120)?
        .set_default("mailer.url", "http://localhost:8025")?
        .set_default("mailer.sender_name", "VoBook")?
        .set_default("mailer.timeout_secs", 10)?
        .set_default("otp.ttl_secs", 300)?
        .set_default("otp.sweep_interval_secs", 60)?
        .set_default("synthesis.queue_capacity", 256)?
        .set_default("synthesis.max_concurrent", 2)?
        .set_default("synthesis.max_retries", 3)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 添加配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 添加环境变量（最高优先级）
    // 前缀: VOBOOK_，层级分隔符: __ (双下划线)
    builder = builder.add_source(
        Environment::with_prefix("VOBOOK")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::ParseError(format!("Failed to deserialize config: {}", e)))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.database.path.is_empty() {
        return Err(ConfigError::ValidationError(
            "Database path cannot be empty".to_string(),
        ));
    }

    if config.tts.url.is_empty() {
        return Err(ConfigError::ValidationError(
            "TTS URL cannot be empty".to_string(),
        ));
    }

    if config.mailer.url.is_empty() {
        return Err(ConfigError::ValidationError(
            "Mailer URL cannot be empty".to_string(),
        ));
    }

    if config.otp.ttl_secs == 0 {
        return Err(ConfigError::ValidationError(
            "OTP TTL cannot be 0".to_string(),
        ));
    }

    if config.otp.sweep_interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "OTP sweep interval cannot be 0".to_string(),
        ));
    }

    if config.synthesis.queue_capacity == 0 {
        return Err(ConfigError::ValidationError(
            "Synthesis queue capacity cannot be 0".to_string(),
        ));
    }

    if config.synthesis.max_concurrent == 0 {
        return Err(ConfigError::ValidationError(
            "Synthesis concurrency cannot be 0".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Database: {}", config.database.path);
    tracing::info!("Database Max Connections: {}", config.database.max_connections);
    tracing::info!("TTS URL: {}", config.tts.url);
    tracing::info!("TTS Timeout: {}s", config.tts.timeout_secs);
    tracing::info!("Mailer URL: {}", config.mailer.url);
    tracing::info!("OTP TTL: {}s", config.otp.ttl_secs);
    tracing::info!("OTP Sweep Interval: {}s", config.otp.sweep_interval_secs);
    tracing::info!("Synthesis Queue Capacity: {}", config.synthesis.queue_capacity);
    tracing::info!("Synthesis Max Concurrent: {}", config.synthesis.max_concurrent);
    tracing::info!("Synthesis Max Retries: {}", config.synthesis.max_retries);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.database.path, "data/vobook.db");
        assert_eq!(config.otp.ttl_secs, 300);
        assert_eq!(config.synthesis.max_retries, 3);
    }

    #[test]
    fn test_database_url() {
        let config = AppConfig::default();
        assert_eq!(config.database.database_url(), "sqlite:data/vobook.db?mode=rwc");
    }

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_empty_db_path() {
        let mut config = AppConfig::default();
        config.database.path = String::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_ttl() {
        let mut config = AppConfig::default();
        config.otp.ttl_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[database]
path = "/tmp/test.db"

[otp]
ttl_secs = 120
"#,
        )
        .unwrap();

        let config = load_config_from_path(Some(&path)).unwrap();
        assert_eq!(config.database.path, "/tmp/test.db");
        assert_eq!(config.otp.ttl_secs, 120);
        // 未覆盖的键取默认值
        assert_eq!(config.synthesis.max_concurrent, 2);
    }
}
