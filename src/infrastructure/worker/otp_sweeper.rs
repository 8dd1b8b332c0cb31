//! OTP Sweeper - 过期验证码后台清扫
//!
//! 惰性过期已保证正确性，清扫只负责回收从未被再次访问的记录。
//! 删除按 expires_at 列条件执行，不会触碰仍然有效的记录

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::OtpRepositoryPort;

/// Sweeper 配置
#[derive(Debug, Clone)]
pub struct OtpSweeperConfig {
    /// 清扫间隔（秒）
    pub interval_secs: u64,
}

impl Default for OtpSweeperConfig {
    fn default() -> Self {
        Self { interval_secs: 60 }
    }
}

/// OTP 清扫器
pub struct OtpSweeper {
    config: OtpSweeperConfig,
    otp_repo: Arc<dyn OtpRepositoryPort>,
}

impl OtpSweeper {
    pub fn new(config: OtpSweeperConfig, otp_repo: Arc<dyn OtpRepositoryPort>) -> Self {
        Self { config, otp_repo }
    }

    /// 启动清扫循环；出错记录日志，下个周期重试
    pub async fn run(self) {
        tracing::info!(interval_secs = self.config.interval_secs, "OtpSweeper started");

        let mut ticker = tokio::time::interval(Duration::from_secs(self.config.interval_secs));
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            match self.otp_repo.purge_expired(Utc::now()).await {
                Ok(0) => {}
                Ok(purged) => {
                    tracing::debug!(purged = purged, "Expired OTP records purged");
                }
                Err(e) => {
                    tracing::error!(error = %e, "OTP sweep failed");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::OtpRecord;
    use crate::infrastructure::persistence::sqlite::{
        create_pool, run_migrations, DatabaseConfig, SqliteOtpRepository,
    };
    use chrono::Duration as ChronoDuration;

    #[tokio::test]
    async fn test_sweep_removes_only_expired_records() {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        let repo = Arc::new(SqliteOtpRepository::new(pool));

        let now = Utc::now();
        repo.upsert(&OtpRecord {
            email: "stale@x.com".into(),
            code: "111111".into(),
            issued_at: now - ChronoDuration::seconds(600),
            expires_at: now - ChronoDuration::seconds(300),
        })
        .await
        .unwrap();
        repo.upsert(&OtpRecord {
            email: "live@x.com".into(),
            code: "222222".into(),
            issued_at: now,
            expires_at: now + ChronoDuration::seconds(300),
        })
        .await
        .unwrap();

        // 直接驱动一次清扫逻辑，不等待定时器
        let purged = repo.purge_expired(Utc::now()).await.unwrap();
        assert_eq!(purged, 1);
        assert!(repo.find_by_email("stale@x.com").await.unwrap().is_none());
        assert!(repo.find_by_email("live@x.com").await.unwrap().is_some());
    }
}
