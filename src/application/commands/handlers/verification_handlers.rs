//! Verification Command Handlers - OTP 签发与校验
//!
//! 每个邮箱的状态机: Issued -> {Verified, Expired, Superseded}
//! 同一邮箱上的并发 issue/verify 经 KeyLocks 串行化；
//! 删除一律以 (email, issued_at) 条件执行，不会误删并发签发的新记录

use chrono::{Duration, Utc};
use std::sync::Arc;

use crate::application::commands::{IssueOtp, VerifyOtp};
use crate::application::error::ApplicationError;
use crate::application::key_locks::KeyLocks;
use crate::application::ports::{NotifierPort, OtpRecord, OtpRepositoryPort};
use crate::domain::verification::{OtpCode, VerifyFailure};

/// 签发响应
///
/// delivered=false 表示投递失败；记录仍然有效，
/// 调用方可凭带外获得的验证码完成校验
#[derive(Debug, Clone)]
pub struct IssueOtpResponse {
    pub email: String,
    pub code: String,
    pub expires_at: chrono::DateTime<Utc>,
    pub delivered: bool,
}

/// IssueOtp Handler
pub struct IssueOtpHandler {
    otp_repo: Arc<dyn OtpRepositoryPort>,
    notifier: Arc<dyn NotifierPort>,
    locks: Arc<KeyLocks>,
    ttl_secs: u64,
}

impl IssueOtpHandler {
    pub fn new(
        otp_repo: Arc<dyn OtpRepositoryPort>,
        notifier: Arc<dyn NotifierPort>,
        locks: Arc<KeyLocks>,
        ttl_secs: u64,
    ) -> Self {
        Self {
            otp_repo,
            notifier,
            locks,
            ttl_secs,
        }
    }

    pub async fn handle(&self, command: IssueOtp) -> Result<IssueOtpResponse, ApplicationError> {
        if !command.email.contains('@') {
            return Err(ApplicationError::validation("invalid email address"));
        }

        let _guard = self.locks.acquire(&command.email).await;

        let code = OtpCode::generate(&mut rand::thread_rng());
        let issued_at = Utc::now();
        let record = OtpRecord {
            email: command.email.clone(),
            code: code.as_str().to_string(),
            issued_at,
            expires_at: issued_at + Duration::seconds(self.ttl_secs as i64),
        };

        // 覆盖写：旧的未消费记录被取代 (Superseded)
        self.otp_repo.upsert(&record).await?;

        // 投递失败不回滚已持久化的记录
        let delivered = match self
            .notifier
            .send_verification_code(&record.email, code.as_str())
            .await
        {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(email = %record.email, error = %e, "OTP delivery failed");
                false
            }
        };

        tracing::info!(
            email = %record.email,
            expires_at = %record.expires_at,
            delivered = delivered,
            "OTP issued"
        );

        Ok(IssueOtpResponse {
            email: record.email,
            code: record.code,
            expires_at: record.expires_at,
            delivered,
        })
    }
}

/// VerifyOtp Handler
///
/// 成功即消费（单次使用）；过期在读取时惰性清除
pub struct VerifyOtpHandler {
    otp_repo: Arc<dyn OtpRepositoryPort>,
    locks: Arc<KeyLocks>,
}

impl VerifyOtpHandler {
    pub fn new(otp_repo: Arc<dyn OtpRepositoryPort>, locks: Arc<KeyLocks>) -> Self {
        Self { otp_repo, locks }
    }

    pub async fn handle(&self, command: VerifyOtp) -> Result<(), ApplicationError> {
        let _guard = self.locks.acquire(&command.email).await;

        let record = self
            .otp_repo
            .find_by_email(&command.email)
            .await?
            .ok_or_else(|| ApplicationError::not_found_key("otp", &command.email))?;

        let now = Utc::now();
        if record.is_expired(now) {
            // 惰性过期：观测到即丢弃
            self.otp_repo
                .delete_issued(&record.email, record.issued_at)
                .await?;
            tracing::debug!(email = %record.email, "OTP expired on verify");
            return Err(VerifyFailure::Expired.into());
        }

        if !OtpCode::from_stored(&record.code).matches(&command.code) {
            return Err(VerifyFailure::Mismatch.into());
        }

        // 消费记录；条件删除未命中说明已被并发签发取代
        let consumed = self
            .otp_repo
            .delete_issued(&record.email, record.issued_at)
            .await?;
        if !consumed {
            return Err(ApplicationError::not_found_key("otp", &command.email));
        }

        tracing::info!(email = %record.email, "OTP verified");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::commands::{IssueOtp, VerifyOtp};
    use crate::infrastructure::adapters::FakeMailerClient;
    use crate::infrastructure::persistence::sqlite::{
        create_pool, run_migrations, DatabaseConfig, SqliteOtpRepository,
    };

    async fn setup(
        ttl_secs: u64,
        mailer: Arc<FakeMailerClient>,
    ) -> (IssueOtpHandler, VerifyOtpHandler) {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        let repo = Arc::new(SqliteOtpRepository::new(pool));
        let locks = Arc::new(KeyLocks::new());
        (
            IssueOtpHandler::new(repo.clone(), mailer, locks.clone(), ttl_secs),
            VerifyOtpHandler::new(repo, locks),
        )
    }

    #[tokio::test]
    async fn test_issue_then_verify_succeeds_once() {
        let (issue, verify) = setup(300, Arc::new(FakeMailerClient::new())).await;

        let issued = issue
            .handle(IssueOtp {
                email: "a@x.com".into(),
            })
            .await
            .unwrap();
        assert!(issued.delivered);

        let ok = verify
            .handle(VerifyOtp {
                email: "a@x.com".into(),
                code: issued.code.clone(),
            })
            .await;
        assert!(ok.is_ok());

        // 单次使用：第二次校验同一验证码失败
        let err = verify
            .handle(VerifyOtp {
                email: "a@x.com".into(),
                code: issued.code,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_reissue_supersedes_old_code() {
        let (issue, verify) = setup(300, Arc::new(FakeMailerClient::new())).await;

        let first = issue
            .handle(IssueOtp {
                email: "a@x.com".into(),
            })
            .await
            .unwrap();
        let second = issue
            .handle(IssueOtp {
                email: "a@x.com".into(),
            })
            .await
            .unwrap();

        // 旧码不再可用
        if first.code != second.code {
            let err = verify
                .handle(VerifyOtp {
                    email: "a@x.com".into(),
                    code: first.code,
                })
                .await
                .unwrap_err();
            assert!(matches!(err, ApplicationError::Mismatch));
        }

        // 新码可用
        assert!(verify
            .handle(VerifyOtp {
                email: "a@x.com".into(),
                code: second.code,
            })
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_wrong_code_is_mismatch_and_keeps_record() {
        let (issue, verify) = setup(300, Arc::new(FakeMailerClient::new())).await;

        let issued = issue
            .handle(IssueOtp {
                email: "a@x.com".into(),
            })
            .await
            .unwrap();

        let wrong = if issued.code == "000000" { "111111" } else { "000000" };
        let err = verify
            .handle(VerifyOtp {
                email: "a@x.com".into(),
                code: wrong.into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Mismatch));

        // 记录仍在，正确的码依然可用
        assert!(verify
            .handle(VerifyOtp {
                email: "a@x.com".into(),
                code: issued.code,
            })
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_expired_code_rejected() {
        // TTL 0：签发即过期
        let (issue, verify) = setup(0, Arc::new(FakeMailerClient::new())).await;

        let issued = issue
            .handle(IssueOtp {
                email: "a@x.com".into(),
            })
            .await
            .unwrap();

        let err = verify
            .handle(VerifyOtp {
                email: "a@x.com".into(),
                code: issued.code,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Expired));

        // 过期记录已被惰性清除
        let err = verify
            .handle(VerifyOtp {
                email: "a@x.com".into(),
                code: "123456".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_unknown_email_is_not_found() {
        let (_, verify) = setup(300, Arc::new(FakeMailerClient::new())).await;

        let err = verify
            .handle(VerifyOtp {
                email: "nobody@x.com".into(),
                code: "123456".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delivery_failure_keeps_record_valid() {
        let mailer = Arc::new(FakeMailerClient::failing());
        let (issue, verify) = setup(300, mailer.clone()).await;

        let issued = issue
            .handle(IssueOtp {
                email: "a@x.com".into(),
            })
            .await
            .unwrap();
        assert!(!issued.delivered);

        // 投递失败不影响已持久化的记录
        assert!(verify
            .handle(VerifyOtp {
                email: "a@x.com".into(),
                code: issued.code,
            })
            .await
            .is_ok());
    }
}
