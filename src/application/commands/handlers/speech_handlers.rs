//! Speech Command Handlers - TTS 流水线状态迁移
//!
//! 所有迁移在仓储层以 compare-and-set 执行（UPDATE ... WHERE status = 期望值），
//! 同一文本上的并发迁移至多一个成功；KeyLocks 再按文本 id 串行化用例本身

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::commands::{
    BeginSynthesis, CompleteSynthesis, DeleteAudio, DeleteText, FailSynthesis, RetrySynthesis,
    SubmitText, UpdateText,
};
use crate::application::error::ApplicationError;
use crate::application::key_locks::KeyLocks;
use crate::application::ports::{
    AudioRecord, AudioRepositoryPort, RepositoryError, SynthesisQueuePort, TextRecord,
    TextRepositoryPort,
};
use crate::domain::speech::{preprocess_content, word_count, TextStatus};

// ============================================================================
// SubmitText
// ============================================================================

/// 提交响应
#[derive(Debug, Clone)]
pub struct SubmitTextResponse {
    pub id: Uuid,
    pub status: TextStatus,
    pub word_count: u32,
}

/// SubmitText Handler
///
/// 预处理内容、统计词数、落库为 pending 并投递给后台 Worker
pub struct SubmitTextHandler {
    text_repo: Arc<dyn TextRepositoryPort>,
    queue: Arc<dyn SynthesisQueuePort>,
}

impl SubmitTextHandler {
    pub fn new(text_repo: Arc<dyn TextRepositoryPort>, queue: Arc<dyn SynthesisQueuePort>) -> Self {
        Self { text_repo, queue }
    }

    pub async fn handle(&self, command: SubmitText) -> Result<SubmitTextResponse, ApplicationError> {
        let content = preprocess_content(&command.content);
        if content.is_empty() {
            return Err(ApplicationError::validation("text content cannot be empty"));
        }

        let words = word_count(&content) as u32;
        let now = Utc::now();
        let text = TextRecord {
            id: Uuid::new_v4(),
            user_id: command.user_id,
            title: command.title,
            content,
            language: command.language,
            tags: command.tags,
            status: TextStatus::Pending,
            processing_error: None,
            word_count: words,
            retry_count: 0,
            created_at: now,
            updated_at: now,
        };

        // user_id 不可解析时仓储返回 DanglingReference
        self.text_repo.create(&text).await?;

        self.queue
            .enqueue(text.id)
            .await
            .map_err(|e| ApplicationError::Queue(e.to_string()))?;

        tracing::info!(
            text_id = %text.id,
            user_id = %text.user_id,
            word_count = words,
            language = %text.language,
            "Text submitted"
        );

        Ok(SubmitTextResponse {
            id: text.id,
            status: TextStatus::Pending,
            word_count: words,
        })
    }
}

// ============================================================================
// BeginSynthesis
// ============================================================================

/// BeginSynthesis Handler - pending -> processing
pub struct BeginSynthesisHandler {
    text_repo: Arc<dyn TextRepositoryPort>,
    locks: Arc<KeyLocks>,
}

impl BeginSynthesisHandler {
    pub fn new(text_repo: Arc<dyn TextRepositoryPort>, locks: Arc<KeyLocks>) -> Self {
        Self { text_repo, locks }
    }

    pub async fn handle(&self, command: BeginSynthesis) -> Result<(), ApplicationError> {
        let _guard = self.locks.acquire(&command.text_id.to_string()).await;

        let hit = self
            .text_repo
            .transition(
                command.text_id,
                TextStatus::Pending,
                TextStatus::Processing,
                None,
            )
            .await?;

        if !hit {
            return Err(transition_rejection(&*self.text_repo, command.text_id, TextStatus::Processing).await);
        }

        tracing::info!(text_id = %command.text_id, "Synthesis started");
        Ok(())
    }
}

// ============================================================================
// CompleteSynthesis
// ============================================================================

/// 完成响应
#[derive(Debug, Clone)]
pub struct CompleteSynthesisResponse {
    pub audio_id: Uuid,
}

/// CompleteSynthesis Handler - processing -> completed
///
/// Audio 的创建与状态迁移在仓储层同一事务内完成，
/// Audio 仅在文本到达 completed 时存在
pub struct CompleteSynthesisHandler {
    text_repo: Arc<dyn TextRepositoryPort>,
    locks: Arc<KeyLocks>,
}

impl CompleteSynthesisHandler {
    pub fn new(text_repo: Arc<dyn TextRepositoryPort>, locks: Arc<KeyLocks>) -> Self {
        Self { text_repo, locks }
    }

    pub async fn handle(
        &self,
        command: CompleteSynthesis,
    ) -> Result<CompleteSynthesisResponse, ApplicationError> {
        let _guard = self.locks.acquire(&command.text_id.to_string()).await;

        let text = self
            .text_repo
            .find_by_id(command.text_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("text", command.text_id))?;

        let audio = AudioRecord {
            id: Uuid::new_v4(),
            text_id: text.id,
            user_id: text.user_id,
            url: command.audio_url,
            voice_model: command.voice_model,
            format: command.format,
            duration_secs: command.duration_secs,
            created_at: Utc::now(),
        };

        let hit = self.text_repo.complete_with_audio(text.id, &audio).await?;
        if !hit {
            return Err(
                transition_rejection(&*self.text_repo, command.text_id, TextStatus::Completed)
                    .await,
            );
        }

        tracing::info!(
            text_id = %text.id,
            audio_id = %audio.id,
            url = %audio.url,
            "Synthesis completed"
        );

        Ok(CompleteSynthesisResponse { audio_id: audio.id })
    }
}

// ============================================================================
// FailSynthesis
// ============================================================================

/// FailSynthesis Handler - processing -> failed
pub struct FailSynthesisHandler {
    text_repo: Arc<dyn TextRepositoryPort>,
    locks: Arc<KeyLocks>,
}

impl FailSynthesisHandler {
    pub fn new(text_repo: Arc<dyn TextRepositoryPort>, locks: Arc<KeyLocks>) -> Self {
        Self { text_repo, locks }
    }

    pub async fn handle(&self, command: FailSynthesis) -> Result<(), ApplicationError> {
        let _guard = self.locks.acquire(&command.text_id.to_string()).await;

        let hit = self
            .text_repo
            .transition(
                command.text_id,
                TextStatus::Processing,
                TextStatus::Failed,
                Some(command.reason.clone()),
            )
            .await?;

        if !hit {
            return Err(
                transition_rejection(&*self.text_repo, command.text_id, TextStatus::Failed).await,
            );
        }

        tracing::warn!(text_id = %command.text_id, reason = %command.reason, "Synthesis failed");
        Ok(())
    }
}

// ============================================================================
// RetrySynthesis
// ============================================================================

/// RetrySynthesis Handler - failed -> pending（调用方显式触发，次数有上限）
pub struct RetrySynthesisHandler {
    text_repo: Arc<dyn TextRepositoryPort>,
    queue: Arc<dyn SynthesisQueuePort>,
    locks: Arc<KeyLocks>,
    max_retries: u32,
}

impl RetrySynthesisHandler {
    pub fn new(
        text_repo: Arc<dyn TextRepositoryPort>,
        queue: Arc<dyn SynthesisQueuePort>,
        locks: Arc<KeyLocks>,
        max_retries: u32,
    ) -> Self {
        Self {
            text_repo,
            queue,
            locks,
            max_retries,
        }
    }

    pub async fn handle(&self, command: RetrySynthesis) -> Result<(), ApplicationError> {
        let _guard = self.locks.acquire(&command.text_id.to_string()).await;

        let hit = self
            .text_repo
            .reopen_for_retry(command.text_id, self.max_retries)
            .await?;

        if !hit {
            // 未命中：区分不存在 / 状态不对 / 次数耗尽
            let text = self
                .text_repo
                .find_by_id(command.text_id)
                .await?
                .ok_or_else(|| ApplicationError::not_found("text", command.text_id))?;
            if text.status != TextStatus::Failed {
                return Err(ApplicationError::InvalidTransition {
                    from: text.status,
                    to: TextStatus::Pending,
                });
            }
            return Err(ApplicationError::RetryLimitExceeded {
                text_id: command.text_id,
                max_retries: self.max_retries,
            });
        }

        self.queue
            .enqueue(command.text_id)
            .await
            .map_err(|e| ApplicationError::Queue(e.to_string()))?;

        tracing::info!(text_id = %command.text_id, "Synthesis retry requested");
        Ok(())
    }
}

// ============================================================================
// DeleteText
// ============================================================================

/// DeleteText Handler - 仅所有者可删除
pub struct DeleteTextHandler {
    text_repo: Arc<dyn TextRepositoryPort>,
}

impl DeleteTextHandler {
    pub fn new(text_repo: Arc<dyn TextRepositoryPort>) -> Self {
        Self { text_repo }
    }

    pub async fn handle(&self, command: DeleteText) -> Result<(), ApplicationError> {
        let text = self
            .text_repo
            .find_by_id(command.text_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("text", command.text_id))?;
        if text.user_id != command.user_id {
            return Err(ApplicationError::forbidden("text", command.text_id));
        }

        self.text_repo
            .delete(command.text_id)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound(_) => {
                    ApplicationError::not_found("text", command.text_id)
                }
                other => other.into(),
            })?;

        tracing::debug!(text_id = %command.text_id, user_id = %command.user_id, "Text deleted");
        Ok(())
    }
}

// ============================================================================
// UpdateText / DeleteAudio
// ============================================================================

/// UpdateText Handler - 编辑待合成文本
///
/// 仅所有者、仅 pending 状态允许编辑；内容重新预处理并重算词数
pub struct UpdateTextHandler {
    text_repo: Arc<dyn TextRepositoryPort>,
    locks: Arc<KeyLocks>,
}

impl UpdateTextHandler {
    pub fn new(text_repo: Arc<dyn TextRepositoryPort>, locks: Arc<KeyLocks>) -> Self {
        Self { text_repo, locks }
    }

    pub async fn handle(&self, command: UpdateText) -> Result<(), ApplicationError> {
        let content = preprocess_content(&command.content);
        if content.is_empty() {
            return Err(ApplicationError::validation("text content cannot be empty"));
        }
        let words = word_count(&content) as u32;

        let _guard = self.locks.acquire(&command.text_id.to_string()).await;

        let text = self
            .text_repo
            .find_by_id(command.text_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("text", command.text_id))?;
        if text.user_id != command.user_id {
            return Err(ApplicationError::forbidden("text", command.text_id));
        }

        let hit = self
            .text_repo
            .update_pending(
                command.text_id,
                &command.title,
                &content,
                &command.tags,
                words,
            )
            .await?;

        if !hit {
            return Err(ApplicationError::validation(format!(
                "text can only be edited while pending (current: {})",
                text.status
            )));
        }

        tracing::info!(text_id = %command.text_id, word_count = words, "Text updated");
        Ok(())
    }
}

/// DeleteAudio Handler - 仅所有者可删除音频产物
pub struct DeleteAudioHandler {
    audio_repo: Arc<dyn AudioRepositoryPort>,
}

impl DeleteAudioHandler {
    pub fn new(audio_repo: Arc<dyn AudioRepositoryPort>) -> Self {
        Self { audio_repo }
    }

    pub async fn handle(&self, command: DeleteAudio) -> Result<(), ApplicationError> {
        let audio = self
            .audio_repo
            .find_by_id(command.audio_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("audio", command.audio_id))?;
        if audio.user_id != command.user_id {
            return Err(ApplicationError::forbidden("audio", command.audio_id));
        }

        self.audio_repo
            .delete(command.audio_id)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound(_) => {
                    ApplicationError::not_found("audio", command.audio_id)
                }
                other => other.into(),
            })?;

        tracing::debug!(audio_id = %command.audio_id, user_id = %command.user_id, "Audio deleted");
        Ok(())
    }
}

/// CAS 未命中时定位拒绝原因：不存在 -> NotFound，否则按实际状态报非法迁移
async fn transition_rejection(
    text_repo: &dyn TextRepositoryPort,
    text_id: Uuid,
    to: TextStatus,
) -> ApplicationError {
    match text_repo.find_by_id(text_id).await {
        Ok(Some(text)) => ApplicationError::InvalidTransition {
            from: text.status,
            to,
        },
        Ok(None) => ApplicationError::not_found("text", text_id),
        Err(e) => e.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::commands::{
        BeginSynthesis, CompleteSynthesis, FailSynthesis, RetrySynthesis, SubmitText,
    };
    use crate::application::ports::{AudioRepositoryPort, UserRecord, UserRepositoryPort};
    use crate::infrastructure::persistence::sqlite::{
        create_pool, run_migrations, DatabaseConfig, SqliteAudioRepository, SqliteTextRepository,
        SqliteUserRepository,
    };
    use crate::infrastructure::worker::ChannelSynthesisQueue;
    use tokio::sync::mpsc;

    struct Fixture {
        submit: SubmitTextHandler,
        begin: BeginSynthesisHandler,
        complete: CompleteSynthesisHandler,
        fail: FailSynthesisHandler,
        retry: RetrySynthesisHandler,
        audio_repo: Arc<SqliteAudioRepository>,
        text_repo: Arc<SqliteTextRepository>,
        user_id: Uuid,
        _rx: mpsc::Receiver<Uuid>,
    }

    async fn setup(max_retries: u32) -> Fixture {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();

        let user_repo = SqliteUserRepository::new(pool.clone());
        let now = Utc::now();
        let user = UserRecord {
            id: Uuid::new_v4(),
            account_name: "u1".into(),
            display_name: "U1".into(),
            email: "u1@x.com".into(),
            password_hash: "hash".into(),
            favorites: vec![],
            created_at: now,
            updated_at: now,
        };
        user_repo.create(&user).await.unwrap();

        let text_repo = Arc::new(SqliteTextRepository::new(pool.clone()));
        let audio_repo = Arc::new(SqliteAudioRepository::new(pool));
        let (tx, rx) = mpsc::channel(16);
        let queue: Arc<dyn SynthesisQueuePort> = Arc::new(ChannelSynthesisQueue::new(tx));
        let locks = Arc::new(KeyLocks::new());

        Fixture {
            submit: SubmitTextHandler::new(text_repo.clone(), queue.clone()),
            begin: BeginSynthesisHandler::new(text_repo.clone(), locks.clone()),
            complete: CompleteSynthesisHandler::new(text_repo.clone(), locks.clone()),
            fail: FailSynthesisHandler::new(text_repo.clone(), locks.clone()),
            retry: RetrySynthesisHandler::new(text_repo.clone(), queue, locks, max_retries),
            audio_repo,
            text_repo,
            user_id: user.id,
            _rx: rx,
        }
    }

    fn submit_cmd(user_id: Uuid) -> SubmitText {
        SubmitText {
            user_id,
            title: "Đoạn văn mẫu".into(),
            content: "Xin chào".into(),
            language: "vi".into(),
            tags: vec!["mẫu".into()],
        }
    }

    #[tokio::test]
    async fn test_full_pipeline_to_completed() {
        let fx = setup(3).await;

        let submitted = fx.submit.handle(submit_cmd(fx.user_id)).await.unwrap();
        assert_eq!(submitted.status, TextStatus::Pending);
        assert_eq!(submitted.word_count, 2);

        fx.begin
            .handle(BeginSynthesis {
                text_id: submitted.id,
            })
            .await
            .unwrap();
        let text = fx.text_repo.find_by_id(submitted.id).await.unwrap().unwrap();
        assert_eq!(text.status, TextStatus::Processing);

        let completed = fx
            .complete
            .handle(CompleteSynthesis {
                text_id: submitted.id,
                audio_url: "s3://bucket/a1.mp3".into(),
                voice_model: "female".into(),
                format: "mp3".into(),
                duration_secs: Some(1.5),
            })
            .await
            .unwrap();

        let text = fx.text_repo.find_by_id(submitted.id).await.unwrap().unwrap();
        assert_eq!(text.status, TextStatus::Completed);

        let audio = fx
            .audio_repo
            .find_by_text(submitted.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(audio.id, completed.audio_id);
        assert_eq!(audio.user_id, fx.user_id);
        assert_eq!(audio.url, "s3://bucket/a1.mp3");
    }

    #[tokio::test]
    async fn test_complete_from_pending_is_invalid() {
        let fx = setup(3).await;
        let submitted = fx.submit.handle(submit_cmd(fx.user_id)).await.unwrap();

        let err = fx
            .complete
            .handle(CompleteSynthesis {
                text_id: submitted.id,
                audio_url: "s3://bucket/a1.mp3".into(),
                voice_model: "female".into(),
                format: "mp3".into(),
                duration_secs: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::InvalidTransition {
                from: TextStatus::Pending,
                to: TextStatus::Completed,
            }
        ));

        // 且未产出 Audio
        assert!(fx
            .audio_repo
            .find_by_text(submitted.id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_begin_twice_rejected() {
        let fx = setup(3).await;
        let submitted = fx.submit.handle(submit_cmd(fx.user_id)).await.unwrap();

        fx.begin
            .handle(BeginSynthesis {
                text_id: submitted.id,
            })
            .await
            .unwrap();
        let err = fx
            .begin
            .handle(BeginSynthesis {
                text_id: submitted.id,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::InvalidTransition {
                from: TextStatus::Processing,
                to: TextStatus::Processing,
            }
        ));
    }

    #[tokio::test]
    async fn test_begin_missing_text_not_found() {
        let fx = setup(3).await;
        let err = fx
            .begin
            .handle(BeginSynthesis {
                text_id: Uuid::new_v4(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_fail_records_reason_without_audio() {
        let fx = setup(3).await;
        let submitted = fx.submit.handle(submit_cmd(fx.user_id)).await.unwrap();
        fx.begin
            .handle(BeginSynthesis {
                text_id: submitted.id,
            })
            .await
            .unwrap();

        fx.fail
            .handle(FailSynthesis {
                text_id: submitted.id,
                reason: "engine unreachable".into(),
            })
            .await
            .unwrap();

        let text = fx.text_repo.find_by_id(submitted.id).await.unwrap().unwrap();
        assert_eq!(text.status, TextStatus::Failed);
        assert_eq!(text.processing_error.as_deref(), Some("engine unreachable"));
        assert!(fx
            .audio_repo
            .find_by_text(submitted.id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_retry_reopens_until_limit() {
        let fx = setup(1).await;
        let submitted = fx.submit.handle(submit_cmd(fx.user_id)).await.unwrap();

        // 第一轮失败后重试成功
        fx.begin
            .handle(BeginSynthesis {
                text_id: submitted.id,
            })
            .await
            .unwrap();
        fx.fail
            .handle(FailSynthesis {
                text_id: submitted.id,
                reason: "boom".into(),
            })
            .await
            .unwrap();
        fx.retry
            .handle(RetrySynthesis {
                text_id: submitted.id,
            })
            .await
            .unwrap();
        let text = fx.text_repo.find_by_id(submitted.id).await.unwrap().unwrap();
        assert_eq!(text.status, TextStatus::Pending);
        assert_eq!(text.retry_count, 1);

        // 第二轮失败后次数耗尽
        fx.begin
            .handle(BeginSynthesis {
                text_id: submitted.id,
            })
            .await
            .unwrap();
        fx.fail
            .handle(FailSynthesis {
                text_id: submitted.id,
                reason: "boom again".into(),
            })
            .await
            .unwrap();
        let err = fx
            .retry
            .handle(RetrySynthesis {
                text_id: submitted.id,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::RetryLimitExceeded { .. }));
    }

    #[tokio::test]
    async fn test_retry_from_pending_is_invalid() {
        let fx = setup(3).await;
        let submitted = fx.submit.handle(submit_cmd(fx.user_id)).await.unwrap();

        let err = fx
            .retry
            .handle(RetrySynthesis {
                text_id: submitted.id,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::InvalidTransition {
                from: TextStatus::Pending,
                to: TextStatus::Pending,
            }
        ));
    }

    #[tokio::test]
    async fn test_submit_dangling_user_rejected() {
        let fx = setup(3).await;
        let err = fx
            .submit
            .handle(submit_cmd(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::DanglingReference(_)));
    }

    #[tokio::test]
    async fn test_update_allowed_only_while_pending() {
        let fx = setup(3).await;
        let submitted = fx.submit.handle(submit_cmd(fx.user_id)).await.unwrap();
        let update = UpdateTextHandler::new(fx.text_repo.clone(), Arc::new(KeyLocks::new()));

        update
            .handle(UpdateText {
                text_id: submitted.id,
                user_id: fx.user_id,
                title: "bản sửa".into(),
                content: "  một   hai ba bốn ".into(),
                tags: vec!["thơ".into()],
            })
            .await
            .unwrap();

        let text = fx.text_repo.find_by_id(submitted.id).await.unwrap().unwrap();
        assert_eq!(text.word_count, 4);
        assert_eq!(text.content, "một hai ba bốn");

        // 进入 processing 后不可再编辑
        fx.begin
            .handle(BeginSynthesis {
                text_id: submitted.id,
            })
            .await
            .unwrap();
        let err = update
            .handle(UpdateText {
                text_id: submitted.id,
                user_id: fx.user_id,
                title: "nữa".into(),
                content: "năm sáu".into(),
                tags: vec![],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Validation(_)));
    }

    #[tokio::test]
    async fn test_mutations_rejected_for_non_owner() {
        let fx = setup(3).await;
        let submitted = fx.submit.handle(submit_cmd(fx.user_id)).await.unwrap();
        let intruder = Uuid::new_v4();

        let update = UpdateTextHandler::new(fx.text_repo.clone(), Arc::new(KeyLocks::new()));
        let err = update
            .handle(UpdateText {
                text_id: submitted.id,
                user_id: intruder,
                title: "chiếm".into(),
                content: "không phải của tôi".into(),
                tags: vec![],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Forbidden { .. }));

        let delete_text = DeleteTextHandler::new(fx.text_repo.clone());
        let err = delete_text
            .handle(DeleteText {
                text_id: submitted.id,
                user_id: intruder,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Forbidden { .. }));

        // 走完流水线产出 Audio，再验证音频删除同样受所有权保护
        fx.begin
            .handle(BeginSynthesis {
                text_id: submitted.id,
            })
            .await
            .unwrap();
        let completed = fx
            .complete
            .handle(CompleteSynthesis {
                text_id: submitted.id,
                audio_url: "s3://bucket/a1.mp3".into(),
                voice_model: "female".into(),
                format: "mp3".into(),
                duration_secs: None,
            })
            .await
            .unwrap();

        let delete_audio = DeleteAudioHandler::new(fx.audio_repo.clone());
        let err = delete_audio
            .handle(DeleteAudio {
                audio_id: completed.audio_id,
                user_id: intruder,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Forbidden { .. }));

        // 文本与音频均未被动过
        let text = fx.text_repo.find_by_id(submitted.id).await.unwrap().unwrap();
        assert_eq!(text.title, "Đoạn văn mẫu");
        assert!(fx
            .audio_repo
            .find_by_id(completed.audio_id)
            .await
            .unwrap()
            .is_some());

        // 所有者本人可以删除
        delete_audio
            .handle(DeleteAudio {
                audio_id: completed.audio_id,
                user_id: fx.user_id,
            })
            .await
            .unwrap();
        delete_text
            .handle(DeleteText {
                text_id: submitted.id,
                user_id: fx.user_id,
            })
            .await
            .unwrap();
        assert!(fx.text_repo.find_by_id(submitted.id).await.unwrap().is_none());
    }
}
