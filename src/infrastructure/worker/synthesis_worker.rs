//! Synthesis Worker - 后台合成任务处理器
//!
//! 从队列消费文本 id，认领 (pending -> processing) 后调用合成引擎，
//! 按结果走 complete / fail 路径。认领失败（已被并发认领或文本已删除）直接跳过

use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::application::commands::handlers::{
    BeginSynthesisHandler, CompleteSynthesisHandler, FailSynthesisHandler,
};
use crate::application::commands::{BeginSynthesis, CompleteSynthesis, FailSynthesis};
use crate::application::error::ApplicationError;
use crate::application::ports::{SynthesisRequest, SynthesizerPort, TextRepositoryPort};

/// Worker 配置
#[derive(Debug, Clone)]
pub struct SynthesisWorkerConfig {
    /// 最大并发合成数
    pub max_concurrent: usize,
}

impl Default for SynthesisWorkerConfig {
    fn default() -> Self {
        Self { max_concurrent: 2 }
    }
}

/// 合成 Worker
pub struct SynthesisWorker {
    config: SynthesisWorkerConfig,
    queue_receiver: mpsc::Receiver<Uuid>,
    text_repo: Arc<dyn TextRepositoryPort>,
    synthesizer: Arc<dyn SynthesizerPort>,
    begin: Arc<BeginSynthesisHandler>,
    complete: Arc<CompleteSynthesisHandler>,
    fail: Arc<FailSynthesisHandler>,
}

impl SynthesisWorker {
    pub fn new(
        config: SynthesisWorkerConfig,
        queue_receiver: mpsc::Receiver<Uuid>,
        text_repo: Arc<dyn TextRepositoryPort>,
        synthesizer: Arc<dyn SynthesizerPort>,
        begin: Arc<BeginSynthesisHandler>,
        complete: Arc<CompleteSynthesisHandler>,
        fail: Arc<FailSynthesisHandler>,
    ) -> Self {
        Self {
            config,
            queue_receiver,
            text_repo,
            synthesizer,
            begin,
            complete,
            fail,
        }
    }

    /// 启动 Worker
    pub async fn run(mut self) {
        tracing::info!(
            max_concurrent = self.config.max_concurrent,
            "SynthesisWorker started"
        );

        // 使用 semaphore 控制并发
        let semaphore = Arc::new(tokio::sync::Semaphore::new(self.config.max_concurrent));

        while let Some(text_id) = self.queue_receiver.recv().await {
            let permit = match semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    tracing::error!("Failed to acquire semaphore permit");
                    continue;
                }
            };

            let text_repo = self.text_repo.clone();
            let synthesizer = self.synthesizer.clone();
            let begin = self.begin.clone();
            let complete = self.complete.clone();
            let fail = self.fail.clone();

            tokio::spawn(async move {
                let _permit = permit; // 持有 permit 直到任务完成

                Self::process_text(text_id, text_repo, synthesizer, begin, complete, fail).await;
            });
        }

        tracing::info!("SynthesisWorker stopped");
    }

    /// 处理单个文本
    async fn process_text(
        text_id: Uuid,
        text_repo: Arc<dyn TextRepositoryPort>,
        synthesizer: Arc<dyn SynthesizerPort>,
        begin: Arc<BeginSynthesisHandler>,
        complete: Arc<CompleteSynthesisHandler>,
        fail: Arc<FailSynthesisHandler>,
    ) {
        // 认领：pending -> processing
        match begin.handle(BeginSynthesis { text_id }).await {
            Ok(()) => {}
            Err(ApplicationError::NotFound { .. }) => {
                tracing::warn!(text_id = %text_id, "Text not found, skipping");
                return;
            }
            Err(ApplicationError::InvalidTransition { from, .. }) => {
                // 已被并发认领或已处理完
                tracing::debug!(text_id = %text_id, from = %from.as_str(), "Text not claimable, skipping");
                return;
            }
            Err(e) => {
                tracing::error!(text_id = %text_id, error = %e, "Failed to claim text");
                return;
            }
        }

        let text = match text_repo.find_by_id(text_id).await {
            Ok(Some(t)) => t,
            Ok(None) => {
                tracing::warn!(text_id = %text_id, "Text removed after claim");
                return;
            }
            Err(e) => {
                tracing::error!(text_id = %text_id, error = %e, "Failed to load text");
                let _ = fail
                    .handle(FailSynthesis {
                        text_id,
                        reason: format!("Database error: {}", e),
                    })
                    .await;
                return;
            }
        };

        let request = SynthesisRequest {
            text_id,
            content: text.content.clone(),
            language: text.language.clone(),
        };

        match synthesizer.synthesize(request).await {
            Ok(outcome) => {
                let result = complete
                    .handle(CompleteSynthesis {
                        text_id,
                        audio_url: outcome.audio_url,
                        voice_model: outcome.voice_model,
                        format: outcome.format,
                        duration_secs: outcome.duration_secs,
                    })
                    .await;

                if let Err(e) = result {
                    tracing::error!(text_id = %text_id, error = %e, "Failed to record completion");
                }
            }
            Err(e) => {
                tracing::warn!(text_id = %text_id, error = %e, "Synthesis failed");
                let result = fail
                    .handle(FailSynthesis {
                        text_id,
                        reason: e.to_string(),
                    })
                    .await;

                if let Err(e) = result {
                    tracing::error!(text_id = %text_id, error = %e, "Failed to record failure");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::commands::SubmitText;
    use crate::application::commands::handlers::SubmitTextHandler;
    use crate::application::key_locks::KeyLocks;
    use crate::application::ports::{
        AudioRepositoryPort, SynthesisQueuePort, UserRecord, UserRepositoryPort,
    };
    use crate::domain::speech::TextStatus;
    use crate::infrastructure::adapters::FakeTtsClient;
    use crate::infrastructure::persistence::sqlite::{
        create_pool, run_migrations, DatabaseConfig, SqliteAudioRepository, SqliteTextRepository,
        SqliteUserRepository,
    };
    use crate::infrastructure::worker::ChannelSynthesisQueue;
    use chrono::Utc;
    use std::time::Duration;

    struct Harness {
        submit: SubmitTextHandler,
        text_repo: Arc<SqliteTextRepository>,
        audio_repo: Arc<SqliteAudioRepository>,
        user_id: Uuid,
    }

    async fn setup(synthesizer: Arc<dyn SynthesizerPort>) -> Harness {
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

        let worker = SynthesisWorker::new(
            SynthesisWorkerConfig { max_concurrent: 1 },
            rx,
            text_repo.clone(),
            synthesizer,
            Arc::new(BeginSynthesisHandler::new(text_repo.clone(), locks.clone())),
            Arc::new(CompleteSynthesisHandler::new(
                text_repo.clone(),
                locks.clone(),
            )),
            Arc::new(FailSynthesisHandler::new(text_repo.clone(), locks)),
        );
        tokio::spawn(worker.run());

        Harness {
            submit: SubmitTextHandler::new(text_repo.clone(), queue),
            text_repo,
            audio_repo,
            user_id: user.id,
        }
    }

    async fn wait_for_terminal(harness: &Harness, text_id: Uuid) -> TextStatus {
        for _ in 0..100 {
            let text = harness
                .text_repo
                .find_by_id(text_id)
                .await
                .unwrap()
                .unwrap();
            if text.status.is_terminal() {
                return text.status;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("text {} never reached a terminal status", text_id);
    }

    #[tokio::test]
    async fn test_worker_completes_submitted_text() {
        let harness = setup(Arc::new(FakeTtsClient::new())).await;

        let submitted = harness
            .submit
            .handle(SubmitText {
                user_id: harness.user_id,
                title: "t".into(),
                content: "xin chào các bạn".into(),
                language: "vi".into(),
                tags: vec![],
            })
            .await
            .unwrap();

        let status = wait_for_terminal(&harness, submitted.id).await;
        assert_eq!(status, TextStatus::Completed);

        let audio = harness
            .audio_repo
            .find_by_text(submitted.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(audio.user_id, harness.user_id);
    }

    #[tokio::test]
    async fn test_worker_records_engine_failure() {
        let harness = setup(Arc::new(FakeTtsClient::failing("voice bank offline"))).await;

        let submitted = harness
            .submit
            .handle(SubmitText {
                user_id: harness.user_id,
                title: "t".into(),
                content: "một hai ba".into(),
                language: "vi".into(),
                tags: vec![],
            })
            .await
            .unwrap();

        let status = wait_for_terminal(&harness, submitted.id).await;
        assert_eq!(status, TextStatus::Failed);

        let text = harness
            .text_repo
            .find_by_id(submitted.id)
            .await
            .unwrap()
            .unwrap();
        assert!(text
            .processing_error
            .unwrap()
            .contains("voice bank offline"));
        assert!(harness
            .audio_repo
            .find_by_text(submitted.id)
            .await
            .unwrap()
            .is_none());
    }
}
