//! VoBook - 多租户有声书平台数据核心
//!
//! 启动后台合成 Worker 与 OTP 清扫器，等待 Ctrl-C 退出

use std::sync::Arc;

use tokio::sync::mpsc;
use vobook::application::commands::handlers::{
    BeginSynthesisHandler, CompleteSynthesisHandler, FailSynthesisHandler, IssueOtpHandler,
    VerifyOtpHandler,
};
use vobook::application::KeyLocks;
use vobook::config::{load_config, print_config};
use vobook::infrastructure::adapters::{
    HttpMailerClient, HttpMailerClientConfig, HttpTtsClient, HttpTtsClientConfig,
};
use vobook::infrastructure::persistence::sqlite::{
    create_pool, run_migrations, DatabaseConfig, SqliteOtpRepository, SqliteTextRepository,
};
use vobook::infrastructure::worker::{
    OtpSweeper, OtpSweeperConfig, SynthesisWorker, SynthesisWorkerConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!("{},vobook={}", config.log.level, config.log.level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .init();

    tracing::info!("VoBook - 有声书平台数据核心");
    print_config(&config);

    // 确保数据目录存在
    if let Some(parent) = std::path::Path::new(&config.database.path).parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    // 初始化数据库
    let db_config = DatabaseConfig {
        database_url: config.database.database_url(),
        max_connections: config.database.max_connections,
    };
    let pool = create_pool(&db_config).await?;
    run_migrations(&pool).await?;

    // 创建 Repository 适配器
    let text_repo = Arc::new(SqliteTextRepository::new(pool.clone()));
    let otp_repo = Arc::new(SqliteOtpRepository::new(pool.clone()));

    // 创建外部服务客户端
    let tts_config =
        HttpTtsClientConfig::new(config.tts.url.clone()).with_timeout(config.tts.timeout_secs);
    let synthesizer = Arc::new(HttpTtsClient::new(tts_config)?);

    let mailer_config = HttpMailerClientConfig {
        base_url: config.mailer.url.clone(),
        sender_name: config.mailer.sender_name.clone(),
        timeout_secs: config.mailer.timeout_secs,
    };
    let mailer = Arc::new(HttpMailerClient::new(mailer_config)?);

    // 创建合成队列与 Worker
    let (queue_tx, queue_rx) = mpsc::channel(config.synthesis.queue_capacity);
    let locks = Arc::new(KeyLocks::new());

    // OTP 用例处理器，与 queue_tx 一起移交给接入面
    let issue_otp = Arc::new(IssueOtpHandler::new(
        otp_repo.clone(),
        mailer,
        locks.clone(),
        config.otp.ttl_secs,
    ));
    let verify_otp = Arc::new(VerifyOtpHandler::new(otp_repo.clone(), locks.clone()));

    let worker = SynthesisWorker::new(
        SynthesisWorkerConfig {
            max_concurrent: config.synthesis.max_concurrent,
        },
        queue_rx,
        text_repo.clone(),
        synthesizer,
        Arc::new(BeginSynthesisHandler::new(text_repo.clone(), locks.clone())),
        Arc::new(CompleteSynthesisHandler::new(
            text_repo.clone(),
            locks.clone(),
        )),
        Arc::new(FailSynthesisHandler::new(text_repo.clone(), locks.clone())),
    );
    tokio::spawn(worker.run());

    // 启动 OTP 清扫器
    let sweeper = OtpSweeper::new(
        OtpSweeperConfig {
            interval_secs: config.otp.sweep_interval_secs,
        },
        otp_repo,
    );
    tokio::spawn(sweeper.run());

    // queue_tx 与 OTP 处理器移交给上层接入面（HTTP 等）；
    // 当前进程保持 Worker 存活直到 Ctrl-C
    let _queue_tx = queue_tx;
    let _otp_handlers = (issue_otp, verify_otp);

    tracing::info!("VoBook started, press Ctrl-C to stop");
    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");

    Ok(())
}
