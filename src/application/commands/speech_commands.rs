//! Speech Commands - TTS 流水线写操作

use uuid::Uuid;

/// 提交文本命令（进入 pending）
#[derive(Debug, Clone)]
pub struct SubmitText {
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub language: String,
    pub tags: Vec<String>,
}

/// 开始合成命令（pending -> processing，仅此一条合法边）
#[derive(Debug, Clone)]
pub struct BeginSynthesis {
    pub text_id: Uuid,
}

/// 合成完成命令（processing -> completed，同时产出 Audio）
#[derive(Debug, Clone)]
pub struct CompleteSynthesis {
    pub text_id: Uuid,
    pub audio_url: String,
    pub voice_model: String,
    pub format: String,
    pub duration_secs: Option<f64>,
}

/// 合成失败命令（processing -> failed，记录原因，不产出 Audio）
///
/// 调用方取消合成也走这条路径
#[derive(Debug, Clone)]
pub struct FailSynthesis {
    pub text_id: Uuid,
    pub reason: String,
}

/// 显式重试命令（failed -> pending，次数有上限）
#[derive(Debug, Clone)]
pub struct RetrySynthesis {
    pub text_id: Uuid,
}

/// 删除文本命令（仅所有者可删除）
#[derive(Debug, Clone)]
pub struct DeleteText {
    pub text_id: Uuid,
    pub user_id: Uuid,
}

/// 编辑文本命令（仅所有者、仅 pending 状态允许，重新统计词数）
#[derive(Debug, Clone)]
pub struct UpdateText {
    pub text_id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

/// 删除音频产物命令（仅所有者可删除）
#[derive(Debug, Clone)]
pub struct DeleteAudio {
    pub audio_id: Uuid,
    pub user_id: Uuid,
}
