//! Speech Queries - TTS 流水线读操作

use uuid::Uuid;

/// 读取文本
#[derive(Debug, Clone)]
pub struct GetText {
    pub text_id: Uuid,
}

/// 用户文本列表（分页）
#[derive(Debug, Clone)]
pub struct ListUserTexts {
    pub user_id: Uuid,
    pub offset: u32,
    pub limit: u32,
}

/// 按文本读取音频产物
#[derive(Debug, Clone)]
pub struct GetAudioForText {
    pub text_id: Uuid,
}

/// 用户的音频产物列表
#[derive(Debug, Clone)]
pub struct ListUserAudios {
    pub user_id: Uuid,
}
