//! Speech Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{
    AudioRecord, AudioRepositoryPort, TextRecord, TextRepositoryPort,
};
use crate::application::queries::{GetAudioForText, GetText, ListUserAudios, ListUserTexts};

/// GetText Handler
pub struct GetTextHandler {
    text_repo: Arc<dyn TextRepositoryPort>,
}

impl GetTextHandler {
    pub fn new(text_repo: Arc<dyn TextRepositoryPort>) -> Self {
        Self { text_repo }
    }

    pub async fn handle(&self, query: GetText) -> Result<TextRecord, ApplicationError> {
        self.text_repo
            .find_by_id(query.text_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("text", query.text_id))
    }
}

/// ListUserTexts Handler - 按创建时间倒序分页
pub struct ListUserTextsHandler {
    text_repo: Arc<dyn TextRepositoryPort>,
}

impl ListUserTextsHandler {
    pub fn new(text_repo: Arc<dyn TextRepositoryPort>) -> Self {
        Self { text_repo }
    }

    pub async fn handle(&self, query: ListUserTexts) -> Result<Vec<TextRecord>, ApplicationError> {
        Ok(self
            .text_repo
            .find_by_user(query.user_id, query.offset, query.limit)
            .await?)
    }
}

/// GetAudioForText Handler
///
/// 每个 Text 至多一个 Audio；文本未到 completed 时返回 NotFound
pub struct GetAudioForTextHandler {
    audio_repo: Arc<dyn AudioRepositoryPort>,
}

impl GetAudioForTextHandler {
    pub fn new(audio_repo: Arc<dyn AudioRepositoryPort>) -> Self {
        Self { audio_repo }
    }

    pub async fn handle(&self, query: GetAudioForText) -> Result<AudioRecord, ApplicationError> {
        self.audio_repo
            .find_by_text(query.text_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("audio", query.text_id))
    }
}

/// ListUserAudios Handler
pub struct ListUserAudiosHandler {
    audio_repo: Arc<dyn AudioRepositoryPort>,
}

impl ListUserAudiosHandler {
    pub fn new(audio_repo: Arc<dyn AudioRepositoryPort>) -> Self {
        Self { audio_repo }
    }

    pub async fn handle(&self, query: ListUserAudios) -> Result<Vec<AudioRecord>, ApplicationError> {
        Ok(self.audio_repo.find_by_user(query.user_id).await?)
    }
}
