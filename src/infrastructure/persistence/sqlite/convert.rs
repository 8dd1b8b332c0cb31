//! SQLite 行字段转换
//!
//! uuid/时间戳存 TEXT（rfc3339），标签类列表存 JSON TEXT

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::application::ports::RepositoryError;

pub(crate) fn parse_uuid(s: &str) -> Result<Uuid, RepositoryError> {
    Uuid::parse_str(s).map_err(|e| RepositoryError::SerializationError(e.to_string()))
}

pub(crate) fn parse_ts(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::SerializationError(e.to_string()))
}

pub(crate) fn parse_string_list(s: &str) -> Result<Vec<String>, RepositoryError> {
    serde_json::from_str(s).map_err(|e| RepositoryError::SerializationError(e.to_string()))
}

pub(crate) fn string_list_json(list: &[String]) -> Result<String, RepositoryError> {
    serde_json::to_string(list).map_err(|e| RepositoryError::SerializationError(e.to_string()))
}
