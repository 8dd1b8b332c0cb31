//! Speech Context - Text 处理状态机
//!
//! 状态机: pending -> processing -> {completed, failed}
//! failed 可由调用方显式重试回到 pending（有次数上限，不自动）

use serde::{Deserialize, Serialize};

/// 文本处理状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextStatus {
    /// 等待合成
    Pending,
    /// 合成中
    Processing,
    /// 合成完成（已产出 Audio）
    Completed,
    /// 合成失败
    Failed,
}

impl TextStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextStatus::Pending => "pending",
            TextStatus::Processing => "processing",
            TextStatus::Completed => "completed",
            TextStatus::Failed => "failed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(TextStatus::Pending),
            "processing" => Some(TextStatus::Processing),
            "completed" => Some(TextStatus::Completed),
            "failed" => Some(TextStatus::Failed),
            _ => None,
        }
    }

    /// completed 为终态；failed 仅可被显式重试重新打开
    pub fn is_terminal(&self) -> bool {
        matches!(self, TextStatus::Completed | TextStatus::Failed)
    }
}

impl std::fmt::Display for TextStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!TextStatus::Pending.is_terminal());
        assert!(!TextStatus::Processing.is_terminal());
        assert!(TextStatus::Completed.is_terminal());
        assert!(TextStatus::Failed.is_terminal());
    }

    #[test]
    fn test_roundtrip_str() {
        for s in [
            TextStatus::Pending,
            TextStatus::Processing,
            TextStatus::Completed,
            TextStatus::Failed,
        ] {
            assert_eq!(TextStatus::from_str(s.as_str()), Some(s));
        }
        assert_eq!(TextStatus::from_str("ready"), None);
    }
}
