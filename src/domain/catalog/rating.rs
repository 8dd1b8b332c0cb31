//! Catalog Context - Rating 值对象

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 评分越界错误
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Rating score must be within 1..=5, got {0}")]
pub struct ScoreOutOfRange(pub i64);

/// 评分值
///
/// 不变量: 取值范围 [1, 5]，构造时校验
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingScore(u8);

impl RatingScore {
    pub fn new(score: i64) -> Result<Self, ScoreOutOfRange> {
        if !(1..=5).contains(&score) {
            return Err(ScoreOutOfRange(score));
        }
        Ok(Self(score as u8))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for RatingScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_boundaries() {
        assert!(RatingScore::new(1).is_ok());
        assert!(RatingScore::new(5).is_ok());
        assert_eq!(RatingScore::new(0), Err(ScoreOutOfRange(0)));
        assert_eq!(RatingScore::new(6), Err(ScoreOutOfRange(6)));
        assert_eq!(RatingScore::new(-3), Err(ScoreOutOfRange(-3)));
    }
}
