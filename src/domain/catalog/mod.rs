//! Catalog Context - 内容图谱上下文
//!
//! 用户、作者、书籍、章节、评论、评分之间的引用关系
//! 以及评分聚合的领域规则

mod rating;

pub use rating::{RatingScore, ScoreOutOfRange};
