//! Catalog Commands - 内容图谱写操作

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// 创建用户命令
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub account_name: String,
    pub display_name: String,
    pub email: String,
    pub password_hash: String,
    pub favorites: Vec<String>,
}

/// 创建作者命令
#[derive(Debug, Clone)]
pub struct CreateAuthor {
    pub name: String,
    pub birthplace: Option<String>,
    pub birthdate: Option<DateTime<Utc>>,
    pub biography: Option<String>,
    pub avatar_url: Option<String>,
}

/// 创建书籍命令
#[derive(Debug, Clone)]
pub struct CreateBook {
    pub author_id: Uuid,
    pub title: String,
    pub description: String,
    pub genres: Vec<String>,
    pub cover_url: Option<String>,
}

/// 添加章节命令
#[derive(Debug, Clone)]
pub struct AddChapter {
    pub book_id: Uuid,
    pub title: String,
    pub content: String,
    pub sequence_index: u32,
}

/// 添加评论命令
#[derive(Debug, Clone)]
pub struct AddComment {
    pub book_id: Uuid,
    pub user_id: Uuid,
    pub body: String,
}

/// 评分命令（首次评分）
#[derive(Debug, Clone)]
pub struct RateBook {
    pub book_id: Uuid,
    pub user_id: Uuid,
    pub score: i64,
}

/// 修改已有评分命令
#[derive(Debug, Clone)]
pub struct ChangeRating {
    pub book_id: Uuid,
    pub user_id: Uuid,
    pub score: i64,
}

/// 撤销评分命令
#[derive(Debug, Clone)]
pub struct RemoveRating {
    pub book_id: Uuid,
    pub user_id: Uuid,
}

/// 删除书籍命令（级联删除章节/评论/评分）
#[derive(Debug, Clone)]
pub struct DeleteBook {
    pub book_id: Uuid,
}

/// 删除章节命令
#[derive(Debug, Clone)]
pub struct DeleteChapter {
    pub chapter_id: Uuid,
}

/// 删除评论命令
#[derive(Debug, Clone)]
pub struct DeleteComment {
    pub comment_id: Uuid,
}

/// 删除用户命令
#[derive(Debug, Clone)]
pub struct DeleteUser {
    pub user_id: Uuid,
}

/// 删除作者命令
#[derive(Debug, Clone)]
pub struct DeleteAuthor {
    pub author_id: Uuid,
}
