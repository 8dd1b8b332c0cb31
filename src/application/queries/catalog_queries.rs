//! Catalog Queries - 内容图谱读操作

use uuid::Uuid;

/// 读取书籍（含评分聚合与有序章节）
#[derive(Debug, Clone)]
pub struct GetBook {
    pub book_id: Uuid,
}

/// 读取作者（含书单）
#[derive(Debug, Clone)]
pub struct GetAuthor {
    pub author_id: Uuid,
}

/// 读取用户
#[derive(Debug, Clone)]
pub struct GetUser {
    pub user_id: Uuid,
}

/// 书籍的评论列表
#[derive(Debug, Clone)]
pub struct ListBookComments {
    pub book_id: Uuid,
}

/// 书籍的评分列表
#[derive(Debug, Clone)]
pub struct ListBookRatings {
    pub book_id: Uuid,
}
