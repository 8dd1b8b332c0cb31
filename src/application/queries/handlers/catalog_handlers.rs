//! Catalog Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{
    AuthorRecord, AuthorRepositoryPort, BookRecord, BookRepositoryPort, ChapterRecord,
    ChapterRepositoryPort, CommentRecord, CommentRepositoryPort, RatingRecord,
    RatingRepositoryPort, UserRecord, UserRepositoryPort,
};
use crate::application::queries::{GetAuthor, GetBook, GetUser, ListBookComments, ListBookRatings};

/// 书籍详情：评分聚合随行，章节按 sequence_index 有序
#[derive(Debug, Clone)]
pub struct BookDetails {
    pub book: BookRecord,
    pub chapters: Vec<ChapterRecord>,
}

/// GetBook Handler
pub struct GetBookHandler {
    book_repo: Arc<dyn BookRepositoryPort>,
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
}

impl GetBookHandler {
    pub fn new(
        book_repo: Arc<dyn BookRepositoryPort>,
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
    ) -> Self {
        Self {
            book_repo,
            chapter_repo,
        }
    }

    pub async fn handle(&self, query: GetBook) -> Result<BookDetails, ApplicationError> {
        let book = self
            .book_repo
            .find_by_id(query.book_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("book", query.book_id))?;
        let chapters = self.chapter_repo.find_by_book(query.book_id).await?;

        Ok(BookDetails { book, chapters })
    }
}

/// 作者详情：书单为派生查询（作者名下书籍的有序集合）
#[derive(Debug, Clone)]
pub struct AuthorDetails {
    pub author: AuthorRecord,
    pub books: Vec<BookRecord>,
}

/// GetAuthor Handler
pub struct GetAuthorHandler {
    author_repo: Arc<dyn AuthorRepositoryPort>,
    book_repo: Arc<dyn BookRepositoryPort>,
}

impl GetAuthorHandler {
    pub fn new(
        author_repo: Arc<dyn AuthorRepositoryPort>,
        book_repo: Arc<dyn BookRepositoryPort>,
    ) -> Self {
        Self {
            author_repo,
            book_repo,
        }
    }

    pub async fn handle(&self, query: GetAuthor) -> Result<AuthorDetails, ApplicationError> {
        let author = self
            .author_repo
            .find_by_id(query.author_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("author", query.author_id))?;
        let books = self.book_repo.find_by_author(query.author_id).await?;

        Ok(AuthorDetails { author, books })
    }
}

/// GetUser Handler
pub struct GetUserHandler {
    user_repo: Arc<dyn UserRepositoryPort>,
}

impl GetUserHandler {
    pub fn new(user_repo: Arc<dyn UserRepositoryPort>) -> Self {
        Self { user_repo }
    }

    pub async fn handle(&self, query: GetUser) -> Result<UserRecord, ApplicationError> {
        self.user_repo
            .find_by_id(query.user_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("user", query.user_id))
    }
}

/// ListBookComments Handler
pub struct ListBookCommentsHandler {
    comment_repo: Arc<dyn CommentRepositoryPort>,
}

impl ListBookCommentsHandler {
    pub fn new(comment_repo: Arc<dyn CommentRepositoryPort>) -> Self {
        Self { comment_repo }
    }

    pub async fn handle(
        &self,
        query: ListBookComments,
    ) -> Result<Vec<CommentRecord>, ApplicationError> {
        Ok(self.comment_repo.find_by_book(query.book_id).await?)
    }
}

/// ListBookRatings Handler
pub struct ListBookRatingsHandler {
    rating_repo: Arc<dyn RatingRepositoryPort>,
}

impl ListBookRatingsHandler {
    pub fn new(rating_repo: Arc<dyn RatingRepositoryPort>) -> Self {
        Self { rating_repo }
    }

    pub async fn handle(
        &self,
        query: ListBookRatings,
    ) -> Result<Vec<RatingRecord>, ApplicationError> {
        Ok(self.rating_repo.find_by_book(query.book_id).await?)
    }
}
