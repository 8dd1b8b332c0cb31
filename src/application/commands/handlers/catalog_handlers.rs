//! Catalog Command Handlers

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::commands::{
    AddChapter, AddComment, ChangeRating, CreateAuthor, CreateBook, CreateUser, DeleteAuthor,
    DeleteBook, DeleteChapter, DeleteComment, DeleteUser, RateBook, RemoveRating,
};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    AuthorRecord, AuthorRepositoryPort, BookRecord, BookRepositoryPort, ChapterRecord,
    ChapterRepositoryPort, CommentRecord, CommentRepositoryPort, RatingRecord,
    RatingRepositoryPort, RepositoryError, UserRecord, UserRepositoryPort,
};
use crate::domain::catalog::RatingScore;

// ============================================================================
// CreateUser
// ============================================================================

/// 创建用户响应
#[derive(Debug, Clone)]
pub struct CreateUserResponse {
    pub id: Uuid,
}

/// CreateUser Handler
///
/// 账号与邮箱的唯一性由存储的唯一约束保证，检查与写入原子
pub struct CreateUserHandler {
    user_repo: Arc<dyn UserRepositoryPort>,
}

impl CreateUserHandler {
    pub fn new(user_repo: Arc<dyn UserRepositoryPort>) -> Self {
        Self { user_repo }
    }

    pub async fn handle(&self, command: CreateUser) -> Result<CreateUserResponse, ApplicationError> {
        if command.account_name.trim().is_empty() {
            return Err(ApplicationError::validation("account_name cannot be empty"));
        }
        if !command.email.contains('@') {
            return Err(ApplicationError::validation("invalid email address"));
        }

        let now = Utc::now();
        let user = UserRecord {
            id: Uuid::new_v4(),
            account_name: command.account_name,
            display_name: command.display_name,
            email: command.email,
            password_hash: command.password_hash,
            favorites: command.favorites,
            created_at: now,
            updated_at: now,
        };

        self.user_repo.create(&user).await?;

        tracing::info!(user_id = %user.id, account = %user.account_name, "User created");

        Ok(CreateUserResponse { id: user.id })
    }
}

// ============================================================================
// CreateAuthor
// ============================================================================

/// 创建作者响应
#[derive(Debug, Clone)]
pub struct CreateAuthorResponse {
    pub id: Uuid,
}

/// CreateAuthor Handler
pub struct CreateAuthorHandler {
    author_repo: Arc<dyn AuthorRepositoryPort>,
}

impl CreateAuthorHandler {
    pub fn new(author_repo: Arc<dyn AuthorRepositoryPort>) -> Self {
        Self { author_repo }
    }

    pub async fn handle(
        &self,
        command: CreateAuthor,
    ) -> Result<CreateAuthorResponse, ApplicationError> {
        if command.name.trim().is_empty() {
            return Err(ApplicationError::validation("author name cannot be empty"));
        }

        let author = AuthorRecord {
            id: Uuid::new_v4(),
            name: command.name,
            birthplace: command.birthplace,
            birthdate: command.birthdate,
            biography: command.biography,
            avatar_url: command.avatar_url,
            created_at: Utc::now(),
        };

        self.author_repo.create(&author).await?;

        tracing::info!(author_id = %author.id, name = %author.name, "Author created");

        Ok(CreateAuthorResponse { id: author.id })
    }
}

// ============================================================================
// CreateBook
// ============================================================================

/// 创建书籍响应
#[derive(Debug, Clone)]
pub struct CreateBookResponse {
    pub id: Uuid,
}

/// CreateBook Handler
///
/// author_id 不可解析时返回 DanglingReference
pub struct CreateBookHandler {
    book_repo: Arc<dyn BookRepositoryPort>,
}

impl CreateBookHandler {
    pub fn new(book_repo: Arc<dyn BookRepositoryPort>) -> Self {
        Self { book_repo }
    }

    pub async fn handle(&self, command: CreateBook) -> Result<CreateBookResponse, ApplicationError> {
        if command.title.trim().is_empty() {
            return Err(ApplicationError::validation("book title cannot be empty"));
        }

        let now = Utc::now();
        let book = BookRecord {
            id: Uuid::new_v4(),
            author_id: command.author_id,
            title: command.title,
            description: command.description,
            genres: command.genres,
            cover_url: command.cover_url,
            audio_url: None,
            rating_avg: 0.0,
            rating_count: 0,
            created_at: now,
            updated_at: now,
        };

        self.book_repo.create(&book).await?;

        tracing::info!(book_id = %book.id, author_id = %book.author_id, title = %book.title, "Book created");

        Ok(CreateBookResponse { id: book.id })
    }
}

// ============================================================================
// AddChapter
// ============================================================================

/// 添加章节响应
#[derive(Debug, Clone)]
pub struct AddChapterResponse {
    pub id: Uuid,
}

/// AddChapter Handler
///
/// (book_id, sequence_index) 的唯一性由存储约束保证
pub struct AddChapterHandler {
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
}

impl AddChapterHandler {
    pub fn new(chapter_repo: Arc<dyn ChapterRepositoryPort>) -> Self {
        Self { chapter_repo }
    }

    pub async fn handle(&self, command: AddChapter) -> Result<AddChapterResponse, ApplicationError> {
        let now = Utc::now();
        let chapter = ChapterRecord {
            id: Uuid::new_v4(),
            book_id: command.book_id,
            title: command.title,
            content: command.content,
            audio_url: None,
            sequence_index: command.sequence_index,
            created_at: now,
            updated_at: now,
        };

        self.chapter_repo.create(&chapter).await.map_err(|e| match e {
            RepositoryError::Duplicate(_) => ApplicationError::DuplicateSequence {
                book_id: command.book_id,
                sequence_index: command.sequence_index,
            },
            other => other.into(),
        })?;

        tracing::info!(
            chapter_id = %chapter.id,
            book_id = %chapter.book_id,
            index = chapter.sequence_index,
            "Chapter added"
        );

        Ok(AddChapterResponse { id: chapter.id })
    }
}

// ============================================================================
// AddComment
// ============================================================================

/// 添加评论响应
#[derive(Debug, Clone)]
pub struct AddCommentResponse {
    pub id: Uuid,
}

/// AddComment Handler
pub struct AddCommentHandler {
    comment_repo: Arc<dyn CommentRepositoryPort>,
}

impl AddCommentHandler {
    pub fn new(comment_repo: Arc<dyn CommentRepositoryPort>) -> Self {
        Self { comment_repo }
    }

    pub async fn handle(&self, command: AddComment) -> Result<AddCommentResponse, ApplicationError> {
        if command.body.trim().is_empty() {
            return Err(ApplicationError::validation("comment body cannot be empty"));
        }

        let comment = CommentRecord {
            id: Uuid::new_v4(),
            book_id: command.book_id,
            user_id: command.user_id,
            body: command.body,
            created_at: Utc::now(),
        };

        self.comment_repo.create(&comment).await?;

        tracing::debug!(comment_id = %comment.id, book_id = %comment.book_id, "Comment added");

        Ok(AddCommentResponse { id: comment.id })
    }
}

// ============================================================================
// RateBook / ChangeRating / RemoveRating
// ============================================================================

/// RateBook Handler - 首次评分
///
/// 评分写入与书籍聚合重算在仓储层同一事务内完成
pub struct RateBookHandler {
    rating_repo: Arc<dyn RatingRepositoryPort>,
}

impl RateBookHandler {
    pub fn new(rating_repo: Arc<dyn RatingRepositoryPort>) -> Self {
        Self { rating_repo }
    }

    pub async fn handle(&self, command: RateBook) -> Result<(), ApplicationError> {
        let score = RatingScore::new(command.score)?;

        let rating = RatingRecord {
            id: Uuid::new_v4(),
            book_id: command.book_id,
            user_id: command.user_id,
            score: score.value(),
            created_at: Utc::now(),
        };

        self.rating_repo.create(&rating).await.map_err(|e| match e {
            RepositoryError::Duplicate(_) => ApplicationError::DuplicateRating {
                book_id: command.book_id,
                user_id: command.user_id,
            },
            other => other.into(),
        })?;

        tracing::debug!(
            book_id = %command.book_id,
            user_id = %command.user_id,
            score = score.value(),
            "Book rated"
        );

        Ok(())
    }
}

/// ChangeRating Handler - 覆盖已有评分并重新聚合
pub struct ChangeRatingHandler {
    rating_repo: Arc<dyn RatingRepositoryPort>,
}

impl ChangeRatingHandler {
    pub fn new(rating_repo: Arc<dyn RatingRepositoryPort>) -> Self {
        Self { rating_repo }
    }

    pub async fn handle(&self, command: ChangeRating) -> Result<(), ApplicationError> {
        let score = RatingScore::new(command.score)?;

        self.rating_repo
            .update_score(command.book_id, command.user_id, score.value())
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound(_) => ApplicationError::NotFound {
                    resource: "rating",
                    id: format!("{}/{}", command.book_id, command.user_id),
                },
                other => other.into(),
            })?;

        tracing::debug!(
            book_id = %command.book_id,
            user_id = %command.user_id,
            score = score.value(),
            "Rating changed"
        );

        Ok(())
    }
}

/// RemoveRating Handler
pub struct RemoveRatingHandler {
    rating_repo: Arc<dyn RatingRepositoryPort>,
}

impl RemoveRatingHandler {
    pub fn new(rating_repo: Arc<dyn RatingRepositoryPort>) -> Self {
        Self { rating_repo }
    }

    pub async fn handle(&self, command: RemoveRating) -> Result<(), ApplicationError> {
        self.rating_repo
            .delete(command.book_id, command.user_id)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound(_) => ApplicationError::NotFound {
                    resource: "rating",
                    id: format!("{}/{}", command.book_id, command.user_id),
                },
                other => other.into(),
            })?;

        tracing::debug!(book_id = %command.book_id, user_id = %command.user_id, "Rating removed");

        Ok(())
    }
}

// ============================================================================
// DeleteBook / DeleteChapter / DeleteComment
// ============================================================================

/// 级联删除响应
#[derive(Debug, Clone)]
pub struct DeleteBookResponse {
    pub chapters_removed: u64,
    pub comments_removed: u64,
    pub ratings_removed: u64,
}

/// DeleteBook Handler
///
/// 删除书籍并在同一事务内移除其全部章节、评论、评分；
/// 作者书单为派生查询，书籍删除后自然不再包含该 id
pub struct DeleteBookHandler {
    book_repo: Arc<dyn BookRepositoryPort>,
}

impl DeleteBookHandler {
    pub fn new(book_repo: Arc<dyn BookRepositoryPort>) -> Self {
        Self { book_repo }
    }

    pub async fn handle(&self, command: DeleteBook) -> Result<DeleteBookResponse, ApplicationError> {
        let (chapters, comments, ratings) = self
            .book_repo
            .delete_cascade(command.book_id)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound(_) => {
                    ApplicationError::not_found("book", command.book_id)
                }
                other => other.into(),
            })?;

        tracing::info!(
            book_id = %command.book_id,
            chapters = chapters,
            comments = comments,
            ratings = ratings,
            "Book deleted (cascade)"
        );

        Ok(DeleteBookResponse {
            chapters_removed: chapters,
            comments_removed: comments,
            ratings_removed: ratings,
        })
    }
}

/// DeleteChapter Handler
pub struct DeleteChapterHandler {
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
}

impl DeleteChapterHandler {
    pub fn new(chapter_repo: Arc<dyn ChapterRepositoryPort>) -> Self {
        Self { chapter_repo }
    }

    pub async fn handle(&self, command: DeleteChapter) -> Result<(), ApplicationError> {
        self.chapter_repo
            .delete(command.chapter_id)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound(_) => {
                    ApplicationError::not_found("chapter", command.chapter_id)
                }
                other => other.into(),
            })?;

        tracing::debug!(chapter_id = %command.chapter_id, "Chapter deleted");
        Ok(())
    }
}

/// DeleteComment Handler
pub struct DeleteCommentHandler {
    comment_repo: Arc<dyn CommentRepositoryPort>,
}

impl DeleteCommentHandler {
    pub fn new(comment_repo: Arc<dyn CommentRepositoryPort>) -> Self {
        Self { comment_repo }
    }

    pub async fn handle(&self, command: DeleteComment) -> Result<(), ApplicationError> {
        self.comment_repo
            .delete(command.comment_id)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound(_) => {
                    ApplicationError::not_found("comment", command.comment_id)
                }
                other => other.into(),
            })?;

        tracing::debug!(comment_id = %command.comment_id, "Comment deleted");
        Ok(())
    }
}

/// DeleteUser Handler
///
/// 名下仍有文本、评论或评分时由外键拒绝
pub struct DeleteUserHandler {
    user_repo: Arc<dyn UserRepositoryPort>,
}

impl DeleteUserHandler {
    pub fn new(user_repo: Arc<dyn UserRepositoryPort>) -> Self {
        Self { user_repo }
    }

    pub async fn handle(&self, command: DeleteUser) -> Result<(), ApplicationError> {
        self.user_repo
            .delete(command.user_id)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound(_) => {
                    ApplicationError::not_found("user", command.user_id)
                }
                other => other.into(),
            })?;

        tracing::info!(user_id = %command.user_id, "User deleted");
        Ok(())
    }
}

/// DeleteAuthor Handler
///
/// 名下仍有书籍时由外键拒绝
pub struct DeleteAuthorHandler {
    author_repo: Arc<dyn AuthorRepositoryPort>,
}

impl DeleteAuthorHandler {
    pub fn new(author_repo: Arc<dyn AuthorRepositoryPort>) -> Self {
        Self { author_repo }
    }

    pub async fn handle(&self, command: DeleteAuthor) -> Result<(), ApplicationError> {
        self.author_repo
            .delete(command.author_id)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound(_) => {
                    ApplicationError::not_found("author", command.author_id)
                }
                other => other.into(),
            })?;

        tracing::info!(author_id = %command.author_id, "Author deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::sqlite::{
        create_pool, run_migrations, DatabaseConfig, SqliteAuthorRepository, SqliteBookRepository,
        SqliteChapterRepository, SqliteCommentRepository, SqliteRatingRepository,
        SqliteUserRepository,
    };

    struct Fixture {
        create_user: CreateUserHandler,
        create_author: CreateAuthorHandler,
        create_book: CreateBookHandler,
        add_chapter: AddChapterHandler,
        add_comment: AddCommentHandler,
        rate: RateBookHandler,
        change_rating: ChangeRatingHandler,
        remove_rating: RemoveRatingHandler,
        delete_book: DeleteBookHandler,
        delete_author: DeleteAuthorHandler,
        book_repo: Arc<SqliteBookRepository>,
        chapter_repo: Arc<SqliteChapterRepository>,
        comment_repo: Arc<SqliteCommentRepository>,
        rating_repo: Arc<SqliteRatingRepository>,
    }

    async fn setup() -> Fixture {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();

        let user_repo = Arc::new(SqliteUserRepository::new(pool.clone()));
        let author_repo = Arc::new(SqliteAuthorRepository::new(pool.clone()));
        let book_repo = Arc::new(SqliteBookRepository::new(pool.clone()));
        let chapter_repo = Arc::new(SqliteChapterRepository::new(pool.clone()));
        let comment_repo = Arc::new(SqliteCommentRepository::new(pool.clone()));
        let rating_repo = Arc::new(SqliteRatingRepository::new(pool));

        Fixture {
            create_user: CreateUserHandler::new(user_repo),
            create_author: CreateAuthorHandler::new(author_repo.clone()),
            delete_author: DeleteAuthorHandler::new(author_repo),
            create_book: CreateBookHandler::new(book_repo.clone()),
            add_chapter: AddChapterHandler::new(chapter_repo.clone()),
            add_comment: AddCommentHandler::new(comment_repo.clone()),
            rate: RateBookHandler::new(rating_repo.clone()),
            change_rating: ChangeRatingHandler::new(rating_repo.clone()),
            remove_rating: RemoveRatingHandler::new(rating_repo.clone()),
            delete_book: DeleteBookHandler::new(book_repo.clone()),
            book_repo,
            chapter_repo,
            comment_repo,
            rating_repo,
        }
    }

    fn user_command(n: u32) -> CreateUser {
        CreateUser {
            account_name: format!("user{}", n),
            display_name: format!("User {}", n),
            email: format!("user{}@x.com", n),
            password_hash: "hash".into(),
            favorites: vec![],
        }
    }

    fn author_command(name: &str) -> CreateAuthor {
        CreateAuthor {
            name: name.into(),
            birthplace: None,
            birthdate: None,
            biography: None,
            avatar_url: None,
        }
    }

    fn book_command(author_id: Uuid, title: &str) -> CreateBook {
        CreateBook {
            author_id,
            title: title.into(),
            description: "desc".into(),
            genres: vec!["fantasy".into()],
            cover_url: None,
        }
    }

    async fn seed_book(fixture: &Fixture) -> (Uuid, Uuid) {
        let author = fixture
            .create_author
            .handle(author_command("Nguyễn Nhật Ánh"))
            .await
            .unwrap();
        let book = fixture
            .create_book
            .handle(book_command(author.id, "Mắt Biếc"))
            .await
            .unwrap();
        (author.id, book.id)
    }

    #[tokio::test]
    async fn test_duplicate_user_email_is_conflict() {
        let fixture = setup().await;
        fixture.create_user.handle(user_command(1)).await.unwrap();

        let mut dup = user_command(2);
        dup.email = "user1@x.com".into();
        let err = fixture.create_user.handle(dup).await.unwrap_err();
        assert!(matches!(err, ApplicationError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_book_with_unknown_author_is_dangling() {
        let fixture = setup().await;
        let err = fixture
            .create_book
            .handle(book_command(Uuid::new_v4(), "Orphan"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::DanglingReference(_)));
    }

    #[tokio::test]
    async fn test_duplicate_chapter_sequence_rejected() {
        let fixture = setup().await;
        let (_, book_id) = seed_book(&fixture).await;

        fixture
            .add_chapter
            .handle(AddChapter {
                book_id,
                title: "Chương 1".into(),
                content: "...".into(),
                sequence_index: 1,
            })
            .await
            .unwrap();

        let err = fixture
            .add_chapter
            .handle(AddChapter {
                book_id,
                title: "Chương 1 (lại)".into(),
                content: "...".into(),
                sequence_index: 1,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::DuplicateSequence { sequence_index: 1, .. }
        ));

        // 其他书上同一序号不受影响
        let author2 = fixture
            .create_author
            .handle(author_command("Tô Hoài"))
            .await
            .unwrap();
        let book2 = fixture
            .create_book
            .handle(book_command(author2.id, "Dế Mèn"))
            .await
            .unwrap();
        assert!(fixture
            .add_chapter
            .handle(AddChapter {
                book_id: book2.id,
                title: "Chương 1".into(),
                content: "...".into(),
                sequence_index: 1,
            })
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_comment_requires_existing_user_and_book() {
        let fixture = setup().await;
        let (_, book_id) = seed_book(&fixture).await;

        let err = fixture
            .add_comment
            .handle(AddComment {
                book_id,
                user_id: Uuid::new_v4(),
                body: "hay quá".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::DanglingReference(_)));
    }

    #[tokio::test]
    async fn test_rating_aggregate_read_after_write() {
        let fixture = setup().await;
        let (_, book_id) = seed_book(&fixture).await;
        let u1 = fixture.create_user.handle(user_command(1)).await.unwrap();
        let u2 = fixture.create_user.handle(user_command(2)).await.unwrap();

        fixture
            .rate
            .handle(RateBook { book_id, user_id: u1.id, score: 4 })
            .await
            .unwrap();
        fixture
            .rate
            .handle(RateBook { book_id, user_id: u2.id, score: 2 })
            .await
            .unwrap();

        let book = fixture.book_repo.find_by_id(book_id).await.unwrap().unwrap();
        assert_eq!(book.rating_count, 2);
        assert!((book.rating_avg - 3.0).abs() < f64::EPSILON);

        fixture
            .remove_rating
            .handle(RemoveRating { book_id, user_id: u2.id })
            .await
            .unwrap();
        let book = fixture.book_repo.find_by_id(book_id).await.unwrap().unwrap();
        assert_eq!(book.rating_count, 1);
        assert!((book.rating_avg - 4.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_second_rating_by_same_user_is_duplicate() {
        let fixture = setup().await;
        let (_, book_id) = seed_book(&fixture).await;
        let user = fixture.create_user.handle(user_command(1)).await.unwrap();

        fixture
            .rate
            .handle(RateBook { book_id, user_id: user.id, score: 5 })
            .await
            .unwrap();
        let err = fixture
            .rate
            .handle(RateBook { book_id, user_id: user.id, score: 3 })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::DuplicateRating { .. }));
    }

    #[tokio::test]
    async fn test_change_rating_reaggregates_to_new_score() {
        let fixture = setup().await;
        let (_, book_id) = seed_book(&fixture).await;
        let user = fixture.create_user.handle(user_command(1)).await.unwrap();

        fixture
            .rate
            .handle(RateBook { book_id, user_id: user.id, score: 5 })
            .await
            .unwrap();
        fixture
            .change_rating
            .handle(ChangeRating { book_id, user_id: user.id, score: 2 })
            .await
            .unwrap();

        let book = fixture.book_repo.find_by_id(book_id).await.unwrap().unwrap();
        assert_eq!(book.rating_count, 1);
        assert!((book.rating_avg - 2.0).abs() < f64::EPSILON);

        let stored = fixture
            .rating_repo
            .find_one(book_id, user.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.score, 2);
    }

    #[tokio::test]
    async fn test_score_out_of_range_is_validation_error() {
        let fixture = setup().await;
        let (_, book_id) = seed_book(&fixture).await;
        let user = fixture.create_user.handle(user_command(1)).await.unwrap();

        for score in [0, 6] {
            let err = fixture
                .rate
                .handle(RateBook { book_id, user_id: user.id, score })
                .await
                .unwrap_err();
            assert!(matches!(err, ApplicationError::Validation(_)));
        }
    }

    #[tokio::test]
    async fn test_delete_book_cascades_and_prunes_author_list() {
        let fixture = setup().await;
        let (author_id, book_id) = seed_book(&fixture).await;
        let user = fixture.create_user.handle(user_command(1)).await.unwrap();

        for seq in 1..=2 {
            fixture
                .add_chapter
                .handle(AddChapter {
                    book_id,
                    title: format!("Chương {}", seq),
                    content: "...".into(),
                    sequence_index: seq,
                })
                .await
                .unwrap();
        }
        fixture
            .add_comment
            .handle(AddComment {
                book_id,
                user_id: user.id,
                body: "tuyệt vời".into(),
            })
            .await
            .unwrap();
        fixture
            .rate
            .handle(RateBook { book_id, user_id: user.id, score: 5 })
            .await
            .unwrap();

        let removed = fixture
            .delete_book
            .handle(DeleteBook { book_id })
            .await
            .unwrap();
        assert_eq!(removed.chapters_removed, 2);
        assert_eq!(removed.comments_removed, 1);
        assert_eq!(removed.ratings_removed, 1);

        assert!(fixture.book_repo.find_by_id(book_id).await.unwrap().is_none());
        assert!(fixture.chapter_repo.find_by_book(book_id).await.unwrap().is_empty());
        assert!(fixture.comment_repo.find_by_book(book_id).await.unwrap().is_empty());
        assert!(fixture.rating_repo.find_by_book(book_id).await.unwrap().is_empty());
        assert!(fixture.book_repo.find_by_author(author_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_author_blocked_until_books_removed() {
        let fixture = setup().await;
        let (author_id, book_id) = seed_book(&fixture).await;

        let err = fixture
            .delete_author
            .handle(DeleteAuthor { author_id })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::DanglingReference(_)));

        fixture
            .delete_book
            .handle(DeleteBook { book_id })
            .await
            .unwrap();
        assert!(fixture
            .delete_author
            .handle(DeleteAuthor { author_id })
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_delete_missing_book_is_not_found() {
        let fixture = setup().await;
        let err = fixture
            .delete_book
            .handle(DeleteBook { book_id: Uuid::new_v4() })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound { .. }));
    }
}
