//! Command Handlers

mod catalog_handlers;
mod speech_handlers;
mod verification_handlers;

pub use catalog_handlers::{
    AddChapterHandler, AddChapterResponse, AddCommentHandler, AddCommentResponse,
    ChangeRatingHandler, CreateAuthorHandler, CreateAuthorResponse, CreateBookHandler,
    CreateBookResponse, CreateUserHandler, CreateUserResponse, DeleteAuthorHandler,
    DeleteBookHandler, DeleteBookResponse, DeleteChapterHandler, DeleteCommentHandler,
    DeleteUserHandler, RateBookHandler, RemoveRatingHandler,
};
pub use speech_handlers::{
    BeginSynthesisHandler, CompleteSynthesisHandler, CompleteSynthesisResponse,
    DeleteAudioHandler, DeleteTextHandler, FailSynthesisHandler, RetrySynthesisHandler,
    SubmitTextHandler, SubmitTextResponse, UpdateTextHandler,
};
pub use verification_handlers::{IssueOtpHandler, IssueOtpResponse, VerifyOtpHandler};
