//! Query Handlers

mod catalog_handlers;
mod speech_handlers;

pub use catalog_handlers::{
    AuthorDetails, BookDetails, GetAuthorHandler, GetBookHandler, GetUserHandler,
    ListBookCommentsHandler, ListBookRatingsHandler,
};
pub use speech_handlers::{
    GetAudioForTextHandler, GetTextHandler, ListUserAudiosHandler, ListUserTextsHandler,
};
