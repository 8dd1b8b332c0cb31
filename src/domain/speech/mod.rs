//! Speech Context - 文本转语音流水线上下文

mod status;
mod text;

pub use status::TextStatus;
pub use text::{preprocess_content, word_count};
