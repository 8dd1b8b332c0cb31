//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod notifier;
mod repositories;
mod synthesis_queue;
mod synthesizer;

pub use notifier::{NotifierPort, NotifyError};
pub use repositories::{
    AudioRecord, AudioRepositoryPort, AuthorRecord, AuthorRepositoryPort, BookRecord,
    BookRepositoryPort, ChapterRecord, ChapterRepositoryPort, CommentRecord,
    CommentRepositoryPort, OtpRecord, OtpRepositoryPort, RatingRecord, RatingRepositoryPort,
    RepositoryError, TextRecord, TextRepositoryPort, UserRecord, UserRepositoryPort,
};
pub use synthesis_queue::{QueueError, SynthesisQueuePort};
pub use synthesizer::{SynthesisError, SynthesisOutcome, SynthesisRequest, SynthesizerPort};
