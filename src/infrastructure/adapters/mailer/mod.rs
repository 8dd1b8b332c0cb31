//! Mailer Adapter - 验证码投递实现

mod fake_mailer_client;
mod http_mailer_client;

pub use fake_mailer_client::FakeMailerClient;
pub use http_mailer_client::{HttpMailerClient, HttpMailerClientConfig};
