//! Worker Layer - Background Task Processing
//!
//! 后台合成 Worker 与过期 OTP 清扫

mod otp_sweeper;
mod queue;
mod synthesis_worker;

pub use otp_sweeper::{OtpSweeper, OtpSweeperConfig};
pub use queue::ChannelSynthesisQueue;
pub use synthesis_worker::{SynthesisWorker, SynthesisWorkerConfig};
