//! 基础设施层
//!
//! 持久化、外部服务适配器与后台 Worker

pub mod adapters;
pub mod persistence;
pub mod worker;
