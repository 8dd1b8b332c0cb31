//! 持久化层

pub mod sqlite;
