//! KeyLocks - 同键互斥
//!
//! 以字符串键为粒度的异步互斥锁注册表。
//! 同一实体键上的用例（同一邮箱的 issue/verify、同一文本的状态迁移）
//! 经此串行化；不同键完全并行

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// 按键互斥锁注册表
#[derive(Default)]
pub struct KeyLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl KeyLocks {
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// 获取指定键的互斥锁，guard 释放即解锁
    pub async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let entry = self.locks.entry(key.to_string()).or_default();
            entry.value().clone()
        };
        lock.lock_owned().await
    }
}
