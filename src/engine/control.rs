// ランの制御 - キャンセル要求と同時実行の抑止

use crate::core::{BatchError, BatchResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// タスク間・モジュール間で確認されるキャンセル要求
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// 同時に1つのランだけを許可するスロット
#[derive(Debug, Clone, Default)]
pub struct RunSlot {
    active: Arc<Mutex<Option<String>>>,
}

impl RunSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// 空いていれば占有する。実行中のランがあれば `RunInProgress`
    pub fn acquire(&self, label: impl Into<String>) -> BatchResult<RunGuard> {
        let mut active = lock(&self.active);
        if let Some(current) = active.as_ref() {
            return Err(BatchError::run_in_progress(current.clone()));
        }
        *active = Some(label.into());
        Ok(RunGuard {
            active: Arc::clone(&self.active),
        })
    }

    /// 実行中のランの名前
    pub fn active(&self) -> Option<String> {
        lock(&self.active).clone()
    }

    pub fn is_busy(&self) -> bool {
        lock(&self.active).is_some()
    }
}

/// スロットの占有権。ドロップで解放される
#[derive(Debug)]
pub struct RunGuard {
    active: Arc<Mutex<Option<String>>>,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        *lock(&self.active) = None;
    }
}

// ランがパニックしてもスロットは使い続ける
fn lock(active: &Mutex<Option<String>>) -> MutexGuard<'_, Option<String>> {
    active.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
