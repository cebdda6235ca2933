//! 進行中請求保護
//!
//! 同一個鍵同時只允許一個請求（例如同一個槽位的解鎖）；守衛離開作用域時自動釋放。

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::error::GameError;

#[derive(Debug, Default)]
pub struct InFlight {
    keys: DashMap<String, ()>,
}

/// 持有期間該鍵被佔用
#[derive(Debug)]
pub struct InFlightGuard<'a> {
    keys: &'a DashMap<String, ()>,
    key: String,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&self, key: impl Into<String>) -> Result<InFlightGuard<'_>, GameError> {
        let key = key.into();
        match self.keys.entry(key.clone()) {
            Entry::Occupied(_) => return Err(GameError::Busy(key)),
            Entry::Vacant(slot) => {
                slot.insert(());
            }
        }
        Ok(InFlightGuard {
            keys: &self.keys,
            key,
        })
    }

    pub fn is_busy(&self, key: &str) -> bool {
        self.keys.contains_key(key)
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.keys.remove(&self.key);
    }
}

// ============================================================================
// 單元測試
// ============================================================================
