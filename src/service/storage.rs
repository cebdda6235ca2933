//! 持久化
//!
//! 金幣與收藏各存在一個鍵下（字串值）。讀取時容忍壞資料並遷移舊格式，
//! 寫入失敗時工作階段照常進行：收藏寫入失敗會設下黏滯的「儲存降級」旗標。

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use log::{info, warn};
use serde::Deserialize;

use crate::error::StorageError;
use crate::game::{CardInstance, Collection, CollectionEntry, COINS_KEY, COLLECTION_KEY};

/// 鍵值儲存
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

// ============================================================================
// 記憶體儲存
// ============================================================================

/// 記憶體儲存，可設總容量上限（模擬瀏覽器配額）
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    capacity: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: Option<usize>) -> Self {
        Self {
            values: HashMap::new(),
            capacity,
        }
    }

    fn used_without(&self, key: &str) -> usize {
        self.values
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(capacity) = self.capacity {
            let needed = self.used_without(key) + key.len() + value.len();
            if needed > capacity {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    capacity,
                });
            }
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ============================================================================
// 檔案儲存
// ============================================================================

/// 每個鍵一個檔案
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        // 先寫暫存檔再改名，避免寫到一半的檔案
        let path = self.path(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

// ============================================================================
// 持久化轉接
// ============================================================================

/// 收藏的兩種存檔格式
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredCollection {
    Current(BTreeMap<String, CollectionEntry>),
    Legacy(Vec<CardInstance>),
}

/// 載入結果
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadedState {
    pub coins: i64,
    pub collection: Collection,
    pub migrated: bool,
}

pub struct Persistence {
    store: Box<dyn KeyValueStore>,
    degraded: bool,
}

impl Persistence {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self {
            store,
            degraded: false,
        }
    }

    /// 收藏曾寫入失敗（不會自動清除）
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// 載入金幣與收藏；壞資料回到預設值，舊格式遷移後立即寫回
    pub fn load(&mut self, starting_coins: i64, now_ms: u64) -> LoadedState {
        let coins = self.load_coins(starting_coins);

        let (collection, migrated) = match self.store.get(COLLECTION_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<StoredCollection>(&raw) {
                Ok(StoredCollection::Current(entries)) => (Collection::from_entries(entries), false),
                Ok(StoredCollection::Legacy(cards)) => {
                    info!("migrating {} legacy cards", cards.len());
                    (Collection::from_legacy(cards, now_ms), true)
                }
                Err(err) => {
                    warn!("unreadable collection, starting empty: {}", err);
                    (Collection::new(), false)
                }
            },
            Ok(None) => (Collection::new(), false),
            Err(err) => {
                warn!("cannot read collection, starting empty: {}", err);
                (Collection::new(), false)
            }
        };

        if migrated {
            self.save_collection(&collection);
        }

        LoadedState {
            coins,
            collection,
            migrated,
        }
    }

    fn load_coins(&self, starting_coins: i64) -> i64 {
        match self.store.get(COINS_KEY) {
            Ok(Some(raw)) => match raw.trim().parse::<i64>() {
                Ok(coins) if coins >= 0 => coins,
                _ => {
                    warn!("invalid stored coins {:?}, using {}", raw, starting_coins);
                    starting_coins
                }
            },
            Ok(None) => starting_coins,
            Err(err) => {
                warn!("cannot read coins, using {}: {}", starting_coins, err);
                starting_coins
            }
        }
    }

    pub fn save_coins(&mut self, coins: i64) {
        if let Err(err) = self.store.set(COINS_KEY, &coins.to_string()) {
            warn!("failed to save coins: {}", err);
        }
    }

    pub fn save_collection(&mut self, collection: &Collection) {
        let result = serde_json::to_string(collection)
            .map_err(StorageError::from)
            .and_then(|json| self.store.set(COLLECTION_KEY, &json));

        if let Err(err) = result {
            if !self.degraded {
                warn!("failed to save collection, storage degraded: {}", err);
            }
            self.degraded = true;
        }
    }
}

// ============================================================================
// 單元測試
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::catalog::{find_design, LOKITO_KEY};
    use crate::game::CardDraft;

    fn card(key: &str) -> CardInstance {
        CardDraft::from_design(find_design(key).unwrap()).into_instance("id".into(), String::new(), 0)
    }

    fn store_with(values: &[(&str, &str)]) -> Box<dyn KeyValueStore> {
        let mut store = MemoryStore::new();
        for (key, value) in values {
            store.set(key, value).unwrap();
        }
        Box::new(store)
    }

    #[test]
    fn test_empty_store_uses_defaults() {
        let mut persistence = Persistence::new(Box::new(MemoryStore::new()));
        let loaded = persistence.load(1000, 0);
        assert_eq!(loaded.coins, 1000);
        assert!(loaded.collection.is_empty());
        assert!(!loaded.migrated);
    }

    #[test]
    fn test_bad_coins_fall_back() {
        for raw in ["abc", "-5", ""] {
            let mut persistence = Persistence::new(store_with(&[(COINS_KEY, raw)]));
            assert_eq!(persistence.load(1000, 0).coins, 1000);
        }
        let mut persistence = Persistence::new(store_with(&[(COINS_KEY, "420")]));
        assert_eq!(persistence.load(1000, 0).coins, 420);
    }

    #[test]
    fn test_corrupt_collection_starts_empty() {
        let mut persistence = Persistence::new(store_with(&[(COLLECTION_KEY, "{not json")]));
        let loaded = persistence.load(1000, 0);
        assert!(loaded.collection.is_empty());
    }

    #[test]
    fn test_current_format_round_trips() {
        let mut collection = Collection::new();
        collection.insert_unlocked(LOKITO_KEY, card(LOKITO_KEY));

        let mut persistence = Persistence::new(Box::new(MemoryStore::new()));
        persistence.save_collection(&collection);
        persistence.save_coins(77);

        let loaded = persistence.load(1000, 0);
        assert_eq!(loaded.coins, 77);
        assert_eq!(loaded.collection, collection);
    }

    #[test]
    fn test_legacy_array_is_migrated_and_written_back() {
        let legacy = serde_json::to_string(&vec![card(LOKITO_KEY), card(LOKITO_KEY), card("bolla")]).unwrap();
        let mut persistence = Persistence::new(store_with(&[(COLLECTION_KEY, legacy.as_str())]));

        let loaded = persistence.load(1000, 42);
        assert!(loaded.migrated);
        assert_eq!(loaded.collection.count(LOKITO_KEY), 2);
        assert_eq!(loaded.collection.count("bolla"), 1);

        // 寫回後再載入是新格式
        let reloaded = persistence.load(1000, 99);
        assert!(!reloaded.migrated);
        assert_eq!(reloaded.collection, loaded.collection);
    }

    #[test]
    fn test_quota_sets_sticky_degraded_flag() {
        let mut persistence = Persistence::new(Box::new(MemoryStore::with_capacity(Some(64))));
        let mut collection = Collection::new();
        collection.insert_unlocked(LOKITO_KEY, card(LOKITO_KEY));

        persistence.save_coins(10);
        assert!(!persistence.is_degraded());
        persistence.save_collection(&collection);
        assert!(persistence.is_degraded());

        persistence.save_collection(&Collection::new());
        assert!(persistence.is_degraded());
    }

    #[test]
    fn test_failed_coin_write_is_not_degraded() {
        // "zenith_coins" 本身就超過 8 bytes
        let mut persistence = Persistence::new(Box::new(MemoryStore::with_capacity(Some(8))));
        persistence.save_coins(1000);
        assert!(!persistence.is_degraded());
        assert_eq!(persistence.load(500, 0).coins, 500);
    }

    #[test]
    fn test_file_store() {
        let dir = std::env::temp_dir().join(format!("randagi-store-{}", std::process::id()));
        let mut store = FileStore::new(&dir).unwrap();
        assert_eq!(store.get(COINS_KEY).unwrap(), None);
        store.set(COINS_KEY, "5").unwrap();
        store.set(COINS_KEY, "6").unwrap();
        assert_eq!(store.get(COINS_KEY).unwrap().as_deref(), Some("6"));
        let _ = fs::remove_dir_all(&dir);
    }
}
