//! 收藏與合併引擎
//!
//! 收藏是 `design_key → { 代表卡, 數量 }` 的有序映射，數量永遠 ≥ 1
//! （歸零即刪除）。新抽到的卡依 [`PLACEMENT_PRIORITY`] 逐一嘗試放置：
//!
//! 1. `Predefined`: 數值組合與預定義設計完全相同 → 該設計的槽位
//! 2. `ClaimGeneric`: 同 (類型, 稀有度) 第一個未擁有的通用槽位
//! 3. `DuplicateGeneric`: 同 (類型, 稀有度) 已擁有的通用槽位中隨機一個，數量 +1
//! 4. `Fallback`: 登錄表沒有此 (類型, 稀有度) 的通用槽位，臨時建立一個

use std::collections::BTreeMap;

use log::warn;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::cards::{AnimalType, CardInstance, Rarity};
use super::catalog;
use super::slots::SlotRegistry;
use crate::error::GameError;

/// 收藏項目
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionEntry {
    pub card: CardInstance,
    pub count: u32,
}

/// 放置方式
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Placement {
    Predefined,
    ClaimGeneric,
    DuplicateGeneric,
    Fallback,
}

impl Placement {
    pub fn label(&self) -> &'static str {
        match self {
            Placement::Predefined => "predefined",
            Placement::ClaimGeneric => "claim-generic",
            Placement::DuplicateGeneric => "duplicate-generic",
            Placement::Fallback => "fallback",
        }
    }
}

/// 放置優先順序（具名卡優先，其次填空槽，最後才累積重複）
pub const PLACEMENT_PRIORITY: [Placement; 4] = [
    Placement::Predefined,
    Placement::ClaimGeneric,
    Placement::DuplicateGeneric,
    Placement::Fallback,
];

/// 單張卡的合併結果
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergeOutcome {
    pub design_key: String,
    pub placement: Placement,
    pub count: u32,
}

/// 賣出結果
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SaleOutcome {
    pub price: i64,
    pub remaining: u32,
}

/// 臨時槽位 key
pub fn fallback_key(animal_type: AnimalType, rarity: Rarity, now_ms: u64) -> String {
    format!("fallback-{}-{}-{}", animal_type.slug(), rarity.slug(), now_ms)
}

/// 舊格式遷移的合成 key
pub fn legacy_key(animal_type: AnimalType, rarity: Rarity, batch: u64) -> String {
    format!("legacy-{}-{}-{}", animal_type.slug(), rarity.slug(), batch)
}

/// 玩家收藏
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection {
    entries: BTreeMap<String, CollectionEntry>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    /// 從持久化資料建立，丟棄數量為 0 的項目
    pub fn from_entries(entries: BTreeMap<String, CollectionEntry>) -> Self {
        let mut collection = Self { entries };
        collection.entries.retain(|key, entry| {
            if entry.count == 0 {
                warn!("dropping zero-count collection entry {}", key);
                return false;
            }
            true
        });
        collection
    }

    pub fn get(&self, design_key: &str) -> Option<&CollectionEntry> {
        self.entries.get(design_key)
    }

    pub fn contains(&self, design_key: &str) -> bool {
        self.entries.contains_key(design_key)
    }

    pub fn count(&self, design_key: &str) -> u32 {
        self.entries.get(design_key).map(|e| e.count).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 所有卡片總張數
    pub fn total_cards(&self) -> u32 {
        self.entries.values().map(|e| e.count).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &CollectionEntry)> {
        self.entries.iter()
    }

    // ========================================================================
    // 合併
    // ========================================================================

    /// 依序合併一批新卡
    pub fn merge(
        &mut self,
        cards: Vec<CardInstance>,
        registry: &SlotRegistry,
        rng: &mut StdRng,
        now_ms: u64,
    ) -> Vec<MergeOutcome> {
        cards
            .into_iter()
            .map(|card| self.merge_one(card, registry, rng, now_ms))
            .collect()
    }

    fn merge_one(
        &mut self,
        card: CardInstance,
        registry: &SlotRegistry,
        rng: &mut StdRng,
        now_ms: u64,
    ) -> MergeOutcome {
        let (placement, key) = PLACEMENT_PRIORITY
            .iter()
            .find_map(|p| {
                self.resolve_slot(*p, &card, registry, rng, now_ms)
                    .map(|key| (*p, key))
            })
            .unwrap_or_else(|| (Placement::Fallback, self.fallback_slot(&card, now_ms)));

        let count = self.add(key.clone(), card);
        MergeOutcome {
            design_key: key,
            placement,
            count,
        }
    }

    /// 依放置方式找出目標 key
    fn resolve_slot(
        &self,
        placement: Placement,
        card: &CardInstance,
        registry: &SlotRegistry,
        rng: &mut StdRng,
        now_ms: u64,
    ) -> Option<String> {
        match placement {
            Placement::Predefined => catalog::find_exact(card)
                .filter(|design| registry.contains(design.design_key))
                .map(|design| design.design_key.to_string()),

            Placement::ClaimGeneric => registry
                .generic_slots(card.animal_type, card.rarity)
                .find(|slot| !self.contains(&slot.design_key))
                .map(|slot| slot.design_key.clone()),

            Placement::DuplicateGeneric => {
                let owned: Vec<&str> = registry
                    .generic_slots(card.animal_type, card.rarity)
                    .filter(|slot| self.contains(&slot.design_key))
                    .map(|slot| slot.design_key.as_str())
                    .collect();
                owned.choose(rng).map(|key| key.to_string())
            }

            Placement::Fallback => Some(self.fallback_slot(card, now_ms)),
        }
    }

    /// 登錄表設定有誤時才會走到這裡
    fn fallback_slot(&self, card: &CardInstance, now_ms: u64) -> String {
        let base = fallback_key(card.animal_type, card.rarity, now_ms);
        let mut key = base.clone();
        let mut suffix = 1;
        while self.contains(&key) {
            key = format!("{}-{}", base, suffix);
            suffix += 1;
        }
        warn!(
            "no generic slot for ({}, {}); created fallback slot {}",
            card.animal_type, card.rarity, key
        );
        key
    }

    /// 增加一張卡，回傳新數量
    fn add(&mut self, design_key: String, mut card: CardInstance) -> u32 {
        card.design_key = Some(design_key.clone());
        let entry = self
            .entries
            .entry(design_key)
            .or_insert(CollectionEntry { card, count: 0 });
        entry.count += 1;
        entry.count
    }

    /// 直接解鎖：以數量 1 寫入（覆蓋任何殘缺項目）
    pub fn insert_unlocked(&mut self, design_key: &str, mut card: CardInstance) {
        card.design_key = Some(design_key.to_string());
        self.entries
            .insert(design_key.to_string(), CollectionEntry { card, count: 1 });
    }

    // ========================================================================
    // 賣出
    // ========================================================================

    /// 賣出一張；數量 1 時刪除項目
    pub fn sell(&mut self, design_key: &str) -> Result<SaleOutcome, GameError> {
        let entry = self
            .entries
            .get_mut(design_key)
            .ok_or_else(|| GameError::NotOwned(design_key.to_string()))?;

        let price = entry.card.rarity.sell_price();
        entry.count = entry.count.saturating_sub(1);
        let remaining = entry.count;
        if remaining == 0 {
            self.entries.remove(design_key);
        }

        Ok(SaleOutcome { price, remaining })
    }

    // ========================================================================
    // 舊格式遷移
    // ========================================================================

    /// 舊版扁平陣列 → 收藏
    ///
    /// 預定義卡歸入專屬槽位；其餘依 (類型, 稀有度) 分組成 `legacy-*-<batch>`。
    pub fn from_legacy(cards: Vec<CardInstance>, batch: u64) -> Self {
        let mut collection = Self::new();

        for card in cards {
            let key = match catalog::find_exact(&card) {
                Some(design) => design.design_key.to_string(),
                None => legacy_key(card.animal_type, card.rarity, batch),
            };
            collection.add(key, card);
        }

        collection
    }
}

// ============================================================================
// 單元測試
// ============================================================================
