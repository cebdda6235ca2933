//! 遊戲核心模組
//!
//! 包含卡牌相簿遊戲的純邏輯（不涉及 I/O 與非同步）：
//! - `constants`: 遊戲常量
//! - `cards`: 稀有度、動物類型、定位、卡牌設計與實例
//! - `catalog`: 預定義卡牌目錄
//! - `rarity`: 稀有度權重與加權抽樣
//! - `slots`: 相簿槽位登錄表
//! - `packs`: 主題卡包與開包計畫
//! - `collection`: 收藏與合併引擎
//! - `wallet`: 金幣與被動收入
//! - `album`: 相簿篩選與完成度
//! - `odds`: 機率表

#![allow(unused_imports)]

pub mod constants;
pub mod cards;
pub mod catalog;
pub mod rarity;
pub mod slots;
pub mod packs;
pub mod collection;
pub mod wallet;
pub mod album;
pub mod odds;

// Re-export 常用類型（公開 API，可能未在內部使用）
pub use constants::*;
pub use cards::{now_millis, card_id, AnimalType, CardDesign, CardDraft, CardInstance, Rarity, Role};
pub use catalog::{find_design, find_exact, PREDEFINED_DESIGNS};
pub use rarity::{sample_rarity, RarityWeights};
pub use slots::{AlbumSlot, SlotRegistry, SlotTargets};
pub use packs::{find_pack, finalize_drafts, plan_pack, PackContents, PackPlan, PackTheme, PACK_THEMES};
pub use collection::{
    Collection, CollectionEntry, MergeOutcome, Placement, SaleOutcome, PLACEMENT_PRIORITY,
};
pub use wallet::{PassiveIncome, Wallet};
pub use album::{album_entries, completion, AlbumEntry, AlbumFilter, Completion};
pub use odds::{jackpot_rate_exact, pool_odds, simulate_jackpot_rate, RarityOdds};
