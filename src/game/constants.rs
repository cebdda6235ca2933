//! 遊戲常量定義

// ============================================================================
// 經濟常量
// ============================================================================

pub const STARTING_COINS: i64 = 1000;        // 起始金幣
pub const PACK_COST: i64 = 100;              // 卡包價格
pub const UNLOCK_COST: i64 = 250;            // 直接解鎖單一相簿槽位
pub const PASSIVE_INCOME: i64 = 10;          // 被動收入
pub const PASSIVE_INTERVAL_SECS: u32 = 60;   // 被動收入間隔（秒）

// ============================================================================
// 卡包常量
// ============================================================================

pub const CARDS_PER_PACK: usize = 5;         // 每包卡片數
pub const GOLD_PACK_CHANCE: f64 = 0.01;      // 金包機率（全部從稀有池抽）

// ============================================================================
// 相簿槽位目標數量（每個動物類型）
// ============================================================================

pub const TARGET_COMMON_SLOTS: u32 = 6;
pub const TARGET_UNCOMMON_SLOTS: u32 = 5;
pub const TARGET_RARE_SLOTS: u32 = 4;
pub const TARGET_SUPER_RARE_SLOTS: u32 = 2;
pub const TARGET_LEGENDARY_SLOTS: u32 = 1;

// ============================================================================
// 儲存鍵
// ============================================================================

pub const COINS_KEY: &str = "zenith_coins";
pub const COLLECTION_KEY: &str = "zenith_collection";

// ============================================================================
// 圖片備援
// ============================================================================

pub const FALLBACK_CARD_IMAGE: &str =
    "https://images.unsplash.com/photo-1518717758536-85ae29035b6d?q=80&w=400&auto=format&fit=crop";
pub const FALLBACK_PACK_IMAGE: &str =
    "https://images.unsplash.com/photo-1614850523459-c2f4c699c52e?q=80&w=400&auto=format&fit=crop";

// ============================================================================
// 佔位卡
// ============================================================================

pub const PLACEHOLDER_NAME: &str = "Creatura Sconosciuta";
pub const PLACEHOLDER_DESCRIPTION: &str =
    "[segnaposto] La generazione della carta non è riuscita.";
