//! 稀有度權重與加權抽樣

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::cards::Rarity;

/// 稀有度權重表
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RarityWeights {
    pub common: u32,
    pub uncommon: u32,
    pub rare: u32,
    pub super_rare: u32,
    pub legendary: u32,
}

impl Default for RarityWeights {
    fn default() -> Self {
        Self {
            common: 80,
            uncommon: 40,
            rare: 20,
            super_rare: 5,
            legendary: 1,
        }
    }
}

impl RarityWeights {
    pub fn weight(&self, rarity: Rarity) -> u32 {
        match rarity {
            Rarity::Common => self.common,
            Rarity::Uncommon => self.uncommon,
            Rarity::Rare => self.rare,
            Rarity::SuperRare => self.super_rare,
            Rarity::Legendary => self.legendary,
        }
    }

    /// 池內權重總和
    pub fn total(&self, pool: &[Rarity]) -> u32 {
        pool.iter().map(|r| self.weight(*r)).sum()
    }

    pub fn all_positive(&self) -> bool {
        Rarity::all().iter().all(|r| self.weight(*r) > 0)
    }
}

/// 依權重從池中抽出一個稀有度
///
/// 在 `[0, total)` 取值後依池順序扣除權重，值變為負時即為結果。
/// 理論上不會走完迴圈；若走完（或總權重為 0）回傳池中第一個。
/// 空池回傳 `None`。
pub fn sample_rarity(pool: &[Rarity], weights: &RarityWeights, rng: &mut StdRng) -> Option<Rarity> {
    let first = *pool.first()?;
    let total = weights.total(pool);
    if total == 0 {
        return Some(first);
    }

    let mut roll = rng.gen_range(0..total) as i64;
    for rarity in pool {
        roll -= weights.weight(*rarity) as i64;
        if roll < 0 {
            return Some(*rarity);
        }
    }

    Some(first)
}

// ============================================================================
// 單元測試
// ============================================================================
