//! 機率表
//!
//! 提供給「卡包機率」說明視窗的資料：保底槽與一般槽的各稀有度機率，
//! 以及用蒙地卡羅估計的大獎包比例（含金包）。

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use super::cards::Rarity;
use super::packs::{plan_pack, PACK_THEMES};
use super::rarity::RarityWeights;

/// 單一稀有度的機率
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RarityOdds {
    pub rarity: Rarity,
    pub weight: u32,
    pub probability: f64,
}

/// 池內各稀有度機率（權重 / 總權重）
pub fn pool_odds(pool: &[Rarity], weights: &RarityWeights) -> Vec<RarityOdds> {
    let total = weights.total(pool).max(1) as f64;
    pool.iter()
        .map(|rarity| {
            let weight = weights.weight(*rarity);
            RarityOdds {
                rarity: *rarity,
                weight,
                probability: weight as f64 / total,
            }
        })
        .collect()
}

const SIMULATION_CHUNK: usize = 1_000;

/// 估計大獎包（含 Super Rare 以上）的比例
///
/// 假設生成器遵守計畫的稀有度。每個區塊使用獨立種子，結果可重現。
pub fn simulate_jackpot_rate(
    weights: &RarityWeights,
    gold_chance: f64,
    packs: usize,
    seed: u64,
) -> f64 {
    if packs == 0 {
        return 0.0;
    }

    let chunks = packs.div_ceil(SIMULATION_CHUNK);
    let pack = &PACK_THEMES[0];

    let jackpots: usize = (0..chunks)
        .into_par_iter()
        .map(|chunk| {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(chunk as u64));
            let size = SIMULATION_CHUNK.min(packs - chunk * SIMULATION_CHUNK);
            (0..size)
                .filter(|_| {
                    plan_pack(pack, weights, gold_chance, &mut rng)
                        .rarities
                        .iter()
                        .any(|r| r.is_jackpot())
                })
                .count()
        })
        .sum();

    jackpots as f64 / packs as f64
}

/// 解析解：1 保底槽 + 4 一般槽全部都不是大獎的機率的補數（不含金包）
pub fn jackpot_rate_exact(weights: &RarityWeights) -> f64 {
    let miss = |pool: &[Rarity]| -> f64 {
        pool_odds(pool, weights)
            .iter()
            .filter(|o| !o.rarity.is_jackpot())
            .map(|o| o.probability)
            .sum()
    };
    let guaranteed_miss = miss(Rarity::rare_or_better());
    let standard_miss = miss(Rarity::all());
    1.0 - guaranteed_miss * standard_miss.powi(4)
}

// ============================================================================
// 單元測試
// ============================================================================
