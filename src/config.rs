//! 伺服器設定
//!
//! 從 JSON 檔載入（`RANDAGI_CONFIG` 指定路徑，預設 `randagi.json`，不存在則用內建預設值），
//! `RANDAGI_ADDR` 可覆蓋監聽位址。

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::game::{
    RarityWeights, SlotTargets, GOLD_PACK_CHANCE, PACK_COST, PASSIVE_INCOME,
    PASSIVE_INTERVAL_SECS, STARTING_COINS, UNLOCK_COST,
};

pub const CONFIG_ENV: &str = "RANDAGI_CONFIG";
pub const ADDR_ENV: &str = "RANDAGI_ADDR";
pub const DEFAULT_CONFIG_PATH: &str = "randagi.json";

/// 內容生成器種類
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GeneratorKind {
    /// 從預定義目錄中抽同稀有度的卡
    #[default]
    Catalog,
    /// 從整個目錄均勻抽，保留卡片原本的稀有度
    CatalogAny,
    /// 程序化生成新卡
    Procedural,
}

/// 遊戲規則參數
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRules {
    pub starting_coins: i64,
    pub pack_cost: i64,
    pub unlock_cost: i64,
    pub passive_income: i64,
    pub passive_interval_secs: u32,
    pub gold_pack_chance: f64,
    pub rarity_weights: RarityWeights,
    pub slot_targets: SlotTargets,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            starting_coins: STARTING_COINS,
            pack_cost: PACK_COST,
            unlock_cost: UNLOCK_COST,
            passive_income: PASSIVE_INCOME,
            passive_interval_secs: PASSIVE_INTERVAL_SECS,
            gold_pack_chance: GOLD_PACK_CHANCE,
            rarity_weights: RarityWeights::default(),
            slot_targets: SlotTargets::default(),
        }
    }
}

impl GameRules {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.rarity_weights.all_positive() {
            return Err(ConfigError::Invalid("rarity weights must all be positive".into()));
        }
        if self.pack_cost <= 0 || self.unlock_cost <= 0 {
            return Err(ConfigError::Invalid("pack and unlock costs must be positive".into()));
        }
        if self.starting_coins < 0 || self.passive_income < 0 {
            return Err(ConfigError::Invalid("coin amounts must not be negative".into()));
        }
        if self.passive_interval_secs == 0 {
            return Err(ConfigError::Invalid("passive income interval must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.gold_pack_chance) {
            return Err(ConfigError::Invalid("gold pack chance must be within [0, 1]".into()));
        }
        Ok(())
    }
}

/// 完整設定
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub listen_addr: String,
    /// 資料目錄；未設定時使用記憶體儲存
    pub data_dir: Option<PathBuf>,
    /// 模擬瀏覽器儲存上限（位元組）
    pub storage_quota_bytes: Option<usize>,
    pub seed: Option<u64>,
    pub generator: GeneratorKind,
    pub rules: GameRules,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:50052".to_string(),
            data_dir: None,
            storage_quota_bytes: None,
            seed: None,
            generator: GeneratorKind::default(),
            rules: GameRules::default(),
        }
    }
}

impl Config {
    /// 從 JSON 字串解析並驗證
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.rules.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// 依環境變數載入設定
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_PATH))?
            }
            Err(_) => Self::default(),
        };

        if let Ok(addr) = std::env::var(ADDR_ENV) {
            config.listen_addr = addr;
        }

        Ok(config)
    }
}

// ============================================================================
// 單元測試
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.rules.validate().is_ok());
        assert_eq!(config.rules.starting_coins, 1000);
        assert_eq!(config.rules.pack_cost, 100);
        assert_eq!(config.generator, GeneratorKind::Catalog);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = Config::from_json(
            r#"{ "generator": "procedural", "rules": { "pack_cost": 50, "rarity_weights": { "legendary": 3 } } }"#,
        )
        .unwrap();
        assert_eq!(config.generator, GeneratorKind::Procedural);
        assert_eq!(config.rules.pack_cost, 50);
        assert_eq!(config.rules.unlock_cost, UNLOCK_COST);
        assert_eq!(config.rules.rarity_weights.legendary, 3);
        assert_eq!(config.rules.rarity_weights.common, 80);
    }

    #[test]
    fn test_rejects_zero_weight() {
        let err = Config::from_json(r#"{ "rules": { "rarity_weights": { "rare": 0 } } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_bad_json() {
        assert!(matches!(Config::from_json("{ nope"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_catalog_any_kind() {
        let config = Config::from_json(r#"{ "generator": "catalog-any" }"#).unwrap();
        assert_eq!(config.generator, GeneratorKind::CatalogAny);
    }
}
