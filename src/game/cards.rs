//! 卡牌定義：稀有度、動物類型、戰鬥定位、卡牌設計與實例

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use super::constants::{PLACEHOLDER_DESCRIPTION, PLACEHOLDER_NAME};

// ============================================================================
// 稀有度
// ============================================================================

/// 卡牌稀有度（有序，Common 最低）
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rarity {
    #[serde(rename = "comune")]
    Common,
    #[serde(rename = "non comune")]
    Uncommon,
    #[serde(rename = "rara")]
    Rare,
    #[serde(rename = "super rara")]
    SuperRare,
    #[serde(rename = "leggendaria")]
    Legendary,
}

impl Rarity {
    /// 所有稀有度（由低到高）
    pub fn all() -> &'static [Rarity] {
        &[
            Rarity::Common,
            Rarity::Uncommon,
            Rarity::Rare,
            Rarity::SuperRare,
            Rarity::Legendary,
        ]
    }

    /// 稀有以上（保底池）
    pub fn rare_or_better() -> &'static [Rarity] {
        &[Rarity::Rare, Rarity::SuperRare, Rarity::Legendary]
    }

    /// 持久化與協定使用的標籤
    pub fn label(&self) -> &'static str {
        match self {
            Rarity::Common => "comune",
            Rarity::Uncommon => "non comune",
            Rarity::Rare => "rara",
            Rarity::SuperRare => "super rara",
            Rarity::Legendary => "leggendaria",
        }
    }

    pub fn from_label(label: &str) -> Option<Rarity> {
        Rarity::all().iter().copied().find(|r| r.label() == label)
    }

    /// 用於 design key 的短代號
    pub fn slug(&self) -> &'static str {
        match self {
            Rarity::Common => "comune",
            Rarity::Uncommon => "non-comune",
            Rarity::Rare => "rara",
            Rarity::SuperRare => "super-rara",
            Rarity::Legendary => "leggendaria",
        }
    }

    /// 賣出價格
    pub fn sell_price(&self) -> i64 {
        match self {
            Rarity::Common => 1,
            Rarity::Uncommon => 5,
            Rarity::Rare => 10,
            Rarity::SuperRare => 30,
            Rarity::Legendary => 50,
        }
    }

    /// 是否為大獎稀有度（Super Rare 以上）
    pub fn is_jackpot(&self) -> bool {
        *self >= Rarity::SuperRare
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// 動物類型
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AnimalType {
    Felino,
    Cane,
    Volatile,
    Insetto,
    Roditore,
    Pesce,
    Rettile,
}

impl AnimalType {
    pub fn all() -> &'static [AnimalType] {
        &[
            AnimalType::Felino,
            AnimalType::Cane,
            AnimalType::Volatile,
            AnimalType::Insetto,
            AnimalType::Roditore,
            AnimalType::Pesce,
            AnimalType::Rettile,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            AnimalType::Felino => "Felino",
            AnimalType::Cane => "Cane",
            AnimalType::Volatile => "Volatile",
            AnimalType::Insetto => "Insetto",
            AnimalType::Roditore => "Roditore",
            AnimalType::Pesce => "Pesce",
            AnimalType::Rettile => "Rettile",
        }
    }

    pub fn from_label(label: &str) -> Option<AnimalType> {
        AnimalType::all().iter().copied().find(|t| t.label() == label)
    }

    pub fn slug(&self) -> &'static str {
        match self {
            AnimalType::Felino => "felino",
            AnimalType::Cane => "cane",
            AnimalType::Volatile => "volatile",
            AnimalType::Insetto => "insetto",
            AnimalType::Roditore => "roditore",
            AnimalType::Pesce => "pesce",
            AnimalType::Rettile => "rettile",
        }
    }
}

impl fmt::Display for AnimalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// 戰鬥定位
// ============================================================================

/// 戰鬥定位標籤（舊存檔沒有此欄位，預設 Attaccante）
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Attaccante,
    Difensore,
    Supporto,
    Esploratore,
    Ingannatore,
}

impl Role {
    pub fn all() -> &'static [Role] {
        &[
            Role::Attaccante,
            Role::Difensore,
            Role::Supporto,
            Role::Esploratore,
            Role::Ingannatore,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Attaccante => "attaccante",
            Role::Difensore => "difensore",
            Role::Supporto => "supporto",
            Role::Esploratore => "esploratore",
            Role::Ingannatore => "ingannatore",
        }
    }

    pub fn from_label(label: &str) -> Option<Role> {
        Role::all().iter().copied().find(|r| r.label() == label)
    }

    /// 輪替分配用
    pub fn from_index(index: usize) -> Role {
        let roles = Role::all();
        roles[index % roles.len()]
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// 卡牌設計（靜態模板）
// ============================================================================

/// 預定義卡牌設計
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CardDesign {
    pub design_key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub rarity: Rarity,
    pub animal_type: AnimalType,
    pub role: Role,
    pub attack: u32,
    pub defense: u32,
    pub hp: u32,
    /// 自訂圖片 prompt（簽名卡使用）
    pub image_prompt: Option<&'static str>,
}

// ============================================================================
// 卡牌草稿（生成器輸出，尚未分配 id）
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardDraft {
    pub name: String,
    pub description: String,
    pub rarity: Rarity,
    pub animal_type: AnimalType,
    pub role: Option<Role>,
    pub attack: u32,
    pub defense: u32,
    pub hp: u32,
    pub image_prompt: Option<String>,
}

impl CardDraft {
    pub fn from_design(design: &CardDesign) -> Self {
        Self {
            name: design.name.to_string(),
            description: design.description.to_string(),
            rarity: design.rarity,
            animal_type: design.animal_type,
            role: Some(design.role),
            attack: design.attack,
            defense: design.defense,
            hp: design.hp,
            image_prompt: design.image_prompt.map(str::to_string),
        }
    }

    /// 生成失敗時的佔位卡：數值全為 0
    pub fn placeholder(rarity: Rarity, animal_type: AnimalType) -> Self {
        Self {
            name: PLACEHOLDER_NAME.to_string(),
            description: PLACEHOLDER_DESCRIPTION.to_string(),
            rarity,
            animal_type,
            role: Some(Role::default()),
            attack: 0,
            defense: 0,
            hp: 0,
            image_prompt: None,
        }
    }

    /// 名稱非空且數值為正才可用
    pub fn is_usable(&self) -> bool {
        !self.name.trim().is_empty() && self.attack > 0 && self.defense > 0 && self.hp > 0
    }

    /// 預設圖片 prompt
    pub fn image_prompt(&self) -> String {
        match &self.image_prompt {
            Some(prompt) => prompt.clone(),
            None => format!(
                "Fantasy illustration for a TCG card named \"{}\". It is a {} creature. Lore: {}. \
                 Digital art, vibrant colors, detailed environment. NO TEXT, NO CARD FRAME.",
                self.name, self.animal_type, self.description
            ),
        }
    }

    pub fn into_instance(self, id: String, image_url: String, timestamp: u64) -> CardInstance {
        CardInstance {
            id,
            design_key: None,
            name: self.name,
            description: self.description,
            rarity: self.rarity,
            animal_type: self.animal_type,
            role: self.role.unwrap_or_default(),
            attack: self.attack,
            defense: self.defense,
            hp: self.hp,
            image_url,
            timestamp,
        }
    }
}

// ============================================================================
// 卡牌實例
// ============================================================================

/// 抽到的卡牌實例
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardInstance {
    pub id: String,
    /// 合併進收藏時分配
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub design_key: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub rarity: Rarity,
    #[serde(rename = "type")]
    pub animal_type: AnimalType,
    #[serde(default)]
    pub role: Role,
    pub attack: u32,
    pub defense: u32,
    pub hp: u32,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub timestamp: u64,
}

impl CardInstance {
    /// 比對預定義設計的完整數值組合
    pub fn matches_design(&self, design: &CardDesign) -> bool {
        self.name == design.name
            && self.animal_type == design.animal_type
            && self.rarity == design.rarity
            && self.role == design.role
            && self.attack == design.attack
            && self.defense == design.defense
            && self.hp == design.hp
    }

    pub fn is_placeholder(&self) -> bool {
        self.name == PLACEHOLDER_NAME && self.attack == 0 && self.defense == 0 && self.hp == 0
    }
}

/// 卡牌實例 id：card-<ms>-<index>-<random>
pub fn card_id(timestamp: u64, index: usize, nonce: u32) -> String {
    format!("card-{}-{}-{}", timestamp, index, nonce % 1_000_000)
}

/// 目前時間（毫秒）
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

// ============================================================================
// 單元測試
// ============================================================================
