//! 內容生成器
//!
//! 外部生成服務（文字卡牌與圖片）的介面。所有呼叫都可能失敗，
//! 呼叫端一定要有備援（佔位卡、備援圖片或退款）。
//!
//! 內建兩種離線生成器：
//! - `CatalogGenerator`: 從預定義目錄抽卡
//! - `ProceduralGenerator`: 依稀有度程序化生成新卡

use std::sync::Arc;

use rand::prelude::*;
use rand::rngs::StdRng;

use crate::config::GeneratorKind;
use crate::error::GenerationError;
use crate::game::catalog::designs_by_rarity;
use crate::game::{AnimalType, CardDraft, Rarity, Role, PREDEFINED_DESIGNS};

/// 開包生成請求
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackRequest {
    pub theme: String,
    pub rarities: Vec<Rarity>,
    pub seed: u64,
}

/// 單一槽位生成請求（直接解鎖）
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotRequest {
    pub rarity: Rarity,
    pub animal_type: AnimalType,
    pub role: Role,
    pub seed: u64,
}

/// 內容生成器
#[tonic::async_trait]
pub trait ContentGenerator: Send + Sync {
    fn name(&self) -> &'static str;

    /// 依主題與稀有度序列生成卡片草稿（可能少於請求數量或內容不可用）
    async fn generate_cards(&self, request: &PackRequest) -> Result<Vec<CardDraft>, GenerationError>;

    /// 為指定槽位生成一張卡
    async fn generate_card(&self, request: &SlotRequest) -> Result<CardDraft, GenerationError>;

    /// 依 prompt 生成圖片，回傳圖片參照
    async fn generate_image(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// 依設定建立生成器
pub fn build_generator(kind: GeneratorKind) -> Arc<dyn ContentGenerator> {
    match kind {
        GeneratorKind::Catalog => Arc::new(CatalogGenerator::new(true)),
        GeneratorKind::CatalogAny => Arc::new(CatalogGenerator::new(false)),
        GeneratorKind::Procedural => Arc::new(ProceduralGenerator),
    }
}

// ============================================================================
// 目錄生成器
// ============================================================================

/// 從預定義目錄抽卡
///
/// `match_rarity = false` 時不管請求的稀有度，直接從整個目錄均勻抽，
/// 保留設計原本的稀有度。
#[derive(Clone, Copy, Debug)]
pub struct CatalogGenerator {
    pub match_rarity: bool,
}

impl CatalogGenerator {
    pub fn new(match_rarity: bool) -> Self {
        Self { match_rarity }
    }
}

#[tonic::async_trait]
impl ContentGenerator for CatalogGenerator {
    fn name(&self) -> &'static str {
        "catalog"
    }

    async fn generate_cards(&self, request: &PackRequest) -> Result<Vec<CardDraft>, GenerationError> {
        let mut rng = StdRng::seed_from_u64(request.seed);
        let drafts = request
            .rarities
            .iter()
            .filter_map(|rarity| {
                let tier = if self.match_rarity {
                    designs_by_rarity(*rarity)
                } else {
                    Vec::new()
                };
                let design = if tier.is_empty() {
                    PREDEFINED_DESIGNS.choose(&mut rng)
                } else {
                    tier.choose(&mut rng).copied()
                };
                design.map(CardDraft::from_design)
            })
            .collect();
        Ok(drafts)
    }

    async fn generate_card(&self, _request: &SlotRequest) -> Result<CardDraft, GenerationError> {
        // 目錄無法產生非預定義的卡
        Err(GenerationError::NotSupported(self.name()))
    }

    async fn generate_image(&self, _prompt: &str) -> Result<String, GenerationError> {
        Err(GenerationError::NotSupported(self.name()))
    }
}

// ============================================================================
// 程序化生成器
// ============================================================================

const EPITHETS: &[&str] = &[
    "delle Nebbie",
    "di Ferro",
    "Selvaggio",
    "Lunare",
    "dei Tetti",
    "Ardente",
    "Silenzioso",
    "Errante",
];

fn species(animal_type: AnimalType) -> &'static [&'static str] {
    match animal_type {
        AnimalType::Felino => &["Gatto", "Lince", "Pantera"],
        AnimalType::Cane => &["Mastino", "Lupo", "Volpe"],
        AnimalType::Volatile => &["Gufo", "Aquila", "Passero"],
        AnimalType::Insetto => &["Scarabeo", "Vespa", "Falena"],
        AnimalType::Roditore => &["Criceto", "Scoiattolo", "Castoro"],
        AnimalType::Pesce => &["Squalo", "Trota", "Murena"],
        AnimalType::Rettile => &["Iguana", "Cobra", "Camaleonte"],
    }
}

/// 各稀有度的數值範圍
fn stat_range(rarity: Rarity) -> std::ops::RangeInclusive<u32> {
    match rarity {
        Rarity::Common => 5..=20,
        Rarity::Uncommon => 15..=35,
        Rarity::Rare => 30..=55,
        Rarity::SuperRare => 50..=80,
        Rarity::Legendary => 75..=120,
    }
}

/// 程序化生成新卡（不會與預定義卡同名）
#[derive(Clone, Copy, Debug, Default)]
pub struct ProceduralGenerator;

impl ProceduralGenerator {
    fn draft(rarity: Rarity, animal_type: AnimalType, role: Option<Role>, rng: &mut StdRng) -> CardDraft {
        let name = format!(
            "{} {}",
            species(animal_type).choose(rng).copied().unwrap_or("Bestia"),
            EPITHETS.choose(rng).copied().unwrap_or("Randagio"),
        );
        let range = stat_range(rarity);
        CardDraft {
            description: format!("Un {} {} nato dalle strade della città.", animal_type, rarity),
            name,
            rarity,
            animal_type,
            role,
            attack: rng.gen_range(range.clone()),
            defense: rng.gen_range(range.clone()),
            hp: rng.gen_range(range),
            image_prompt: None,
        }
    }
}

#[tonic::async_trait]
impl ContentGenerator for ProceduralGenerator {
    fn name(&self) -> &'static str {
        "procedural"
    }

    async fn generate_cards(&self, request: &PackRequest) -> Result<Vec<CardDraft>, GenerationError> {
        let mut rng = StdRng::seed_from_u64(request.seed);
        let drafts = request
            .rarities
            .iter()
            .map(|rarity| {
                let animal_type = *AnimalType::all().choose(&mut rng).unwrap_or(&AnimalType::Felino);
                Self::draft(*rarity, animal_type, None, &mut rng)
            })
            .collect();
        Ok(drafts)
    }

    async fn generate_card(&self, request: &SlotRequest) -> Result<CardDraft, GenerationError> {
        let mut rng = StdRng::seed_from_u64(request.seed);
        Ok(Self::draft(request.rarity, request.animal_type, Some(request.role), &mut rng))
    }

    async fn generate_image(&self, _prompt: &str) -> Result<String, GenerationError> {
        Err(GenerationError::NotSupported(self.name()))
    }
}

// ============================================================================
// 單元測試
// ============================================================================
