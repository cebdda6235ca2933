//! 卡包系統
//!
//! 定義主題卡包及開包流程中的純邏輯部分：
//! - 抽出 5 個稀有度（1 個保底稀有以上 + 4 個全池）
//! - 整理生成器回傳的草稿（補佔位卡、套用簽名卡、分配定位）
//! - 判斷是否為大獎包

use rand::prelude::*;
use rand::rngs::StdRng;

use super::cards::{AnimalType, CardDraft, CardInstance, Rarity, Role};
use super::catalog::{self, LOKITO_KEY};
use super::constants::CARDS_PER_PACK;
use super::rarity::{sample_rarity, RarityWeights};

/// 主題卡包
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PackTheme {
    pub id: &'static str,
    pub name: &'static str,
    /// 交給生成器的主題描述
    pub theme: &'static str,
    /// 包裝封面 prompt
    pub image_prompt: &'static str,
    /// 簽名卡：取代第一張生成的卡
    pub signature: Option<&'static str>,
}

/// 所有主題卡包
pub const PACK_THEMES: &[PackTheme] = &[
    PackTheme {
        id: "legendary-lokito",
        name: "Legendary Lokito",
        theme: "Un gatto bianco e nero in primo piano con occhi verdi, seguito da un esercito di \
                squali, cani, zanzare e uccelli.",
        image_prompt: "Professional TCG card pack cover. In the extreme foreground, a close-up of a \
                       charismatic black and white cat with piercing bright green eyes. In the \
                       background, a chaotic and epic army consisting of sharks, various dogs, giant \
                       mosquitoes, and flying birds. High-fantasy digital art, cinematic lighting, \
                       vibrant colors, epic composition. NO TEXT.",
        signature: Some(LOKITO_KEY),
    },
    PackTheme {
        id: "legendary-romeo",
        name: "Legendary Romeo",
        theme: "Un gatto grigio e bianco molto ciccione seguito da un esercito di squali, cani, \
                zanzare e uccelli.",
        image_prompt: "Professional TCG card pack cover. In the foreground, a very fat and majestic \
                       grey and white cat sitting proudly. In the background, an epic gathering of \
                       animals: sharks, dogs, large mosquitoes, and birds. Cinematic high-fantasy \
                       style, vibrant lighting, rich colors. NO TEXT.",
        signature: None,
    },
    PackTheme {
        id: "legendary-buck",
        name: "Legendary Buck",
        theme: "Un gatto arancione saggio con un occhio solo seguito da un esercito di squali, \
                cani, zanzare e uccelli.",
        image_prompt: "Professional TCG card pack cover. In the foreground, a wise orange cat with \
                       one blind eye (scarred eye). In the background, a massive army of diverse \
                       animals including sharks, dogs, giant mosquitoes, and birds. Epic fantasy \
                       digital illustration, dramatic lighting, detailed environment. NO TEXT.",
        signature: None,
    },
];

/// 依 id 查詢卡包
pub fn find_pack(id: &str) -> Option<&'static PackTheme> {
    PACK_THEMES.iter().find(|p| p.id == id)
}

// ============================================================================
// 開包計畫
// ============================================================================

/// 開包前決定的內容：稀有度序列與生成種子
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackPlan {
    pub pack_id: &'static str,
    pub rarities: Vec<Rarity>,
    /// 金包：5 張都從稀有池抽
    pub gold_roll: bool,
    pub seed: u64,
}

/// 抽出卡包的稀有度序列
pub fn plan_pack(
    pack: &PackTheme,
    weights: &RarityWeights,
    gold_chance: f64,
    rng: &mut StdRng,
) -> PackPlan {
    let gold_roll = gold_chance > 0.0 && rng.gen_bool(gold_chance.min(1.0));
    let high_pool = Rarity::rare_or_better();
    let full_pool = Rarity::all();

    let mut rarities = Vec::with_capacity(CARDS_PER_PACK);
    rarities.push(sample_rarity(high_pool, weights, rng).unwrap_or(Rarity::Rare));
    let rest_pool = if gold_roll { high_pool } else { full_pool };
    for _ in 1..CARDS_PER_PACK {
        rarities.push(sample_rarity(rest_pool, weights, rng).unwrap_or(Rarity::Common));
    }
    rarities.shuffle(rng);

    PackPlan {
        pack_id: pack.id,
        rarities,
        gold_roll,
        seed: rng.gen(),
    }
}

// ============================================================================
// 草稿整理
// ============================================================================

/// 把生成器回傳的草稿整理成剛好 5 張
///
/// - 缺少或不可用的草稿 → 計畫稀有度的佔位卡
/// - 沒有定位的草稿 → 隨機定位
/// - 卡包有簽名卡時取代第一張
pub fn finalize_drafts(
    plan: &PackPlan,
    pack: &PackTheme,
    drafts: Vec<CardDraft>,
    rng: &mut StdRng,
) -> Vec<CardDraft> {
    let mut drafts = drafts.into_iter();
    let mut result = Vec::with_capacity(plan.rarities.len());

    for rarity in &plan.rarities {
        let draft = match drafts.next() {
            Some(draft) if draft.is_usable() => draft,
            _ => {
                let animal_type = *AnimalType::all().choose(rng).unwrap_or(&AnimalType::Felino);
                CardDraft::placeholder(*rarity, animal_type)
            }
        };
        result.push(draft);
    }

    for draft in &mut result {
        if draft.role.is_none() {
            draft.role = Role::all().choose(rng).copied();
        }
    }

    if let Some(design) = pack.signature.and_then(catalog::find_design) {
        if let Some(first) = result.first_mut() {
            *first = CardDraft::from_design(design);
        }
    }

    result
}

// ============================================================================
// 開包結果
// ============================================================================

/// 卡包內容
#[derive(Clone, Debug)]
pub struct PackContents {
    pub pack_id: &'static str,
    pub cards: Vec<CardInstance>,
    pub is_jackpot: bool,
    pub gold_roll: bool,
    /// 生成失敗補上的佔位卡數量
    pub placeholders: u32,
}

impl PackContents {
    pub fn new(plan: &PackPlan, cards: Vec<CardInstance>) -> Self {
        let is_jackpot = cards.iter().any(|c| c.rarity.is_jackpot());
        let placeholders = cards.iter().filter(|c| c.is_placeholder()).count() as u32;
        Self {
            pack_id: plan.pack_id,
            cards,
            is_jackpot,
            gold_roll: plan.gold_roll,
            placeholders,
        }
    }
}

// ============================================================================
// 單元測試
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, rarity: Rarity) -> CardDraft {
        CardDraft {
            name: name.to_string(),
            description: "x".to_string(),
            rarity,
            animal_type: AnimalType::Cane,
            role: None,
            attack: 5,
            defense: 5,
            hp: 5,
            image_prompt: None,
        }
    }

    #[test]
    fn test_pack_lookup() {
        assert_eq!(find_pack("legendary-buck").map(|p| p.name), Some("Legendary Buck"));
        assert!(find_pack("missing").is_none());
    }

    #[test]
    fn test_plan_has_five_with_guarantee() {
        let mut rng = StdRng::seed_from_u64(42);
        let pack = &PACK_THEMES[1];
        for _ in 0..500 {
            let plan = plan_pack(pack, &RarityWeights::default(), 0.01, &mut rng);
            assert_eq!(plan.rarities.len(), CARDS_PER_PACK);
            assert!(plan.rarities.iter().any(|r| *r >= Rarity::Rare));
        }
    }

    #[test]
    fn test_gold_roll_all_rare() {
        let mut rng = StdRng::seed_from_u64(7);
        let plan = plan_pack(&PACK_THEMES[0], &RarityWeights::default(), 1.0, &mut rng);
        assert!(plan.gold_roll);
        assert!(plan.rarities.iter().all(|r| *r >= Rarity::Rare));
    }

    #[test]
    fn test_no_gold_roll_when_disabled() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let plan = plan_pack(&PACK_THEMES[1], &RarityWeights::default(), 0.0, &mut rng);
            assert!(!plan.gold_roll);
        }
    }

    #[test]
    fn test_finalize_pads_with_placeholders() {
        let mut rng = StdRng::seed_from_u64(1);
        let plan = PackPlan {
            pack_id: "legendary-romeo",
            rarities: vec![Rarity::Rare, Rarity::Common, Rarity::Common, Rarity::Uncommon, Rarity::Common],
            gold_roll: false,
            seed: 0,
        };
        let mut bad = draft("", Rarity::Common);
        bad.attack = 0;
        let drafts = vec![draft("Fido", Rarity::Rare), bad];

        let result = finalize_drafts(&plan, &PACK_THEMES[1], drafts, &mut rng);
        assert_eq!(result.len(), 5);
        assert_eq!(result[0].name, "Fido");
        assert!(!result[1].is_usable());
        assert_eq!(result[1].rarity, Rarity::Common);
        assert_eq!(result[3].rarity, Rarity::Uncommon);
        assert!(result.iter().all(|d| d.role.is_some()));
    }

    #[test]
    fn test_signature_replaces_first() {
        let mut rng = StdRng::seed_from_u64(1);
        let plan = PackPlan {
            pack_id: "legendary-lokito",
            rarities: vec![Rarity::Rare; 5],
            gold_roll: false,
            seed: 0,
        };
        let drafts = (0..5).map(|i| draft(&format!("C{}", i), Rarity::Rare)).collect();
        let result = finalize_drafts(&plan, &PACK_THEMES[0], drafts, &mut rng);
        assert_eq!(result[0].name, "Lokito");
        assert_eq!(result[0].role, Some(Role::Attaccante));
        assert_eq!(result[1].name, "C1");
    }

    #[test]
    fn test_jackpot_flag() {
        let plan = PackPlan {
            pack_id: "legendary-romeo",
            rarities: vec![],
            gold_roll: false,
            seed: 0,
        };
        let card = |rarity| draft("A", rarity).into_instance("i".into(), String::new(), 0);

        let normal = PackContents::new(&plan, vec![card(Rarity::Rare), card(Rarity::Common)]);
        assert!(!normal.is_jackpot);

        let jackpot = PackContents::new(&plan, vec![card(Rarity::Common), card(Rarity::SuperRare)]);
        assert!(jackpot.is_jackpot);
    }
}
