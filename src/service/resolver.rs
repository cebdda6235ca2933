//! 卡包與槽位解析
//!
//! 把開包計畫交給生成器，補上佔位卡、圖片與 id，組成完整的卡包內容。
//! 單張圖片失敗只換成備援圖片，不會讓整包失敗；文字生成失敗則整個操作失敗，
//! 由狀態層退款。

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::generator::{ContentGenerator, PackRequest, SlotRequest};
use crate::error::{GameError, GenerationError};
use crate::game::{
    card_id, finalize_drafts, find_design, AlbumSlot, CardDraft, CardInstance, PackContents,
    PackPlan, PackTheme, FALLBACK_CARD_IMAGE, FALLBACK_PACK_IMAGE,
};

/// 解析整包卡片
pub async fn resolve_pack(
    plan: &PackPlan,
    pack: &PackTheme,
    generator: &dyn ContentGenerator,
    now_ms: u64,
) -> Result<PackContents, GameError> {
    let request = PackRequest {
        theme: pack.theme.to_string(),
        rarities: plan.rarities.clone(),
        seed: plan.seed,
    };
    let drafts = generator.generate_cards(&request).await?;
    if drafts.len() != plan.rarities.len() {
        warn!(
            "{} generator returned {} cards for a {}-card pack",
            generator.name(),
            drafts.len(),
            plan.rarities.len()
        );
    }

    let mut rng = StdRng::seed_from_u64(plan.seed);
    let drafts = finalize_drafts(plan, pack, drafts, &mut rng);
    let placeholders = drafts.iter().filter(|d| !d.is_usable()).count();
    if placeholders > 0 {
        warn!("{} placeholder card(s) in pack {}", placeholders, pack.id);
    }

    let mut cards = Vec::with_capacity(drafts.len());
    for (index, draft) in drafts.into_iter().enumerate() {
        let image_url = card_image(generator, &draft).await;
        let id = card_id(now_ms, index, rng.gen());
        cards.push(draft.into_instance(id, image_url, now_ms));
    }

    Ok(PackContents::new(plan, cards))
}

/// 解析直接解鎖的卡片
///
/// 預定義槽位直接用目錄設計；通用槽位要求生成器產出，並強制套用槽位的
/// 稀有度、類型與定位。
pub async fn resolve_slot_card(
    slot: &AlbumSlot,
    generator: &dyn ContentGenerator,
    seed: u64,
    now_ms: u64,
) -> Result<CardInstance, GameError> {
    let draft = match find_design(&slot.design_key) {
        Some(design) if slot.predefined => CardDraft::from_design(design),
        _ => {
            let request = SlotRequest {
                rarity: slot.rarity,
                animal_type: slot.animal_type,
                role: slot.role,
                seed,
            };
            let mut draft = generator.generate_card(&request).await?;
            if !draft.is_usable() {
                return Err(GenerationError::Malformed(format!(
                    "unusable card for slot {}",
                    slot.design_key
                ))
                .into());
            }
            draft.rarity = slot.rarity;
            draft.animal_type = slot.animal_type;
            draft.role = Some(slot.role);
            draft
        }
    };

    let image_url = card_image(generator, &draft).await;
    let id = card_id(now_ms, 0, seed as u32);
    Ok(draft.into_instance(id, image_url, now_ms))
}

/// 卡包封面
pub async fn pack_cover(generator: &dyn ContentGenerator, pack: &PackTheme) -> String {
    image_or_fallback(generator, pack.image_prompt, FALLBACK_PACK_IMAGE).await
}

async fn card_image(generator: &dyn ContentGenerator, draft: &CardDraft) -> String {
    // 佔位卡不浪費生成額度
    if !draft.is_usable() {
        return FALLBACK_CARD_IMAGE.to_string();
    }
    image_or_fallback(generator, &draft.image_prompt(), FALLBACK_CARD_IMAGE).await
}

async fn image_or_fallback(generator: &dyn ContentGenerator, prompt: &str, fallback: &str) -> String {
    match generator.generate_image(prompt).await {
        Ok(url) if !url.trim().is_empty() => url,
        Ok(_) => {
            warn!("{} generator returned an empty image", generator.name());
            fallback.to_string()
        }
        Err(GenerationError::NotSupported(name)) => {
            debug!("{} generator has no images, using fallback", name);
            fallback.to_string()
        }
        Err(err) => {
            warn!("image generation failed: {}", err);
            fallback.to_string()
        }
    }
}

// ============================================================================
// 單元測試
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::catalog::{LOKITO_KEY, ROMEO_KEY};
    use crate::game::{
        find_pack, plan_pack, AnimalType, Rarity, RarityWeights, SlotRegistry, SlotTargets,
        PLACEHOLDER_NAME,
    };
    use crate::service::generator::{CatalogGenerator, ProceduralGenerator};

    /// 可腳本化的生成器
    struct Scripted {
        cards: Option<Vec<CardDraft>>,
        image: Option<&'static str>,
    }

    #[tonic::async_trait]
    impl ContentGenerator for Scripted {
        fn name(&self) -> &'static str {
            "scripted"
        }

        async fn generate_cards(&self, _request: &PackRequest) -> Result<Vec<CardDraft>, GenerationError> {
            self.cards
                .clone()
                .ok_or_else(|| GenerationError::Unavailable("offline".into()))
        }

        async fn generate_card(&self, _request: &SlotRequest) -> Result<CardDraft, GenerationError> {
            match &self.cards {
                Some(cards) => cards
                    .first()
                    .cloned()
                    .ok_or_else(|| GenerationError::Malformed("empty".into())),
                None => Err(GenerationError::Unavailable("offline".into())),
            }
        }

        async fn generate_image(&self, _prompt: &str) -> Result<String, GenerationError> {
            self.image
                .map(str::to_string)
                .ok_or_else(|| GenerationError::Unavailable("offline".into()))
        }
    }

    fn plan(pack_id: &str, seed: u64) -> (PackPlan, &'static PackTheme) {
        let pack = find_pack(pack_id).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        (plan_pack(pack, &RarityWeights::default(), 0.0, &mut rng), pack)
    }

    #[tokio::test]
    async fn test_resolve_pack_with_catalog() {
        let (plan, pack) = plan("legendary-romeo", 3);
        let contents = resolve_pack(&plan, pack, &CatalogGenerator::new(true), 1000)
            .await
            .unwrap();
        assert_eq!(contents.cards.len(), 5);
        assert!(contents.cards.iter().any(|c| c.rarity >= Rarity::Rare));
        assert!(contents.cards.iter().all(|c| c.image_url == FALLBACK_CARD_IMAGE));

        let mut ids: Vec<_> = contents.cards.iter().map(|c| c.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 5);
    }

    #[tokio::test]
    async fn test_signature_card_replaces_first() {
        let (plan, pack) = plan("legendary-lokito", 9);
        let contents = resolve_pack(&plan, pack, &ProceduralGenerator, 0).await.unwrap();
        assert_eq!(contents.cards[0].name, "Lokito");
        assert!(contents.is_jackpot);
    }

    #[tokio::test]
    async fn test_short_output_is_padded_with_placeholders() {
        let (plan, pack) = plan("legendary-buck", 5);
        let generator = Scripted {
            cards: Some(vec![CardDraft::from_design(find_design(ROMEO_KEY).unwrap())]),
            image: Some("https://img/ok.png"),
        };
        let contents = resolve_pack(&plan, pack, &generator, 0).await.unwrap();
        assert_eq!(contents.cards.len(), 5);
        assert_eq!(contents.cards[0].name, "Romeo");
        assert_eq!(contents.cards[0].image_url, "https://img/ok.png");
        for card in &contents.cards[1..] {
            assert!(card.is_placeholder());
            assert_eq!(card.name, PLACEHOLDER_NAME);
            assert_eq!(card.image_url, FALLBACK_CARD_IMAGE);
        }
        for (card, rarity) in contents.cards[1..].iter().zip(&plan.rarities[1..]) {
            assert_eq!(card.rarity, *rarity);
        }
    }

    #[tokio::test]
    async fn test_generator_failure_fails_pack() {
        let (plan, pack) = plan("legendary-buck", 5);
        let generator = Scripted { cards: None, image: None };
        let result = resolve_pack(&plan, pack, &generator, 0).await;
        assert!(matches!(result, Err(GameError::Generation(GenerationError::Unavailable(_)))));
    }

    #[tokio::test]
    async fn test_predefined_slot_needs_no_generator() {
        let registry = SlotRegistry::build(&SlotTargets::default());
        let slot = registry.get(LOKITO_KEY).unwrap();
        let generator = Scripted { cards: None, image: None };
        let card = resolve_slot_card(slot, &generator, 7, 0).await.unwrap();
        assert_eq!(card.name, "Lokito");
        assert_eq!(card.image_url, FALLBACK_CARD_IMAGE);
    }

    #[tokio::test]
    async fn test_generic_slot_forces_slot_attributes() {
        let registry = SlotRegistry::build(&SlotTargets::default());
        let slot = registry
            .generic_slots(AnimalType::Pesce, Rarity::SuperRare)
            .next()
            .unwrap()
            .clone();
        let generator = Scripted {
            cards: Some(vec![CardDraft::from_design(find_design(ROMEO_KEY).unwrap())]),
            image: None,
        };
        let card = resolve_slot_card(&slot, &generator, 7, 0).await.unwrap();
        assert_eq!(card.rarity, Rarity::SuperRare);
        assert_eq!(card.animal_type, AnimalType::Pesce);
        assert_eq!(card.role, slot.role);
    }

    #[tokio::test]
    async fn test_unusable_slot_card_is_rejected() {
        let registry = SlotRegistry::build(&SlotTargets::default());
        let slot = registry
            .generic_slots(AnimalType::Cane, Rarity::Common)
            .next()
            .unwrap()
            .clone();
        let generator = Scripted {
            cards: Some(vec![CardDraft::placeholder(Rarity::Common, AnimalType::Cane)]),
            image: None,
        };
        let result = resolve_slot_card(&slot, &generator, 1, 0).await;
        assert!(matches!(result, Err(GameError::Generation(GenerationError::Malformed(_)))));
    }

    #[tokio::test]
    async fn test_pack_cover_fallback() {
        let pack = find_pack("legendary-lokito").unwrap();
        let offline = Scripted { cards: None, image: None };
        assert_eq!(pack_cover(&offline, pack).await, FALLBACK_PACK_IMAGE);

        let empty = Scripted { cards: None, image: Some("  ") };
        assert_eq!(pack_cover(&empty, pack).await, FALLBACK_PACK_IMAGE);

        let online = Scripted { cards: None, image: Some("https://img/cover.png") };
        assert_eq!(pack_cover(&online, pack).await, "https://img/cover.png");
    }
}
