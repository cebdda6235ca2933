//! 相簿檢視：篩選與完成度

use super::cards::{AnimalType, CardInstance, Rarity, Role};
use super::collection::Collection;
use super::slots::SlotRegistry;

/// 相簿篩選條件（None 代表全部）
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AlbumFilter {
    pub rarity: Option<Rarity>,
    pub animal_type: Option<AnimalType>,
    pub role: Option<Role>,
    pub owned_only: bool,
}

impl AlbumFilter {
    fn accepts(&self, rarity: Rarity, animal_type: AnimalType, role: Role, count: u32) -> bool {
        self.rarity.map_or(true, |r| r == rarity)
            && self.animal_type.map_or(true, |t| t == animal_type)
            && self.role.map_or(true, |r| r == role)
            && (!self.owned_only || count > 0)
    }
}

/// 相簿項目
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlbumEntry {
    pub design_key: String,
    pub rarity: Rarity,
    pub animal_type: AnimalType,
    pub role: Role,
    pub predefined: bool,
    pub count: u32,
    pub card: Option<CardInstance>,
}

/// 完成度
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Completion {
    pub owned_slots: u32,
    pub total_slots: u32,
    pub total_cards: u32,
}

/// 列出相簿：先登錄表順序，再附上登錄表外的收藏（臨時槽位 / 舊存檔）
pub fn album_entries(
    registry: &SlotRegistry,
    collection: &Collection,
    filter: &AlbumFilter,
) -> Vec<AlbumEntry> {
    let slots = registry.slots().iter().map(|slot| {
        let owned = collection.get(&slot.design_key);
        AlbumEntry {
            design_key: slot.design_key.clone(),
            rarity: slot.rarity,
            animal_type: slot.animal_type,
            role: slot.role,
            predefined: slot.predefined,
            count: owned.map(|e| e.count).unwrap_or(0),
            card: owned.map(|e| e.card.clone()),
        }
    });

    let extras = collection
        .iter()
        .filter(|(key, _)| !registry.contains(key))
        .map(|(key, entry)| AlbumEntry {
            design_key: key.clone(),
            rarity: entry.card.rarity,
            animal_type: entry.card.animal_type,
            role: entry.card.role,
            predefined: false,
            count: entry.count,
            card: Some(entry.card.clone()),
        });

    slots
        .chain(extras)
        .filter(|e| filter.accepts(e.rarity, e.animal_type, e.role, e.count))
        .collect()
}

/// 計算相簿完成度（只計登錄表內的槽位）
pub fn completion(registry: &SlotRegistry, collection: &Collection) -> Completion {
    let owned_slots = registry
        .slots()
        .iter()
        .filter(|slot| collection.contains(&slot.design_key))
        .count() as u32;

    Completion {
        owned_slots,
        total_slots: registry.len() as u32,
        total_cards: collection.total_cards(),
    }
}

// ============================================================================
// 單元測試
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::cards::CardDraft;
    use crate::game::catalog::{find_design, LOKITO_KEY};
    use crate::game::slots::SlotTargets;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn setup() -> (SlotRegistry, Collection) {
        let registry = SlotRegistry::build(&SlotTargets::default());
        let mut collection = Collection::new();
        let mut rng = StdRng::seed_from_u64(1);
        let lokito = CardDraft::from_design(find_design(LOKITO_KEY).unwrap())
            .into_instance("a".into(), String::new(), 0);
        collection.merge(vec![lokito.clone(), lokito], &registry, &mut rng, 0);
        (registry, collection)
    }

    #[test]
    fn test_unfiltered_lists_every_slot() {
        let (registry, collection) = setup();
        let entries = album_entries(&registry, &collection, &AlbumFilter::default());
        assert_eq!(entries.len(), registry.len());
        let lokito = entries.iter().find(|e| e.design_key == LOKITO_KEY).unwrap();
        assert_eq!(lokito.count, 2);
        assert!(lokito.card.is_some());
    }

    #[test]
    fn test_filters_combine() {
        let (registry, collection) = setup();
        let filter = AlbumFilter {
            rarity: Some(Rarity::Legendary),
            animal_type: Some(AnimalType::Felino),
            role: None,
            owned_only: false,
        };
        let entries = album_entries(&registry, &collection, &filter);
        assert_eq!(entries.len(), 3);

        let owned = AlbumFilter {
            owned_only: true,
            ..filter
        };
        let entries = album_entries(&registry, &collection, &owned);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].design_key, LOKITO_KEY);
    }

    #[test]
    fn test_extras_are_listed() {
        let (registry, _) = setup();
        let card = CardDraft::from_design(find_design("bolla").unwrap())
            .into_instance("b".into(), String::new(), 0);
        let mut modified = card.clone();
        modified.name = "Bolla Antica".into();
        let collection = Collection::from_legacy(vec![modified], 55);

        let entries = album_entries(&registry, &collection, &AlbumFilter::default());
        assert_eq!(entries.len(), registry.len() + 1);
        assert_eq!(entries.last().map(|e| e.design_key.as_str()), Some("legacy-pesce-comune-55"));
    }

    #[test]
    fn test_completion() {
        let (registry, collection) = setup();
        let stats = completion(&registry, &collection);
        assert_eq!(stats.owned_slots, 1);
        assert_eq!(stats.total_slots, registry.len() as u32);
        assert_eq!(stats.total_cards, 2);
    }
}
