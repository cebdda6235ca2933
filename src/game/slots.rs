//! 相簿槽位登錄表
//!
//! 啟動時建立一次：
//! - 每張預定義設計一個專屬槽位
//! - 每個 (動物類型, 稀有度) 補足通用槽位至目標數量
//!
//! 通用槽位的 key 為 `generic-<類型>-<稀有度>-<序號>`，定位以輪替方式分配。

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::cards::{AnimalType, CardDesign, Rarity, Role};
use super::catalog::{predefined_count, PREDEFINED_DESIGNS};
use super::constants::{
    TARGET_COMMON_SLOTS, TARGET_LEGENDARY_SLOTS, TARGET_RARE_SLOTS, TARGET_SUPER_RARE_SLOTS,
    TARGET_UNCOMMON_SLOTS,
};

/// 每個動物類型在各稀有度的目標槽位數
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotTargets {
    pub common: u32,
    pub uncommon: u32,
    pub rare: u32,
    pub super_rare: u32,
    pub legendary: u32,
}

impl Default for SlotTargets {
    fn default() -> Self {
        Self {
            common: TARGET_COMMON_SLOTS,
            uncommon: TARGET_UNCOMMON_SLOTS,
            rare: TARGET_RARE_SLOTS,
            super_rare: TARGET_SUPER_RARE_SLOTS,
            legendary: TARGET_LEGENDARY_SLOTS,
        }
    }
}

impl SlotTargets {
    pub fn target(&self, rarity: Rarity) -> u32 {
        match rarity {
            Rarity::Common => self.common,
            Rarity::Uncommon => self.uncommon,
            Rarity::Rare => self.rare,
            Rarity::SuperRare => self.super_rare,
            Rarity::Legendary => self.legendary,
        }
    }
}

/// 相簿槽位
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlbumSlot {
    pub design_key: String,
    pub rarity: Rarity,
    pub animal_type: AnimalType,
    pub role: Role,
    pub predefined: bool,
}

impl AlbumSlot {
    fn from_design(design: &CardDesign) -> Self {
        Self {
            design_key: design.design_key.to_string(),
            rarity: design.rarity,
            animal_type: design.animal_type,
            role: design.role,
            predefined: true,
        }
    }
}

/// 通用槽位 key
pub fn generic_key(animal_type: AnimalType, rarity: Rarity, seq: u32) -> String {
    format!("generic-{}-{}-{}", animal_type.slug(), rarity.slug(), seq)
}

/// 槽位登錄表（穩定順序）
#[derive(Clone, Debug)]
pub struct SlotRegistry {
    slots: Vec<AlbumSlot>,
    index: HashMap<String, usize>,
}

impl SlotRegistry {
    /// 以內建目錄建立
    pub fn build(targets: &SlotTargets) -> Self {
        Self::build_from(PREDEFINED_DESIGNS, targets)
    }

    pub fn build_from(designs: &[CardDesign], targets: &SlotTargets) -> Self {
        let mut slots: Vec<AlbumSlot> = designs.iter().map(AlbumSlot::from_design).collect();

        let mut role_cursor = 0usize;
        for animal_type in AnimalType::all() {
            for rarity in Rarity::all() {
                let used = predefined_count(designs, *animal_type, *rarity);
                let remaining = targets.target(*rarity).saturating_sub(used);

                for seq in 1..=remaining {
                    slots.push(AlbumSlot {
                        design_key: generic_key(*animal_type, *rarity, seq),
                        rarity: *rarity,
                        animal_type: *animal_type,
                        role: Role::from_index(role_cursor),
                        predefined: false,
                    });
                    role_cursor += 1;
                }
            }
        }

        let index = slots
            .iter()
            .enumerate()
            .map(|(i, slot)| (slot.design_key.clone(), i))
            .collect();

        Self { slots, index }
    }

    pub fn slots(&self) -> &[AlbumSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, design_key: &str) -> Option<&AlbumSlot> {
        self.index.get(design_key).map(|&i| &self.slots[i])
    }

    pub fn contains(&self, design_key: &str) -> bool {
        self.index.contains_key(design_key)
    }

    /// 指定 (類型, 稀有度) 的通用槽位（登錄順序）
    pub fn generic_slots(
        &self,
        animal_type: AnimalType,
        rarity: Rarity,
    ) -> impl Iterator<Item = &AlbumSlot> {
        self.slots
            .iter()
            .filter(move |s| !s.predefined && s.animal_type == animal_type && s.rarity == rarity)
    }
}

// ============================================================================
// 單元測試
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_keys_unique() {
        let registry = SlotRegistry::build(&SlotTargets::default());
        let keys: HashSet<_> = registry.slots().iter().map(|s| &s.design_key).collect();
        assert_eq!(keys.len(), registry.len());
    }

    #[test]
    fn test_total_is_stable() {
        let a = SlotRegistry::build(&SlotTargets::default());
        let b = SlotRegistry::build(&SlotTargets::default());
        assert_eq!(a.slots(), b.slots());
    }

    #[test]
    fn test_generic_fill_respects_predefined() {
        let registry = SlotRegistry::build(&SlotTargets::default());

        // Felino 有 3 張預定義傳奇，超過目標 1 → 沒有通用槽位
        assert_eq!(registry.generic_slots(AnimalType::Felino, Rarity::Legendary).count(), 0);
        // Felino 有 1 張預定義普通卡 → 補 5 個
        assert_eq!(registry.generic_slots(AnimalType::Felino, Rarity::Common).count(), 5);
        // Pesce 沒有預定義傳奇 → 補 1 個
        assert_eq!(registry.generic_slots(AnimalType::Pesce, Rarity::Legendary).count(), 1);
    }

    #[test]
    fn test_every_predefined_has_slot() {
        let registry = SlotRegistry::build(&SlotTargets::default());
        for design in PREDEFINED_DESIGNS {
            let slot = registry.get(design.design_key).unwrap();
            assert!(slot.predefined);
            assert_eq!(slot.rarity, design.rarity);
        }
    }

    #[test]
    fn test_roles_round_robin() {
        let registry = SlotRegistry::build(&SlotTargets::default());
        let mut counts: HashMap<Role, usize> = HashMap::new();
        for slot in registry.slots().iter().filter(|s| !s.predefined) {
            *counts.entry(slot.role).or_default() += 1;
        }
        let max = counts.values().max().copied().unwrap_or(0);
        let min = counts.values().min().copied().unwrap_or(0);
        assert_eq!(counts.len(), Role::all().len());
        assert!(max - min <= 1);
    }

    #[test]
    fn test_generic_key_format() {
        assert_eq!(generic_key(AnimalType::Pesce, Rarity::SuperRare, 2), "generic-pesce-super-rara-2");
    }

    #[test]
    fn test_zero_targets() {
        let targets = SlotTargets {
            common: 0,
            uncommon: 0,
            rare: 0,
            super_rare: 0,
            legendary: 0,
        };
        let registry = SlotRegistry::build(&targets);
        assert_eq!(registry.len(), PREDEFINED_DESIGNS.len());
    }
}
