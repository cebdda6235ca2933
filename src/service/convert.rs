//! 遊戲類型與 protobuf 訊息之間的轉換

use randagi_env::proto;
use tonic::Status;

use super::state::AppState;
use crate::error::GameError;
use crate::game::{
    jackpot_rate_exact, pool_odds, AlbumEntry, AlbumFilter, AnimalType, CardInstance,
    MergeOutcome, PackTheme, Rarity, RarityOdds, Role,
};

/// 遊戲錯誤 → gRPC 狀態碼
impl From<GameError> for Status {
    fn from(err: GameError) -> Self {
        let message = err.to_string();
        match err {
            GameError::InsufficientCoins { .. } | GameError::SlotAlreadyFilled(_) => {
                Status::failed_precondition(message)
            }
            GameError::UnknownPack(_) | GameError::UnknownSlot(_) | GameError::NotOwned(_) => {
                Status::not_found(message)
            }
            GameError::Busy(_) => Status::aborted(message),
            GameError::Generation(_) => Status::internal(message),
        }
    }
}

pub fn card_to_proto(card: &CardInstance) -> proto::Card {
    proto::Card {
        id: card.id.clone(),
        design_key: card.design_key.clone().unwrap_or_default(),
        name: card.name.clone(),
        description: card.description.clone(),
        rarity: card.rarity.label().to_string(),
        animal_type: card.animal_type.label().to_string(),
        role: card.role.label().to_string(),
        attack: card.attack,
        defense: card.defense,
        hp: card.hp,
        image_url: card.image_url.clone(),
        timestamp: card.timestamp,
        placeholder: card.is_placeholder(),
    }
}

pub fn snapshot(state: &AppState) -> proto::StateSnapshot {
    let completion = state.completion();
    proto::StateSnapshot {
        coins: state.coins(),
        seconds_until_income: state.seconds_until_income(),
        income_amount: state.income_amount(),
        storage_degraded: state.storage_degraded(),
        owned_slots: completion.owned_slots,
        total_slots: completion.total_slots,
        total_cards: completion.total_cards,
    }
}

pub fn pack_info(pack: &PackTheme, cost: i64, cover_url: String) -> proto::PackInfo {
    proto::PackInfo {
        id: pack.id.to_string(),
        name: pack.name.to_string(),
        theme: pack.theme.to_string(),
        cost,
        cover_url,
    }
}

pub fn placement_to_proto(outcome: &MergeOutcome) -> proto::Placement {
    proto::Placement {
        design_key: outcome.design_key.clone(),
        kind: outcome.placement.label().to_string(),
    }
}

pub fn album_entry_to_proto(entry: &AlbumEntry) -> proto::AlbumEntry {
    proto::AlbumEntry {
        design_key: entry.design_key.clone(),
        rarity: entry.rarity.label().to_string(),
        animal_type: entry.animal_type.label().to_string(),
        role: entry.role.label().to_string(),
        predefined: entry.predefined,
        count: entry.count,
        card: entry.card.as_ref().map(card_to_proto),
    }
}

/// 解析篩選條件；空字串代表全部
pub fn album_filter(request: &proto::GetAlbumRequest) -> Result<AlbumFilter, Status> {
    fn parse<T>(value: &str, field: &str, from: fn(&str) -> Option<T>) -> Result<Option<T>, Status> {
        if value.is_empty() {
            return Ok(None);
        }
        from(value)
            .map(Some)
            .ok_or_else(|| Status::invalid_argument(format!("unknown {}: {}", field, value)))
    }

    Ok(AlbumFilter {
        rarity: parse(&request.rarity, "rarity", Rarity::from_label)?,
        animal_type: parse(&request.animal_type, "animal type", AnimalType::from_label)?,
        role: parse(&request.role, "role", Role::from_label)?,
        owned_only: request.owned_only,
    })
}

fn odds_to_proto(odds: Vec<RarityOdds>) -> Vec<proto::RarityOdds> {
    odds.into_iter()
        .map(|o| proto::RarityOdds {
            rarity: o.rarity.label().to_string(),
            weight: o.weight,
            probability: o.probability,
        })
        .collect()
}

/// 卡包機率說明
pub fn odds_response(state: &AppState, simulated_rate: Option<f64>) -> proto::GetOddsResponse {
    let rules = state.rules();
    let weights = &rules.rarity_weights;
    proto::GetOddsResponse {
        standard_slot: odds_to_proto(pool_odds(Rarity::all(), weights)),
        guaranteed_slot: odds_to_proto(pool_odds(Rarity::rare_or_better(), weights)),
        gold_pack_chance: rules.gold_pack_chance,
        jackpot_rate: simulated_rate.unwrap_or_else(|| jackpot_rate_exact(weights)),
        sell_prices: Rarity::all()
            .iter()
            .map(|r| (r.label().to_string(), r.sell_price()))
            .collect(),
    }
}

// ============================================================================
// 單元測試
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameRules;
    use crate::service::storage::MemoryStore;
    use tonic::Code;

    fn state() -> AppState {
        AppState::new(GameRules::default(), Box::new(MemoryStore::new()), 1, 0)
    }

    #[test]
    fn test_status_codes() {
        let insufficient = GameError::InsufficientCoins { needed: 250, available: 10 };
        assert_eq!(Status::from(insufficient).code(), Code::FailedPrecondition);
        assert_eq!(Status::from(GameError::UnknownSlot("x".into())).code(), Code::NotFound);
        assert_eq!(Status::from(GameError::Busy("x".into())).code(), Code::Aborted);
    }

    #[test]
    fn test_album_filter_parsing() {
        let request = proto::GetAlbumRequest {
            rarity: "super rara".into(),
            animal_type: String::new(),
            role: "supporto".into(),
            owned_only: true,
        };
        let filter = album_filter(&request).unwrap();
        assert_eq!(filter.rarity, Some(Rarity::SuperRare));
        assert_eq!(filter.animal_type, None);
        assert_eq!(filter.role, Some(Role::Supporto));
        assert!(filter.owned_only);

        let bad = proto::GetAlbumRequest {
            rarity: "mitica".into(),
            ..Default::default()
        };
        assert_eq!(album_filter(&bad).unwrap_err().code(), Code::InvalidArgument);
    }

    #[test]
    fn test_odds_response() {
        let response = odds_response(&state(), None);
        assert_eq!(response.standard_slot.len(), 5);
        assert_eq!(response.guaranteed_slot.len(), 3);
        let total: f64 = response.standard_slot.iter().map(|o| o.probability).sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert_eq!(response.sell_prices.get("leggendaria"), Some(&50));
        assert!(response.jackpot_rate > 0.0 && response.jackpot_rate < 1.0);
    }

    #[test]
    fn test_snapshot() {
        let snapshot = snapshot(&state());
        assert_eq!(snapshot.coins, 1000);
        assert_eq!(snapshot.owned_slots, 0);
        assert!(snapshot.total_slots > 0);
        assert!(!snapshot.storage_degraded);
    }
}
