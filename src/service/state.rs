//! 遊戲狀態管理
//!
//! 所有會改變金幣或收藏的操作都在這裡，每次改變後立即持久化。
//! 需要呼叫生成器的操作拆成 `begin_*`（扣款、決定內容）與
//! `complete_*`（合併或退款）兩段，中間的非同步生成不持有狀態鎖。

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::storage::{KeyValueStore, Persistence};
use crate::config::GameRules;
use crate::error::GameError;
use crate::game::{
    album_entries, completion, find_pack, plan_pack, AlbumEntry, AlbumFilter, AlbumSlot,
    CardInstance, Collection, Completion, MergeOutcome, PackContents, PackPlan, PackTheme,
    PassiveIncome, SaleOutcome, SlotRegistry, Wallet,
};

/// 已扣款、等待生成的開包
#[derive(Clone, Debug)]
pub struct PackTicket {
    pub plan: PackPlan,
    pub pack: &'static PackTheme,
    pub cost: i64,
}

/// 已扣款、等待生成的槽位解鎖
#[derive(Clone, Debug)]
pub struct UnlockTicket {
    pub slot: AlbumSlot,
    pub cost: i64,
    pub seed: u64,
}

/// 開包結果
#[derive(Clone, Debug)]
pub struct OpenedPack {
    pub contents: PackContents,
    pub outcomes: Vec<MergeOutcome>,
}

/// 遊戲工作階段狀態
pub struct AppState {
    rng: StdRng,
    rules: GameRules,
    registry: SlotRegistry,
    wallet: Wallet,
    collection: Collection,
    income: PassiveIncome,
    persistence: Persistence,
}

impl AppState {
    /// 建立狀態並從儲存載入（必要時遷移舊存檔）
    pub fn new(rules: GameRules, store: Box<dyn KeyValueStore>, seed: u64, now_ms: u64) -> Self {
        let registry = SlotRegistry::build(&rules.slot_targets);
        let mut persistence = Persistence::new(store);
        let loaded = persistence.load(rules.starting_coins, now_ms);
        info!(
            "loaded {} coins, {} collection entries ({} album slots)",
            loaded.coins,
            loaded.collection.len(),
            registry.len()
        );

        Self {
            rng: StdRng::seed_from_u64(seed),
            income: PassiveIncome::new(rules.passive_income, rules.passive_interval_secs),
            wallet: Wallet::new(loaded.coins),
            collection: loaded.collection,
            registry,
            persistence,
            rules,
        }
    }

    // ========================================================================
    // 查詢
    // ========================================================================

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    pub fn coins(&self) -> i64 {
        self.wallet.balance()
    }

    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    pub fn registry(&self) -> &SlotRegistry {
        &self.registry
    }

    pub fn storage_degraded(&self) -> bool {
        self.persistence.is_degraded()
    }

    pub fn seconds_until_income(&self) -> u32 {
        self.income.seconds_left()
    }

    pub fn income_amount(&self) -> i64 {
        self.income.amount
    }

    pub fn completion(&self) -> Completion {
        completion(&self.registry, &self.collection)
    }

    pub fn album(&self, filter: &AlbumFilter) -> Vec<AlbumEntry> {
        album_entries(&self.registry, &self.collection, filter)
    }

    // ========================================================================
    // 金幣
    // ========================================================================

    fn spend(&mut self, amount: i64) -> Result<(), GameError> {
        self.wallet.spend(amount)?;
        self.persistence.save_coins(self.wallet.balance());
        Ok(())
    }

    fn credit(&mut self, amount: i64) {
        self.wallet.credit(amount);
        self.persistence.save_coins(self.wallet.balance());
    }

    /// 經過一秒；到期時入帳被動收入
    pub fn tick(&mut self) -> Option<i64> {
        let amount = self.income.tick()?;
        self.credit(amount);
        debug!("passive income +{} -> {}", amount, self.wallet.balance());
        Some(amount)
    }

    // ========================================================================
    // 開包
    // ========================================================================

    /// 扣款並決定稀有度序列
    pub fn begin_pack(&mut self, pack_id: &str) -> Result<PackTicket, GameError> {
        let pack = find_pack(pack_id).ok_or_else(|| GameError::UnknownPack(pack_id.to_string()))?;
        let cost = self.rules.pack_cost;
        self.spend(cost)?;

        let plan = plan_pack(
            pack,
            &self.rules.rarity_weights,
            self.rules.gold_pack_chance,
            &mut self.rng,
        );
        debug!("pack {} planned: {:?} (gold={})", pack.id, plan.rarities, plan.gold_roll);
        Ok(PackTicket { plan, pack, cost })
    }

    /// 生成成功則合併進收藏（跳過佔位卡）；失敗則全額退款
    pub fn complete_pack(
        &mut self,
        ticket: PackTicket,
        result: Result<PackContents, GameError>,
        now_ms: u64,
    ) -> Result<OpenedPack, GameError> {
        let contents = match result {
            Ok(contents) => contents,
            Err(err) => {
                warn!("pack {} failed, refunding {}: {}", ticket.pack.id, ticket.cost, err);
                self.credit(ticket.cost);
                return Err(err);
            }
        };

        // 佔位卡只回報給呼叫端，不佔用相簿槽位
        let cards = contents
            .cards
            .iter()
            .filter(|card| !card.is_placeholder())
            .cloned()
            .collect();
        let outcomes = self.merge_cards(cards, now_ms);
        Ok(OpenedPack { contents, outcomes })
    }

    /// 合併一批卡片並持久化
    pub fn merge_cards(&mut self, cards: Vec<CardInstance>, now_ms: u64) -> Vec<MergeOutcome> {
        let outcomes = self
            .collection
            .merge(cards, &self.registry, &mut self.rng, now_ms);
        self.persistence.save_collection(&self.collection);
        outcomes
    }

    // ========================================================================
    // 賣出
    // ========================================================================

    pub fn sell(&mut self, design_key: &str) -> Result<SaleOutcome, GameError> {
        let sale = self.collection.sell(design_key)?;
        self.persistence.save_collection(&self.collection);
        self.credit(sale.price);
        Ok(sale)
    }

    // ========================================================================
    // 直接解鎖
    // ========================================================================

    /// 檢查槽位並扣款
    pub fn begin_unlock(&mut self, design_key: &str) -> Result<UnlockTicket, GameError> {
        let slot = self
            .registry
            .get(design_key)
            .cloned()
            .ok_or_else(|| GameError::UnknownSlot(design_key.to_string()))?;
        if self.collection.count(design_key) > 0 {
            return Err(GameError::SlotAlreadyFilled(design_key.to_string()));
        }

        let cost = self.rules.unlock_cost;
        self.spend(cost)?;
        Ok(UnlockTicket {
            slot,
            cost,
            seed: self.rng.gen(),
        })
    }

    /// 寫入解鎖的卡片；失敗則全額退款
    pub fn complete_unlock(
        &mut self,
        ticket: UnlockTicket,
        result: Result<CardInstance, GameError>,
    ) -> Result<CardInstance, GameError> {
        let card = match result {
            Ok(card) => card,
            Err(err) => {
                warn!(
                    "unlock of {} failed, refunding {}: {}",
                    ticket.slot.design_key, ticket.cost, err
                );
                self.credit(ticket.cost);
                return Err(err);
            }
        };

        // 生成期間同一槽位可能已被開包填入
        let design_key = ticket.slot.design_key;
        if self.collection.count(&design_key) > 0 {
            warn!(
                "slot {} was filled while unlocking, refunding {}",
                design_key, ticket.cost
            );
            self.credit(ticket.cost);
            return Err(GameError::SlotAlreadyFilled(design_key));
        }

        let mut card = card;
        card.design_key = Some(design_key.clone());
        self.collection.insert_unlocked(&design_key, card.clone());
        self.persistence.save_collection(&self.collection);
        Ok(card)
    }
}

// ============================================================================
// 單元測試
// ============================================================================
