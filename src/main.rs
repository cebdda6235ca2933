use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use log::{debug, info};
use tokio::sync::{Mutex, OnceCell};
use tonic::{Request, Response, Status};

use randagi_env::proto::album_env_server::{AlbumEnv, AlbumEnvServer};
use randagi_env::proto::{
    GetAlbumRequest, GetAlbumResponse, GetOddsRequest, GetOddsResponse, GetStateRequest,
    ListPacksRequest, ListPacksResponse, OpenPackRequest, OpenPackResponse, SellCardRequest,
    SellCardResponse, StateSnapshot, UnlockSlotRequest, UnlockSlotResponse,
};

// 設定與錯誤
mod config;
mod error;

// 遊戲核心模組
mod game;
mod service;

use config::Config;
use error::StorageError;
use game::{now_millis, simulate_jackpot_rate, PACK_THEMES};
use service::convert::{
    album_entry_to_proto, album_filter, card_to_proto, odds_response, pack_info,
    placement_to_proto, snapshot,
};
use service::{
    build_generator, pack_cover, resolve_pack, resolve_slot_card, AppState, ContentGenerator,
    FileStore, InFlight, KeyValueStore, MemoryStore,
};

/// 機率說明用的模擬包數
const ODDS_SIMULATION_PACKS: usize = 200_000;

/// 同時只允許開一包
const OPEN_PACK_KEY: &str = "open-pack";

// ============================================================================
// gRPC 服務
// ============================================================================

struct AlbumService {
    state: Mutex<AppState>,
    generator: Arc<dyn ContentGenerator>,
    in_flight: InFlight,
    /// 卡包封面只生成一次
    pack_covers: DashMap<&'static str, String>,
    jackpot_rate: OnceCell<f64>,
    seed: u64,
}

impl AlbumService {
    fn new(state: AppState, generator: Arc<dyn ContentGenerator>, seed: u64) -> Self {
        Self {
            state: Mutex::new(state),
            generator,
            in_flight: InFlight::new(),
            pack_covers: DashMap::new(),
            jackpot_rate: OnceCell::new(),
            seed,
        }
    }

    async fn snapshot(&self) -> StateSnapshot {
        snapshot(&*self.state.lock().await)
    }
}

#[tonic::async_trait]
impl AlbumEnv for AlbumService {
    async fn get_state(
        &self,
        _request: Request<GetStateRequest>,
    ) -> Result<Response<StateSnapshot>, Status> {
        Ok(Response::new(self.snapshot().await))
    }

    async fn list_packs(
        &self,
        _request: Request<ListPacksRequest>,
    ) -> Result<Response<ListPacksResponse>, Status> {
        let cost = self.state.lock().await.rules().pack_cost;

        let mut packs = Vec::with_capacity(PACK_THEMES.len());
        for pack in PACK_THEMES {
            let cached = self.pack_covers.get(pack.id).map(|url| url.value().clone());
            let cover_url = match cached {
                Some(url) => url,
                None => {
                    let url = pack_cover(self.generator.as_ref(), pack).await;
                    self.pack_covers.insert(pack.id, url.clone());
                    url
                }
            };
            packs.push(pack_info(pack, cost, cover_url));
        }

        Ok(Response::new(ListPacksResponse { packs }))
    }

    async fn open_pack(
        &self,
        request: Request<OpenPackRequest>,
    ) -> Result<Response<OpenPackResponse>, Status> {
        let pack_id = request.into_inner().pack_id;
        let _guard = self.in_flight.acquire(OPEN_PACK_KEY)?;

        let ticket = self.state.lock().await.begin_pack(&pack_id)?;
        let result = resolve_pack(&ticket.plan, ticket.pack, self.generator.as_ref(), now_millis()).await;

        let mut state = self.state.lock().await;
        let opened = state.complete_pack(ticket, result, now_millis())?;
        info!(
            "opened {}: {} cards ({} placeholders), jackpot={}, coins={}",
            pack_id,
            opened.contents.cards.len(),
            opened.contents.placeholders,
            opened.contents.is_jackpot,
            state.coins()
        );

        Ok(Response::new(OpenPackResponse {
            cards: opened.contents.cards.iter().map(card_to_proto).collect(),
            is_jackpot: opened.contents.is_jackpot,
            gold_roll: opened.contents.gold_roll,
            placements: opened.outcomes.iter().map(placement_to_proto).collect(),
            state: Some(snapshot(&state)),
            placeholders: opened.contents.placeholders,
        }))
    }

    async fn sell_card(
        &self,
        request: Request<SellCardRequest>,
    ) -> Result<Response<SellCardResponse>, Status> {
        let design_key = request.into_inner().design_key;
        let mut state = self.state.lock().await;
        let sale = state.sell(&design_key)?;
        debug!("sold {} for {} ({} left)", design_key, sale.price, sale.remaining);

        Ok(Response::new(SellCardResponse {
            price: sale.price,
            remaining: sale.remaining,
            state: Some(snapshot(&state)),
        }))
    }

    async fn unlock_slot(
        &self,
        request: Request<UnlockSlotRequest>,
    ) -> Result<Response<UnlockSlotResponse>, Status> {
        let design_key = request.into_inner().design_key;
        let _guard = self.in_flight.acquire(format!("unlock:{}", design_key))?;

        let ticket = self.state.lock().await.begin_unlock(&design_key)?;
        let cost = ticket.cost;
        let result = resolve_slot_card(&ticket.slot, self.generator.as_ref(), ticket.seed, now_millis()).await;

        let mut state = self.state.lock().await;
        let card = state.complete_unlock(ticket, result)?;
        info!("unlocked {} for {} coins", design_key, cost);

        Ok(Response::new(UnlockSlotResponse {
            card: Some(card_to_proto(&card)),
            cost,
            state: Some(snapshot(&state)),
        }))
    }

    async fn get_album(
        &self,
        request: Request<GetAlbumRequest>,
    ) -> Result<Response<GetAlbumResponse>, Status> {
        let filter = album_filter(&request.into_inner())?;
        let state = self.state.lock().await;
        let completion = state.completion();

        Ok(Response::new(GetAlbumResponse {
            entries: state.album(&filter).iter().map(album_entry_to_proto).collect(),
            owned_slots: completion.owned_slots,
            total_slots: completion.total_slots,
        }))
    }

    async fn get_odds(
        &self,
        _request: Request<GetOddsRequest>,
    ) -> Result<Response<GetOddsResponse>, Status> {
        let (weights, gold_chance) = {
            let state = self.state.lock().await;
            (state.rules().rarity_weights, state.rules().gold_pack_chance)
        };
        let seed = self.seed;

        let rate = self
            .jackpot_rate
            .get_or_try_init(|| async move {
                tokio::task::spawn_blocking(move || {
                    simulate_jackpot_rate(&weights, gold_chance, ODDS_SIMULATION_PACKS, seed)
                })
                .await
            })
            .await
            .map_err(|err| Status::internal(format!("odds simulation failed: {}", err)))?;

        let state = self.state.lock().await;
        Ok(Response::new(odds_response(&state, Some(*rate))))
    }
}

// ============================================================================
// 啟動
// ============================================================================

fn open_store(config: &Config) -> Result<Box<dyn KeyValueStore>, StorageError> {
    match &config.data_dir {
        Some(dir) => Ok(Box::new(FileStore::new(dir)?)),
        None => Ok(Box::new(MemoryStore::with_capacity(config.storage_quota_bytes))),
    }
}

/// 每秒推進被動收入倒數
fn spawn_income_ticker(service: Arc<AlbumService>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(1));
        interval.tick().await;
        loop {
            interval.tick().await;
            let mut state = service.state.lock().await;
            if let Some(amount) = state.tick() {
                info!("passive income +{} (coins={})", amount, state.coins());
            }
        }
    });
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::load()?;
    let addr: SocketAddr = config.listen_addr.parse()?;
    let seed = config.seed.unwrap_or_else(rand::random);

    let store = open_store(&config)?;
    let state = AppState::new(config.rules.clone(), store, seed, now_millis());
    let generator = build_generator(config.generator);
    info!("using {} generator (seed {})", generator.name(), seed);

    let service = Arc::new(AlbumService::new(state, generator, seed));
    spawn_income_ticker(Arc::clone(&service));

    info!("AlbumEnv gRPC server listening on {}", addr);

    tonic::transport::Server::builder()
        .add_service(AlbumEnvServer::from_arc(service))
        .serve(addr)
        .await?;

    Ok(())
}
