//! 服務層模組
//!
//! 提供 gRPC 服務所需的狀態管理、內容生成、持久化與訊息轉換

#![allow(unused_imports)]

pub mod convert;
pub mod generator;
pub mod guard;
pub mod resolver;
pub mod state;
pub mod storage;

pub use generator::{build_generator, ContentGenerator};
pub use guard::InFlight;
pub use resolver::{pack_cover, resolve_pack, resolve_slot_card};
pub use state::AppState;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
