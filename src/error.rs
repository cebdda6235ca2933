//! 錯誤類型

use thiserror::Error;

/// 遊戲操作錯誤（全部可恢復，不會中斷工作階段）
#[derive(Debug, Error)]
pub enum GameError {
    #[error("insufficient coins: need {needed}, have {available}")]
    InsufficientCoins { needed: i64, available: i64 },
    #[error("unknown pack: {0}")]
    UnknownPack(String),
    #[error("unknown album slot: {0}")]
    UnknownSlot(String),
    #[error("design not in collection: {0}")]
    NotOwned(String),
    #[error("album slot already filled: {0}")]
    SlotAlreadyFilled(String),
    #[error("request already in progress: {0}")]
    Busy(String),
    #[error("content generation failed: {0}")]
    Generation(#[from] GenerationError),
}

/// 內容生成器錯誤
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generator unavailable: {0}")]
    Unavailable(String),
    #[error("malformed generator output: {0}")]
    Malformed(String),
    #[error("not supported by {0} generator")]
    NotSupported(&'static str),
}

/// 儲存錯誤
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage quota exceeded writing {key}: {needed} bytes > {capacity} bytes")]
    QuotaExceeded {
        key: String,
        needed: usize,
        capacity: usize,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// 設定檔錯誤
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
