use crate::charset::Category;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A generation request that cannot produce a password.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("At least one character type must be enabled")]
    NoCategories,

    #[error("Every enabled character type is fully excluded, nothing left to sample from")]
    EmptyPool,

    #[error("All {} characters are excluded, enable another set or relax --exclude", .0.label())]
    EmptyCategory(Category),

    #[error("Password length must be at least 1")]
    ZeroLength,
}

/// The history file exists but does not hold a valid entry list.
///
/// This is recovered from: the store reports it and carries on with an
/// empty history.
#[derive(Debug, Error)]
#[error("{} is corrupted ({source}), starting a new history", .path.display())]
pub struct StoreCorruption {
    pub path: PathBuf,
    #[source]
    pub source: serde_json::Error,
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Failed to access history file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to encode history: {0}")]
    Encode(#[from] serde_json::Error),
}
