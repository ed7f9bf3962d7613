pub mod charset;
pub mod config;
pub mod entropy;
pub mod error;
pub mod generator;
pub mod history;

pub use charset::{Category, CharacterPool};
pub use config::{GenerationConfig, HistoryConfig};
pub use entropy::{assess, Rating, StrengthAssessment};
pub use error::{ConfigError, HistoryError, StoreCorruption};
pub use generator::{generate, generate_password, ChaChaSource, RandomSource, RngSource};
pub use history::{HistoryEntry, HistoryStore, Snapshot};
