pub mod classify;
pub mod config;
pub mod error;
pub mod types;

pub use classify::classify;
pub use config::EngineConfig;
pub use error::HarvestError;
pub use types::*;
