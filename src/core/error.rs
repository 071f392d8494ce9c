use thiserror::Error;

use crate::core::types::UnitId;

#[derive(Error, Debug)]
pub enum WarError {
    #[error("Unit not found: {0}")]
    UnitNotFound(UnitId),

    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Phase executed before start_turn")]
    TurnNotStarted,

    #[error("Scenario error: {0}")]
    Scenario(#[from] crate::scenario::ScenarioError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, WarError>;
