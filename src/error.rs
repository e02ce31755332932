// src/error.rs
//! Structured errors surfaced by the engine.
//!
//! The engine degrades gracefully almost everywhere; the only hard failure on the
//! hot path is a malformed article batch. Config loading reuses the same type.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("article #{index} is missing required field `{field}`")]
    MissingField { index: usize, field: &'static str },

    #[error("article id `{id}` appears more than once in the batch")]
    DuplicateId { id: String },

    #[error("invalid engine config: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl EngineError {
    /// True for errors caused by the caller's article batch (as opposed to local config/IO).
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            EngineError::MissingField { .. } | EngineError::DuplicateId { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
