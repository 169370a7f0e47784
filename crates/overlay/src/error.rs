//! Error types for overlay operations

use live_tree::TreeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("Tree error: {0}")]
    Tree(#[from] TreeError),

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, OverlayError>;
