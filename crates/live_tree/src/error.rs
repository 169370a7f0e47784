//! Error types for live tree operations

use crate::SubscriptionId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TreeError {
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    #[error("Document has no body")]
    NoBody,

    #[error("Subscription not found: {0}")]
    SubscriptionNotFound(SubscriptionId),

    #[error("Host error: {0}")]
    Host(String),
}

impl TreeError {
    /// Create a new NodeNotFound error
    pub fn node_not_found(node: impl std::fmt::Display) -> Self {
        Self::NodeNotFound(node.to_string())
    }

    /// Create a new Host error
    pub fn host(msg: impl Into<String>) -> Self {
        Self::Host(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, TreeError>;
