//! # Network Error Types

use thiserror::Error;

/// Errors that can occur while building a network.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    /// The node count / clique size / edges-per-node combination is unusable.
    #[error("invalid network configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for network operations.
pub type NetworkResult<T> = Result<T, NetworkError>;
