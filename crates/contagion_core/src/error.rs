//! # State Error Types
//!
//! All errors that can occur while seeding or stepping the state buffers.

use thiserror::Error;

/// Errors raised by the state buffers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// The start node does not name a node of the network.
    #[error("start node {start_node} out of range for {node_count} nodes")]
    StartNodeOutOfRange {
        /// The rejected start node.
        start_node: usize,
        /// Number of nodes in the network.
        node_count: usize,
    },

    /// A buffer with zero nodes was requested.
    #[error("state buffers need at least one node")]
    Empty,

    /// A step handle is already held, so the buffers cannot be stepped or swapped.
    #[error("a step is already in progress")]
    StepActive,
}

/// Result type for state buffer operations.
pub type StateResult<T> = Result<T, StateError>;
