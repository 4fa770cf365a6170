//! # Node State and Seeding
//!
//! The per-node `(susceptible, infected)` pair and the initial infection.
//!
//! ## Seeding
//!
//! Every run starts with three infected nodes, not one:
//!
//! ```text
//! start, (start + 1) mod N, (start + 4) mod N
//! ```
//!
//! On small networks two offsets can land on the same node, which leaves
//! fewer than three distinct infected nodes.

use bytemuck::{Pod, Zeroable};

use crate::error::{StateError, StateResult};

/// Offsets from the start node that are seeded as infected.
pub const SEED_OFFSETS: [usize; 3] = [0, 1, 4];

/// Epidemic state of a single node.
///
/// `#[repr(C)]` so a state buffer can be handed to a compute kernel as a flat
/// array of `2 * N` floats.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct NodeState {
    /// Susceptible fraction of the node.
    pub susceptible: f32,
    /// Infected fraction of the node.
    pub infected: f32,
}

impl NodeState {
    /// Fully susceptible, not infected.
    pub const SUSCEPTIBLE: Self = Self::new(1.0, 0.0);

    /// Fully infected.
    pub const INFECTED: Self = Self::new(0.0, 1.0);

    /// Both channels zero. Contents of a buffer that has never been written.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Creates a node state.
    #[inline]
    #[must_use]
    pub const fn new(susceptible: f32, infected: f32) -> Self {
        Self {
            susceptible,
            infected,
        }
    }

    /// Returns true if both channels are finite numbers.
    #[inline]
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.susceptible.is_finite() && self.infected.is_finite()
    }
}

/// Returns the node indices seeded as infected for `start_node`.
///
/// # Errors
///
/// Returns an error if `node_count` is zero or `start_node` is out of range.
pub fn seed_nodes(node_count: usize, start_node: usize) -> StateResult<[usize; 3]> {
    if node_count == 0 {
        return Err(StateError::Empty);
    }
    if start_node >= node_count {
        return Err(StateError::StartNodeOutOfRange {
            start_node,
            node_count,
        });
    }
    Ok(SEED_OFFSETS.map(|offset| (start_node + offset) % node_count))
}

/// Builds the initial state: everything susceptible except the seed nodes.
///
/// # Errors
///
/// Returns an error if `node_count` is zero or `start_node` is out of range.
pub fn initial_states(node_count: usize, start_node: usize) -> StateResult<Vec<NodeState>> {
    let seeds = seed_nodes(node_count, start_node)?;
    let mut states = vec![NodeState::SUSCEPTIBLE; node_count];
    for index in seeds {
        states[index] = NodeState::INFECTED;
    }
    Ok(states)
}
