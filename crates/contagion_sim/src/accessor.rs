//! # Result Access
//!
//! Copies of the latest completed state for renderers and analysis code.
//!
//! Every read copies out of whichever buffer is current when the read lands,
//! so callers never see a buffer the kernel is writing. Reads do not wait for
//! a step in flight; a read racing a commit returns either the old or the new
//! state, whole.

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use contagion_core::{NodeState, StateBuffers};
use contagion_network::Network;

/// One node as a renderer consumes it: position plus state.
///
/// Field order matches the vertex layout `x, y, infected, susceptible`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct NodeVertex {
    /// Layout x.
    pub x: f32,
    /// Layout y.
    pub y: f32,
    /// Infected value.
    pub infected: f32,
    /// Susceptible value.
    pub susceptible: f32,
}

/// Both channels of one completed state, split per channel.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StateSnapshot {
    /// Susceptible value per node.
    pub susceptible: Vec<f32>,
    /// Infected value per node.
    pub infected: Vec<f32>,
}

impl StateSnapshot {
    fn from_states(states: &[NodeState]) -> Self {
        Self {
            susceptible: states.iter().map(|s| s.susceptible).collect(),
            infected: states.iter().map(|s| s.infected).collect(),
        }
    }

    /// Number of nodes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.infected.len()
    }

    /// Returns true if the snapshot has no nodes.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.infected.is_empty()
    }

    /// State of `node`.
    #[must_use]
    pub fn get(&self, node: usize) -> Option<NodeState> {
        Some(NodeState::new(*self.susceptible.get(node)?, *self.infected.get(node)?))
    }

    /// Sum of the infected channel.
    #[must_use]
    pub fn total_infected(&self) -> f64 {
        self.infected.iter().map(|&v| f64::from(v)).sum()
    }

    /// Sum of the susceptible channel.
    #[must_use]
    pub fn total_susceptible(&self) -> f64 {
        self.susceptible.iter().map(|&v| f64::from(v)).sum()
    }
}

/// Read-only view of the latest completed state.
///
/// Cheap to clone; clones share the same buffers, so a renderer thread can
/// hold one while the controller keeps stepping.
#[derive(Clone, Debug)]
pub struct ResultAccessor {
    state: Arc<StateBuffers>,
    network: Arc<Network>,
}

impl ResultAccessor {
    pub(crate) fn new(state: Arc<StateBuffers>, network: Arc<Network>) -> Self {
        Self { state, network }
    }

    /// Number of nodes.
    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.state.node_count()
    }

    /// The network the state lives on.
    #[inline]
    #[must_use]
    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Copies the latest completed state.
    ///
    /// `start_node` only selects whether the read happens: an index outside
    /// `[0, N)` returns `None`, any valid index returns the same full state.
    #[must_use]
    pub fn read(&self, start_node: usize) -> Option<StateSnapshot> {
        if start_node >= self.node_count() {
            return None;
        }
        Some(self.state.with_current(StateSnapshot::from_states))
    }

    /// Copies the latest completed state into caller buffers.
    ///
    /// Returns false and writes nothing if `start_node` is out of range or
    /// either buffer is not exactly `N` long.
    pub fn read_into(&self, start_node: usize, susceptible: &mut [f32], infected: &mut [f32]) -> bool {
        let n = self.node_count();
        if start_node >= n || susceptible.len() != n || infected.len() != n {
            return false;
        }
        self.state.with_current(|states| {
            for ((s, i), state) in susceptible.iter_mut().zip(infected.iter_mut()).zip(states) {
                *s = state.susceptible;
                *i = state.infected;
            }
        });
        true
    }

    /// Number of nodes whose infected value has reached 1.
    ///
    /// `None` if `start_node` is out of range.
    #[must_use]
    pub fn infected_count(&self, start_node: usize) -> Option<usize> {
        if start_node >= self.node_count() {
            return None;
        }
        Some(
            self.state
                .with_current(|states| states.iter().filter(|s| s.infected >= 1.0).count()),
        )
    }

    /// Merges layout positions with the latest state, one vertex per node.
    #[must_use]
    pub fn vertices(&self) -> Vec<NodeVertex> {
        let positions = self.network.positions();
        self.state.with_current(|states| {
            positions
                .iter()
                .zip(states)
                .map(|(p, s)| NodeVertex {
                    x: p.x,
                    y: p.y,
                    infected: s.infected,
                    susceptible: s.susceptible,
                })
                .collect()
        })
    }
}
