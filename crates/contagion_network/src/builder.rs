//! # Preferential Attachment Builder
//!
//! Grows a scale-free network in two phases:
//!
//! ```text
//! 1. Seed clique:  connect every pair among nodes [0, M0)
//!                  degree = M0 - 1 each, total = M0 (M0 - 1)
//!
//! 2. Growth:       for i in M0..N, add M distinct edges i ~ j, j < i,
//!                  P(j) = degree(j) / total_degree
//! ```
//!
//! Sampling walks `j` upward accumulating `degree(j) / total` until the sum
//! passes a uniform draw `p`. A draw that lands on an existing neighbour, or
//! falls past the last earlier node, is discarded and redrawn; only
//! successful attachments count toward `M`. Degrees and the total are updated
//! with every edge, so later draws already see earlier attachments.
//!
//! `M <= M0 <= i` guarantees `i` always has at least `M` unconnected earlier
//! nodes, so growth terminates.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::{NetworkError, NetworkResult};
use crate::layout::DEFAULT_LAYOUT_RADIUS;
use crate::network::Network;

/// Shape of the network to grow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Total node count `N`.
    pub node_count: usize,
    /// Size `M0` of the fully connected seed clique.
    pub seed_clique: usize,
    /// Edges `M` attached by every grown node.
    pub edges_per_node: usize,
}

impl NetworkConfig {
    /// Creates a configuration. Call [`validate`](Self::validate) before use.
    #[inline]
    #[must_use]
    pub const fn new(node_count: usize, seed_clique: usize, edges_per_node: usize) -> Self {
        Self {
            node_count,
            seed_clique,
            edges_per_node,
        }
    }

    /// Checks `M0 >= 2`, `1 <= M <= M0` and `N >= M0`.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::InvalidConfig`] naming the violated bound.
    pub fn validate(&self) -> NetworkResult<()> {
        if self.seed_clique < 2 {
            return Err(NetworkError::InvalidConfig(format!(
                "seed clique must have at least 2 nodes, got {}",
                self.seed_clique
            )));
        }
        if self.edges_per_node == 0 || self.edges_per_node > self.seed_clique {
            return Err(NetworkError::InvalidConfig(format!(
                "edges per node must be in 1..={}, got {}",
                self.seed_clique, self.edges_per_node
            )));
        }
        if self.node_count < self.seed_clique {
            return Err(NetworkError::InvalidConfig(format!(
                "node count {} is smaller than the seed clique {}",
                self.node_count, self.seed_clique
            )));
        }
        if u32::try_from(self.node_count).is_err() {
            return Err(NetworkError::InvalidConfig(format!(
                "node count {} exceeds u32 range",
                self.node_count
            )));
        }
        Ok(())
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self::new(500, 4, 4)
    }
}

/// Builds networks of one validated shape.
#[derive(Clone, Debug)]
pub struct GraphBuilder {
    config: NetworkConfig,
    layout_radius: f32,
}

impl GraphBuilder {
    /// Creates a builder.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::InvalidConfig`] if the shape is unusable.
    pub fn new(config: NetworkConfig) -> NetworkResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            layout_radius: DEFAULT_LAYOUT_RADIUS,
        })
    }

    /// Sets the radius of the display layout.
    #[must_use]
    pub const fn with_layout_radius(mut self, radius: f32) -> Self {
        self.layout_radius = radius;
        self
    }

    /// The shape this builder produces.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> NetworkConfig {
        self.config
    }

    /// Grows a network drawing from `rng`.
    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> Network {
        let NetworkConfig {
            node_count,
            seed_clique,
            edges_per_node,
        } = self.config;

        let mut network = Network::empty(node_count, self.layout_radius);

        for i in 0..seed_clique {
            for j in (i + 1)..seed_clique {
                network.add_edge(i, j);
            }
        }

        for node in seed_clique..node_count {
            attach(&mut network, node, edges_per_node, rng);
        }

        tracing::info!(
            nodes = node_count,
            edges = network.edge_count(),
            max_degree = network.degrees().iter().max().copied().unwrap_or(0),
            "network built"
        );

        network
    }

    /// Grows a network from a pinned seed.
    #[must_use]
    pub fn build_seeded(&self, seed: u64) -> Network {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.build(&mut rng)
    }
}

/// Validates `config` and grows one network from `rng`.
///
/// # Errors
///
/// Returns [`NetworkError::InvalidConfig`] if the shape is unusable.
pub fn build_network<R: Rng + ?Sized>(config: NetworkConfig, rng: &mut R) -> NetworkResult<Network> {
    Ok(GraphBuilder::new(config)?.build(rng))
}

/// Adds `edges` distinct degree-proportional edges from `node` to earlier nodes.
#[allow(clippy::cast_precision_loss)]
fn attach<R: Rng + ?Sized>(network: &mut Network, node: usize, edges: usize, rng: &mut R) {
    let mut added = 0;
    while added < edges {
        let p: f64 = rng.gen();
        let total = network.total_degree() as f64;

        let mut cumulative = 0.0;
        let mut target = None;
        for (j, &degree) in network.degrees()[..node].iter().enumerate() {
            cumulative += f64::from(degree) / total;
            if p < cumulative {
                target = Some(j);
                break;
            }
        }

        if let Some(j) = target {
            if network.add_edge(j, node) {
                added += 1;
            }
        }
    }
}
