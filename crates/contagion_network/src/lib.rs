//! # Contagion Network
//!
//! Fixed-topology contact networks for the epidemic simulation.
//!
//! ## Design Principles
//!
//! 1. **Built once**: topology is generated at startup and never mutated
//! 2. **Scale-free**: a fully connected seed clique grows by
//!    degree-proportional ("rich get richer") attachment
//! 3. **Deterministic**: the caller supplies the random source, so a pinned
//!    seed always yields the same network
//!
//! ## Core Components
//!
//! - `AdjacencyMatrix`: symmetric N×N bit matrix
//! - `Network`: adjacency + degree sequence + layout positions
//! - `GraphBuilder`: preferential-attachment growth
//!
//! ## Example
//!
//! ```rust
//! use contagion_network::{GraphBuilder, NetworkConfig};
//!
//! let builder = GraphBuilder::new(NetworkConfig::new(50, 4, 2)).unwrap();
//! let network = builder.build_seeded(7);
//!
//! assert_eq!(network.node_count(), 50);
//! assert_eq!(network.degree_sum(), 2 * network.edge_count() as u64);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod adjacency;
pub mod builder;
pub mod error;
pub mod layout;
pub mod network;

pub use adjacency::AdjacencyMatrix;
pub use builder::{build_network, GraphBuilder, NetworkConfig};
pub use error::{NetworkError, NetworkResult};
pub use layout::{circle_positions, Point, DEFAULT_LAYOUT_RADIUS};
pub use network::Network;
