//! # Contagion
//!
//! Epidemic diffusion over a scale-free contact network.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          CONTAGION                           │
//! ├──────────────────────────────────────────────────────────────┤
//! │                                                              │
//! │  ┌────────────────┐    ┌────────────────┐                    │
//! │  │ network        │    │ core           │                    │
//! │  │                │    │                │                    │
//! │  │ • GraphBuilder │    │ • NodeState    │                    │
//! │  │ • Adjacency    │    │ • Seed set     │                    │
//! │  │ • Layout       │    │ • StateBuffers │                    │
//! │  └───────┬────────┘    └───────┬────────┘                    │
//! │          │                     │                             │
//! │          └──────────┬──────────┘                             │
//! │                     ▼                                        │
//! │            ┌──────────────────┐                              │
//! │            │ sim              │                              │
//! │            │                  │                              │
//! │            │ • DiffusionKernel│                              │
//! │            │ • Controller     │──> ResultAccessor (readers)  │
//! │            │ • Config         │                              │
//! │            └──────────────────┘                              │
//! │                                                              │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `cli`: argument parsing for `contagion-run`

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod cli;

pub use contagion_core as core;
pub use contagion_network as network;
pub use contagion_sim as sim;

pub use contagion_network::{GraphBuilder, Network, NetworkConfig};
pub use contagion_sim::{ResultAccessor, SimulationConfig, SimulationController, SimulationError};
