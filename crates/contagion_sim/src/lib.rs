//! # Contagion Simulation
//!
//! Steps an epidemic over a fixed contact network.
//!
//! ## Data Flow
//!
//! ```text
//! GraphBuilder ──> Network ──┐
//!                            ├──> SimulationController::step(dt)
//! StateBuffers (seeded) ─────┘            │
//!                                         ▼
//!                          DiffusionKernel::apply(previous -> next)
//!                                         │  returns = barrier
//!                                         ▼
//!                                  commit (index flip)
//!                                         │
//!                                         ▼
//!                              ResultAccessor::read(start)
//! ```
//!
//! ## Thread Safety
//!
//! The controller serializes steps: a second concurrent `step` fails with
//! [`SimulationError::StepInProgress`]. Reads never observe a half-written
//! buffer and never wait on the kernel.
//!
//! ## Example
//!
//! ```rust
//! use contagion_sim::{SimulationConfig, SimulationController};
//!
//! let config = SimulationConfig::from_toml_str(r#"
//!     start_node = 0
//!     graph_seed = 7
//!     step_seed = 11
//!     [network]
//!     node_count = 10
//!     seed_clique = 4
//!     edges_per_node = 2
//! "#).unwrap();
//!
//! let sim = SimulationController::from_config(&config).unwrap();
//! sim.step(0.1).unwrap();
//!
//! let snapshot = sim.results().read(0).unwrap();
//! assert_eq!(snapshot.len(), 10);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod accessor;
pub mod config;
pub mod controller;
pub mod error;
pub mod kernel;

pub use accessor::{NodeVertex, ResultAccessor, StateSnapshot};
pub use config::{EpidemicParams, KernelKind, SimulationConfig};
pub use controller::{Phase, SimulationController, StepReport};
pub use error::{KernelError, SimulationError, SimulationResult};
pub use kernel::{DiffusionKernel, KernelInputs, PassThroughKernel, StepParams, StochasticSirKernel};
