//! # Contagion Core
//!
//! Per-node epidemic state and the double-buffered storage that every
//! simulation step reads from and writes into.
//!
//! ## Architecture Rules
//!
//! 1. **Two buffers, one authority** - "current" is the last completed step,
//!    the other buffer is scratch space for the step in flight
//! 2. **Swap, never copy** - publishing a step flips an index
//! 3. **All or nothing** - a step that is not committed is never observed
//!
//! ## Example
//!
//! ```rust
//! use contagion_core::{NodeState, StateBuffers};
//!
//! let buffers = StateBuffers::initialize(10, 0).unwrap();
//! let snapshot = buffers.snapshot();
//! assert_eq!(snapshot[0], NodeState::INFECTED);
//! assert_eq!(snapshot[2], NodeState::SUSCEPTIBLE);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod error;
pub mod state;
pub mod sync;

pub use error::{StateError, StateResult};
pub use state::{initial_states, seed_nodes, NodeState, SEED_OFFSETS};
pub use sync::{StateBuffers, StepHandle};
