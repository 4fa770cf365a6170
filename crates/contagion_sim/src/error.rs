//! # Simulation Error Types
//!
//! ## Taxonomy
//!
//! - Configuration (`Network`, `State`, `InvalidConfig`, `ConfigParse`):
//!   raised before any step runs, fatal to the run
//! - `Kernel`: one step failed, the pre-step state is still current, retry is allowed
//! - `StepInProgress`: caller misuse, never a data problem

use contagion_core::StateError;
use contagion_network::NetworkError;
use thiserror::Error;

/// Errors a diffusion kernel can report.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KernelError {
    /// A scalar parameter is out of its domain.
    #[error("invalid kernel parameter: {0}")]
    InvalidParameter(String),

    /// A buffer length disagrees with the node count.
    #[error("buffer length {actual} does not match node count {expected}")]
    ShapeMismatch {
        /// Node count the kernel was dispatched for.
        expected: usize,
        /// Length actually supplied.
        actual: usize,
    },

    /// The kernel produced NaN or infinity.
    #[error("non-finite output at node {node}")]
    NonFiniteOutput {
        /// First offending node.
        node: usize,
    },

    /// The compute resource could not be acquired.
    #[error("compute resource unavailable: {0}")]
    Unavailable(String),
}

/// Errors that can occur in the simulation.
#[derive(Error, Debug)]
pub enum SimulationError {
    /// The network shape is invalid.
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// The state buffers rejected the request.
    #[error(transparent)]
    State(#[from] StateError),

    /// The kernel failed; the pre-step state is still current.
    #[error("kernel `{kernel}` failed: {source}")]
    Kernel {
        /// Name of the kernel that failed.
        kernel: String,
        /// What went wrong.
        #[source]
        source: KernelError,
    },

    /// `step` was called while another step was still running.
    #[error("a simulation step is already in progress")]
    StepInProgress,

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configuration file is not valid TOML for this schema.
    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// The configuration could not be rendered as TOML.
    #[error("config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// The configuration file could not be read.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl SimulationError {
    /// Returns true for failures that leave the run usable (retry allowed).
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Kernel { .. } | Self::StepInProgress)
    }

    /// Returns true for caller misuse rather than data or resource problems.
    #[must_use]
    pub fn is_misuse(&self) -> bool {
        matches!(self, Self::StepInProgress)
    }
}

/// Result type for simulation operations.
pub type SimulationResult<T> = Result<T, SimulationError>;
