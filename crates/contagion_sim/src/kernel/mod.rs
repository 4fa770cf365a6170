//! # Diffusion Kernel Contract
//!
//! One simulation step is a pure function of the network, the last completed
//! state and a scalar parameter set:
//!
//! ```text
//! apply(network, previous[N], params) -> next[N]
//! ```
//!
//! ## Contract
//!
//! - Every output cell is written exactly once, from `previous` only; cells
//!   of the same call never depend on each other
//! - `apply` returns only after every write has landed; returning is the
//!   completion barrier
//! - Kernels keep no reference to either buffer past the call
//! - On `Err` the output buffer is garbage and is discarded by the caller
//!
//! ## Reference Kernels
//!
//! - [`PassThroughKernel`]: copies `previous` (test double)
//! - [`StochasticSirKernel`]: stochastic infection, diffusion and recovery

mod pass_through;
mod stochastic_sir;

pub use pass_through::PassThroughKernel;
pub use stochastic_sir::StochasticSirKernel;

use contagion_core::NodeState;
use contagion_network::Network;

use crate::error::KernelError;

/// Scalar parameters bound for one kernel invocation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepParams {
    /// Infection rate β.
    pub infection_rate: f32,
    /// Recovery/decay rate α.
    pub recovery_rate: f32,
    /// Diffusion coefficient D.
    pub diffusion: f32,
    /// Elapsed time for this step, in seconds.
    pub dt: f32,
    /// Number of nodes N.
    pub node_count: usize,
    /// Start node of the run.
    pub start_node: usize,
    /// Seed for this invocation only.
    pub random_seed: u64,
}

impl StepParams {
    /// Checks that every scalar is in its domain.
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::InvalidParameter`] naming the first bad value.
    pub fn validate(&self) -> Result<(), KernelError> {
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(KernelError::InvalidParameter(format!(
                "dt must be finite and positive, got {}",
                self.dt
            )));
        }
        for (name, value) in [
            ("infection_rate", self.infection_rate),
            ("recovery_rate", self.recovery_rate),
            ("diffusion", self.diffusion),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(KernelError::InvalidParameter(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        if self.start_node >= self.node_count {
            return Err(KernelError::InvalidParameter(format!(
                "start node {} out of range for {} nodes",
                self.start_node, self.node_count
            )));
        }
        Ok(())
    }
}

/// Read-only inputs of one kernel invocation.
#[derive(Clone, Copy, Debug)]
pub struct KernelInputs<'a> {
    /// The contact network.
    pub network: &'a Network,
    /// The last completed state.
    pub previous: &'a [NodeState],
    /// Scalars for this step.
    pub params: &'a StepParams,
}

impl KernelInputs<'_> {
    /// Validates parameters and checks that every buffer has `node_count` entries.
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::InvalidParameter`] or [`KernelError::ShapeMismatch`].
    pub fn validate(&self, output: &[NodeState]) -> Result<(), KernelError> {
        self.params.validate()?;
        let expected = self.params.node_count;
        for actual in [self.network.node_count(), self.previous.len(), output.len()] {
            if actual != expected {
                return Err(KernelError::ShapeMismatch { expected, actual });
            }
        }
        Ok(())
    }
}

/// A per-step state update.
///
/// Implementations must be stateless across calls (configuration such as a
/// thread pool is fine) and safe to call from any thread.
pub trait DiffusionKernel: Send + Sync {
    /// Short name used in logs and errors.
    fn name(&self) -> &str;

    /// Writes the next state for every node into `output`.
    ///
    /// # Errors
    ///
    /// Returns a [`KernelError`] if the step cannot run. `output` may then
    /// hold partial results; the caller discards it.
    fn apply(&self, inputs: &KernelInputs<'_>, output: &mut [NodeState]) -> Result<(), KernelError>;
}
