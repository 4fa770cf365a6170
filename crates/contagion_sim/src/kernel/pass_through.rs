//! Identity kernel: the next state equals the previous one.

use contagion_core::NodeState;

use super::{DiffusionKernel, KernelInputs};
use crate::error::KernelError;

/// Copies `previous` into the output unchanged.
///
/// Deterministic and free of arithmetic, so buffer and ordering behaviour can
/// be checked without any transition law in the way.
#[derive(Clone, Copy, Debug, Default)]
pub struct PassThroughKernel;

impl DiffusionKernel for PassThroughKernel {
    fn name(&self) -> &str {
        "pass_through"
    }

    fn apply(&self, inputs: &KernelInputs<'_>, output: &mut [NodeState]) -> Result<(), KernelError> {
        inputs.validate(output)?;
        output.copy_from_slice(inputs.previous);
        Ok(())
    }
}
