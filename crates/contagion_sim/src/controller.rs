//! # Simulation Controller
//!
//! Owns the network, the state buffers and the kernel, and advances time.
//!
//! ## Step Sequence
//!
//! ```text
//! step(dt)
//!   ├─ begin_step      claim the buffers (fails if a step is running)
//!   ├─ kernel.apply    previous -> next, every node
//!   ├─ barrier         apply returned, all writes landed
//!   └─ commit          next becomes current (O(1) index flip)
//! ```
//!
//! A kernel error drops the claim without committing: the pre-step state
//! stays current and the run can continue.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use contagion_core::{NodeState, StateBuffers, StateError, StepHandle};
use contagion_network::{GraphBuilder, Network};
use parking_lot::Mutex;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use crate::accessor::ResultAccessor;
use crate::config::{EpidemicParams, SimulationConfig};
use crate::error::{SimulationError, SimulationResult};
use crate::kernel::{DiffusionKernel, KernelInputs, StepParams};

/// Whether a step is currently running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Between steps; the current buffer is stable.
    Idle,
    /// A kernel is writing the next buffer.
    Stepping,
}

/// Summary of one completed step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepReport {
    /// 1-based number of this step.
    pub step: u64,
    /// Seed the kernel ran with.
    pub seed: u64,
    /// Elapsed time of the step.
    pub dt: f32,
    /// Sum of the infected channel after the step.
    pub infected_total: f64,
    /// Buffer swaps so far.
    pub swaps: usize,
}

/// Drives the simulation one step at a time.
///
/// `step` takes `&self` so the controller can be shared across threads; the
/// buffers themselves enforce that only one step runs at once.
pub struct SimulationController {
    network: Arc<Network>,
    state: Arc<StateBuffers>,
    kernel: Box<dyn DiffusionKernel>,
    params: EpidemicParams,
    seeds: Mutex<ChaCha8Rng>,
    steps_completed: AtomicU64,
}

impl SimulationController {
    /// Seeds the state for `start_node` on an existing network.
    ///
    /// # Errors
    ///
    /// Returns a state error if `start_node` is out of range or the network
    /// is empty, and a configuration error for bad rates.
    pub fn new(
        network: Arc<Network>,
        params: EpidemicParams,
        start_node: usize,
        kernel: Box<dyn DiffusionKernel>,
    ) -> SimulationResult<Self> {
        params.validate()?;
        let state = StateBuffers::initialize(network.node_count(), start_node)?;

        info!(
            nodes = network.node_count(),
            edges = network.edge_count(),
            start_node,
            kernel = kernel.name(),
            "simulation initialized"
        );

        Ok(Self {
            network,
            state: Arc::new(state),
            kernel,
            params,
            seeds: Mutex::new(ChaCha8Rng::seed_from_u64(rand::thread_rng().gen())),
            steps_completed: AtomicU64::new(0),
        })
    }

    /// Pins the per-step seed stream.
    #[must_use]
    pub fn with_step_seed(self, seed: u64) -> Self {
        *self.seeds.lock() = ChaCha8Rng::seed_from_u64(seed);
        self
    }

    /// Builds the network and the controller described by `config`.
    ///
    /// # Errors
    ///
    /// Returns the first configuration error.
    pub fn from_config(config: &SimulationConfig) -> SimulationResult<Self> {
        config.validate()?;

        let graph_seed = config.graph_seed.unwrap_or_else(|| rand::thread_rng().gen());
        info!(graph_seed, "building network");
        let network = GraphBuilder::new(config.network)?.build_seeded(graph_seed);

        let controller = Self::new(
            Arc::new(network),
            config.epidemic,
            config.start_node,
            config.kernel.instantiate(),
        )?;
        Ok(match config.step_seed {
            Some(seed) => controller.with_step_seed(seed),
            None => controller,
        })
    }

    /// Advances the simulation by `dt` seconds with a fresh seed.
    ///
    /// The seed is drawn only once the buffers are claimed, so a rejected
    /// call leaves a pinned seed stream where it was.
    ///
    /// # Errors
    ///
    /// - [`SimulationError::StepInProgress`] if another step is running
    /// - [`SimulationError::Kernel`] if the kernel fails; state is unchanged
    pub fn step(&self, dt: f32) -> SimulationResult<StepReport> {
        let handle = self.claim()?;
        let seed = self.seeds.lock().gen();
        self.execute(handle, dt, seed)
    }

    /// Advances the simulation by `dt` seconds with an explicit seed.
    ///
    /// # Errors
    ///
    /// As [`step`](Self::step).
    pub fn step_with_seed(&self, dt: f32, seed: u64) -> SimulationResult<StepReport> {
        let handle = self.claim()?;
        self.execute(handle, dt, seed)
    }

    fn claim(&self) -> SimulationResult<StepHandle<'_>> {
        self.state.begin_step().map_err(|e| match e {
            StateError::StepActive => {
                warn!("step rejected: another step is in progress");
                SimulationError::StepInProgress
            }
            other => SimulationError::State(other),
        })
    }

    fn execute(&self, mut handle: StepHandle<'_>, dt: f32, seed: u64) -> SimulationResult<StepReport> {
        let params = StepParams {
            infection_rate: self.params.infection_rate,
            recovery_rate: self.params.recovery_rate,
            diffusion: self.params.diffusion,
            dt,
            node_count: self.state.node_count(),
            start_node: self.state.start_node(),
            random_seed: seed,
        };

        let (previous, next) = handle.split();
        let inputs = KernelInputs {
            network: &self.network,
            previous,
            params: &params,
        };
        if let Err(source) = self.kernel.apply(&inputs, next) {
            warn!(kernel = self.kernel.name(), seed, error = %source, "step failed, state unchanged");
            return Err(SimulationError::Kernel {
                kernel: self.kernel.name().to_owned(),
                source,
            });
        }

        let infected_total = next.iter().map(|s| f64::from(s.infected)).sum();
        let swaps = handle.commit();
        let step = self.steps_completed.fetch_add(1, Ordering::AcqRel) + 1;

        debug!(step, seed, dt, infected_total, "step completed");

        Ok(StepReport {
            step,
            seed,
            dt,
            infected_total,
            swaps,
        })
    }

    /// Runs `count` steps of `dt`, stopping at the first error.
    ///
    /// # Errors
    ///
    /// As [`step`](Self::step).
    pub fn run(&self, count: u64, dt: f32) -> SimulationResult<Vec<StepReport>> {
        (0..count).map(|_| self.step(dt)).collect()
    }

    /// Whether a step is running right now.
    #[must_use]
    pub fn phase(&self) -> Phase {
        if self.state.is_stepping() {
            Phase::Stepping
        } else {
            Phase::Idle
        }
    }

    /// Number of committed steps.
    #[inline]
    #[must_use]
    pub fn steps_completed(&self) -> u64 {
        self.steps_completed.load(Ordering::Acquire)
    }

    /// The contact network.
    #[inline]
    #[must_use]
    pub fn network(&self) -> &Network {
        &self.network
    }

    /// The epidemic rates.
    #[inline]
    #[must_use]
    pub fn params(&self) -> &EpidemicParams {
        &self.params
    }

    /// The start node the state was seeded for.
    #[inline]
    #[must_use]
    pub fn start_node(&self) -> usize {
        self.state.start_node()
    }

    /// Name of the kernel in use.
    #[must_use]
    pub fn kernel_name(&self) -> &str {
        self.kernel.name()
    }

    /// Read access to completed states; clone it freely across threads.
    #[must_use]
    pub fn results(&self) -> ResultAccessor {
        ResultAccessor::new(Arc::clone(&self.state), Arc::clone(&self.network))
    }

    /// Copies the latest completed state as raw node records.
    #[must_use]
    pub fn snapshot(&self) -> Vec<NodeState> {
        self.state.snapshot()
    }
}

impl std::fmt::Debug for SimulationController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationController")
            .field("nodes", &self.network.node_count())
            .field("start_node", &self.state.start_node())
            .field("kernel", &self.kernel.name())
            .field("params", &self.params)
            .field("steps_completed", &self.steps_completed())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KernelKind;
    use crate::error::KernelError;
    use crate::kernel::PassThroughKernel;
    use contagion_network::NetworkConfig;

    fn network(node_count: usize) -> Arc<Network> {
        Arc::new(
            GraphBuilder::new(NetworkConfig::new(node_count, 4, 2))
                .unwrap()
                .build_seeded(3),
        )
    }

    struct FailingKernel;

    impl DiffusionKernel for FailingKernel {
        fn name(&self) -> &str {
            "failing"
        }

        fn apply(&self, _inputs: &KernelInputs<'_>, output: &mut [NodeState]) -> Result<(), KernelError> {
            output.fill(NodeState::new(f32::NAN, f32::NAN));
            Err(KernelError::Unavailable("device lost".into()))
        }
    }

    #[test]
    fn test_new_rejects_bad_start_node() {
        let err = SimulationController::new(network(10), EpidemicParams::default(), 10, Box::new(PassThroughKernel))
            .unwrap_err();
        assert!(matches!(err, SimulationError::State(StateError::StartNodeOutOfRange { .. })));
    }

    #[test]
    fn test_step_advances_counters() {
        let sim = SimulationController::new(network(10), EpidemicParams::default(), 0, Box::new(PassThroughKernel))
            .unwrap();
        assert_eq!(sim.phase(), Phase::Idle);
        assert_eq!(sim.steps_completed(), 0);

        let report = sim.step(0.1).unwrap();
        assert_eq!(report.step, 1);
        assert_eq!(report.swaps, 1);
        assert!((report.infected_total - 3.0).abs() < 1e-9);
        assert_eq!(sim.steps_completed(), 1);
        assert_eq!(sim.phase(), Phase::Idle);
    }

    #[test]
    fn test_kernel_failure_keeps_state() {
        let sim =
            SimulationController::new(network(10), EpidemicParams::default(), 2, Box::new(FailingKernel)).unwrap();
        let before = sim.snapshot();

        let err = sim.step(0.1).unwrap_err();
        assert!(err.is_recoverable());
        assert!(matches!(err, SimulationError::Kernel { ref kernel, .. } if kernel == "failing"));
        assert_eq!(sim.snapshot(), before);
        assert_eq!(sim.steps_completed(), 0);
        assert_eq!(sim.phase(), Phase::Idle);
    }

    #[test]
    fn test_invalid_dt_is_kernel_error() {
        let sim = SimulationController::new(network(10), EpidemicParams::default(), 0, Box::new(PassThroughKernel))
            .unwrap();
        let err = sim.step(-1.0).unwrap_err();
        assert!(matches!(
            err,
            SimulationError::Kernel {
                source: KernelError::InvalidParameter(_),
                ..
            }
        ));
    }

    #[test]
    fn test_pinned_step_seed_is_reproducible() {
        let config = SimulationConfig {
            graph_seed: Some(5),
            step_seed: Some(6),
            kernel: KernelKind::StochasticSir,
            network: NetworkConfig::new(60, 4, 3),
            ..SimulationConfig::default()
        };
        let a = SimulationController::from_config(&config).unwrap();
        let b = SimulationController::from_config(&config).unwrap();
        let ra = a.run(10, 0.1).unwrap();
        let rb = b.run(10, 0.1).unwrap();
        assert_eq!(ra, rb);
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn test_each_step_gets_fresh_seed() {
        fn assert_distinct(reports: &[StepReport]) {
            let mut seeds: Vec<u64> = reports.iter().map(|r| r.seed).collect();
            seeds.sort_unstable();
            seeds.dedup();
            assert_eq!(seeds.len(), reports.len(), "seed reused across steps");
        }

        let pinned = SimulationController::new(network(10), EpidemicParams::default(), 0, Box::new(PassThroughKernel))
            .unwrap()
            .with_step_seed(5);
        assert_distinct(&pinned.run(5, 0.1).unwrap());

        let unpinned = SimulationController::new(network(10), EpidemicParams::default(), 0, Box::new(PassThroughKernel))
            .unwrap();
        assert_distinct(&unpinned.run(5, 0.1).unwrap());
    }

    #[test]
    fn test_explicit_seed_reported() {
        let sim = SimulationController::new(network(12), EpidemicParams::default(), 0, Box::new(PassThroughKernel))
            .unwrap();
        let report = sim.step_with_seed(0.25, 99).unwrap();
        assert_eq!(report.seed, 99);
        assert!((report.dt - 0.25).abs() < f32::EPSILON);
    }
}
