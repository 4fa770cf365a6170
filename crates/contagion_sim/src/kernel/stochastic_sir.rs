//! # Stochastic SIR Kernel
//!
//! Per-node update, run in parallel across nodes with rayon.
//!
//! For node `i` with previous `(S, I)`, degree `k` and neighbour infected
//! sum `Σ`:
//!
//! ```text
//! p_inf = clamp(β · Σ · dt, 0, 1)
//! T     = S if u < p_inf else 0          u ~ U[0,1) from stream (seed, i)
//! Δ_D   = D · dt · (Σ / k − I)           0 when k = 0
//! Δ_R   = α · dt · I
//! I'    = clamp(I + T + Δ_D − Δ_R, 0, 1)
//! S'    = clamp(S − T, 0, 1 − I')
//! ```
//!
//! Recovered mass is `1 − S − I` and never returns to susceptible.
//!
//! Each node draws from its own ChaCha stream keyed by the step seed, so the
//! result depends only on inputs and seed, never on how rayon splits work.

use contagion_core::NodeState;
use contagion_network::Network;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use super::{DiffusionKernel, KernelInputs, StepParams};
use crate::error::KernelError;

/// Stochastic infection with neighbour diffusion and linear recovery.
#[derive(Debug, Default)]
pub struct StochasticSirKernel {
    /// Dedicated pool. `None` runs on rayon's global pool.
    pool: Option<ThreadPool>,
}

impl StochasticSirKernel {
    /// Creates a kernel on rayon's global pool.
    #[must_use]
    pub fn new() -> Self {
        Self { pool: None }
    }

    /// Creates a kernel with a dedicated pool of `threads` workers.
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::Unavailable`] if the pool cannot be spawned.
    pub fn with_threads(threads: usize) -> Result<Self, KernelError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("contagion-kernel-{i}"))
            .build()
            .map_err(|e| KernelError::Unavailable(e.to_string()))?;
        Ok(Self { pool: Some(pool) })
    }

    /// Worker count of the pool this kernel runs on.
    #[must_use]
    pub fn threads(&self) -> usize {
        self.pool
            .as_ref()
            .map_or_else(rayon::current_num_threads, ThreadPool::current_num_threads)
    }
}

impl DiffusionKernel for StochasticSirKernel {
    fn name(&self) -> &str {
        "stochastic_sir"
    }

    fn apply(&self, inputs: &KernelInputs<'_>, output: &mut [NodeState]) -> Result<(), KernelError> {
        inputs.validate(output)?;

        let mut run = || {
            output
                .par_iter_mut()
                .enumerate()
                .for_each(|(node, out)| {
                    *out = update_node(node, inputs.network, inputs.previous, inputs.params);
                });
        };
        match &self.pool {
            Some(pool) => pool.install(run),
            None => run(),
        }

        match output.iter().position(|s| !s.is_finite()) {
            Some(node) => Err(KernelError::NonFiniteOutput { node }),
            None => Ok(()),
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn update_node(node: usize, network: &Network, previous: &[NodeState], params: &StepParams) -> NodeState {
    let NodeState {
        susceptible,
        infected,
    } = previous[node];

    let degree = network.degree(node);
    let neighbor_infected: f32 = network.neighbors(node).map(|j| previous[j].infected).sum();

    let p_infect = (params.infection_rate * neighbor_infected * params.dt).clamp(0.0, 1.0);
    let mut rng = ChaCha8Rng::seed_from_u64(params.random_seed);
    rng.set_stream(node as u64);
    let transfer = if rng.gen::<f32>() < p_infect {
        susceptible
    } else {
        0.0
    };

    let diffusion = if degree > 0 {
        params.diffusion * params.dt * (neighbor_infected / degree as f32 - infected)
    } else {
        0.0
    };
    let recovery = params.recovery_rate * params.dt * infected;

    let next_infected = (infected + transfer + diffusion - recovery).clamp(0.0, 1.0);
    let next_susceptible = (susceptible - transfer).clamp(0.0, 1.0 - next_infected);
    NodeState::new(next_susceptible, next_infected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contagion_core::initial_states;
    use contagion_network::{GraphBuilder, NetworkConfig};

    fn setup(node_count: usize) -> (Network, Vec<NodeState>) {
        let network = GraphBuilder::new(NetworkConfig::new(node_count, 4, 2))
            .unwrap()
            .build_seeded(8);
        let states = initial_states(node_count, 0).unwrap();
        (network, states)
    }

    fn params(node_count: usize, seed: u64) -> StepParams {
        StepParams {
            infection_rate: 0.5,
            recovery_rate: 0.1,
            diffusion: 0.4,
            dt: 0.1,
            node_count,
            start_node: 0,
            random_seed: seed,
        }
    }

    fn run(kernel: &StochasticSirKernel, network: &Network, previous: &[NodeState], p: &StepParams) -> Vec<NodeState> {
        let mut output = vec![NodeState::ZERO; previous.len()];
        let inputs = KernelInputs {
            network,
            previous,
            params: p,
        };
        kernel.apply(&inputs, &mut output).unwrap();
        output
    }

    #[test]
    fn test_pinned_seed_is_reproducible() {
        let (network, states) = setup(200);
        let kernel = StochasticSirKernel::new();
        let p = params(200, 1234);
        assert_eq!(run(&kernel, &network, &states, &p), run(&kernel, &network, &states, &p));
    }

    #[test]
    fn test_pool_size_does_not_change_result() {
        let (network, states) = setup(300);
        let p = params(300, 77);
        let single = StochasticSirKernel::with_threads(1).unwrap();
        let many = StochasticSirKernel::with_threads(4).unwrap();
        assert_eq!(single.threads(), 1);
        assert_eq!(run(&single, &network, &states, &p), run(&many, &network, &states, &p));
    }

    #[test]
    fn test_values_stay_in_unit_interval() {
        let (network, mut states) = setup(150);
        let kernel = StochasticSirKernel::new();
        for seed in 0..50 {
            states = run(&kernel, &network, &states, &params(150, seed));
            for s in &states {
                assert!(s.is_finite());
                assert!((0.0..=1.0).contains(&s.susceptible));
                assert!((0.0..=1.0).contains(&s.infected));
                assert!(s.susceptible + s.infected <= 1.0 + 1e-6);
            }
        }
    }

    #[test]
    fn test_no_infection_without_infected_neighbours() {
        let (network, _) = setup(50);
        let states = vec![NodeState::SUSCEPTIBLE; 50];
        let kernel = StochasticSirKernel::new();
        let next = run(&kernel, &network, &states, &params(50, 3));
        assert_eq!(next, states);
    }

    #[test]
    fn test_recovery_only_decays_infected() {
        // No spread, no diffusion: I' = I (1 - α dt)
        let (network, states) = setup(20);
        let mut p = params(20, 5);
        p.infection_rate = 0.0;
        p.diffusion = 0.0;
        let next = run(&StochasticSirKernel::new(), &network, &states, &p);
        assert!((next[0].infected - 0.99).abs() < 1e-6);
        assert_eq!(next[2], NodeState::SUSCEPTIBLE);
    }

    #[test]
    fn test_invalid_dt_rejected() {
        let (network, states) = setup(10);
        let mut p = params(10, 0);
        p.dt = f32::INFINITY;
        let mut output = vec![NodeState::ZERO; 10];
        let inputs = KernelInputs {
            network: &network,
            previous: &states,
            params: &p,
        };
        let err = StochasticSirKernel::new().apply(&inputs, &mut output).unwrap_err();
        assert!(matches!(err, KernelError::InvalidParameter(_)));
    }
}
