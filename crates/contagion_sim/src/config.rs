//! # Simulation Configuration
//!
//! Loaded once at startup from TOML. Every field has a default, so a file
//! only needs the values it changes:
//!
//! ```toml
//! start_node = 0
//! graph_seed = 42      # omit for a fresh network every run
//! step_seed = 7        # omit for fresh per-step seeds
//! kernel = "stochastic_sir"
//! dt = 0.1
//!
//! [network]
//! node_count = 500
//! seed_clique = 4
//! edges_per_node = 4
//!
//! [epidemic]
//! infection_rate = 0.05
//! recovery_rate = 0.1
//! diffusion = 0.4
//! ```

use std::path::Path;

use contagion_core::seed_nodes;
use contagion_network::NetworkConfig;
use serde::{Deserialize, Serialize};

use crate::error::{SimulationError, SimulationResult};
use crate::kernel::{DiffusionKernel, PassThroughKernel, StochasticSirKernel};

/// Rates fixed for the whole run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpidemicParams {
    /// Infection rate β.
    pub infection_rate: f32,
    /// Recovery/decay rate α.
    pub recovery_rate: f32,
    /// Diffusion coefficient D.
    pub diffusion: f32,
}

impl EpidemicParams {
    /// Checks that every rate is finite and non-negative.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidConfig`] naming the first bad rate.
    pub fn validate(&self) -> SimulationResult<()> {
        for (name, value) in [
            ("infection_rate", self.infection_rate),
            ("recovery_rate", self.recovery_rate),
            ("diffusion", self.diffusion),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SimulationError::InvalidConfig(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for EpidemicParams {
    fn default() -> Self {
        Self {
            infection_rate: 0.05,
            recovery_rate: 0.1,
            diffusion: 0.4,
        }
    }
}

/// Which built-in kernel drives the run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KernelKind {
    /// Next state equals previous state.
    PassThrough,
    /// Stochastic infection, diffusion and recovery.
    #[default]
    StochasticSir,
}

impl KernelKind {
    /// Creates the kernel.
    #[must_use]
    pub fn instantiate(self) -> Box<dyn DiffusionKernel> {
        match self {
            Self::PassThrough => Box::new(PassThroughKernel),
            Self::StochasticSir => Box::new(StochasticSirKernel::new()),
        }
    }
}

/// Everything needed to build and run one simulation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Node whose seed set starts infected.
    pub start_node: usize,
    /// Pins the network. `None` draws a fresh seed. At most `i64::MAX`,
    /// the largest TOML integer.
    pub graph_seed: Option<u64>,
    /// Pins the per-step seed stream. `None` seeds it from OS entropy.
    /// At most `i64::MAX`.
    pub step_seed: Option<u64>,
    /// Kernel to run.
    pub kernel: KernelKind,
    /// Default step length in seconds.
    pub dt: f32,
    /// Network shape.
    pub network: NetworkConfig,
    /// Epidemic rates.
    pub epidemic: EpidemicParams,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            start_node: 0,
            graph_seed: None,
            step_seed: None,
            kernel: KernelKind::default(),
            dt: 0.1,
            network: NetworkConfig::default(),
            epidemic: EpidemicParams::default(),
        }
    }
}

impl SimulationConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns a parse error for malformed TOML and a configuration error
    /// for out-of-range values.
    pub fn from_toml_str(source: &str) -> SimulationResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, otherwise as
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn from_toml_file(path: impl AsRef<Path>) -> SimulationResult<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Renders the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::ConfigSerialize`] if rendering fails.
    pub fn to_toml_string(&self) -> SimulationResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Checks every field before anything is built.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> SimulationResult<()> {
        self.network.validate()?;
        self.epidemic.validate()?;
        seed_nodes(self.network.node_count, self.start_node)?;
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(SimulationError::InvalidConfig(format!(
                "dt must be finite and positive, got {}",
                self.dt
            )));
        }
        for (name, seed) in [("graph_seed", self.graph_seed), ("step_seed", self.step_seed)] {
            if let Some(seed) = seed.filter(|&s| i64::try_from(s).is_err()) {
                return Err(SimulationError::InvalidConfig(format!(
                    "{name} must be at most {}, got {seed}",
                    i64::MAX
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contagion_core::StateError;

    #[test]
    fn test_defaults_match_reference_run() {
        let config = SimulationConfig::default();
        assert_eq!(config.network, NetworkConfig::new(500, 4, 4));
        assert!((config.epidemic.infection_rate - 0.05).abs() < f32::EPSILON);
        assert!((config.epidemic.diffusion - 0.4).abs() < f32::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = SimulationConfig::from_toml_str(
            r#"
            start_node = 3
            kernel = "pass_through"

            [network]
            node_count = 40
            "#,
        )
        .unwrap();
        assert_eq!(config.start_node, 3);
        assert_eq!(config.kernel, KernelKind::PassThrough);
        assert_eq!(config.network, NetworkConfig::new(40, 4, 4));
        assert_eq!(config.epidemic, EpidemicParams::default());
        assert_eq!(config.graph_seed, None);
    }

    #[test]
    fn test_start_node_out_of_range_is_config_error() {
        let err = SimulationConfig::from_toml_str(
            r"
            start_node = 10
            [network]
            node_count = 10
            ",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SimulationError::State(StateError::StartNodeOutOfRange { start_node: 10, .. })
        ));
    }

    #[test]
    fn test_invalid_network_shape_rejected() {
        let err = SimulationConfig::from_toml_str(
            r"
            [network]
            seed_clique = 3
            edges_per_node = 5
            ",
        )
        .unwrap_err();
        assert!(matches!(err, SimulationError::Network(_)));
    }

    #[test]
    fn test_negative_rate_rejected() {
        let err = SimulationConfig::from_toml_str("[epidemic]\ninfection_rate = -0.5\n").unwrap_err();
        assert!(matches!(err, SimulationError::InvalidConfig(_)));
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let err = SimulationConfig::from_toml_str("start_node = \"zero\"").unwrap_err();
        assert!(matches!(err, SimulationError::ConfigParse(_)));
    }

    #[test]
    fn test_seed_beyond_toml_range_rejected() {
        let mut config = SimulationConfig::default();
        config.graph_seed = Some(i64::MAX as u64);
        config.step_seed = Some(i64::MAX as u64);
        let text = config.to_toml_string().unwrap();
        assert_eq!(SimulationConfig::from_toml_str(&text).unwrap(), config);

        config.step_seed = Some(u64::MAX);
        assert!(matches!(config.validate(), Err(SimulationError::InvalidConfig(_))));
        config.step_seed = None;
        config.graph_seed = Some(i64::MAX as u64 + 1);
        assert!(matches!(config.validate(), Err(SimulationError::InvalidConfig(_))));
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = SimulationConfig::default();
        config.graph_seed = Some(9);
        config.step_seed = Some(10);
        let text = config.to_toml_string().unwrap();
        assert_eq!(SimulationConfig::from_toml_str(&text).unwrap(), config);
    }
}
