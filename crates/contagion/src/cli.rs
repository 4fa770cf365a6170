//! Command line of `contagion-run`.
//!
//! ```text
//! contagion-run [--config FILE] [--steps N] [--dt SECS] [--seed S] [--dump]
//! ```

use std::path::PathBuf;

use contagion_sim::{SimulationConfig, SimulationResult};
use thiserror::Error;

/// Usage line printed for `--help` and on argument errors.
pub const USAGE: &str = "Usage: contagion-run [--config FILE] [--steps N] [--dt SECS] [--seed S] [--dump]";

/// Steps run when `--steps` is not given.
pub const DEFAULT_STEPS: u64 = 100;

/// Argument errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ArgsError {
    /// A flag needs a value and none followed.
    #[error("{0} expects a value")]
    MissingValue(&'static str),

    /// A value did not parse.
    #[error("invalid value `{value}` for {flag}")]
    InvalidValue {
        /// The flag.
        flag: &'static str,
        /// What was given.
        value: String,
    },

    /// Unrecognized argument.
    #[error("unknown argument `{0}`")]
    Unknown(String),
}

/// Parsed arguments.
#[derive(Clone, Debug, PartialEq)]
pub struct RunArgs {
    /// TOML file to load; defaults apply when absent.
    pub config: Option<PathBuf>,
    /// Number of steps to run.
    pub steps: u64,
    /// Overrides the configured step length.
    pub dt: Option<f32>,
    /// Pins both the network and the step seeds.
    pub seed: Option<u64>,
    /// Log every node's state after the run.
    pub dump: bool,
    /// Print usage and exit.
    pub help: bool,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            config: None,
            steps: DEFAULT_STEPS,
            dt: None,
            seed: None,
            dump: false,
            help: false,
        }
    }
}

impl RunArgs {
    /// Parses arguments, program name excluded.
    ///
    /// # Errors
    ///
    /// Returns an [`ArgsError`] for unknown flags and bad values.
    pub fn parse<I>(args: I) -> Result<Self, ArgsError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut parsed = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => parsed.config = Some(PathBuf::from(value(&mut args, "--config")?)),
                "--steps" => parsed.steps = parse_value(&mut args, "--steps")?,
                "--dt" => parsed.dt = Some(parse_value(&mut args, "--dt")?),
                "--seed" => parsed.seed = Some(parse_value(&mut args, "--seed")?),
                "--dump" => parsed.dump = true,
                "--help" | "-h" => parsed.help = true,
                _ => return Err(ArgsError::Unknown(arg)),
            }
        }
        Ok(parsed)
    }

    /// Loads the configuration and applies the overrides.
    ///
    /// # Errors
    ///
    /// Returns read, parse and validation errors.
    pub fn load_config(&self) -> SimulationResult<SimulationConfig> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::from_toml_file(path)?,
            None => SimulationConfig::default(),
        };
        if let Some(dt) = self.dt {
            config.dt = dt;
        }
        if let Some(seed) = self.seed {
            config.graph_seed = Some(seed);
            config.step_seed = Some(seed);
        }
        config.validate()?;
        Ok(config)
    }
}

fn value(args: &mut impl Iterator<Item = String>, flag: &'static str) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue(flag))
}

fn parse_value<T: std::str::FromStr>(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<T, ArgsError> {
    let raw = value(args, flag)?;
    raw.parse()
        .map_err(|_| ArgsError::InvalidValue { flag, value: raw })
}
