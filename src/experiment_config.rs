mod algo_config;
mod general_experiment_config;
mod race_config;

pub use algo_config::{
    AcoExperiment, AlgoConfig, GeneticExperiment, UnseededAcoExperiment,
    UnseededGeneticExperiment,
};
pub use general_experiment_config::{FullConfig, GeneralExperimentConfig, UnseededConfig};
pub use race_config::RaceConfig;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

pub trait Fix<CorrectType> {
    fn to_fixed(&self) -> CorrectType;
}

/// One YAML experiment file.
///
/// ```yaml
/// experiment:
///   seed: 42
///   aggregation_rate: 5
/// race:
///   laps_file: data/monza_ver.csv
///   pit_stop_penalty: 22.5
/// algorithm:
///   ant_count: 30
///   iterations: 50
///   evaporation_rate: 0.1
///   alpha: 1.0
///   beta: 2.0
/// ```
#[derive(Deserialize, Serialize, Debug)]
pub struct ExperimentConfig {
    pub experiment: GeneralExperimentConfig,
    pub race: RaceConfig,
    pub algorithm: AlgoConfig,
}

impl ExperimentConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, ExperimentConfigError> {
        let config: ExperimentConfig = serde_yaml::from_str(yaml)?;
        config.race.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ExperimentConfigError> {
        let yaml = fs::read_to_string(path.as_ref()).map_err(|err| {
            ExperimentConfigError::Unreadable(format!("{}: {}", path.as_ref().display(), err))
        })?;
        Self::from_yaml(&yaml)
    }
}

#[derive(Debug, Error)]
pub enum ExperimentConfigError {
    #[error("Config is not a valid genetic algorithm config.")]
    NotGenetic,
    #[error("Config is not a valid ACO config.")]
    NotAco,
    #[error("{0}")]
    InvalidRaceConfig(String),
    #[error("could not read config {0}")]
    Unreadable(String),
    #[error("could not parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
}
