mod aco_experiment;
mod genetic_experiment;

use serde::{Deserialize, Serialize};

use crate::experiment_config::ExperimentConfigError;
pub use aco_experiment::{AcoExperiment, UnseededAcoExperiment};
pub use genetic_experiment::{GeneticExperiment, UnseededGeneticExperiment};

#[derive(Deserialize, Serialize, Debug)]
#[serde(untagged)]
pub enum AlgoConfig {
    Genetic(GeneticExperiment),
    UnseededGenetic(UnseededGeneticExperiment),
    Aco(AcoExperiment),
    UnseededAco(UnseededAcoExperiment),
}

impl AlgoConfig {
    /// Unseeded sections take `seed` from the experiment section.
    pub fn genetic(&self, seed: u64) -> Result<GeneticExperiment, ExperimentConfigError> {
        match self {
            AlgoConfig::Genetic(genetic) => Ok(*genetic),
            AlgoConfig::UnseededGenetic(usgenetic) => Ok(usgenetic.with_seed(seed)),
            _ => Err(ExperimentConfigError::NotGenetic),
        }
    }

    pub fn aco(&self, seed: u64) -> Result<AcoExperiment, ExperimentConfigError> {
        match self {
            AlgoConfig::Aco(aco) => Ok(*aco),
            AlgoConfig::UnseededAco(usaco) => Ok(usaco.with_seed(seed)),
            _ => Err(ExperimentConfigError::NotAco),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AlgoConfig::Genetic(_) | AlgoConfig::UnseededGenetic(_) => "genetic",
            AlgoConfig::Aco(_) | AlgoConfig::UnseededAco(_) => "aco",
        }
    }
}
