use serde::{Deserialize, Serialize};

use crate::experiment_config::Fix;
use crate::rng::os_random_seed;

#[derive(Deserialize, Serialize, Debug)]
#[serde(untagged)]
pub enum GeneralExperimentConfig {
    Full(FullConfig),
    Unseeded(UnseededConfig),
}

impl GeneralExperimentConfig {
    pub fn cfg(&self) -> FullConfig {
        match self {
            Self::Full(cfg) => *cfg,
            Self::Unseeded(cfg) => cfg.to_fixed(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy)]
pub struct FullConfig {
    /// Finished experiments are skipped by the runner.
    #[serde(default)]
    pub finished: bool,
    /// Seed for every algorithm section that has none of its own.
    pub seed: u64,
    pub aggregation_rate: usize,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct UnseededConfig {
    #[serde(default)]
    pub finished: bool,
    pub aggregation_rate: usize,
}

impl Fix<FullConfig> for UnseededConfig {
    fn to_fixed(&self) -> FullConfig {
        FullConfig {
            finished: self.finished,
            seed: (os_random_seed() >> 64) as u64,
            aggregation_rate: self.aggregation_rate,
        }
    }
}
