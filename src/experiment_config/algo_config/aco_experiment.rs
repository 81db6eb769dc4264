use serde::{Deserialize, Serialize};

use crate::metaheuristic::aco::Params;

#[derive(Copy, Clone, Deserialize, Serialize, Debug)]
pub struct AcoExperiment {
    pub ant_count: usize,
    pub iterations: usize,
    pub evaporation_rate: f64,
    pub alpha: f64,
    pub beta: f64,
    pub seed: u64,
}

impl AcoExperiment {
    pub fn params(&self) -> Params {
        Params::new(
            self.ant_count,
            self.iterations,
            self.evaporation_rate,
            self.alpha,
            self.beta,
            Some(self.seed as u128),
        )
    }
}

#[derive(Deserialize, Serialize, Debug)]
pub struct UnseededAcoExperiment {
    pub ant_count: usize,
    pub iterations: usize,
    pub evaporation_rate: f64,
    pub alpha: f64,
    pub beta: f64,
}

impl UnseededAcoExperiment {
    pub fn with_seed(&self, seed: u64) -> AcoExperiment {
        AcoExperiment {
            ant_count: self.ant_count,
            iterations: self.iterations,
            evaporation_rate: self.evaporation_rate,
            alpha: self.alpha,
            beta: self.beta,
            seed,
        }
    }
}
