use serde::{Deserialize, Serialize};

use crate::metaheuristic::genetic::Params;

#[derive(Copy, Clone, Deserialize, Serialize, Debug)]
pub struct GeneticExperiment {
    pub population_size: usize,
    pub generations: usize,
    pub mutation_rate: f64,
    pub crossover_rate: f64,
    pub elitism_size: usize,
    pub seed: u64,
}

impl GeneticExperiment {
    pub fn params(&self) -> Params {
        Params::new(
            self.population_size,
            self.generations,
            self.mutation_rate,
            self.crossover_rate,
            self.elitism_size,
            Some(self.seed as u128),
        )
    }
}

#[derive(Deserialize, Serialize, Debug)]
pub struct UnseededGeneticExperiment {
    pub population_size: usize,
    pub generations: usize,
    pub mutation_rate: f64,
    pub crossover_rate: f64,
    pub elitism_size: usize,
}

impl UnseededGeneticExperiment {
    pub fn with_seed(&self, seed: u64) -> GeneticExperiment {
        GeneticExperiment {
            population_size: self.population_size,
            generations: self.generations,
            mutation_rate: self.mutation_rate,
            crossover_rate: self.crossover_rate,
            elitism_size: self.elitism_size,
            seed,
        }
    }
}
