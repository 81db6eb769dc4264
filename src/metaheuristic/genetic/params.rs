use crate::metaheuristic::error::{ensure, SearchError};
use crate::rng::os_random_seed;

#[derive(Debug, Clone, PartialEq)]
pub struct Params {
    pub population_size: usize,
    pub generations: usize,
    pub mutation_rate: f64,
    pub crossover_rate: f64,
    pub elitism_size: usize,
    pub seed: u128,
}

impl Params {
    pub fn new(
        population_size: usize,
        generations: usize,
        mutation_rate: f64,
        crossover_rate: f64,
        elitism_size: usize,
        seed: Option<u128>,
    ) -> Self {
        Params {
            population_size,
            generations,
            mutation_rate,
            crossover_rate,
            elitism_size,
            seed: seed.unwrap_or_else(os_random_seed),
        }
    }

    pub fn validate(&self) -> Result<(), SearchError> {
        ensure(self.population_size > 0, "population_size must be positive")?;
        ensure(self.generations > 0, "generations must be positive")?;
        ensure(
            (0.0..=1.0).contains(&self.mutation_rate),
            format!("mutation_rate {} is not in [0, 1]", self.mutation_rate),
        )?;
        ensure(
            (0.0..=1.0).contains(&self.crossover_rate),
            format!("crossover_rate {} is not in [0, 1]", self.crossover_rate),
        )?;
        ensure(
            self.elitism_size <= self.population_size,
            format!(
                "elitism_size {} exceeds population_size {}",
                self.elitism_size, self.population_size
            ),
        )
    }
}
