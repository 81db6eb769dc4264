use crate::race::{Strategy, StrategySimulator};

use decorum::R64;
use std::cmp::Ordering;

/// Added to the race time of strategies that never change compound.
pub const COMPOUND_RULE_PENALTY: f64 = 10_000.0;
/// Added to the race time of strategies with two stops on the same lap.
pub const DUPLICATE_LAP_PENALTY: f64 = 500.0;

/// `1 / (race time + penalties)`; higher is better, `0` if not finite.
pub fn fitness(chromosome: &Strategy, simulator: &StrategySimulator) -> f64 {
    let mut penalty = 0.0;
    if chromosome.distinct_compounds(simulator.initial_compound()) < 2 {
        penalty += COMPOUND_RULE_PENALTY;
    }
    if chromosome.has_duplicate_laps() {
        penalty += DUPLICATE_LAP_PENALTY;
    }

    let fitness = 1.0 / (simulator.evaluate(chromosome) + penalty);
    if fitness.is_finite() && fitness >= 0.0 {
        fitness
    } else {
        0.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    pub chromosome: Strategy,
    fitness: f64,
}

impl Individual {
    pub fn evaluate(chromosome: Strategy, simulator: &StrategySimulator) -> Self {
        let fitness = fitness(&chromosome, simulator);
        Individual {
            chromosome,
            fitness,
        }
    }

    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    fn rank(&self) -> R64 {
        R64::from_inner(self.fitness)
    }

    /// Total order on fitness, best last.
    pub fn cmp_fitness(&self, other: &Individual) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}
