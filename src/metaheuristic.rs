pub mod aco;
mod error;
pub mod genetic;
mod supervisor;

pub use aco::Aco;
pub use error::SearchError;
pub use genetic::Genetic;
pub use supervisor::{Message, MessageInfo, Supervisor};

use crate::race::{Compound, Strategy, StrategySimulator};

use serde::{Deserialize, Serialize};

pub trait Metaheuristic {
    /// Runs one generation or iteration. Returns the best strategy found so
    /// far, or `None` once the budget is spent.
    fn single_iteration(&mut self) -> Option<&Strategy>;

    fn result(&self) -> SearchResult;

    fn solve(&mut self) -> SearchResult {
        while self.single_iteration().is_some() {}
        self.result()
    }
}

/// What a search is run against: the simulator and the compounds it may fit.
#[derive(Clone, Copy)]
pub struct ProblemInstance<'a> {
    simulator: &'a StrategySimulator,
    compounds: &'a [Compound],
}

impl<'a> ProblemInstance<'a> {
    pub fn new(simulator: &'a StrategySimulator) -> Self {
        ProblemInstance {
            simulator,
            compounds: simulator.available_compounds(),
        }
    }

    /// Restricts the compounds a strategy may switch to.
    pub fn with_compounds(simulator: &'a StrategySimulator, compounds: &'a [Compound]) -> Self {
        ProblemInstance {
            simulator,
            compounds,
        }
    }

    pub fn simulator(&self) -> &'a StrategySimulator {
        self.simulator
    }

    pub fn compounds(&self) -> &'a [Compound] {
        self.compounds
    }

    pub fn total_laps(&self) -> u32 {
        self.simulator.total_laps()
    }

    pub fn initial_compound(&self) -> Compound {
        self.simulator.initial_compound()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub best_strategy: Strategy,
    /// Simulated race time of `best_strategy`, infinite if nothing was found.
    pub total_time: f64,
    /// Best fitness per generation or iteration.
    pub fitness_history: Vec<f64>,
}
