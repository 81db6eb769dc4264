use crate::metaheuristic::aco::{Decision, Message, PheromoneMatrix};
use crate::race::{Compound, PitEvent, Strategy, StrategySimulator, MAX_STOPS, MIN_LAP_TIME};
use crate::rng::{rng64, weighted_index};

use std::sync::mpsc::Sender;
use std::time::Instant;

/// Heuristic used when the cost estimate is not finite.
pub const FALLBACK_HEURISTIC: f64 = 0.1;

/// Inverse cost of the next lap after taking `decision` at `lap`.
pub fn heuristic(
    simulator: &StrategySimulator,
    lap: u32,
    decision: Decision,
    current: Compound,
    tyre_age: u32,
) -> f64 {
    let cost = match decision {
        Decision::Continue => simulator.lap_time(lap + 1, current, tyre_age + 1),
        Decision::Pit(compound) => {
            simulator.lap_time(lap + 1, compound, 0) + simulator.pit_stop_penalty()
        }
    };

    if cost.is_finite() {
        1.0 / cost.max(MIN_LAP_TIME)
    } else {
        FALLBACK_HEURISTIC
    }
}

/// Probability of every decision at `lap`, `pheromone^alpha * heuristic^beta`
/// normalised. Uniform when nothing carries weight.
pub fn transition_probabilities(
    matrix: &PheromoneMatrix,
    simulator: &StrategySimulator,
    alpha: f64,
    beta: f64,
    lap: u32,
    current: Compound,
    tyre_age: u32,
) -> Vec<f64> {
    let mut scores: Vec<f64> = matrix
        .row(lap)
        .iter()
        .enumerate()
        .map(|(column, &pheromone)| {
            let decision = matrix.decision(column);
            pheromone.powf(alpha) * heuristic(simulator, lap, decision, current, tyre_age).powf(beta)
        })
        .collect();

    let total: f64 = scores.iter().sum();
    if total.is_finite() && total > 0.0 {
        for score in scores.iter_mut() {
            *score /= total;
        }
    } else {
        let uniform = 1.0 / scores.len() as f64;
        for score in scores.iter_mut() {
            *score = uniform;
        }
    }
    scores
}

pub struct Ant<'a> {
    simulator: &'a StrategySimulator,
    pheromone_matrix: &'a PheromoneMatrix,
    alpha: f64,
    beta: f64,
    rng_seed: u128,
    sender: Sender<Message>,
    id: usize,
    iteration: usize,
}

impl<'a> Ant<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        simulator: &'a StrategySimulator,
        pheromone_matrix: &'a PheromoneMatrix,
        alpha: f64,
        beta: f64,
        rng_seed: u128,
        sender: Sender<Message>,
        id: usize,
        iteration: usize,
    ) -> Self {
        Ant {
            simulator,
            pheromone_matrix,
            alpha,
            beta,
            rng_seed,
            sender,
            id,
            iteration,
        }
    }

    /// Walks the race lap by lap, deciding at each lap whether to stop.
    pub fn get_solution(&self) -> AntSolution {
        let start_time = Instant::now();
        let mut rng = rng64(self.rng_seed);
        let mut evals = 0;
        let mut strategy = Strategy::new();
        let mut choices = Vec::new();

        let mut lap = 1;
        let mut compound = self.simulator.initial_compound();
        let mut tyre_age = 0;
        while lap <= self.pheromone_matrix.total_laps() {
            // no more stops allowed
            let column = if strategy.len() >= MAX_STOPS {
                0
            } else {
                let probabilities = transition_probabilities(
                    self.pheromone_matrix,
                    self.simulator,
                    self.alpha,
                    self.beta,
                    lap,
                    compound,
                    tyre_age,
                );
                evals += probabilities.len();
                weighted_index(&mut rng, &probabilities)
            };

            match self.pheromone_matrix.decision(column) {
                Decision::Continue => tyre_age += 1,
                Decision::Pit(next) => {
                    strategy.push(PitEvent::new(lap, next));
                    choices.push((lap, column));
                    compound = next;
                    tyre_age = 0;
                }
            }
            lap += 1;
        }

        let total_time = self.simulator.evaluate(&strategy);
        let _res = self.sender.send(Message::new(
            self.id,
            self.iteration,
            evals,
            0,
            strategy.len(),
            start_time.elapsed(),
            total_time,
        ));

        AntSolution {
            strategy,
            choices,
            total_time,
        }
    }
}

pub struct AntSolution {
    pub strategy: Strategy,
    /// `(lap, column)` of every stop, for the pheromone deposit.
    pub choices: Vec<(u32, usize)>,
    pub total_time: f64,
}
