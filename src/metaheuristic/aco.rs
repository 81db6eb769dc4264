mod ant;
mod message;
mod params;
mod pheromone;

pub use ant::{heuristic, transition_probabilities, Ant, AntSolution, FALLBACK_HEURISTIC};
pub use message::Message;
pub use params::Params;
pub use pheromone::{Decision, PheromoneMatrix, CONTINUE_LEVEL, INITIAL_LEVEL};

use crate::metaheuristic::error::{ensure, SearchError};
use crate::metaheuristic::{Metaheuristic, ProblemInstance, SearchResult, Supervisor};
use crate::race::Strategy;
use crate::rng::{derive_seed, rng64, RandomSource};

use oorandom::Rand64;
use rayon::prelude::*;
use std::io::Write;
use std::time::Instant;

/// Ant colony search: every ant decides lap by lap whether to stay out or
/// pit for one of the compounds, guided by a lap x decision pheromone matrix.
pub struct Aco<'a, R: RandomSource, W: Write> {
    problem: ProblemInstance<'a>,
    params: Params,
    pheromone_matrix: PheromoneMatrix,
    best_strategy: Strategy,
    best_time: f64,
    fitness_history: Vec<f64>,
    iteration: usize,
    pub supervisor: Supervisor<Message, W>,
    rng: R,
}

impl<'a, W: Write> Aco<'a, Rand64, W> {
    pub fn new(
        problem: ProblemInstance<'a>,
        params: Params,
        supervisor: Supervisor<Message, W>,
    ) -> Result<Self, SearchError> {
        let rng = rng64(params.seed);
        Self::with_rng(problem, params, supervisor, rng)
    }
}

impl<'a, R: RandomSource, W: Write> Aco<'a, R, W> {
    pub fn with_rng(
        problem: ProblemInstance<'a>,
        params: Params,
        supervisor: Supervisor<Message, W>,
        rng: R,
    ) -> Result<Self, SearchError> {
        params.validate()?;
        ensure(!problem.compounds().is_empty(), "no compounds to choose from")?;
        ensure(problem.total_laps() > 0, "race has no laps")?;

        Ok(Aco {
            pheromone_matrix: PheromoneMatrix::new(problem.total_laps(), problem.compounds()),
            problem,
            params,
            best_strategy: Strategy::new(),
            best_time: f64::INFINITY,
            fitness_history: Vec::new(),
            iteration: 0,
            supervisor,
            rng,
        })
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn pheromone_matrix(&self) -> &PheromoneMatrix {
        &self.pheromone_matrix
    }

    pub fn best_time(&self) -> f64 {
        self.best_time
    }

    pub fn fitness_history(&self) -> &[f64] {
        &self.fitness_history
    }

    pub fn iteration(&self) -> usize {
        self.iteration
    }

    fn construct_solutions(&mut self) -> Vec<AntSolution> {
        let mut ants = Vec::with_capacity(self.params.ant_count);
        for id in 1..=self.params.ant_count {
            // seeds are drawn in ant order, so scheduling cannot change the run
            let seed = derive_seed(&mut self.rng);
            ants.push(Ant::new(
                self.problem.simulator(),
                &self.pheromone_matrix,
                self.params.alpha,
                self.params.beta,
                seed,
                self.supervisor.sender(),
                id,
                self.iteration,
            ));
        }

        ants.into_par_iter().map(|ant| ant.get_solution()).collect()
    }

    fn pheromone_update(&mut self, solutions: &[AntSolution]) {
        self.pheromone_matrix.evaporate(self.params.evaporation_rate);

        for solution in solutions {
            if !(solution.total_time.is_finite() && solution.total_time > 0.0) {
                continue;
            }
            let amount = 1.0 / solution.total_time;
            for &(lap, column) in solution.choices.iter() {
                self.pheromone_matrix.deposit(lap, column, amount);
            }
        }
    }

    fn best_fitness(&self) -> f64 {
        if self.best_time.is_finite() && self.best_time > 0.0 {
            1.0 / self.best_time
        } else {
            0.0
        }
    }
}

impl<'a, R: RandomSource, W: Write> Metaheuristic for Aco<'a, R, W> {
    fn single_iteration(&mut self) -> Option<&Strategy> {
        if self.iteration >= self.params.iterations {
            return None;
        }

        let solutions = self.construct_solutions();

        let start_time = Instant::now();
        let mut improvements = 0;
        for solution in solutions.iter() {
            if solution.total_time < self.best_time {
                improvements += 1;
                self.best_time = solution.total_time;
                self.best_strategy = solution.strategy.clone();
            }
        }

        self.pheromone_update(&solutions);
        self.fitness_history.push(self.best_fitness());

        // Ant 0 is always supervisor
        let _res = self.supervisor.sender().send(Message::new(
            0,
            self.iteration,
            0,
            improvements,
            0,
            start_time.elapsed(),
            self.best_time,
        ));
        self.supervisor.prepare_next();

        if self.iteration % 10 == 0 {
            log::info!(
                "iteration {}: best race time {:.3} s ({})",
                self.iteration,
                self.best_time,
                self.best_strategy
            );
        }
        self.iteration += 1;

        Some(&self.best_strategy)
    }

    fn result(&self) -> SearchResult {
        SearchResult {
            best_strategy: self.best_strategy.clone(),
            total_time: self.best_time,
            fitness_history: self.fitness_history.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::race::{Compound, LapTimeModel, ModelParameters, StrategySimulator, MAX_STOPS};

    fn simulator(total_laps: u32) -> StrategySimulator {
        let params = ModelParameters::default_table(total_laps, Compound::Medium);
        StrategySimulator::new(LapTimeModel::from_parameters(params))
    }

    fn colony<'a>(
        sim: &'a StrategySimulator,
        params: Params,
    ) -> Aco<'a, Rand64, std::io::Sink> {
        Aco::new(ProblemInstance::new(sim), params, Supervisor::default()).unwrap()
    }

    #[test]
    fn aco_works() {
        let sim = simulator(40);
        let mut aco = colony(&sim, Params::new(15, 20, 0.1, 1.0, 2.0, Some(3)));
        let result = aco.solve();

        assert_eq!(result.fitness_history.len(), 20);
        assert!(result.total_time.is_finite());
        assert!(float_cmp::approx_eq!(
            f64,
            result.total_time,
            sim.evaluate(&result.best_strategy)
        ));
        assert!(result.best_strategy.len() <= MAX_STOPS);
        assert!(!result.best_strategy.has_duplicate_laps());
        for window in result.fitness_history.windows(2) {
            assert!(window[1] >= window[0]);
        }
    }

    #[test]
    fn same_seed_same_result() {
        let sim = simulator(30);
        let a = colony(&sim, Params::new(8, 6, 0.2, 1.0, 2.0, Some(11))).solve();
        let b = colony(&sim, Params::new(8, 6, 0.2, 1.0, 2.0, Some(11))).solve();

        assert_eq!(a, b);
    }

    #[test]
    fn pheromones_stay_non_negative() {
        let sim = simulator(25);
        let mut aco = colony(&sim, Params::new(5, 30, 0.9, 1.0, 1.0, Some(8)));

        while aco.single_iteration().is_some() {
            assert!(aco.pheromone_matrix().levels().iter().all(|&level| level >= 0.0));
        }
    }

    #[test]
    fn full_evaporation_keeps_only_new_deposits() {
        let sim = simulator(20);
        let mut aco = colony(&sim, Params::new(4, 1, 1.0, 1.0, 1.0, Some(2)));
        aco.single_iteration();

        // continuing never deposits, so column 0 is drained
        let m = aco.pheromone_matrix();
        assert!((1..=20).all(|lap| m.level(lap, 0) == Some(0.0)));
    }

    #[test]
    fn unfinished_ants_deposit_nothing() {
        let sim = simulator(20);
        let mut aco = colony(&sim, Params::new(4, 1, 0.3, 1.0, 1.0, Some(2)));
        let mut expected = aco.pheromone_matrix().clone();
        expected.evaporate(0.3);

        let column = expected
            .column(Decision::Pit(Compound::Hard))
            .unwrap();
        let solutions: Vec<AntSolution> = [f64::INFINITY, f64::NAN, 0.0]
            .iter()
            .map(|&total_time| AntSolution {
                strategy: Strategy::new(),
                choices: vec![(10, column)],
                total_time,
            })
            .collect();
        aco.pheromone_update(&solutions);

        assert_eq!(aco.pheromone_matrix(), &expected);
    }

    #[test]
    fn infinite_lap_times_keep_the_colony_running() {
        let mut params = ModelParameters::default_table(20, Compound::Medium);
        params.base_time = f64::INFINITY;
        let sim = StrategySimulator::new(LapTimeModel::from_parameters(params));
        let mut aco = colony(&sim, Params::new(4, 3, 0.2, 1.0, 2.0, Some(6)));
        let initial = aco.pheromone_matrix().clone();
        let result = aco.solve();

        assert!(result.fitness_history.iter().all(|&f| f == 0.0));
        // evaporation only
        let m = aco.pheromone_matrix();
        assert!(m
            .levels()
            .iter()
            .zip(initial.levels())
            .all(|(&level, &start)| level <= start && level >= 0.0));
    }

    #[test]
    fn invalid_configuration_is_rejected() {
        let sim = simulator(30);
        let no_laps = simulator(0);
        let valid = || Params::new(5, 5, 0.1, 1.0, 2.0, Some(1));

        let cases = vec![
            (ProblemInstance::new(&sim), Params::new(0, 5, 0.1, 1.0, 2.0, Some(1))),
            (ProblemInstance::new(&sim), Params::new(5, 5, 0.0, 1.0, 2.0, Some(1))),
            (ProblemInstance::new(&sim), Params::new(5, 5, 0.1, -0.5, 2.0, Some(1))),
            (ProblemInstance::with_compounds(&sim, &[]), valid()),
            (ProblemInstance::new(&no_laps), valid()),
        ];
        for (problem, params) in cases {
            let aco = Aco::new(problem, params, Supervisor::default());
            assert!(matches!(aco, Err(SearchError::InvalidConfiguration(_))));
        }
    }

    #[test]
    fn supervisor_sees_every_ant() {
        let sim = simulator(20);
        let mut aco = colony(&sim, Params::new(6, 3, 0.1, 1.0, 2.0, Some(4)));
        aco.solve();

        let buckets = aco.supervisor.aggregated();
        assert_eq!(buckets.len(), 3);
        // 20 laps, 4 decisions each, unless an ant ran out of stops
        assert!(buckets.iter().all(|b| b.evaluations > 0 && b.evaluations <= 6 * 80));
    }
}
