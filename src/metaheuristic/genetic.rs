mod individual;
mod message;
pub mod operators;
mod params;

pub use individual::{fitness, Individual, COMPOUND_RULE_PENALTY, DUPLICATE_LAP_PENALTY};
pub use message::Message;
pub use params::Params;

use crate::metaheuristic::error::{ensure, SearchError};
use crate::metaheuristic::{Metaheuristic, ProblemInstance, SearchResult, Supervisor};
use crate::race::Strategy;
use crate::rng::{rng64, RandomSource};

use oorandom::Rand64;
use rayon::prelude::*;
use std::io::Write;
use std::time::Instant;

/// Generational genetic algorithm over pit strategies with tournament
/// selection, single cut point crossover and elitism.
pub struct Genetic<'a, R: RandomSource, W: Write> {
    problem: ProblemInstance<'a>,
    params: Params,
    population: Vec<Individual>,
    best: Individual,
    best_time: f64,
    fitness_history: Vec<f64>,
    generation: usize,
    pub supervisor: Supervisor<Message, W>,
    rng: R,
}

impl<'a, W: Write> Genetic<'a, Rand64, W> {
    pub fn new(
        problem: ProblemInstance<'a>,
        params: Params,
        supervisor: Supervisor<Message, W>,
    ) -> Result<Self, SearchError> {
        let rng = rng64(params.seed);
        Self::with_rng(problem, params, supervisor, rng)
    }
}

impl<'a, R: RandomSource, W: Write> Genetic<'a, R, W> {
    /// Validates the configuration and evaluates a random initial population.
    pub fn with_rng(
        problem: ProblemInstance<'a>,
        params: Params,
        supervisor: Supervisor<Message, W>,
        mut rng: R,
    ) -> Result<Self, SearchError> {
        params.validate()?;
        ensure(!problem.compounds().is_empty(), "no compounds to choose from")?;
        ensure(problem.total_laps() > 0, "race has no laps")?;

        let start_time = Instant::now();
        let chromosomes: Vec<Strategy> = (0..params.population_size)
            .map(|_| {
                operators::random_strategy(
                    &mut rng,
                    problem.total_laps(),
                    problem.compounds(),
                    problem.initial_compound(),
                )
            })
            .collect();
        let population = evaluate_all(problem, chromosomes);

        let best = population
            .iter()
            .max_by(|a, b| a.cmp_fitness(b))
            .cloned()
            .ok_or_else(|| SearchError::InvalidConfiguration("empty population".to_string()))?;
        let best_time = problem.simulator().evaluate(&best.chromosome);

        let genetic = Genetic {
            problem,
            fitness_history: vec![population_best(&population)],
            params,
            population,
            best,
            best_time,
            generation: 0,
            supervisor,
            rng,
        };
        genetic.report(genetic.params.population_size, 1, 0, start_time);
        log::debug!(
            "initial population of {} with best {} ({:.3} s)",
            genetic.population.len(),
            genetic.best.chromosome,
            genetic.best_time
        );

        Ok(genetic)
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn population(&self) -> &[Individual] {
        &self.population
    }

    pub fn best_individual(&self) -> &Individual {
        &self.best
    }

    pub fn fitness_history(&self) -> &[f64] {
        &self.fitness_history
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    fn next_generation(&mut self) {
        let start_time = Instant::now();
        let total_laps = self.problem.total_laps();
        let compounds = self.problem.compounds();

        self.population.sort_by(|a, b| b.cmp_fitness(a));
        let mut next: Vec<Individual> = self.population[..self.params.elitism_size].to_vec();

        let needed = self.params.population_size - self.params.elitism_size;
        let mut offspring: Vec<Strategy> = Vec::with_capacity(needed + 1);
        let mut changes = 0;
        while offspring.len() < needed {
            let (first, second) = match (
                operators::tournament(&mut self.rng, &self.population),
                operators::tournament(&mut self.rng, &self.population),
            ) {
                (Some(first), Some(second)) => (first, second),
                _ => break,
            };

            let (mut c1, mut c2) = operators::crossover(
                &mut self.rng,
                &first.chromosome,
                &second.chromosome,
                self.params.crossover_rate,
            );
            for child in [&mut c1, &mut c2].iter_mut() {
                let mutation = operators::mutate(
                    &mut self.rng,
                    child,
                    self.params.mutation_rate,
                    total_laps,
                    compounds,
                );
                if mutation.is_some() {
                    changes += 1;
                }
            }

            offspring.push(c1);
            offspring.push(c2);
        }
        offspring.truncate(needed);

        let evaluations = offspring.len();
        next.extend(evaluate_all(self.problem, offspring));
        self.population = next;
        self.generation += 1;

        let improved = self.track_best();
        self.fitness_history.push(population_best(&self.population));
        self.report(evaluations, improved as usize, changes, start_time);

        if self.generation % 10 == 0 {
            log::info!(
                "generation {}: best fitness {:.8}, race time {:.3} s",
                self.generation,
                self.best.fitness(),
                self.best_time
            );
        }
    }

    /// Keeps a copy of the fittest individual seen so far.
    fn track_best(&mut self) -> bool {
        let candidate = self.population.iter().max_by(|a, b| a.cmp_fitness(b));
        match candidate {
            Some(candidate) if candidate.cmp_fitness(&self.best) == std::cmp::Ordering::Greater => {
                self.best = candidate.clone();
                self.best_time = self.problem.simulator().evaluate(&self.best.chromosome);
                true
            }
            _ => false,
        }
    }

    fn report(&self, evaluations: usize, improvements: usize, changes: usize, start: Instant) {
        // the supervisor owns the receiver, so sending cannot fail
        let _res = self.supervisor.sender().send(Message::new(
            self.generation,
            evaluations,
            improvements,
            changes,
            start.elapsed(),
            self.best_time,
            self.best.fitness(),
        ));
    }
}

/// Best fitness within one generation, which may be below the best ever seen
/// when no elites are kept.
fn population_best(population: &[Individual]) -> f64 {
    population.iter().map(Individual::fitness).fold(0.0, f64::max)
}

fn evaluate_all(problem: ProblemInstance, chromosomes: Vec<Strategy>) -> Vec<Individual> {
    let simulator = problem.simulator();
    chromosomes
        .into_par_iter()
        .map(|chromosome| Individual::evaluate(chromosome, simulator))
        .collect()
}

impl<'a, R: RandomSource, W: Write> Metaheuristic for Genetic<'a, R, W> {
    fn single_iteration(&mut self) -> Option<&Strategy> {
        if self.generation >= self.params.generations {
            return None;
        }

        self.next_generation();
        self.supervisor.prepare_next();
        Some(&self.best.chromosome)
    }

    fn result(&self) -> SearchResult {
        SearchResult {
            best_strategy: self.best.chromosome.clone(),
            total_time: self.best_time,
            fitness_history: self.fitness_history.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::race::{Compound, LapTimeModel, ModelParameters, PitEvent, StrategySimulator};

    fn simulator(total_laps: u32) -> StrategySimulator {
        let params = ModelParameters::default_table(total_laps, Compound::Medium);
        StrategySimulator::new(LapTimeModel::from_parameters(params))
    }

    fn run(sim: &StrategySimulator, params: Params) -> SearchResult {
        let problem = ProblemInstance::new(sim);
        let mut ga = Genetic::new(problem, params, Supervisor::default()).unwrap();
        ga.solve()
    }

    #[test]
    fn genetic_works() {
        let sim = simulator(50);
        let result = run(&sim, Params::new(30, 40, 0.2, 0.8, 3, Some(7)));

        assert_eq!(result.fitness_history.len(), 41);
        assert!(result.best_strategy.distinct_compounds(Compound::Medium) >= 2);
        assert!(float_cmp::approx_eq!(
            f64,
            result.total_time,
            sim.evaluate(&result.best_strategy)
        ));
        let best_fitness = fitness(&result.best_strategy, &sim);
        assert!(result.fitness_history.iter().all(|&f| f <= best_fitness));
        // a legal strategy beats running the whole race on mediums
        assert!(result.total_time < sim.no_stop_time(Compound::Medium) + 10_000.0);
    }

    #[test]
    fn same_seed_same_result() {
        let sim = simulator(50);
        let a = run(&sim, Params::new(20, 15, 0.3, 0.9, 2, Some(1234)));
        let b = run(&sim, Params::new(20, 15, 0.3, 0.9, 2, Some(1234)));

        assert_eq!(a, b);
    }

    #[test]
    fn single_elite_without_variation_is_stable() {
        let sim = simulator(30);
        let a = run(&sim, Params::new(1, 5, 0.0, 0.0, 1, Some(99)));
        let b = run(&sim, Params::new(1, 5, 0.0, 0.0, 1, Some(99)));

        assert_eq!(a, b);
        assert_eq!(a.fitness_history.len(), 6);
        assert!(a.fitness_history.iter().all(|&f| f == a.fitness_history[0]));
    }

    #[test]
    fn elites_survive_unmodified() {
        let sim = simulator(50);
        let problem = ProblemInstance::new(&sim);
        let params = Params::new(10, 1, 1.0, 1.0, 2, Some(5));
        let mut ga = Genetic::new(problem, params, Supervisor::default()).unwrap();

        let mut ranked = ga.population().to_vec();
        ranked.sort_by(|a, b| b.cmp_fitness(a));
        ga.single_iteration();

        assert_eq!(ga.population()[..2], ranked[..2]);
        assert_eq!(ga.population().len(), 10);
        assert!(ga.single_iteration().is_none());
    }

    #[test]
    fn history_tracks_each_generation_without_elites() {
        let sim = simulator(50);
        let problem = ProblemInstance::new(&sim);
        let params = Params::new(4, 40, 1.0, 1.0, 0, Some(13));
        let mut ga = Genetic::new(problem, params, Supervisor::default()).unwrap();

        while ga.single_iteration().is_some() {
            let generation_best = population_best(ga.population());
            assert_eq!(ga.fitness_history().last(), Some(&generation_best));
            assert!(ga.best_individual().fitness() >= generation_best);
        }
        assert_eq!(ga.fitness_history().len(), 41);
    }

    #[test]
    fn best_is_a_copy() {
        let sim = simulator(50);
        let problem = ProblemInstance::new(&sim);
        let params = Params::new(8, 3, 1.0, 1.0, 0, Some(21));
        let mut ga = Genetic::new(problem, params, Supervisor::default()).unwrap();

        let before = ga.best_individual().clone();
        ga.population[0]
            .chromosome
            .push(PitEvent::new(2, Compound::Soft));
        assert_eq!(ga.best_individual(), &before);
    }

    #[test]
    fn invalid_configuration_is_rejected() {
        let sim = simulator(50);
        let no_laps = simulator(0);
        let cases = vec![
            (ProblemInstance::new(&sim), Params::new(0, 10, 0.1, 0.8, 0, Some(1))),
            (ProblemInstance::new(&sim), Params::new(10, 10, 0.1, 0.8, 11, Some(1))),
            (ProblemInstance::with_compounds(&sim, &[]), Params::new(10, 10, 0.1, 0.8, 1, Some(1))),
            (ProblemInstance::new(&no_laps), Params::new(10, 10, 0.1, 0.8, 1, Some(1))),
        ];

        for (problem, params) in cases {
            let ga = Genetic::new(problem, params, Supervisor::default());
            assert!(matches!(ga, Err(SearchError::InvalidConfiguration(_))));
        }
    }

    #[test]
    fn supervisor_gets_one_bucket_per_generation() {
        let sim = simulator(40);
        let problem = ProblemInstance::new(&sim);
        let params = Params::new(6, 4, 0.5, 0.5, 1, Some(3));
        let mut ga = Genetic::new(problem, params, Supervisor::default()).unwrap();
        ga.solve();
        ga.supervisor.prepare_next();

        let buckets = ga.supervisor.aggregated();
        assert_eq!(buckets.len(), 5);
        assert_eq!(buckets[0].evaluations, 6);
        assert!(buckets[1..].iter().all(|b| b.evaluations == 5));
    }
}
