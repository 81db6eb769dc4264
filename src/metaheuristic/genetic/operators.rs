use crate::metaheuristic::genetic::Individual;
use crate::race::{Compound, PitEvent, Strategy};
use crate::rng::{choose, uniform_inclusive, uniform_index, RandomSource};

use std::collections::BTreeSet;

pub const TOURNAMENT_SIZE: usize = 3;
pub const MAX_INITIAL_STOPS: u32 = 3;
pub const PIT_WINDOW_START: u32 = 5;
pub const EXTRA_STOP_WINDOW_START: u32 = 10;
/// Laps at the end of the race in which no stop is planned.
pub const PIT_WINDOW_END_MARGIN: u32 = 5;

/// Closed lap interval `[start, total_laps - margin]`, squeezed into the race.
pub fn pit_window(total_laps: u32, start: u32) -> (u32, u32) {
    let high = total_laps
        .saturating_sub(PIT_WINDOW_END_MARGIN)
        .max(1)
        .min(total_laps.max(1));
    (start.min(high), high)
}

/// Random chromosome with 0 to 3 stops that uses at least two compounds
/// whenever `compounds` allows it.
pub fn random_strategy<R: RandomSource>(
    rng: &mut R,
    total_laps: u32,
    compounds: &[Compound],
    initial: Compound,
) -> Strategy {
    let stops = uniform_inclusive(rng, 0, MAX_INITIAL_STOPS);
    let (low, high) = pit_window(total_laps, PIT_WINDOW_START);
    let mut laps: Vec<u32> = (0..stops)
        .map(|_| uniform_inclusive(rng, low, high))
        .collect();
    laps.sort_unstable();

    let mut strategy = Strategy::new();
    for lap in laps {
        if let Some(&compound) = choose(rng, compounds) {
            strategy.push(PitEvent::new(lap, compound));
        }
    }

    if strategy.distinct_compounds(initial) < 2 {
        let used: BTreeSet<Compound> = strategy
            .iter()
            .map(|event| event.compound)
            .chain(std::iter::once(initial))
            .collect();
        let unused: Vec<Compound> = compounds
            .iter()
            .copied()
            .filter(|compound| !used.contains(compound))
            .collect();

        if let Some(&compound) = choose(rng, &unused) {
            let (low, high) = pit_window(total_laps, EXTRA_STOP_WINDOW_START);
            strategy.push(PitEvent::new(uniform_inclusive(rng, low, high), compound));
        }
    }

    strategy
}

/// Fittest of up to [`TOURNAMENT_SIZE`] distinct individuals; ties go to the
/// first one drawn.
pub fn tournament<'p, R: RandomSource>(
    rng: &mut R,
    population: &'p [Individual],
) -> Option<&'p Individual> {
    let size = TOURNAMENT_SIZE.min(population.len());
    let mut picked: Vec<usize> = Vec::with_capacity(size);
    while picked.len() < size {
        let idx = uniform_index(rng, population.len())?;
        if !picked.contains(&idx) {
            picked.push(idx);
        }
    }

    let mut contestants = picked.into_iter().map(|idx| &population[idx]);
    let first = contestants.next()?;
    Some(contestants.fold(first, |winner, contestant| {
        if contestant.cmp_fitness(winner) == std::cmp::Ordering::Greater {
            contestant
        } else {
            winner
        }
    }))
}

/// Single cut point crossover. With probability `1 - rate`, or when either
/// parent has no stop, the parents are returned unchanged.
pub fn crossover<R: RandomSource>(
    rng: &mut R,
    first: &Strategy,
    second: &Strategy,
    rate: f64,
) -> (Strategy, Strategy) {
    if rng.rand_float() >= rate || first.is_empty() || second.is_empty() {
        return (first.clone(), second.clone());
    }

    let longest = first.len().max(second.len());
    let cut = uniform_inclusive(rng, 0, longest as u32) as usize;
    let splice = |head: &Strategy, tail: &Strategy| {
        let head = &head.events()[..cut.min(head.len())];
        let tail = &tail.events()[cut.min(tail.len())..];
        Strategy::from_events(head.iter().chain(tail.iter()).copied().collect())
    };

    (splice(first, second), splice(second, first))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    ChangeLap,
    ChangeCompound,
    AddPit,
    RemovePit,
}

impl Mutation {
    pub const ALL: [Mutation; 4] = [
        Mutation::ChangeLap,
        Mutation::ChangeCompound,
        Mutation::AddPit,
        Mutation::RemovePit,
    ];
}

/// With probability `rate` applies one uniformly chosen [`Mutation`].
/// Returns the mutation drawn, even if it had nothing to act on.
pub fn mutate<R: RandomSource>(
    rng: &mut R,
    strategy: &mut Strategy,
    rate: f64,
    total_laps: u32,
    compounds: &[Compound],
) -> Option<Mutation> {
    if rng.rand_float() >= rate {
        return None;
    }

    let mutation = *choose(rng, &Mutation::ALL)?;
    apply(rng, strategy, mutation, total_laps, compounds);
    Some(mutation)
}

pub fn apply<R: RandomSource>(
    rng: &mut R,
    strategy: &mut Strategy,
    mutation: Mutation,
    total_laps: u32,
    compounds: &[Compound],
) {
    let (low, high) = pit_window(total_laps, PIT_WINDOW_START);
    match mutation {
        Mutation::ChangeLap => {
            if let Some(idx) = uniform_index(rng, strategy.len()) {
                strategy.events_mut()[idx].lap = uniform_inclusive(rng, low, high);
            }
        }
        Mutation::ChangeCompound => {
            if let Some(idx) = uniform_index(rng, strategy.len()) {
                if let Some(&compound) = choose(rng, compounds) {
                    strategy.events_mut()[idx].compound = compound;
                }
            }
        }
        Mutation::AddPit => {
            let lap = uniform_inclusive(rng, low, high);
            if let Some(&compound) = choose(rng, compounds) {
                strategy.push(PitEvent::new(lap, compound));
                strategy.sort_by_lap();
            }
        }
        Mutation::RemovePit => {
            if let Some(idx) = uniform_index(rng, strategy.len()) {
                strategy.remove(idx);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::race::{LapTimeModel, ModelParameters, StrategySimulator};
    use crate::rng::rng64;

    fn strategy(events: &[(u32, Compound)]) -> Strategy {
        Strategy::from_events(
            events
                .iter()
                .map(|&(lap, compound)| PitEvent::new(lap, compound))
                .collect(),
        )
    }

    #[test]
    fn pit_window_works() {
        assert_eq!(pit_window(50, PIT_WINDOW_START), (5, 45));
        assert_eq!(pit_window(50, EXTRA_STOP_WINDOW_START), (10, 45));
        assert_eq!(pit_window(8, PIT_WINDOW_START), (3, 3));
        assert_eq!(pit_window(3, PIT_WINDOW_START), (1, 1));
        assert_eq!(pit_window(1, EXTRA_STOP_WINDOW_START), (1, 1));
    }

    #[test]
    fn random_strategies_use_two_compounds() {
        let mut rng = rng64(42);
        for _ in 0..500 {
            let strategy = random_strategy(&mut rng, 50, &Compound::DRY_SET, Compound::Medium);

            assert!(strategy.len() <= 4);
            assert!(strategy.distinct_compounds(Compound::Medium) >= 2);
            assert!(strategy.iter().all(|e| e.lap >= 5 && e.lap <= 45));
        }
    }

    #[test]
    fn random_strategy_with_single_compound_stays_legal_in_laps() {
        let mut rng = rng64(5);
        for _ in 0..100 {
            let strategy = random_strategy(&mut rng, 4, &[Compound::Hard], Compound::Hard);

            assert!(strategy.iter().all(|e| e.lap == 1 && e.compound == Compound::Hard));
        }
    }

    #[test]
    fn tournament_picks_fittest_of_all_when_small() {
        let params = ModelParameters::default_table(50, Compound::Medium);
        let sim = StrategySimulator::new(LapTimeModel::from_parameters(params));
        let population = vec![
            Individual::evaluate(Strategy::new(), &sim),
            Individual::evaluate(strategy(&[(25, Compound::Hard)]), &sim),
        ];
        let mut rng = rng64(9);

        for _ in 0..20 {
            let winner = tournament(&mut rng, &population).unwrap();
            assert_eq!(winner, &population[1]);
        }
        assert!(tournament(&mut rng, &[]).is_none());
    }

    #[test]
    fn crossover_with_rate_zero_copies_parents() {
        let mut rng = rng64(1);
        let a = strategy(&[(10, Compound::Soft), (30, Compound::Hard)]);
        let b = strategy(&[(20, Compound::Medium)]);

        assert_eq!(crossover(&mut rng, &a, &b, 0.0), (a.clone(), b.clone()));
        assert_eq!(
            crossover(&mut rng, &a, &Strategy::new(), 1.0),
            (a.clone(), Strategy::new())
        );
    }

    #[test]
    fn crossover_preserves_genes() {
        let mut rng = rng64(77);
        let a = strategy(&[(10, Compound::Soft), (30, Compound::Hard), (40, Compound::Soft)]);
        let b = strategy(&[(20, Compound::Medium)]);

        for _ in 0..50 {
            let (c1, c2) = crossover(&mut rng, &a, &b, 1.0);
            assert_eq!(c1.len() + c2.len(), a.len() + b.len());

            let mut genes: Vec<PitEvent> = c1.iter().chain(c2.iter()).copied().collect();
            let mut parents: Vec<PitEvent> = a.iter().chain(b.iter()).copied().collect();
            genes.sort_by_key(|e| e.lap);
            parents.sort_by_key(|e| e.lap);
            assert_eq!(genes, parents);
        }
    }

    #[test]
    fn mutation_with_rate_zero_does_nothing() {
        let mut rng = rng64(3);
        let mut s = strategy(&[(10, Compound::Soft)]);

        assert_eq!(mutate(&mut rng, &mut s, 0.0, 50, &Compound::DRY_SET), None);
        assert_eq!(s, strategy(&[(10, Compound::Soft)]));
    }

    #[test]
    fn mutations_on_empty_strategy() {
        let mut rng = rng64(3);
        for &mutation in [Mutation::ChangeLap, Mutation::ChangeCompound, Mutation::RemovePit].iter() {
            let mut s = Strategy::new();
            apply(&mut rng, &mut s, mutation, 50, &Compound::DRY_SET);
            assert!(s.is_empty());
        }

        let mut s = Strategy::new();
        apply(&mut rng, &mut s, Mutation::AddPit, 50, &Compound::DRY_SET);
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn add_pit_keeps_laps_sorted() {
        let mut rng = rng64(12);
        let mut s = strategy(&[(10, Compound::Soft), (40, Compound::Hard)]);
        for _ in 0..10 {
            apply(&mut rng, &mut s, Mutation::AddPit, 50, &Compound::DRY_SET);
        }

        let laps: Vec<u32> = s.iter().map(|e| e.lap).collect();
        let mut sorted = laps.clone();
        sorted.sort_unstable();
        assert_eq!(laps, sorted);
        assert_eq!(s.len(), 12);
    }

    #[test]
    fn change_lap_stays_in_window() {
        let mut rng = rng64(4);
        let mut s = strategy(&[(10, Compound::Soft), (40, Compound::Hard)]);
        for _ in 0..100 {
            apply(&mut rng, &mut s, Mutation::ChangeLap, 50, &Compound::DRY_SET);
            assert!(s.iter().all(|e| e.lap >= 5 && e.lap <= 45));
        }
    }
}
