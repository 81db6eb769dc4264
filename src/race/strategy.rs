use crate::race::Compound;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::fmt::{Display, Formatter};

/// Tyre change at the start of `lap` onto a fresh set of `compound`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PitEvent {
    pub lap: u32,
    pub compound: Compound,
}

impl PitEvent {
    pub fn new(lap: u32, compound: Compound) -> Self {
        PitEvent { lap, compound }
    }
}

/// Ordered list of pit events for one race. Empty means no stop.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Strategy {
    events: Vec<PitEvent>,
}

impl Strategy {
    pub fn new() -> Self {
        Strategy { events: Vec::new() }
    }

    pub fn from_events(events: Vec<PitEvent>) -> Self {
        Strategy { events }
    }

    pub fn push(&mut self, event: PitEvent) {
        self.events.push(event);
    }

    pub fn remove(&mut self, idx: usize) -> PitEvent {
        self.events.remove(idx)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[PitEvent] {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut [PitEvent] {
        &mut self.events
    }

    pub fn iter(&self) -> impl Iterator<Item = &PitEvent> + '_ {
        self.events.iter()
    }

    /// Stable sort by lap; events sharing a lap keep their relative order.
    pub fn sort_by_lap(&mut self) {
        self.events.sort_by_key(|event| event.lap);
    }

    pub fn canonical(&self) -> Strategy {
        let mut sorted = self.clone();
        sorted.sort_by_lap();
        sorted
    }

    /// Distinct compounds raced, counting the set fitted at the start.
    pub fn distinct_compounds(&self, initial: Compound) -> usize {
        self.events
            .iter()
            .map(|event| event.compound)
            .chain(std::iter::once(initial))
            .collect::<BTreeSet<_>>()
            .len()
    }

    pub fn has_duplicate_laps(&self) -> bool {
        let laps: BTreeSet<_> = self.events.iter().map(|event| event.lap).collect();
        laps.len() != self.events.len()
    }
}

impl From<Vec<PitEvent>> for Strategy {
    fn from(events: Vec<PitEvent>) -> Self {
        Strategy::from_events(events)
    }
}

impl Display for Strategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.events.is_empty() {
            return write!(f, "no stop");
        }

        write!(
            f,
            "{}",
            self.events
                .iter()
                .map(|event| format!("L{} {}", event.lap, event.compound))
                .collect::<Vec<String>>()
                .join(" -> ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unsorted() -> Strategy {
        Strategy::from_events(vec![
            PitEvent::new(30, Compound::Hard),
            PitEvent::new(12, Compound::Soft),
            PitEvent::new(45, Compound::Medium),
        ])
    }

    #[test]
    fn canonical_sorts_by_lap() {
        let laps: Vec<u32> = unsorted().canonical().iter().map(|e| e.lap).collect();

        assert_eq!(laps, vec![12, 30, 45]);
    }

    #[test]
    fn distinct_compounds_counts_initial() {
        let strategy = Strategy::from_events(vec![PitEvent::new(20, Compound::Hard)]);

        assert_eq!(strategy.distinct_compounds(Compound::Hard), 1);
        assert_eq!(strategy.distinct_compounds(Compound::Medium), 2);
        assert_eq!(Strategy::new().distinct_compounds(Compound::Soft), 1);
    }

    #[test]
    fn duplicate_laps_are_detected() {
        let mut strategy = unsorted();
        assert!(!strategy.has_duplicate_laps());

        strategy.push(PitEvent::new(12, Compound::Hard));
        assert!(strategy.has_duplicate_laps());
    }

    #[test]
    fn display_works() {
        let strategy = Strategy::from_events(vec![
            PitEvent::new(12, Compound::Soft),
            PitEvent::new(30, Compound::Hard),
        ]);

        assert_eq!(strategy.to_string(), "L12 SOFT -> L30 HARD");
        assert_eq!(Strategy::new().to_string(), "no stop");
    }
}
