use crate::race::Compound;

use serde::{Deserialize, Serialize};

pub const INITIAL_LEVEL: f64 = 0.1;
pub const CONTINUE_LEVEL: f64 = 1.0;

/// What an ant does at the start of a lap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    Continue,
    Pit(Compound),
}

/// Pheromone level per lap and decision, stored row major. Column 0 is
/// [`Decision::Continue`], column `i + 1` is a stop for `compounds[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PheromoneMatrix {
    total_laps: u32,
    compounds: Vec<Compound>,
    levels: Vec<f64>,
}

impl PheromoneMatrix {
    pub fn new(total_laps: u32, compounds: &[Compound]) -> Self {
        let width = compounds.len() + 1;
        let mut levels = vec![INITIAL_LEVEL; total_laps as usize * width];
        for row in levels.chunks_mut(width) {
            row[0] = CONTINUE_LEVEL;
        }

        PheromoneMatrix {
            total_laps,
            compounds: compounds.to_vec(),
            levels,
        }
    }

    pub fn total_laps(&self) -> u32 {
        self.total_laps
    }

    pub fn compounds(&self) -> &[Compound] {
        &self.compounds
    }

    /// Number of decisions per lap.
    pub fn width(&self) -> usize {
        self.compounds.len() + 1
    }

    pub fn decision(&self, column: usize) -> Decision {
        match column.checked_sub(1).and_then(|idx| self.compounds.get(idx)) {
            Some(&compound) => Decision::Pit(compound),
            None => Decision::Continue,
        }
    }

    pub fn column(&self, decision: Decision) -> Option<usize> {
        match decision {
            Decision::Continue => Some(0),
            Decision::Pit(compound) => self
                .compounds
                .iter()
                .position(|&c| c == compound)
                .map(|idx| idx + 1),
        }
    }

    fn offset(&self, lap: u32) -> Option<usize> {
        if lap >= 1 && lap <= self.total_laps {
            Some((lap - 1) as usize * self.width())
        } else {
            None
        }
    }

    /// Levels of all decisions at `lap`, empty outside the race.
    pub fn row(&self, lap: u32) -> &[f64] {
        match self.offset(lap) {
            Some(start) => &self.levels[start..start + self.width()],
            None => &[],
        }
    }

    pub fn level(&self, lap: u32, column: usize) -> Option<f64> {
        self.row(lap).get(column).copied()
    }

    pub fn levels(&self) -> &[f64] {
        &self.levels
    }

    pub fn evaporate(&mut self, rate: f64) {
        let keep = 1.0 - rate;
        for level in self.levels.iter_mut() {
            *level *= keep;
        }
    }

    /// Adds `amount` to one entry. Returns `false` if it lies outside the matrix.
    pub fn deposit(&mut self, lap: u32, column: usize, amount: f64) -> bool {
        let width = self.width();
        match self.offset(lap) {
            Some(start) if column < width => {
                self.levels[start + column] += amount;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    fn matrix() -> PheromoneMatrix {
        PheromoneMatrix::new(10, &Compound::DRY_SET)
    }

    #[test]
    fn initial_levels_work() {
        let m = matrix();

        assert_eq!(m.levels().len(), 40);
        assert_eq!(m.row(1), &[1.0, 0.1, 0.1, 0.1]);
        assert_eq!(m.row(10), &[1.0, 0.1, 0.1, 0.1]);
        assert!(m.row(0).is_empty());
        assert!(m.row(11).is_empty());
    }

    #[test]
    fn decisions_and_columns_agree() {
        let m = matrix();

        for column in 0..m.width() {
            assert_eq!(m.column(m.decision(column)), Some(column));
        }
        assert_eq!(m.decision(2), Decision::Pit(Compound::Medium));
        assert_eq!(m.column(Decision::Pit(Compound::Wet)), None);
    }

    #[test]
    fn evaporate_and_deposit_work() {
        let mut m = matrix();
        m.evaporate(0.5);
        assert!(m.deposit(3, 2, 0.25));
        assert!(!m.deposit(11, 0, 1.0));
        assert!(!m.deposit(3, 4, 1.0));

        assert!(approx_eq!(f64, m.level(3, 0).unwrap(), 0.5));
        assert!(approx_eq!(f64, m.level(3, 2).unwrap(), 0.3));
        assert!(approx_eq!(f64, m.level(4, 2).unwrap(), 0.05));
    }

    #[test]
    fn full_evaporation_leaves_zero() {
        let mut m = matrix();
        m.evaporate(1.0);

        assert!(m.levels().iter().all(|&level| level == 0.0));
    }
}
