use crate::metaheuristic::supervisor;
use crate::metaheuristic::supervisor::MessageInfo;

use std::time::Duration;

/// Statistics of one generation.
#[derive(Debug)]
pub struct Message {
    pub generation: usize,
    pub evaluations: usize,
    pub cpu_time: Duration,
    pub n_improvements: usize,
    /// Mutations applied to offspring.
    pub changes: usize,
    pub best_time: f64,
    pub best_fitness: f64,
}

impl Message {
    pub fn new(
        generation: usize,
        evaluations: usize,
        n_improvements: usize,
        changes: usize,
        cpu_time: Duration,
        best_time: f64,
        best_fitness: f64,
    ) -> Self {
        Self {
            generation,
            evaluations,
            n_improvements,
            changes,
            cpu_time,
            best_time,
            best_fitness,
        }
    }
}

impl supervisor::Message for Message {
    fn iteration(&self) -> usize {
        self.generation
    }

    fn get_info(&self) -> MessageInfo {
        MessageInfo::new(
            self.evaluations,
            self.n_improvements,
            self.changes,
            self.cpu_time,
            self.best_time,
            self.best_fitness,
        )
    }
}
