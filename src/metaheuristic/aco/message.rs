use crate::metaheuristic::supervisor;
use crate::metaheuristic::supervisor::MessageInfo;

use std::time::Duration;

/// Statistics of one ant, or with `ant_id` 0 of the whole colony, in one
/// iteration.
#[derive(Debug)]
pub struct Message {
    pub ant_id: usize,
    pub iteration: usize,
    pub evaluations: usize,
    pub cpu_time: Duration,
    pub n_improvements: usize,
    /// Pit stops taken.
    pub changes: usize,
    pub total_time: f64,
}

impl Message {
    pub fn new(
        ant_id: usize,
        iteration: usize,
        evaluations: usize,
        n_improvements: usize,
        changes: usize,
        cpu_time: Duration,
        total_time: f64,
    ) -> Self {
        Self {
            ant_id,
            iteration,
            evaluations,
            n_improvements,
            changes,
            cpu_time,
            total_time,
        }
    }

    pub fn id(&self) -> usize {
        self.ant_id
    }
}

impl supervisor::Message for Message {
    fn iteration(&self) -> usize {
        self.iteration
    }

    fn get_info(&self) -> MessageInfo {
        let fitness = if self.total_time.is_finite() && self.total_time > 0.0 {
            1.0 / self.total_time
        } else {
            0.0
        };

        MessageInfo::new(
            self.evaluations,
            self.n_improvements,
            self.changes,
            self.cpu_time,
            self.total_time,
            fitness,
        )
    }
}
