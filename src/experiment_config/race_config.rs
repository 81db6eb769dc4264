use serde::{Deserialize, Serialize};

use crate::experiment_config::ExperimentConfigError;
use crate::race::{Compound, PitPenaltyMode, DEFAULT_PIT_STOP_PENALTY};

fn default_pit_stop_penalty() -> f64 {
    DEFAULT_PIT_STOP_PENALTY
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct RaceConfig {
    /// CSV with `lap_number,compound,tyre_age,lap_time_seconds`, relative to
    /// the working directory.
    pub laps_file: String,
    #[serde(default = "default_pit_stop_penalty")]
    pub pit_stop_penalty: f64,
    #[serde(default)]
    pub pit_penalty_mode: PitPenaltyMode,
    /// Race distance, if it differs from the number of recorded laps.
    #[serde(default)]
    pub total_laps: Option<u32>,
    /// Compounds strategies may switch to, all observed ones if absent.
    #[serde(default)]
    pub compounds: Option<Vec<Compound>>,
}

impl RaceConfig {
    pub fn validate(&self) -> Result<(), ExperimentConfigError> {
        if !(self.pit_stop_penalty.is_finite() && self.pit_stop_penalty >= 0.0) {
            return Err(ExperimentConfigError::InvalidRaceConfig(format!(
                "pit_stop_penalty {} must be a non-negative number",
                self.pit_stop_penalty
            )));
        }
        if self.total_laps == Some(0) {
            return Err(ExperimentConfigError::InvalidRaceConfig(
                "total_laps must be positive".to_string(),
            ));
        }
        if let Some(compounds) = &self.compounds {
            if compounds.is_empty() {
                return Err(ExperimentConfigError::InvalidRaceConfig(
                    "compounds must not be empty".to_string(),
                ));
            }
        }

        Ok(())
    }
}
