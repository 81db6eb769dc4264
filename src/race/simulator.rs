use crate::race::{Compound, LapTimeModel, ModelParameters, Strategy};

use serde::{Deserialize, Serialize};

/// Strategies with more stops than this pay [`EXCESS_STOP_PENALTY`] per stop.
pub const MAX_STOPS: usize = 3;
pub const EXCESS_STOP_PENALTY: f64 = 1000.0;

/// How the pit-stop penalty is charged over the stops of a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PitPenaltyMode {
    /// Every stop but the last one is charged.
    ExemptFinalStop,
    ChargeEveryStop,
}

impl Default for PitPenaltyMode {
    fn default() -> Self {
        PitPenaltyMode::ExemptFinalStop
    }
}

/// Deterministic total race time of a strategy under a [`LapTimeModel`].
#[derive(Debug, Clone)]
pub struct StrategySimulator {
    model: LapTimeModel,
    pit_penalty_mode: PitPenaltyMode,
}

impl StrategySimulator {
    pub fn new(model: LapTimeModel) -> Self {
        Self::with_mode(model, PitPenaltyMode::default())
    }

    pub fn with_mode(model: LapTimeModel, pit_penalty_mode: PitPenaltyMode) -> Self {
        StrategySimulator {
            model,
            pit_penalty_mode,
        }
    }

    pub fn model(&self) -> &LapTimeModel {
        &self.model
    }

    pub fn parameters(&self) -> &ModelParameters {
        self.model.parameters()
    }

    pub fn pit_penalty_mode(&self) -> PitPenaltyMode {
        self.pit_penalty_mode
    }

    pub fn total_laps(&self) -> u32 {
        self.model.total_laps()
    }

    pub fn initial_compound(&self) -> Compound {
        self.parameters().initial_compound
    }

    pub fn available_compounds(&self) -> &[Compound] {
        &self.parameters().available_compounds
    }

    pub fn pit_stop_penalty(&self) -> f64 {
        self.parameters().pit_stop_penalty
    }

    pub fn lap_time(&self, lap: u32, compound: Compound, tyre_age: u32) -> f64 {
        self.model.lap_time(lap, compound, tyre_age)
    }

    /// Total race time in seconds, including pit and excess-stop penalties.
    ///
    /// Events are sorted by lap first. Events sharing a lap are all applied in
    /// order, each one charged like any other stop.
    pub fn evaluate(&self, strategy: &Strategy) -> f64 {
        if strategy.is_empty() {
            return self.no_stop_time(self.initial_compound());
        }

        let strategy = strategy.canonical();
        let stops = strategy.len();
        let total_laps = self.total_laps();

        let mut total_time = 0.0;
        let mut lap = 1;
        let mut compound = self.initial_compound();
        let mut tyre_age = 0;

        for (i, event) in strategy.iter().enumerate() {
            while lap < event.lap && lap <= total_laps {
                total_time += self.lap_time(lap, compound, tyre_age);
                lap += 1;
                tyre_age += 1;
            }

            let charged = match self.pit_penalty_mode {
                PitPenaltyMode::ExemptFinalStop => i + 1 < stops,
                PitPenaltyMode::ChargeEveryStop => true,
            };
            if charged {
                total_time += self.pit_stop_penalty();
            }

            compound = event.compound;
            tyre_age = 0;
        }

        while lap <= total_laps {
            total_time += self.lap_time(lap, compound, tyre_age);
            lap += 1;
            tyre_age += 1;
        }

        total_time + excess_stop_penalty(stops)
    }

    /// Closed form of a race run entirely on `compound`.
    pub fn no_stop_time(&self, compound: Compound) -> f64 {
        (1..=self.total_laps())
            .map(|lap| self.lap_time(lap, compound, lap - 1))
            .sum()
    }
}

fn excess_stop_penalty(stops: usize) -> f64 {
    if stops > MAX_STOPS {
        (stops - MAX_STOPS) as f64 * EXCESS_STOP_PENALTY
    } else {
        0.0
    }
}
