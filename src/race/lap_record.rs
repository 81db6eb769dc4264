use crate::race::Compound;

use serde::{Deserialize, Serialize};

/// One timed lap of the reference race.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LapRecord {
    pub lap_number: u32,
    pub compound: Compound,
    pub tyre_age: u32,
    pub lap_time_seconds: f64,
}

impl LapRecord {
    pub fn new(lap_number: u32, compound: Compound, tyre_age: u32, lap_time_seconds: f64) -> Self {
        LapRecord {
            lap_number,
            compound,
            tyre_age,
            lap_time_seconds,
        }
    }
}

/// Compounds in order of first appearance.
pub fn observed_compounds(records: &[LapRecord]) -> Vec<Compound> {
    let mut compounds = Vec::new();
    for record in records {
        if !compounds.contains(&record.compound) {
            compounds.push(record.compound);
        }
    }
    compounds
}

/// Basic figures about the lap data a model is calibrated on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceSummary {
    pub total_laps: usize,
    pub compounds_used: Vec<Compound>,
    pub avg_lap_time: f64,
    pub best_lap_time: f64,
    pub worst_lap_time: f64,
}

impl RaceSummary {
    pub fn from_records(records: &[LapRecord]) -> Option<Self> {
        if records.is_empty() {
            return None;
        }

        let times = records.iter().map(|r| r.lap_time_seconds);
        let sum: f64 = times.clone().sum();

        Some(RaceSummary {
            total_laps: records.len(),
            compounds_used: observed_compounds(records),
            avg_lap_time: sum / records.len() as f64,
            best_lap_time: times.clone().fold(f64::INFINITY, f64::min),
            worst_lap_time: times.fold(f64::NEG_INFINITY, f64::max),
        })
    }
}
