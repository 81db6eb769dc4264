use serde::{Deserialize, Serialize};
use std::io::Write;
use std::time::Instant;
use thiserror::Error;

use crate::experiment_config::{ExperimentConfig, ExperimentConfigError};
use crate::metaheuristic::aco::PheromoneMatrix;
use crate::metaheuristic::{
    Aco, Genetic, Metaheuristic, ProblemInstance, SearchError, SearchResult, Supervisor,
};
use crate::race::import::{import_laps, ImportError};
use crate::race::{Calibration, LapRecord, LapTimeModel, RaceSummary, StrategySimulator};

#[derive(Debug, Error)]
pub enum ExperimentError {
    #[error(transparent)]
    Config(#[from] ExperimentConfigError),
    #[error("could not import laps: {0}")]
    Import(#[from] ImportError),
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error("could not write statistics: {0}")]
    Statistics(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("{0} contains no laps")]
    EmptyRace(String),
    #[error("could not serialize outcome: {0}")]
    Persist(String),
}

/// Everything one experiment produced, as persisted next to its statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentOutcome {
    pub algorithm: String,
    pub seed: u64,
    pub summary: RaceSummary,
    pub calibration: Calibration,
    /// Race time without any stop on the starting compound.
    pub no_stop_time: f64,
    pub result: SearchResult,
    pub pheromone_matrix: Option<PheromoneMatrix>,
    pub wall_time_ms: u64,
}

impl ExperimentOutcome {
    pub fn to_ron(&self) -> Result<String, ExperimentError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|err| ExperimentError::Persist(err.to_string()))
    }
}

pub struct RaceExperiment {}

impl RaceExperiment {
    /// Loads the laps named by the config and runs it. Returns `None` for
    /// experiments already marked finished.
    pub fn run_config<W: Write>(
        config: &ExperimentConfig,
        stats: W,
    ) -> Result<Option<ExperimentOutcome>, ExperimentError> {
        if config.experiment.cfg().finished {
            log::debug!("skipping finished experiment on {}", config.race.laps_file);
            return Ok(None);
        }

        let records = import_laps(config.race.laps_file.as_str())?;
        Self::run_on_records(config, &records, stats).map(Some)
    }

    /// Calibrates on `records`, runs the configured search and writes its
    /// statistics to `stats` as CSV.
    pub fn run_on_records<W: Write>(
        config: &ExperimentConfig,
        records: &[LapRecord],
        stats: W,
    ) -> Result<ExperimentOutcome, ExperimentError> {
        let start_time = Instant::now();
        let race = &config.race;
        let experiment_cfg = config.experiment.cfg();
        let summary = RaceSummary::from_records(records)
            .ok_or_else(|| ExperimentError::EmptyRace(race.laps_file.clone()))?;

        let total_laps = race.total_laps.unwrap_or(records.len() as u32);
        let (model, calibration) =
            LapTimeModel::calibrate_with_laps(records, race.pit_stop_penalty, total_laps);
        let simulator = StrategySimulator::with_mode(model, race.pit_penalty_mode);
        let problem = match &race.compounds {
            Some(compounds) => ProblemInstance::with_compounds(&simulator, compounds),
            None => ProblemInstance::new(&simulator),
        };
        let supervisor_writer = csv::Writer::from_writer(stats);

        let (seed, result, pheromone_matrix) = if let Ok(genetic_cfg) =
            config.algorithm.genetic(experiment_cfg.seed)
        {
            let supervisor = Supervisor::new(experiment_cfg.aggregation_rate, supervisor_writer);
            let mut genetic = Genetic::new(problem, genetic_cfg.params(), supervisor)?;
            let result = genetic.solve();
            genetic.supervisor.aggregate_receive()?;
            (genetic_cfg.seed, result, None)
        } else {
            let aco_cfg = config.algorithm.aco(experiment_cfg.seed)?;
            let supervisor = Supervisor::new(experiment_cfg.aggregation_rate, supervisor_writer);
            let mut aco = Aco::new(problem, aco_cfg.params(), supervisor)?;
            let result = aco.solve();
            aco.supervisor.aggregate_receive()?;
            (aco_cfg.seed, result, Some(aco.pheromone_matrix().clone()))
        };

        log::info!(
            "{} on {}: {} in {:.3} s",
            config.algorithm.name(),
            race.laps_file,
            result.best_strategy,
            result.total_time
        );

        Ok(ExperimentOutcome {
            algorithm: config.algorithm.name().to_string(),
            seed,
            summary,
            no_stop_time: simulator.no_stop_time(simulator.initial_compound()),
            calibration,
            result,
            pheromone_matrix,
            wall_time_ms: start_time.elapsed().as_millis() as u64,
        })
    }
}
