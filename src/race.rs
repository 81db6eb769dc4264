mod compound;
pub mod import;
mod lap_record;
mod model;
mod simulator;
mod strategy;

pub use compound::Compound;
pub use lap_record::{observed_compounds, LapRecord, RaceSummary};
pub use model::{
    calibrate, fit_compound, Calibration, CoefficientKind, Correction, FitOutcome, LapTimeModel,
    ModelParameters, DEFAULT_PIT_STOP_PENALTY, FUEL_EFFECT_COEFF, MIN_LAP_TIME,
};
pub use simulator::{PitPenaltyMode, StrategySimulator, MAX_STOPS};
pub use strategy::{PitEvent, Strategy};
