use crate::race::lap_record::observed_compounds;
use crate::race::{Compound, LapRecord};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fmt::{Display, Formatter};

/// Seconds gained per lap as fuel burns off.
pub const FUEL_EFFECT_COEFF: f64 = 0.035;
pub const DEFAULT_PIT_STOP_PENALTY: f64 = 25.0;
pub const DEFAULT_BASE_TIME: f64 = 90.0;
/// No lap is ever predicted faster than this.
pub const MIN_LAP_TIME: f64 = 60.0;
/// Coefficients for compounds the model has never seen.
pub const NEUTRAL_DEGRADATION: f64 = 0.05;
pub const NEUTRAL_OFFSET: f64 = 0.0;

pub const MAX_DEGRADATION: f64 = 0.5;
pub const MAX_OFFSET_MAGNITUDE: f64 = 10.0;
pub const MIN_FIT_SAMPLES: usize = 3;

const PREFERRED_REFERENCE: Compound = Compound::Hard;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelParameters {
    pub base_time: f64,
    pub fuel_effect_coeff: f64,
    pub degradation_coeffs: BTreeMap<Compound, f64>,
    pub offset_coeffs: BTreeMap<Compound, f64>,
    pub pit_stop_penalty: f64,
    pub total_laps: u32,
    /// Compound fitted for lap 1.
    pub initial_compound: Compound,
    /// Compounds a strategy may switch to.
    pub available_compounds: Vec<Compound>,
}

impl ModelParameters {
    /// The fallback table used when no compound could be fitted.
    pub fn default_table(total_laps: u32, initial_compound: Compound) -> Self {
        let dry_and_inter = [
            Compound::Soft,
            Compound::Medium,
            Compound::Hard,
            Compound::Intermediate,
        ];

        ModelParameters {
            base_time: DEFAULT_BASE_TIME,
            fuel_effect_coeff: FUEL_EFFECT_COEFF,
            degradation_coeffs: dry_and_inter
                .iter()
                .map(|&c| (c, c.default_degradation()))
                .collect(),
            offset_coeffs: dry_and_inter
                .iter()
                .map(|&c| (c, c.default_offset()))
                .collect(),
            pit_stop_penalty: DEFAULT_PIT_STOP_PENALTY,
            total_laps,
            initial_compound,
            available_compounds: Compound::DRY_SET.to_vec(),
        }
    }

    pub fn degradation(&self, compound: Compound) -> f64 {
        *self
            .degradation_coeffs
            .get(&compound)
            .unwrap_or(&NEUTRAL_DEGRADATION)
    }

    pub fn offset(&self, compound: Compound) -> f64 {
        *self.offset_coeffs.get(&compound).unwrap_or(&NEUTRAL_OFFSET)
    }
}

/// Result of trying to fit one compound's degradation line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FitOutcome {
    Fitted { slope: f64, intercept: f64 },
    SkippedInsufficientData { samples: usize },
    Error(String),
}

/// Which coefficient a validation pass replaced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CoefficientKind {
    Degradation,
    Offset,
}

/// A coefficient that fell outside its plausible range and was replaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correction {
    pub compound: Compound,
    pub kind: CoefficientKind,
    pub fitted: f64,
    pub replacement: f64,
}

impl Display for Correction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} coefficient {} for {} replaced by {}",
            self.kind, self.fitted, self.compound, self.replacement
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    pub parameters: ModelParameters,
    pub outcomes: BTreeMap<Compound, FitOutcome>,
    pub corrections: Vec<Correction>,
    /// True if no compound could be fitted and the default table is in use.
    pub used_defaults: bool,
}

/// Per-compound lap-time model:
/// `base + offset[c] + degradation[c] * tyre_age - fuel * lap`, floored at
/// [`MIN_LAP_TIME`].
#[derive(Debug, Clone, PartialEq)]
pub struct LapTimeModel {
    params: ModelParameters,
}

impl LapTimeModel {
    pub fn from_parameters(params: ModelParameters) -> Self {
        LapTimeModel { params }
    }

    /// Calibrates from the laps of one race, counting every record as a lap.
    pub fn calibrate(records: &[LapRecord], pit_stop_penalty: f64) -> (Self, Calibration) {
        Self::calibrate_with_laps(records, pit_stop_penalty, records.len() as u32)
    }

    pub fn calibrate_with_laps(
        records: &[LapRecord],
        pit_stop_penalty: f64,
        total_laps: u32,
    ) -> (Self, Calibration) {
        let calibration = calibrate(records, pit_stop_penalty, total_laps);
        (Self::from_parameters(calibration.parameters.clone()), calibration)
    }

    pub fn parameters(&self) -> &ModelParameters {
        &self.params
    }

    pub fn total_laps(&self) -> u32 {
        self.params.total_laps
    }

    pub fn lap_time(&self, lap: u32, compound: Compound, tyre_age: u32) -> f64 {
        let p = &self.params;
        let time = p.base_time + p.offset(compound) + p.degradation(compound) * tyre_age as f64
            - p.fuel_effect_coeff * lap as f64;
        time.max(MIN_LAP_TIME)
    }
}

/// Fits degradation and offset coefficients per compound.
///
/// Never fails: compounds without enough laps are skipped, no fit at all falls
/// back to [`ModelParameters::default_table`], and implausible coefficients are
/// replaced and listed in [`Calibration::corrections`].
pub fn calibrate(records: &[LapRecord], pit_stop_penalty: f64, total_laps: u32) -> Calibration {
    let compounds = observed_compounds(records);
    let initial_compound = records
        .first()
        .map(|r| r.compound)
        .unwrap_or(Compound::Medium);
    let available_compounds = if compounds.is_empty() {
        Compound::DRY_SET.to_vec()
    } else {
        compounds.clone()
    };

    let mut outcomes = BTreeMap::new();
    let mut fitted: Vec<(Compound, f64, f64)> = Vec::new();
    for &compound in &compounds {
        let outcome = fit_compound(records, compound, FUEL_EFFECT_COEFF);
        match &outcome {
            FitOutcome::Fitted { slope, intercept } => {
                fitted.push((compound, *slope, *intercept));
            }
            FitOutcome::SkippedInsufficientData { samples } => {
                log::debug!("skipping {}: only {} laps", compound, samples);
            }
            FitOutcome::Error(reason) => {
                log::warn!("could not fit {}: {}", compound, reason);
            }
        }
        outcomes.insert(compound, outcome);
    }

    let used_defaults = fitted.is_empty();
    let mut parameters = if used_defaults {
        log::warn!("no compound could be fitted, using default coefficients");
        ModelParameters::default_table(total_laps, initial_compound)
    } else {
        let (_, _, reference_intercept) = fitted
            .iter()
            .find(|(c, _, _)| *c == PREFERRED_REFERENCE)
            .unwrap_or(&fitted[0]);
        let reference_intercept = *reference_intercept;

        let mut degradation_coeffs = BTreeMap::new();
        let mut offset_coeffs = BTreeMap::new();
        for &compound in &compounds {
            offset_coeffs.insert(compound, 0.0);
        }
        for &(compound, slope, intercept) in &fitted {
            degradation_coeffs.insert(compound, slope);
            offset_coeffs.insert(compound, reference_intercept - intercept);
        }

        ModelParameters {
            base_time: reference_intercept,
            fuel_effect_coeff: FUEL_EFFECT_COEFF,
            degradation_coeffs,
            offset_coeffs,
            pit_stop_penalty,
            total_laps,
            initial_compound,
            available_compounds: Vec::new(),
        }
    };
    parameters.pit_stop_penalty = pit_stop_penalty;
    parameters.available_compounds = available_compounds;

    let corrections = validate(&mut parameters);
    for correction in &corrections {
        log::warn!("{}", correction);
    }

    Calibration {
        parameters,
        outcomes,
        corrections,
        used_defaults,
    }
}

/// Fuel-corrects the laps of `compound` and regresses them against tyre age.
pub fn fit_compound(records: &[LapRecord], compound: Compound, fuel_effect_coeff: f64) -> FitOutcome {
    let points: Vec<(f64, f64)> = records
        .iter()
        .filter(|r| r.compound == compound)
        .map(|r| {
            (
                r.tyre_age as f64,
                r.lap_time_seconds + fuel_effect_coeff * r.lap_number as f64,
            )
        })
        .collect();

    if points.len() < MIN_FIT_SAMPLES {
        return FitOutcome::SkippedInsufficientData {
            samples: points.len(),
        };
    }
    if points.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
        return FitOutcome::Error(format!("non-finite lap time for {}", compound));
    }

    let (slope, intercept) = least_squares(&points);
    if slope.is_finite() && intercept.is_finite() {
        FitOutcome::Fitted { slope, intercept }
    } else {
        FitOutcome::Error(format!("regression for {} did not converge", compound))
    }
}

/// Ordinary least squares line through `points`. Without any spread in x the
/// line is flat through the mean.
fn least_squares(points: &[(f64, f64)]) -> (f64, f64) {
    let n = points.len() as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (sxy, sxx) = points.iter().fold((0.0, 0.0), |(sxy, sxx), (x, y)| {
        let dx = x - mean_x;
        (sxy + dx * (y - mean_y), sxx + dx * dx)
    });

    let slope = if sxx == 0.0 { 0.0 } else { sxy / sxx };
    (slope, mean_y - slope * mean_x)
}

fn validate(params: &mut ModelParameters) -> Vec<Correction> {
    let mut corrections = Vec::new();

    for (&compound, coeff) in params.degradation_coeffs.iter_mut() {
        if !(0.0..=MAX_DEGRADATION).contains(coeff) {
            let replacement = compound.default_degradation();
            corrections.push(Correction {
                compound,
                kind: CoefficientKind::Degradation,
                fitted: *coeff,
                replacement,
            });
            *coeff = replacement;
        }
    }

    for (&compound, offset) in params.offset_coeffs.iter_mut() {
        if !(offset.abs() <= MAX_OFFSET_MAGNITUDE) {
            let replacement = compound.default_offset();
            corrections.push(Correction {
                compound,
                kind: CoefficientKind::Offset,
                fitted: *offset,
                replacement,
            });
            *offset = replacement;
        }
    }

    corrections
}
