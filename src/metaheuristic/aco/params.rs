use crate::metaheuristic::error::{ensure, SearchError};
use crate::rng::os_random_seed;

#[derive(Debug, Clone, PartialEq)]
pub struct Params {
    pub ant_count: usize,
    pub iterations: usize,
    /// Share of pheromone lost per iteration, `rho`.
    pub evaporation_rate: f64,
    pub alpha: f64,
    pub beta: f64,
    pub seed: u128,
}

impl Params {
    pub fn new(
        ant_count: usize,
        iterations: usize,
        evaporation_rate: f64,
        alpha: f64,
        beta: f64,
        seed: Option<u128>,
    ) -> Self {
        Params {
            ant_count,
            iterations,
            evaporation_rate,
            alpha,
            beta,
            seed: seed.unwrap_or_else(os_random_seed),
        }
    }

    pub fn validate(&self) -> Result<(), SearchError> {
        ensure(self.ant_count > 0, "ant_count must be positive")?;
        ensure(self.iterations > 0, "iterations must be positive")?;
        ensure(
            self.evaporation_rate > 0.0 && self.evaporation_rate <= 1.0,
            format!(
                "evaporation_rate {} is not in (0, 1]",
                self.evaporation_rate
            ),
        )?;
        ensure(self.alpha >= 0.0, format!("alpha {} is negative", self.alpha))?;
        ensure(self.beta >= 0.0, format!("beta {} is negative", self.beta))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_works() {
        assert!(Params::new(30, 50, 0.1, 1.0, 2.0, Some(1)).validate().is_ok());
        assert!(Params::new(1, 1, 1.0, 0.0, 0.0, Some(1)).validate().is_ok());

        let invalid = vec![
            Params::new(0, 50, 0.1, 1.0, 2.0, Some(1)),
            Params::new(30, 0, 0.1, 1.0, 2.0, Some(1)),
            Params::new(30, 50, 0.0, 1.0, 2.0, Some(1)),
            Params::new(30, 50, 1.1, 1.0, 2.0, Some(1)),
            Params::new(30, 50, 0.1, -1.0, 2.0, Some(1)),
            Params::new(30, 50, 0.1, 1.0, f64::NAN, Some(1)),
        ];
        for params in invalid {
            assert!(params.validate().is_err());
        }
    }
}
