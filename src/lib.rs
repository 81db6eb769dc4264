pub mod experiment;
pub mod experiment_config;
pub mod metaheuristic;
pub mod race;
pub mod rng;
