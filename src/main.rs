use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use pit_strategy_search::experiment::{ExperimentError, RaceExperiment};
use pit_strategy_search::experiment_config::ExperimentConfig;
use std::error::Error;
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};

const USAGE: &str = "usage: pit_strategy_search <config glob> [output dir]";

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let pattern = match args.next() {
        Some(pattern) => pattern,
        None => {
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    };
    let output_dir = PathBuf::from(args.next().unwrap_or_else(|| "results".to_string()));
    fs::create_dir_all(&output_dir)?;

    let configs: Vec<PathBuf> = glob(&pattern)?.filter_map(Result::ok).collect();
    if configs.is_empty() {
        log::warn!("no experiment config matches {}", pattern);
        return Ok(());
    }

    let progress = ProgressBar::new(configs.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar().template("{bar:40} {pos}/{len} experiments [{elapsed_precise}]"),
    );

    let mut failed = 0;
    for path in configs.iter() {
        if let Err(err) = run(path, &output_dir) {
            log::error!("{}: {}", path.display(), err);
            failed += 1;
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    println!(
        "{} experiments run, {} failed, results in {}",
        configs.len(),
        failed,
        output_dir.display()
    );
    Ok(())
}

/// Runs one config, writing `<stem>.csv` statistics and the `<stem>.ron`
/// outcome into `output_dir`.
fn run(path: &Path, output_dir: &Path) -> Result<(), ExperimentError> {
    let config = ExperimentConfig::from_file(path)?;
    if config.experiment.cfg().finished {
        log::debug!("{} is marked finished", path.display());
        return Ok(());
    }

    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "experiment".to_string());
    let stats = File::create(output_dir.join(format!("{}.csv", stem)))?;

    if let Some(outcome) = RaceExperiment::run_config(&config, stats)? {
        println!(
            "{}: {} ({:.3} s, {:.3} s without a stop)",
            stem, outcome.result.best_strategy, outcome.result.total_time, outcome.no_stop_time
        );
        fs::write(output_dir.join(format!("{}.ron", stem)), outcome.to_ron()?)?;
    }

    Ok(())
}
