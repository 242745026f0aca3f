//! Main simulation runner.
//!
//! Each trial gets its own RNG: seeded runs derive trial `i` from
//! `seed + i`, so sequential and parallel runs produce the same positions.

use super::config::{RaceSetup, SimConfig};
use super::race::{simulate_race, FieldModel};
use super::report::SimReport;
use crate::drivers::DriverRegistry;
use crate::errors::SimError;
use crate::summary::summarize;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use std::time::Instant;

/// Run the full simulation and return a report.
pub fn run_simulation(
    registry: &DriverRegistry,
    config: &SimConfig,
) -> Result<SimReport, SimError> {
    let setup = config.validate(registry)?;
    let field = FieldModel::new(registry)?;

    if config.verbosity >= 1 {
        log::info!(
            "Simulating {} races for #{} {} from P{}",
            setup.num_simulations,
            setup.car_number,
            setup.driver_code,
            setup.initial_position
        );
    }

    let start = Instant::now();
    let positions = run_trials(&field, &setup, config);
    let elapsed = start.elapsed();

    let stats = summarize(&positions)?;
    if config.verbosity >= 1 {
        log::info!(
            "Finished {} races in {:.2?}: average P{:.2}, win {:.2}%",
            positions.len(),
            elapsed,
            stats.mean,
            stats.win_chance_percent
        );
    }

    Ok(SimReport::new(setup, config.seed, elapsed, positions, stats))
}

/// Finishing positions of the subject driver, one per trial.
pub fn simulate(registry: &DriverRegistry, config: &SimConfig) -> Result<Vec<u32>, SimError> {
    let setup = config.validate(registry)?;
    let field = FieldModel::new(registry)?;
    Ok(run_trials(&field, &setup, config))
}

/// Run every trial sequentially from a single caller-supplied random stream.
pub fn simulate_with_rng<R: Rng + ?Sized>(
    registry: &DriverRegistry,
    config: &SimConfig,
    rng: &mut R,
) -> Result<Vec<u32>, SimError> {
    let setup = config.validate(registry)?;
    let field = FieldModel::new(registry)?;
    Ok((0..setup.num_simulations)
        .map(|_| {
            simulate_race(&field, setup.initial_position, &mut *rng).position_of(setup.subject)
        })
        .collect())
}

fn run_trials(field: &FieldModel, setup: &RaceSetup, config: &SimConfig) -> Vec<u32> {
    let trial = |idx: u32| {
        let mut rng = trial_rng(config.seed, idx);
        let position =
            simulate_race(field, setup.initial_position, &mut rng).position_of(setup.subject);
        if config.verbosity >= 2 {
            log::debug!("Race {}/{} - P{}", idx + 1, setup.num_simulations, position);
        }
        position
    };

    if config.parallel {
        (0..setup.num_simulations).into_par_iter().map(trial).collect()
    } else {
        (0..setup.num_simulations).map(trial).collect()
    }
}

fn trial_rng(seed: Option<u64>, idx: u32) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed.wrapping_add(idx as u64)),
        None => ChaCha8Rng::from_entropy(),
    }
}
