//! Lap-by-lap model of a single race.
//!
//! Every lap, each car's time is its prime time plus normally distributed
//! noise, a starting position penalty that fades with lap count, and the
//! occasional pit stop. On the final lap the standings after the previous
//! lap feed a correction that compresses the front of the field.

use crate::constants::{
    FIELD_SIZE, FINAL_LAP_CORRECTION_PER_PLACE, FIRST_PIT_WINDOW, MIN_MAX_POSSIBLE_POSITION,
    NUM_LAPS, PIT_STOP_SECONDS, SECOND_PIT_WINDOW, TRAFFIC_DECAY_EXPONENT,
    TRAFFIC_PENALTY_FACTOR,
};
use crate::drivers::DriverRegistry;
use crate::errors::SimError;
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Per-car terms of the lap time model, precomputed from the registry.
#[derive(Debug, Clone)]
struct CarModel {
    prime_time: f64,
    noise: Normal<f64>,
    skill_influence: f64,
}

/// The field as seen by the lap time model, in registry order.
#[derive(Debug, Clone)]
pub struct FieldModel {
    cars: Vec<CarModel>,
}

impl FieldModel {
    pub fn new(registry: &DriverRegistry) -> Result<Self, SimError> {
        let cars = registry
            .entries()
            .iter()
            .map(|entry| {
                let driver = &entry.driver;
                let noise = Normal::new(0.0, driver.noise_stddev()).map_err(|e| {
                    SimError::InvalidDriverData(format!("{}: {}", driver.code, e))
                })?;
                Ok(CarModel {
                    prime_time: driver.prime_time,
                    noise,
                    skill_influence: driver.skill_influence(),
                })
            })
            .collect::<Result<Vec<_>, SimError>>()?;

        Ok(Self { cars })
    }

    pub fn len(&self) -> usize {
        self.cars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cars.is_empty()
    }
}

/// Lap times recorded so far, one sequence per car.
struct RaceState {
    lap_times: Vec<Vec<f64>>,
}

impl RaceState {
    fn new(field_size: usize) -> Self {
        Self {
            lap_times: (0..field_size)
                .map(|_| Vec::with_capacity(NUM_LAPS as usize))
                .collect(),
        }
    }

    fn record(&mut self, car: usize, lap_time: f64) {
        self.lap_times[car].push(lap_time);
    }

    fn totals(&self) -> Vec<f64> {
        self.lap_times.iter().map(|laps| laps.iter().sum()).collect()
    }
}

/// 1-based rank of every car by ascending total time.
/// Equal totals keep field order.
fn rank_by_total(totals: &[f64]) -> Vec<u32> {
    let mut order: Vec<usize> = (0..totals.len()).collect();
    order.sort_by(|&a, &b| totals[a].total_cmp(&totals[b]));

    let mut ranks = vec![0u32; totals.len()];
    for (place, &car) in order.iter().enumerate() {
        ranks[car] = place as u32 + 1;
    }
    ranks
}

/// Final classification of one race.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    positions: Vec<u32>,
    total_times: Vec<f64>,
}

impl Classification {
    /// Finishing position of the car at `car` in field order.
    pub fn position_of(&self, car: usize) -> u32 {
        self.positions[car]
    }

    /// Finishing positions indexed by field order.
    pub fn positions(&self) -> &[u32] {
        &self.positions
    }

    pub fn total_time(&self, car: usize) -> f64 {
        self.total_times[car]
    }
}

/// Grid position penalty for one lap. Negative values shorten the lap.
/// Traffic and dirty air are separate terms with the same formula.
fn position_penalty(initial_position: u32, lap: u32) -> f64 {
    let grid_offset = initial_position.saturating_sub(1) as f64;
    let fade = 1.0 / (lap as f64).powf(TRAFFIC_DECAY_EXPONENT);

    let starting_position_penalty = -grid_offset;
    let traffic_penalty = -TRAFFIC_PENALTY_FACTOR * grid_offset * fade;
    let dirty_air_penalty = -TRAFFIC_PENALTY_FACTOR * grid_offset * fade;
    starting_position_penalty + traffic_penalty + dirty_air_penalty
}

/// Worst running position that still receives the final lap correction.
fn max_possible_position(initial_position: u32) -> u32 {
    (FIELD_SIZE as u32 + 1)
        .saturating_sub(initial_position)
        .max(MIN_MAX_POSSIBLE_POSITION)
}

/// Time added on the final lap to a car running at `rank`.
fn final_lap_correction(rank: u32, max_possible_position: u32) -> f64 {
    if rank < max_possible_position {
        (max_possible_position - rank) as f64 * FINAL_LAP_CORRECTION_PER_PLACE
    } else {
        0.0
    }
}

/// Run one race for the whole field. `initial_position` is the subject
/// driver's grid slot and drives the penalty terms for every car.
pub fn simulate_race<R: Rng + ?Sized>(
    field: &FieldModel,
    initial_position: u32,
    rng: &mut R,
) -> Classification {
    let mut state = RaceState::new(field.len());
    let max_possible_position = max_possible_position(initial_position);

    for lap in 1..=NUM_LAPS {
        // Final lap standings use laps 1..NUM_LAPS-1 only
        let standings = (lap == NUM_LAPS).then(|| rank_by_total(&state.totals()));
        let total_penalty = position_penalty(initial_position, lap);

        for (car, model) in field.cars.iter().enumerate() {
            let random_variation = model.noise.sample(rng);

            let mut lap_time = model.prime_time
                + random_variation
                + total_penalty * (1.0 + model.skill_influence);

            if let Some(ranks) = &standings {
                lap_time += final_lap_correction(ranks[car], max_possible_position);
            }

            // Pit laps are re-rolled for every car on every lap
            let first_stop = rng.gen_range(FIRST_PIT_WINDOW.0..=FIRST_PIT_WINDOW.1);
            let second_stop = rng.gen_range(SECOND_PIT_WINDOW.0..=SECOND_PIT_WINDOW.1);
            if lap == first_stop || lap == second_stop {
                lap_time += pit_stop_time(rng);
            }

            state.record(car, lap_time);
        }
    }

    let total_times = state.totals();
    Classification {
        positions: rank_by_total(&total_times),
        total_times,
    }
}

/// Stationary time for one stop, whole seconds.
fn pit_stop_time<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen_range(PIT_STOP_SECONDS.0..=PIT_STOP_SECONDS.1) as f64
}
