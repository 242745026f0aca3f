//! Monte Carlo race simulator.
//!
//! Replays the same race many times to build a finishing position
//! distribution for one driver:
//! - Lap times from prime pace, experience-scaled noise and grid penalties
//! - Randomly timed pit stops in two windows
//! - Final lap correction based on the running order
//!
//! Trials are independent and can be spread across the rayon pool.

mod config;
mod race;
mod report;
mod runner;

pub use config::{IntField, RaceSetup, SimConfig, SimulationRequest};
pub use race::{simulate_race, Classification, FieldModel};
pub use report::SimReport;
pub use runner::{run_simulation, simulate, simulate_with_rng};
