//! Pitwall - Monte Carlo race finishing position simulator
//!
//! Replays a race many times for one driver and summarizes where they finish.

pub mod build_info;
pub mod constants;
pub mod drivers;
pub mod errors;
pub mod logging;
pub mod simulator;
pub mod summary;
pub mod web;

pub use drivers::DriverRegistry;
pub use errors::{ErrorKind, SimError};
pub use simulator::{run_simulation, simulate, SimConfig, SimReport};
pub use summary::{summarize, PositionStats};
