//! Driver data: ratings, prime lap times and the car number registry.

pub mod registry;
pub mod types;

pub use registry::{CarEntry, DriverRegistry};
pub use types::{Driver, Ratings};
