// Race format
pub const FIELD_SIZE: usize = 20;
pub const NUM_LAPS: u32 = 66;

// Lap time model
pub const BASE_NOISE_STDDEV: f64 = 0.05;
pub const TRAFFIC_PENALTY_FACTOR: f64 = 2.5;
pub const TRAFFIC_DECAY_EXPONENT: f64 = 0.3;
pub const RACECRAFT_INFLUENCE: f64 = 0.2;
pub const RATING_MAX: f64 = 100.0;

// Final lap position correction
pub const MIN_MAX_POSSIBLE_POSITION: u32 = 10;
pub const FINAL_LAP_CORRECTION_PER_PLACE: f64 = 0.5;

// Pit stops (inclusive ranges)
pub const FIRST_PIT_WINDOW: (u32, u32) = (15, 25);
pub const SECOND_PIT_WINDOW: (u32, u32) = (45, 55);
pub const PIT_STOP_SECONDS: (u32, u32) = (23, 29);

// Summary
pub const PODIUM_POSITIONS: u32 = 3;

// Request limits
pub const DEFAULT_MAX_SIMULATIONS: u32 = 100_000;
pub const DEFAULT_SERVER_PORT: u16 = 5000;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
/// Simulations the server runs at once, counting ones whose request timed out
pub const DEFAULT_MAX_IN_FLIGHT: usize = 4;
