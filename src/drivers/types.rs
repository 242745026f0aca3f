//! Driver records and the per-driver terms of the lap time model.

use crate::constants::{BASE_NOISE_STDDEV, RACECRAFT_INFLUENCE, RATING_MAX};
use serde::{Deserialize, Serialize};

/// Driver ratings, each on a 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ratings {
    pub pace: u8,
    pub racecraft: u8,
    pub awareness: u8,
    pub experience: u8,
}

impl Ratings {
    pub const fn new(pace: u8, racecraft: u8, awareness: u8, experience: u8) -> Self {
        Self {
            pace,
            racecraft,
            awareness,
            experience,
        }
    }

    /// Largest rating, used for range validation.
    pub fn max(&self) -> u8 {
        self.pace
            .max(self.racecraft)
            .max(self.awareness)
            .max(self.experience)
    }
}

/// A driver in the field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    /// Three-letter driver code (e.g. "VER")
    pub code: String,
    pub ratings: Ratings,
    /// Best-case lap time in seconds
    pub prime_time: f64,
}

impl Driver {
    pub fn new(code: &str, ratings: Ratings, prime_time: f64) -> Self {
        Self {
            code: code.to_string(),
            ratings,
            prime_time,
        }
    }

    /// Standard deviation of the per-lap random variation.
    /// Experienced drivers are more consistent.
    pub fn noise_stddev(&self) -> f64 {
        BASE_NOISE_STDDEV * (RATING_MAX - self.ratings.experience as f64) / RATING_MAX
    }

    /// Multiplier share applied on top of the position penalty.
    pub fn skill_influence(&self) -> f64 {
        (RATING_MAX - self.ratings.racecraft as f64) / RATING_MAX * RACECRAFT_INFLUENCE
    }
}
