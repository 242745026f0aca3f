//! Simulation configuration and request validation.

use crate::constants::{DEFAULT_MAX_SIMULATIONS, FIELD_SIZE};
use crate::drivers::DriverRegistry;
use crate::errors::SimError;
use log::LevelFilter;
use serde::Deserialize;

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Car number of the driver being simulated
    pub driver: String,

    /// Number of races to simulate
    pub num_simulations: i64,

    /// Starting grid position (1-20)
    pub initial_position: i64,

    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,

    /// Spread trials across the rayon thread pool
    pub parallel: bool,

    /// Upper bound on `num_simulations` accepted for one run
    pub max_simulations: u32,

    /// Log verbosity (0 = silent, 1 = summary, 2 = detailed)
    pub verbosity: u8,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            driver: "1".to_string(),
            num_simulations: 1000,
            initial_position: 1,
            seed: None,
            parallel: false,
            max_simulations: DEFAULT_MAX_SIMULATIONS,
            verbosity: 1,
        }
    }
}

impl SimConfig {
    pub fn for_driver(driver: &str, num_simulations: i64, initial_position: i64) -> Self {
        Self {
            driver: driver.to_string(),
            num_simulations,
            initial_position,
            ..Default::default()
        }
    }

    /// Quick config: 100 races from pole
    pub fn quick(driver: &str) -> Self {
        Self::for_driver(driver, 100, 1)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Default log level for this verbosity. `PITWALL_LOG` still overrides it.
    pub fn log_level(&self) -> LevelFilter {
        match self.verbosity {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        }
    }

    /// Check the request against the registry before any simulation work.
    pub fn validate(&self, registry: &DriverRegistry) -> Result<RaceSetup, SimError> {
        let subject = registry
            .index_of(self.driver.trim())
            .ok_or_else(|| SimError::UnknownDriver(self.driver.clone()))?;

        if self.num_simulations < 1 || self.num_simulations > self.max_simulations as i64 {
            return Err(SimError::InvalidSimulationCount {
                got: self.num_simulations,
                max: self.max_simulations,
            });
        }

        if self.initial_position < 1 || self.initial_position > FIELD_SIZE as i64 {
            return Err(SimError::InvalidPosition {
                got: self.initial_position,
                field_size: FIELD_SIZE,
            });
        }

        let entry = &registry.entries()[subject];
        Ok(RaceSetup {
            subject,
            car_number: entry.car_number.clone(),
            driver_code: entry.driver.code.clone(),
            num_simulations: self.num_simulations as u32,
            initial_position: self.initial_position as u32,
        })
    }
}

/// A validated simulation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaceSetup {
    /// Field index of the subject driver
    pub subject: usize,
    pub car_number: String,
    pub driver_code: String,
    pub num_simulations: u32,
    pub initial_position: u32,
}

/// A JSON integer, or a string holding one (HTML form values arrive as strings).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IntField {
    Int(i64),
    Text(String),
}

impl IntField {
    fn parse(&self, name: &str) -> Result<i64, SimError> {
        match self {
            IntField::Int(value) => Ok(*value),
            IntField::Text(text) => text.trim().parse().map_err(|_| {
                SimError::MalformedRequest(format!("{} must be an integer, got '{}'", name, text))
            }),
        }
    }

    fn as_text(&self) -> String {
        match self {
            IntField::Int(value) => value.to_string(),
            IntField::Text(text) => text.trim().to_string(),
        }
    }
}

/// Simulation request as received over the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct SimulationRequest {
    pub driver: IntField,
    pub num_simulations: IntField,
    pub initial_position: IntField,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl SimulationRequest {
    pub fn from_json(json: &[u8]) -> Result<Self, SimError> {
        serde_json::from_slice(json).map_err(|e| SimError::MalformedRequest(e.to_string()))
    }

    /// Convert into a config bounded by `max_simulations`.
    pub fn into_config(self, max_simulations: u32) -> Result<SimConfig, SimError> {
        Ok(SimConfig {
            driver: self.driver.as_text(),
            num_simulations: self.num_simulations.parse("num_simulations")?,
            initial_position: self.initial_position.parse("initial_position")?,
            seed: self.seed,
            parallel: true,
            max_simulations,
            verbosity: 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let registry = DriverRegistry::default_grid();
        let setup = SimConfig::default().validate(&registry).unwrap();
        assert_eq!(setup.subject, 0);
        assert_eq!(setup.driver_code, "VER");
        assert_eq!(setup.num_simulations, 1000);
        assert_eq!(setup.initial_position, 1);
    }

    #[test]
    fn test_verbosity_sets_log_level() {
        let mut config = SimConfig::default();
        assert_eq!(config.verbosity, 1);
        assert_eq!(config.log_level(), LevelFilter::Info);

        config.verbosity = 0;
        assert_eq!(config.log_level(), LevelFilter::Warn);
        config.verbosity = 2;
        assert_eq!(config.log_level(), LevelFilter::Debug);
        config.verbosity = 5;
        assert_eq!(config.log_level(), LevelFilter::Debug);
    }

    #[test]
    fn test_unknown_driver_rejected() {
        let registry = DriverRegistry::default_grid();
        let err = SimConfig::for_driver("99", 10, 1)
            .validate(&registry)
            .unwrap_err();
        assert_eq!(err, SimError::UnknownDriver("99".to_string()));
    }

    #[test]
    fn test_simulation_count_bounds() {
        let registry = DriverRegistry::default_grid();
        for n in [0, -5] {
            let err = SimConfig::for_driver("44", n, 1)
                .validate(&registry)
                .unwrap_err();
            assert!(matches!(err, SimError::InvalidSimulationCount { .. }));
        }

        let mut config = SimConfig::for_driver("44", 11, 1);
        config.max_simulations = 10;
        assert!(config.validate(&registry).is_err());
        config.num_simulations = 10;
        assert!(config.validate(&registry).is_ok());
    }

    #[test]
    fn test_initial_position_bounds() {
        let registry = DriverRegistry::default_grid();
        for p in [0, 21, -1] {
            let err = SimConfig::for_driver("44", 10, p)
                .validate(&registry)
                .unwrap_err();
            assert!(matches!(err, SimError::InvalidPosition { .. }));
        }
        assert!(SimConfig::for_driver("44", 10, 20)
            .validate(&registry)
            .is_ok());
    }

    #[test]
    fn test_request_accepts_numbers_and_strings() {
        let request = SimulationRequest::from_json(
            br#"{"driver": "16", "num_simulations": "250", "initial_position": 4}"#,
        )
        .unwrap();
        let config = request.into_config(1000).unwrap();
        assert_eq!(config.driver, "16");
        assert_eq!(config.num_simulations, 250);
        assert_eq!(config.initial_position, 4);

        let request = SimulationRequest::from_json(
            br#"{"driver": 44, "num_simulations": 5, "initial_position": "2", "seed": 7}"#,
        )
        .unwrap();
        let config = request.into_config(1000).unwrap();
        assert_eq!(config.driver, "44");
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_request_rejects_non_numeric_count() {
        let request = SimulationRequest::from_json(
            br#"{"driver": "1", "num_simulations": "lots", "initial_position": 1}"#,
        )
        .unwrap();
        let err = request.into_config(1000).unwrap_err();
        assert!(matches!(err, SimError::MalformedRequest(_)));
    }

    #[test]
    fn test_request_missing_field() {
        let err = SimulationRequest::from_json(br#"{"driver": "1"}"#).unwrap_err();
        assert!(matches!(err, SimError::MalformedRequest(_)));
    }
}
