//! Driver registry: car numbers mapped to drivers, in field order.
//!
//! The registry is built once (either the built-in grid or a JSON grid file)
//! and shared read-only by every simulation afterwards. Entry order is the
//! field's iteration order during a race.

use super::types::{Driver, Ratings};
use crate::constants::{FIELD_SIZE, RATING_MAX};
use crate::errors::GridError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// One car on the grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarEntry {
    pub car_number: String,
    pub driver: Driver,
}

/// Read-only mapping from car number to driver.
#[derive(Debug, Clone, PartialEq)]
pub struct DriverRegistry {
    entries: Vec<CarEntry>,
}

/// Built-in grid: (car number, code, pace, racecraft, awareness, experience, prime time)
const DEFAULT_GRID: [(&str, &str, u8, u8, u8, u8, f64); FIELD_SIZE] = [
    ("1", "VER", 95, 95, 94, 92, 73.79),
    ("44", "HAM", 93, 96, 93, 97, 74.32),
    ("63", "RUS", 90, 92, 90, 70, 74.59),
    ("11", "PER", 89, 91, 87, 83, 74.46),
    ("55", "SAI", 89, 90, 91, 75, 74.25),
    ("18", "STR", 83, 80, 82, 66, 74.70),
    ("14", "ALO", 88, 94, 89, 98, 74.39),
    ("31", "OCO", 82, 85, 81, 68, 74.63),
    ("24", "ZHO", 79, 78, 80, 60, 74.83),
    ("10", "GAS", 84, 86, 83, 70, 74.74),
    ("16", "LEC", 92, 88, 86, 72, 74.46),
    ("22", "TSU", 80, 89, 79, 62, 75.06),
    ("81", "PIA", 81, 79, 81, 61, 74.71),
    ("21", "DEV", 78, 76, 78, 59, 74.92),
    ("27", "HUL", 82, 83, 80, 72, 74.66),
    ("23", "ALB", 80, 82, 79, 64, 75.51),
    ("4", "NOR", 87, 85, 84, 65, 74.49),
    ("20", "MAG", 81, 81, 82, 69, 75.34),
    ("77", "BOT", 85, 84, 85, 75, 74.95),
    ("2", "SAR", 77, 75, 77, 58, 76.09),
];

/// On-disk grid format: driver definitions plus car number assignments.
#[derive(Debug, Deserialize)]
struct GridFile {
    drivers: Vec<Driver>,
    cars: Vec<CarAssignment>,
}

#[derive(Debug, Deserialize)]
struct CarAssignment {
    number: String,
    driver: String,
}

impl DriverRegistry {
    /// The built-in 2023 grid.
    pub fn default_grid() -> Self {
        let entries = DEFAULT_GRID
            .iter()
            .map(
                |&(number, code, pace, racecraft, awareness, experience, prime_time)| CarEntry {
                    car_number: number.to_string(),
                    driver: Driver::new(
                        code,
                        Ratings::new(pace, racecraft, awareness, experience),
                        prime_time,
                    ),
                },
            )
            .collect();
        Self { entries }
    }

    /// Build a registry from driver definitions and `(car number, driver code)`
    /// assignments. Field order follows the assignment order.
    pub fn from_parts(
        drivers: Vec<Driver>,
        cars: Vec<(String, String)>,
    ) -> Result<Self, GridError> {
        let mut codes = HashSet::new();
        for driver in &drivers {
            if !codes.insert(driver.code.as_str()) {
                return Err(GridError::Invalid(format!(
                    "driver {} is defined more than once",
                    driver.code
                )));
            }
        }

        let mut entries = Vec::with_capacity(cars.len());
        for (number, code) in cars {
            let driver = drivers
                .iter()
                .find(|d| d.code == code)
                .cloned()
                .ok_or_else(|| {
                    GridError::Invalid(format!("car {} references unknown driver {}", number, code))
                })?;
            entries.push(CarEntry {
                car_number: number,
                driver,
            });
        }

        if entries.len() != drivers.len() {
            return Err(GridError::Invalid(format!(
                "{} drivers defined but {} cars assigned",
                drivers.len(),
                entries.len()
            )));
        }

        let registry = Self { entries };
        registry.validate()?;
        Ok(registry)
    }

    /// Parse a grid from its JSON representation.
    pub fn from_json_str(json: &str) -> Result<Self, GridError> {
        let file: GridFile = serde_json::from_str(json)?;
        let cars = file
            .cars
            .into_iter()
            .map(|c| (c.number, c.driver))
            .collect();
        Self::from_parts(file.drivers, cars)
    }

    /// Load a grid from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GridError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| GridError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let registry = Self::from_json_str(&json)?;
        log::info!(
            "Loaded {} drivers from {}",
            registry.len(),
            path.display()
        );
        Ok(registry)
    }

    /// Check the field invariants: size, unique numbers and codes, rating
    /// ranges and positive prime times.
    pub fn validate(&self) -> Result<(), GridError> {
        if self.entries.len() != FIELD_SIZE {
            return Err(GridError::Invalid(format!(
                "field must have exactly {} cars, found {}",
                FIELD_SIZE,
                self.entries.len()
            )));
        }

        let mut numbers = HashSet::new();
        let mut codes = HashSet::new();
        for entry in &self.entries {
            let driver = &entry.driver;
            if entry.car_number.trim().is_empty() {
                return Err(GridError::Invalid(format!(
                    "driver {} has an empty car number",
                    driver.code
                )));
            }
            if !numbers.insert(entry.car_number.as_str()) {
                return Err(GridError::Invalid(format!(
                    "car number {} is assigned more than once",
                    entry.car_number
                )));
            }
            if !codes.insert(driver.code.as_str()) {
                return Err(GridError::Invalid(format!(
                    "driver {} drives more than one car",
                    driver.code
                )));
            }
            if driver.ratings.max() as f64 > RATING_MAX {
                return Err(GridError::Invalid(format!(
                    "driver {} has a rating above {}",
                    driver.code, RATING_MAX
                )));
            }
            if !driver.prime_time.is_finite() || driver.prime_time <= 0.0 {
                return Err(GridError::Invalid(format!(
                    "driver {} has non-positive prime time {}",
                    driver.code, driver.prime_time
                )));
            }
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in field order.
    pub fn entries(&self) -> &[CarEntry] {
        &self.entries
    }

    pub fn get(&self, car_number: &str) -> Option<&CarEntry> {
        self.entries.iter().find(|e| e.car_number == car_number)
    }

    /// Field index of the given car number.
    pub fn index_of(&self, car_number: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.car_number == car_number)
    }

    pub fn by_code(&self, code: &str) -> Option<&CarEntry> {
        self.entries
            .iter()
            .find(|e| e.driver.code.eq_ignore_ascii_case(code))
    }

    /// Car number for a user selection: a car number, or failing that a
    /// driver code such as `VER` or `ham`.
    pub fn resolve_car_number(&self, selection: &str) -> Option<&str> {
        let selection = selection.trim();
        self.get(selection)
            .or_else(|| self.by_code(selection))
            .map(|entry| entry.car_number.as_str())
    }
}

impl Default for DriverRegistry {
    fn default() -> Self {
        Self::default_grid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_parts() -> (Vec<Driver>, Vec<(String, String)>) {
        let registry = DriverRegistry::default_grid();
        let drivers = registry.entries().iter().map(|e| e.driver.clone()).collect();
        let cars = registry
            .entries()
            .iter()
            .map(|e| (e.car_number.clone(), e.driver.code.clone()))
            .collect();
        (drivers, cars)
    }

    #[test]
    fn test_default_grid_is_valid() {
        let registry = DriverRegistry::default_grid();
        assert_eq!(registry.len(), FIELD_SIZE);
        assert!(registry.validate().is_ok());
    }

    #[test]
    fn test_lookup_by_car_number() {
        let registry = DriverRegistry::default_grid();
        let entry = registry.get("44").unwrap();
        assert_eq!(entry.driver.code, "HAM");
        assert_eq!(entry.driver.ratings.experience, 97);
        assert!((entry.driver.prime_time - 74.32).abs() < 1e-9);

        assert!(registry.get("99").is_none());
        assert!(registry.get("HAM").is_none());
    }

    #[test]
    fn test_field_order_follows_car_assignments() {
        let registry = DriverRegistry::default_grid();
        assert_eq!(registry.index_of("1"), Some(0));
        assert_eq!(registry.index_of("44"), Some(1));
        assert_eq!(registry.index_of("2"), Some(FIELD_SIZE - 1));
    }

    #[test]
    fn test_lookup_by_code_ignores_case() {
        let registry = DriverRegistry::default_grid();
        assert_eq!(registry.by_code("alo").unwrap().car_number, "14");
        assert!(registry.by_code("XYZ").is_none());
    }

    #[test]
    fn test_resolve_car_number_accepts_numbers_and_codes() {
        let registry = DriverRegistry::default_grid();
        assert_eq!(registry.resolve_car_number("44"), Some("44"));
        assert_eq!(registry.resolve_car_number(" 1 "), Some("1"));
        assert_eq!(registry.resolve_car_number("VER"), Some("1"));
        assert_eq!(registry.resolve_car_number("nor"), Some("4"));
        assert_eq!(registry.resolve_car_number("99"), None);
        assert_eq!(registry.resolve_car_number("XYZ"), None);
    }

    #[test]
    fn test_from_parts_round_trips_default_grid() {
        let (drivers, cars) = grid_parts();
        let rebuilt = DriverRegistry::from_parts(drivers, cars).unwrap();
        assert_eq!(rebuilt, DriverRegistry::default_grid());
    }

    #[test]
    fn test_from_parts_rejects_unknown_driver() {
        let (drivers, mut cars) = grid_parts();
        cars[3].1 = "XXX".to_string();
        let err = DriverRegistry::from_parts(drivers, cars).unwrap_err();
        assert!(err.to_string().contains("unknown driver XXX"));
    }

    #[test]
    fn test_from_parts_rejects_duplicate_car_number() {
        let (drivers, mut cars) = grid_parts();
        cars[5].0 = "1".to_string();
        let err = DriverRegistry::from_parts(drivers, cars).unwrap_err();
        assert!(err.to_string().contains("car number 1"));
    }

    #[test]
    fn test_from_parts_rejects_short_field() {
        let (mut drivers, mut cars) = grid_parts();
        drivers.pop();
        cars.pop();
        let err = DriverRegistry::from_parts(drivers, cars).unwrap_err();
        assert!(err.to_string().contains("exactly 20 cars"));
    }

    #[test]
    fn test_from_parts_rejects_out_of_range_rating() {
        let (mut drivers, cars) = grid_parts();
        drivers[0].ratings.pace = 101;
        assert!(DriverRegistry::from_parts(drivers, cars).is_err());
    }

    #[test]
    fn test_from_parts_rejects_non_positive_prime_time() {
        let (mut drivers, cars) = grid_parts();
        drivers[2].prime_time = 0.0;
        assert!(DriverRegistry::from_parts(drivers, cars).is_err());
    }

    #[test]
    fn test_from_json_str_reports_parse_errors() {
        let err = DriverRegistry::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, GridError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = DriverRegistry::load("/nonexistent/grid.json").unwrap_err();
        assert!(matches!(err, GridError::Io { .. }));
    }
}
