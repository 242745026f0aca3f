//! Integration tests: driver grid files

use pitwall::drivers::DriverRegistry;
use pitwall::errors::GridError;
use pitwall::{simulate, SimConfig};

const GRID_2023: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/grid_2023.json");

#[test]
fn test_bundled_grid_matches_default() {
    let loaded = DriverRegistry::load(GRID_2023).unwrap();
    assert_eq!(loaded, DriverRegistry::default_grid());
}

#[test]
fn test_modified_grid_changes_lookup() {
    let json = std::fs::read_to_string(GRID_2023).unwrap();
    let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();

    // Reassign car #1 to a new number
    for car in value["cars"].as_array_mut().unwrap() {
        if car["number"] == "1" {
            car["number"] = serde_json::Value::from("33");
        }
    }

    let registry = DriverRegistry::from_json_str(&value.to_string()).unwrap();
    assert_eq!(registry.get("33").unwrap().driver.code, "VER");
    assert!(registry.get("1").is_none());

    let config = SimConfig::for_driver("33", 5, 1).with_seed(8);
    assert_eq!(simulate(&registry, &config).unwrap().len(), 5);
}

#[test]
fn test_grid_with_missing_fields_fails_to_parse() {
    let err = DriverRegistry::from_json_str(r#"{"drivers": []}"#).unwrap_err();
    assert!(matches!(err, GridError::Parse(_)));
}

#[test]
fn test_empty_grid_is_invalid() {
    let err = DriverRegistry::from_json_str(r#"{"drivers": [], "cars": []}"#).unwrap_err();
    assert!(matches!(err, GridError::Invalid(_)));
}
