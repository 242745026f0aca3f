//! Compile-time build information.

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// Version line shown by `--version`.
pub fn version_string(binary: &str) -> String {
    format!(
        "{} {} ({}, built {})",
        binary,
        env!("CARGO_PKG_VERSION"),
        BUILD_COMMIT,
        BUILD_DATE
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_commit_format() {
        // Should be 7 chars or "unknown"
        assert!(BUILD_COMMIT == "unknown" || BUILD_COMMIT.len() == 7);
    }

    #[test]
    fn test_build_date_format() {
        // Should be YYYY-MM-DD format
        assert!(BUILD_DATE.len() == 10 || BUILD_DATE == "unknown");
    }

    #[test]
    fn test_version_string() {
        let version = version_string("simulate");
        assert!(version.starts_with("simulate 0.1.0 ("));
        assert!(version.contains(BUILD_DATE));
    }
}
