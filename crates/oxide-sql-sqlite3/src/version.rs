//! Engine version checks.

use std::cmp::Ordering;

use crate::error::ConfigError;

/// Oldest SQLite library the connector supports.
pub const MINIMUM_VERSION: &str = "3.3";

/// Returns the version of the linked SQLite library, e.g. `"3.46.0"`.
#[must_use]
pub fn engine_version() -> &'static str {
    rusqlite::version()
}

/// Returns `true` if `version` is at least [`MINIMUM_VERSION`].
///
/// Versions compare component by component as numbers; missing components
/// count as zero, so `"3.3"` and `"3.3.0"` are equal.
#[must_use]
pub fn is_supported_version(version: &str) -> bool {
    compare_versions(version, MINIMUM_VERSION) != Ordering::Less
}

/// Fails unless `version` is at least [`MINIMUM_VERSION`].
///
/// # Errors
///
/// Returns [`ConfigError::UnsupportedVersion`].
pub fn require_supported_version(version: &str) -> Result<(), ConfigError> {
    if is_supported_version(version) {
        Ok(())
    } else {
        Err(ConfigError::UnsupportedVersion {
            found: version.to_owned(),
            minimum: MINIMUM_VERSION,
        })
    }
}

fn components(version: &str) -> Vec<u64> {
    version
        .trim()
        .split('.')
        .map(|part| {
            let digits: String = part.chars().take_while(char::is_ascii_digit).collect();
            digits.parse().unwrap_or(0)
        })
        .collect()
}

fn compare_versions(a: &str, b: &str) -> Ordering {
    let (a, b) = (components(a), components(b));
    let len = a.len().max(b.len());
    (0..len)
        .map(|i| {
            let x = a.get(i).copied().unwrap_or(0);
            let y = b.get(i).copied().unwrap_or(0);
            x.cmp(&y)
        })
        .find(|ord| *ord != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}
