#![allow(clippy::module_name_repetitions)]
//! Canonical file paths for the district datasets.
//!
//! Paths default to the project root's `data/` directory and can be
//! redirected with the `DISTRICT_MAP_DATA_DIR` environment variable.

use std::path::{Path, PathBuf};

/// Environment variable that overrides [`data_dir`].
pub const DATA_DIR_ENV: &str = "DISTRICT_MAP_DATA_DIR";

/// File name of the budgets dataset.
pub const BUDGETS_FILE: &str = "budgets.json";

/// File name of the LEA enrollment dataset.
pub const ENROLLMENT_FILE: &str = "lea_enrollment.json";

/// File name of the district anchors dataset.
pub const ANCHORS_FILE: &str = "district_anchors.json";

/// Returns the workspace root directory.
///
/// Resolved at compile time from `CARGO_MANIFEST_DIR`.
///
/// # Panics
///
/// Panics if the project root cannot be resolved.
#[must_use]
pub fn project_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(2)
        .expect("Failed to find project root from CARGO_MANIFEST_DIR")
        .to_path_buf()
}

/// Returns the data directory: `$DISTRICT_MAP_DATA_DIR` if set, otherwise
/// `<project root>/data`.
#[must_use]
pub fn data_dir() -> PathBuf {
    std::env::var_os(DATA_DIR_ENV)
        .filter(|v| !v.is_empty())
        .map_or_else(|| project_root().join("data"), PathBuf::from)
}

/// Returns the budgets file inside `dir`.
#[must_use]
pub fn budgets_path(dir: &Path) -> PathBuf {
    dir.join(BUDGETS_FILE)
}

/// Returns the enrollment file inside `dir`.
#[must_use]
pub fn enrollment_path(dir: &Path) -> PathBuf {
    dir.join(ENROLLMENT_FILE)
}

/// Returns the anchors file inside `dir`.
#[must_use]
pub fn anchors_path(dir: &Path) -> PathBuf {
    dir.join(ANCHORS_FILE)
}
