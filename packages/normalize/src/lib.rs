#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! District and school name normalization.
//!
//! Budgets, enrollment, and anchor datasets come from different government
//! sources that spell district names differently. Every one of them is
//! keyed through this crate, and so is every lookup against them, so a
//! single normalization pipeline decides which records join.
//!
//! # Usage
//!
//! ```rust
//! use district_map_normalize::{district_key, school_key};
//!
//! assert_eq!(district_key("Providence Public Schools").as_str(), "providence");
//! assert_eq!(
//!     school_key("Providence Public Schools", "Classical High School"),
//!     "providence||classical high school"
//! );
//! ```

pub mod config;
pub mod key;
pub mod normalizer;
pub mod text;

use std::sync::LazyLock;

pub use config::{NormalizerConfig, NormalizerConfigError};
pub use key::{DistrictKey, SCHOOL_KEY_SEPARATOR};
pub use normalizer::KeyNormalizer;

static DEFAULT_NORMALIZER: LazyLock<KeyNormalizer> = LazyLock::new(KeyNormalizer::with_defaults);

/// Normalizes a name with the default configuration.
#[must_use]
pub fn normalize(name: &str) -> String {
    DEFAULT_NORMALIZER.normalize(name)
}

/// Produces a district key with the default alias table.
#[must_use]
pub fn district_key(name: &str) -> DistrictKey {
    DEFAULT_NORMALIZER.district_key(name)
}

/// Produces a school key with the default alias table.
#[must_use]
pub fn school_key(district_name: &str, school_name: &str) -> String {
    DEFAULT_NORMALIZER.school_key(district_name, school_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_functions_use_embedded_aliases() {
        assert_eq!(district_key("Chariho Regional").as_str(), "chariho");
        assert_eq!(normalize("Chariho Regional"), "chariho regional");
    }

    #[test]
    fn normalize_is_idempotent_on_keys() {
        for name in ["Providence Public Schools", "Bristol & Warren", "Foster-Glocester Regional"] {
            let key = district_key(name);
            assert_eq!(normalize(key.as_str()), key.as_str());
        }
    }
}
