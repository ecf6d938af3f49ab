#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Loads the district datasets produced by the data pipeline.
//!
//! Each dataset is a JSON object keyed by district key. Records are
//! validated on load and the first invalid one fails the whole document.
//! Once loaded, a [`DistrictDataset`] is immutable and can be shared
//! freely between threads.

pub mod modeling;
pub mod paths;

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use district_map_district_models::{
    BudgetsMap, DistrictAnchorsMap, DistrictKey, InvalidRecordError, LeaEnrollmentMap, Validate,
};
use district_map_normalize::KeyNormalizer;
use serde::Serialize;
use serde::de::DeserializeOwned;
use strum_macros::{AsRefStr, Display};
use thiserror::Error;

/// The three per-district datasets.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Display, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DatasetKind {
    /// `budgets.json`
    Budgets,
    /// `lea_enrollment.json`
    Enrollment,
    /// `district_anchors.json`
    Anchors,
}

impl DatasetKind {
    /// All dataset kinds, in load order.
    pub const ALL: &[Self] = &[Self::Budgets, Self::Enrollment, Self::Anchors];

    /// Returns the file name of this dataset inside the data directory.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Budgets => paths::BUDGETS_FILE,
            Self::Enrollment => paths::ENROLLMENT_FILE,
            Self::Anchors => paths::ANCHORS_FILE,
        }
    }
}

/// Errors that can occur while loading datasets.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Reading a dataset file failed.
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// A dataset is not a JSON object of well-formed records.
    #[error("JSON error in {dataset}: {source}")]
    Json {
        /// Dataset being parsed.
        dataset: DatasetKind,
        /// Underlying parse error.
        source: serde_json::Error,
    },

    /// A record parsed but failed validation.
    #[error("Invalid {dataset} record for '{key}': {source}")]
    InvalidRecord {
        /// Dataset being validated.
        dataset: DatasetKind,
        /// Key of the offending record.
        key: DistrictKey,
        /// What was wrong.
        source: InvalidRecordError,
    },
}

/// Parses and validates one dataset document.
///
/// Keys that are not in canonical normalized form are kept but logged,
/// since lookups through the normalizer will never reach them.
///
/// # Errors
///
/// Returns [`DatasetError::Json`] if the document is not an object of
/// records, or [`DatasetError::InvalidRecord`] for the first record that
/// fails validation.
pub fn parse_dataset<T: DeserializeOwned + Validate>(
    dataset: DatasetKind,
    json: &str,
    normalizer: &KeyNormalizer,
) -> Result<BTreeMap<DistrictKey, T>, DatasetError> {
    let map: BTreeMap<DistrictKey, T> =
        serde_json::from_str(json).map_err(|source| DatasetError::Json { dataset, source })?;

    for (key, record) in &map {
        record
            .validate()
            .map_err(|source| DatasetError::InvalidRecord {
                dataset,
                key: key.clone(),
                source,
            })?;

        if !normalizer.is_canonical_key(key.as_str()) {
            log::warn!(
                "{dataset} key '{key}' is not canonical (normalizes to '{}')",
                normalizer.district_key(key.as_str())
            );
        }
    }

    log::info!("Loaded {} {dataset} records", map.len());
    Ok(map)
}

fn read_dataset<T: DeserializeOwned + Validate>(
    dataset: DatasetKind,
    dir: &Path,
    normalizer: &KeyNormalizer,
) -> Result<BTreeMap<DistrictKey, T>, DatasetError> {
    let path = match dataset {
        DatasetKind::Budgets => paths::budgets_path(dir),
        DatasetKind::Enrollment => paths::enrollment_path(dir),
        DatasetKind::Anchors => paths::anchors_path(dir),
    };
    log::debug!("Reading {dataset} from {}", path.display());
    let json = std::fs::read_to_string(&path).map_err(|source| DatasetError::Io {
        path: path.clone(),
        source,
    })?;
    parse_dataset(dataset, &json, normalizer)
}

/// Record counts and coverage gaps across the three datasets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetStats {
    /// Number of budget records.
    pub budgets: usize,
    /// Number of enrollment records.
    pub enrollments: usize,
    /// Number of anchor records.
    pub anchors: usize,
    /// Districts present in all three with a positive enrollment total,
    /// i.e. usable in a consolidation estimate.
    pub complete: usize,
    /// For each dataset, keys that appear elsewhere but not in it (or, for
    /// enrollment, appear with a zero total).
    pub missing: BTreeMap<DatasetKind, Vec<DistrictKey>>,
}

/// The loaded budget, enrollment, and anchor maps.
#[derive(Debug, Clone, Default)]
pub struct DistrictDataset {
    /// Budget records by key.
    pub budgets: BudgetsMap,
    /// Enrollment records by key.
    pub enrollments: LeaEnrollmentMap,
    /// Anchor records by key.
    pub anchors: DistrictAnchorsMap,
}

impl DistrictDataset {
    /// Loads all three datasets from `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if any file is missing, malformed, or contains an
    /// invalid record.
    pub fn load_from_dir(dir: &Path, normalizer: &KeyNormalizer) -> Result<Self, DatasetError> {
        log::info!("Loading district datasets from {}", dir.display());
        Ok(Self {
            budgets: read_dataset(DatasetKind::Budgets, dir, normalizer)?,
            enrollments: read_dataset(DatasetKind::Enrollment, dir, normalizer)?,
            anchors: read_dataset(DatasetKind::Anchors, dir, normalizer)?,
        })
    }

    /// Parses all three datasets from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if any document is malformed or contains an
    /// invalid record.
    pub fn from_json(
        budgets: &str,
        enrollments: &str,
        anchors: &str,
        normalizer: &KeyNormalizer,
    ) -> Result<Self, DatasetError> {
        Ok(Self {
            budgets: parse_dataset(DatasetKind::Budgets, budgets, normalizer)?,
            enrollments: parse_dataset(DatasetKind::Enrollment, enrollments, normalizer)?,
            anchors: parse_dataset(DatasetKind::Anchors, anchors, normalizer)?,
        })
    }

    /// Every key present in at least one dataset.
    #[must_use]
    pub fn district_keys(&self) -> BTreeSet<&DistrictKey> {
        self.budgets
            .keys()
            .chain(self.enrollments.keys())
            .chain(self.anchors.keys())
            .collect()
    }

    /// Best display name for a key: the budget name, then the anchor name.
    #[must_use]
    pub fn display_name(&self, key: &str) -> Option<&str> {
        let budget_name = self
            .budgets
            .get(key)
            .map(|b| b.display_name.trim())
            .filter(|name| !name.is_empty());
        budget_name.or_else(|| {
            self.anchors
                .get(key)
                .map(|a| a.name.trim())
                .filter(|name| !name.is_empty())
        })
    }

    /// Computes record counts and coverage gaps.
    #[must_use]
    pub fn stats(&self) -> DatasetStats {
        let mut missing: BTreeMap<DatasetKind, Vec<DistrictKey>> = DatasetKind::ALL
            .iter()
            .map(|kind| (*kind, Vec::new()))
            .collect();
        let mut complete = 0;

        for key in self.district_keys() {
            let has_budget = self.budgets.contains_key(key);
            let has_enrollment = self
                .enrollments
                .get(key)
                .is_some_and(|e| e.has_students());
            let has_anchor = self.anchors.contains_key(key);

            for (kind, present) in [
                (DatasetKind::Budgets, has_budget),
                (DatasetKind::Enrollment, has_enrollment),
                (DatasetKind::Anchors, has_anchor),
            ] {
                if !present {
                    missing.entry(kind).or_default().push(key.clone());
                }
            }
            if has_budget && has_enrollment && has_anchor {
                complete += 1;
            }
        }

        DatasetStats {
            budgets: self.budgets.len(),
            enrollments: self.enrollments.len(),
            anchors: self.anchors.len(),
            complete,
            missing,
        }
    }
}
