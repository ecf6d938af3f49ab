//! Normalizer configuration: the alias table and charter-school patterns.
//!
//! The default configuration is embedded at compile time from
//! `config/normalizer.toml`. Deployments can layer an override file on top
//! with [`NormalizerConfig::merge`].

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const EMBEDDED_CONFIG: &str = include_str!("../config/normalizer.toml");

/// Errors that can occur while loading or compiling a normalizer config.
#[derive(Debug, Error)]
pub enum NormalizerConfigError {
    /// Reading the config file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for [`NormalizerConfig`].
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A charter pattern failed to compile.
    #[error("Invalid charter pattern '{pattern}': {source}")]
    Pattern {
        /// The offending pattern.
        pattern: String,
        /// Underlying regex error.
        source: regex::Error,
    },

    /// An alias points at a target that is not itself a normalized key.
    #[error("Alias '{variant}' targets '{target}', which is not a normalized key")]
    AliasTarget {
        /// The alias variant as written in the config.
        variant: String,
        /// The non-normalized target.
        target: String,
    },

    /// An alias targets another alias's variant, or its variant is another
    /// alias's target.
    #[error("Alias '{variant}' -> '{target}' chains onto another alias")]
    AliasChain {
        /// The alias variant as written in the config.
        variant: String,
        /// The alias target.
        target: String,
    },
}

/// Alias table and matching rules for the key normalizer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Keep the historical ordering where parenthetical stripping ran after
    /// punctuation removal and therefore never matched. Only needed to stay
    /// joinable with datasets keyed that way.
    pub legacy_parentheticals: bool,
    /// Regexes matched against normalized school names to detect charters.
    pub charter_patterns: Vec<String>,
    /// Free-text variant to canonical district key.
    pub aliases: BTreeMap<String, String>,
}

impl NormalizerConfig {
    /// Returns the configuration embedded in the crate.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML fails to parse. It is a compile-time
    /// constant, so a failure is a development error caught by tests.
    #[must_use]
    pub fn embedded() -> Self {
        Self::from_toml_str(EMBEDDED_CONFIG)
            .unwrap_or_else(|e| panic!("Failed to parse embedded normalizer config: {e}"))
    }

    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizerConfigError::Toml`] if the text is not a valid
    /// configuration.
    pub fn from_toml_str(s: &str) -> Result<Self, NormalizerConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Reads a configuration file from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, NormalizerConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        log::debug!(
            "Loaded normalizer config from {} ({} aliases)",
            path.display(),
            config.aliases.len()
        );
        Ok(config)
    }

    /// Layers `other` on top of this config.
    ///
    /// Aliases from `other` win on conflict, charter patterns are appended,
    /// and `legacy_parentheticals` is enabled if either side enables it.
    pub fn merge(&mut self, other: Self) {
        self.legacy_parentheticals |= other.legacy_parentheticals;
        for pattern in other.charter_patterns {
            if !self.charter_patterns.contains(&pattern) {
                self.charter_patterns.push(pattern);
            }
        }
        self.aliases.extend(other.aliases);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_config_parses() {
        let config = NormalizerConfig::embedded();
        assert!(!config.aliases.is_empty());
        assert!(!config.charter_patterns.is_empty());
        assert!(!config.legacy_parentheticals);
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let config = NormalizerConfig::from_toml_str("").unwrap();
        assert_eq!(config, NormalizerConfig::default());
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            NormalizerConfig::from_toml_str("aliases = 3"),
            Err(NormalizerConfigError::Toml(_))
        ));
    }

    #[test]
    fn loads_config_from_disk() {
        let dir = std::env::temp_dir().join("district_map_normalizer_config_load");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("normalizer.toml");
        std::fs::write(&path, "[aliases]\n\"EWG\" = \"exeter west greenwich\"\n").unwrap();

        let config = NormalizerConfig::load(&path).unwrap();

        assert_eq!(
            config.aliases.get("EWG").map(String::as_str),
            Some("exeter west greenwich")
        );
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = NormalizerConfig::load(Path::new("/nonexistent/normalizer.toml"));
        assert!(matches!(result, Err(NormalizerConfigError::Io(_))));
    }

    #[test]
    fn merge_prefers_override_aliases() {
        let mut base = NormalizerConfig::from_toml_str(
            "charter_patterns = ['a']\n[aliases]\n\"x\" = \"one\"\n\"y\" = \"two\"\n",
        )
        .unwrap();
        let other = NormalizerConfig::from_toml_str(
            "legacy_parentheticals = true\ncharter_patterns = ['a', 'b']\n[aliases]\n\"x\" = \"three\"\n",
        )
        .unwrap();

        base.merge(other);

        assert!(base.legacy_parentheticals);
        assert_eq!(base.charter_patterns, vec!["a", "b"]);
        assert_eq!(base.aliases.get("x").map(String::as_str), Some("three"));
        assert_eq!(base.aliases.get("y").map(String::as_str), Some("two"));
    }
}
