//! The configured [`KeyNormalizer`].

use std::collections::BTreeMap;

use regex::Regex;

use crate::config::{NormalizerConfig, NormalizerConfigError};
use crate::key::{DistrictKey, SCHOOL_KEY_SEPARATOR};
use crate::text::normalize_name;

/// Turns free-text district and school names into join keys.
///
/// Owns the alias table and charter patterns so that tests and
/// deployments can run with their own configuration instead of a
/// process-wide table.
#[derive(Debug, Clone)]
pub struct KeyNormalizer {
    strip_parentheticals: bool,
    /// Normalized variant -> canonical key.
    aliases: BTreeMap<String, DistrictKey>,
    charter_patterns: Vec<Regex>,
}

impl KeyNormalizer {
    /// Compiles a normalizer from its configuration.
    ///
    /// Alias variants are normalized here so the config may spell them the
    /// way they appear in source files.
    ///
    /// # Errors
    ///
    /// Returns an error if a charter pattern does not compile, an alias
    /// target is not already a normalized key, or aliases form a chain.
    pub fn new(config: &NormalizerConfig) -> Result<Self, NormalizerConfigError> {
        let strip_parentheticals = !config.legacy_parentheticals;

        let charter_patterns = config
            .charter_patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| NormalizerConfigError::Pattern {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut normalizer = Self {
            strip_parentheticals,
            aliases: BTreeMap::new(),
            charter_patterns,
        };

        for (variant, target) in &config.aliases {
            normalizer.add_alias(variant, target)?;
        }

        Ok(normalizer)
    }

    /// Builds a normalizer from the embedded default configuration.
    ///
    /// # Panics
    ///
    /// Panics if the embedded configuration is invalid.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(&NormalizerConfig::embedded())
            .unwrap_or_else(|e| panic!("Invalid embedded normalizer config: {e}"))
    }

    /// Registers (or replaces) an alias.
    ///
    /// Targets are final: a target may not be another alias's variant, and
    /// a variant may not be another alias's target. Re-keying a key is then
    /// always a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizerConfigError::AliasTarget`] if `target` is not a
    /// normalized key, or [`NormalizerConfigError::AliasChain`] if the alias
    /// would chain onto another one.
    pub fn add_alias(&mut self, variant: &str, target: &str) -> Result<(), NormalizerConfigError> {
        if self.normalize(target) != target || target.is_empty() {
            return Err(NormalizerConfigError::AliasTarget {
                variant: variant.to_string(),
                target: target.to_string(),
            });
        }

        let normalized_variant = self.normalize(variant);
        if normalized_variant == target {
            log::debug!("Alias '{variant}' already normalizes to '{target}'");
        }

        let target_is_variant = self
            .aliases
            .get(target)
            .is_some_and(|existing| existing.as_str() != target);
        let variant_is_target = normalized_variant != target
            && self
                .aliases
                .values()
                .any(|existing| existing.as_str() == normalized_variant);
        if target_is_variant || variant_is_target {
            return Err(NormalizerConfigError::AliasChain {
                variant: variant.to_string(),
                target: target.to_string(),
            });
        }

        self.aliases
            .insert(normalized_variant, DistrictKey::new(target.to_string()));
        Ok(())
    }

    /// Number of registered aliases.
    #[must_use]
    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }

    /// Normalizes a name. See [`crate::text::normalize_name`].
    #[must_use]
    pub fn normalize(&self, name: &str) -> String {
        normalize_name(name, self.strip_parentheticals)
    }

    /// Produces the district key for a display name, applying aliases.
    #[must_use]
    pub fn district_key(&self, name: &str) -> DistrictKey {
        let normalized = self.normalize(name);
        self.aliases
            .get(&normalized)
            .cloned()
            .unwrap_or_else(|| DistrictKey::new(normalized))
    }

    /// Produces the school key `<district key>||<normalized school name>`.
    #[must_use]
    pub fn school_key(&self, district_name: &str, school_name: &str) -> String {
        format!(
            "{}{SCHOOL_KEY_SEPARATOR}{}",
            self.district_key(district_name),
            self.normalize(school_name)
        )
    }

    /// Returns `true` if `key` is already in the form this normalizer
    /// produces, i.e. re-keying it would not change it.
    #[must_use]
    pub fn is_canonical_key(&self, key: &str) -> bool {
        self.district_key(key).as_str() == key
    }

    /// Returns `true` if the school name matches a configured charter
    /// pattern. Patterns are matched against the normalized name.
    #[must_use]
    pub fn is_charter_school(&self, school_name: &str) -> bool {
        let normalized = self.normalize(school_name);
        self.charter_patterns
            .iter()
            .any(|pattern| pattern.is_match(&normalized))
    }
}

impl Default for KeyNormalizer {
    fn default() -> Self {
        Self::with_defaults()
    }
}
