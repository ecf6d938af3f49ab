//! The [`DistrictKey`] join key.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Separator between the district and school components of a school key.
///
/// Never appears inside a normalized name since punctuation is stripped.
pub const SCHOOL_KEY_SEPARATOR: &str = "||";

/// A normalized district identifier shared by every dataset.
///
/// Keys are minted by [`crate::KeyNormalizer`]. Deserialization accepts
/// strings verbatim so that maps already keyed by the data pipeline load
/// without re-keying.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DistrictKey(String);

impl DistrictKey {
    pub(crate) const fn new(key: String) -> Self {
        Self(key)
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the source name normalized to nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for DistrictKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DistrictKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for DistrictKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn map_lookup_by_str() {
        let mut map = BTreeMap::new();
        map.insert(DistrictKey::new("providence".to_string()), 1);
        assert_eq!(map.get("providence"), Some(&1));
        assert_eq!(map.get("cranston"), None);
    }

    #[test]
    fn serializes_as_plain_string() {
        let key = DistrictKey::new("north andover".to_string());
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"north andover\"");
        let back: DistrictKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }
}
