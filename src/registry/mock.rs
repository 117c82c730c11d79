use std::cell::Cell;
use std::collections::HashMap;

use crate::domain::{ReleaseRecord, Variant};
use crate::error::{ReleaseError, Result};
use crate::registry::{PackageRegistry, RegistryIndex, ReleaseListing};

/// In-memory registry for testing without network access
#[derive(Default)]
pub struct MockRegistry {
    indexes: HashMap<Variant, RegistryIndex>,
    unreachable: bool,
    fetches: Cell<usize>,
}

impl MockRegistry {
    /// Create a new empty mock registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry whose every fetch fails as a transport error
    pub fn unreachable() -> Self {
        MockRegistry {
            unreachable: true,
            ..Self::default()
        }
    }

    /// Register a version for a variant
    pub fn add_version(&mut self, variant: Variant, version: impl Into<String>) {
        self.indexes
            .entry(variant)
            .or_default()
            .releases
            .insert(version.into(), serde_json::Value::Array(Vec::new()));
    }

    /// Set the latest version pointer for a variant
    pub fn set_latest(&mut self, variant: Variant, version: Option<&str>) {
        self.indexes.entry(variant).or_default().info.version = version.map(str::to_string);
    }

    /// Number of fetches served so far
    pub fn fetches(&self) -> usize {
        self.fetches.get()
    }
}

impl PackageRegistry for MockRegistry {
    fn fetch_index(&self, variant: Variant) -> Result<RegistryIndex> {
        self.fetches.set(self.fetches.get() + 1);
        if self.unreachable {
            return Err(ReleaseError::RegistryUnreachable(
                "mock registry is offline".to_string(),
            ));
        }
        Ok(self.indexes.get(&variant).cloned().unwrap_or_default())
    }
}

/// In-memory release listing
#[derive(Default)]
pub struct MockReleaseListing {
    releases: Vec<ReleaseRecord>,
    calls: Cell<usize>,
}

impl MockReleaseListing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a listing from tag names
    pub fn with_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MockReleaseListing {
            releases: tags.into_iter().map(ReleaseRecord::new).collect(),
            calls: Cell::new(0),
        }
    }

    /// Number of times the listing was requested
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl ReleaseListing for MockReleaseListing {
    fn list_releases(&self) -> Result<Vec<ReleaseRecord>> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.releases.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_registry_keeps_variants_apart() {
        let mut registry = MockRegistry::new();
        registry.add_version(Variant::Chat, "0.1.0");
        registry.set_latest(Variant::Ce, Some("0.2.0"));

        let chat = registry.fetch_index(Variant::Chat).unwrap();
        let ce = registry.fetch_index(Variant::Ce).unwrap();
        assert!(chat.contains("0.1.0"));
        assert!(!ce.contains("0.1.0"));
        assert_eq!(ce.latest(), Some("0.2.0"));
        assert_eq!(registry.fetches(), 2);
    }

    #[test]
    fn test_mock_listing_counts_calls() {
        let listing = MockReleaseListing::with_tags(["standalone-v1.0-build1"]);
        assert_eq!(listing.list_releases().unwrap().len(), 1);
        assert_eq!(listing.calls(), 1);
    }
}
