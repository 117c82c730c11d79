//! Remote sources abstraction layer
//!
//! Two read-only sources feed a release computation: the package registry
//! that lists the published versions of a variant, and the release listing
//! whose tag names carry previously allocated build numbers.
//!
//! Code depends on the [PackageRegistry] and [ReleaseListing] traits so the
//! HTTP clients in [http] can be swapped for the in-memory doubles in [mock]
//! under test.

pub mod http;
pub mod mock;

pub use http::{GithubReleases, GithubSettings, PypiRegistry};
pub use mock::{MockRegistry, MockReleaseListing};

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::domain::{ReleaseRecord, Variant};
use crate::error::{ReleaseError, Result};

/// Versions known to the registry for one package
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RegistryIndex {
    #[serde(default)]
    pub releases: BTreeMap<String, Value>,

    #[serde(default)]
    pub info: RegistryInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RegistryInfo {
    #[serde(default)]
    pub version: Option<String>,
}

impl RegistryIndex {
    /// Parse a registry JSON body
    pub fn from_json(endpoint: &str, body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(|e| ReleaseError::malformed(endpoint, e.to_string()))
    }

    pub fn contains(&self, version: &str) -> bool {
        self.releases.contains_key(version)
    }

    /// The latest version pointer, if present and non-empty
    pub fn latest(&self) -> Option<&str> {
        self.info.version.as_deref().filter(|v| !v.is_empty())
    }

    /// Up to `limit` known versions, greatest first by plain string order
    pub fn newest_first(&self, limit: usize) -> Vec<String> {
        self.releases.keys().rev().take(limit).cloned().collect()
    }
}

/// Source of published versions for a variant
pub trait PackageRegistry {
    /// Fetch the release index of the variant's package. Never cached.
    fn fetch_index(&self, variant: Variant) -> Result<RegistryIndex>;
}

/// Source of existing release records
pub trait ReleaseListing {
    /// Fetch every release record, following pagination
    fn list_releases(&self) -> Result<Vec<ReleaseRecord>>;
}

impl<T: PackageRegistry + ?Sized> PackageRegistry for &T {
    fn fetch_index(&self, variant: Variant) -> Result<RegistryIndex> {
        (**self).fetch_index(variant)
    }
}

impl<T: ReleaseListing + ?Sized> ReleaseListing for &T {
    fn list_releases(&self) -> Result<Vec<ReleaseRecord>> {
        (**self).list_releases()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_index() {
        let body = r#"{
            "info": {"version": "0.2.0", "name": "aider-chat"},
            "releases": {"0.1.0": [], "0.2.0": [{"filename": "x.whl"}]}
        }"#;
        let index = RegistryIndex::from_json("test", body).unwrap();
        assert!(index.contains("0.1.0"));
        assert!(!index.contains("0.1"));
        assert_eq!(index.latest(), Some("0.2.0"));
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let index = RegistryIndex::from_json("test", "{}").unwrap();
        assert!(index.releases.is_empty());
        assert_eq!(index.latest(), None);
    }

    #[test]
    fn test_empty_latest_is_none() {
        let index = RegistryIndex::from_json("test", r#"{"info": {"version": ""}}"#).unwrap();
        assert_eq!(index.latest(), None);
    }

    #[test]
    fn test_not_json_is_malformed() {
        let err = RegistryIndex::from_json("https://pypi.org/pypi/aider-chat/json", "<html>")
            .unwrap_err();
        assert!(err.is_transport());
        assert!(err.to_string().contains("pypi.org"));
    }

    #[test]
    fn test_newest_first_is_string_order() {
        let body = r#"{"releases": {"0.9.0": [], "0.10.0": [], "0.8.1": []}}"#;
        let index = RegistryIndex::from_json("test", body).unwrap();
        // plain string order puts "0.9.0" above "0.10.0"
        assert_eq!(index.newest_first(2), vec!["0.9.0", "0.8.1"]);
    }
}
