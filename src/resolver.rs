use tracing::debug;

use crate::domain::Variant;
use crate::error::{ReleaseError, Result};
use crate::registry::PackageRegistry;

/// How many known versions a "version not found" error lists
pub const SUGGESTION_LIMIT: usize = 20;

/// Resolves the version to build for a variant.
///
/// With an explicit request the version must be listed in the registry's
/// `releases` mapping and is returned unchanged. Without one, the registry's
/// latest version is returned. The registry is queried on every call.
///
/// # Errors
/// * `VersionNotFound` - the requested version is not published
/// * `NoLatestVersion` - no request and the registry has no latest pointer
/// * `RegistryUnreachable` / `MalformedResponse` - the registry could not be read
pub fn resolve_version<R: PackageRegistry + ?Sized>(
    registry: &R,
    requested: Option<&str>,
    variant: Variant,
) -> Result<String> {
    let index = registry.fetch_index(variant)?;
    let package = variant.profile().package;

    match requested.filter(|r| !r.is_empty()) {
        Some(requested) => {
            if index.contains(requested) {
                debug!(package, version = requested, "requested version is published");
                Ok(requested.to_string())
            } else {
                Err(ReleaseError::VersionNotFound {
                    package: package.to_string(),
                    requested: requested.to_string(),
                    available: index.newest_first(SUGGESTION_LIMIT),
                })
            }
        }
        None => index
            .latest()
            .map(str::to_string)
            .ok_or_else(|| ReleaseError::NoLatestVersion(package.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::MockRegistry;

    #[test]
    fn test_empty_request_means_latest() {
        let mut registry = MockRegistry::new();
        registry.add_version(Variant::Chat, "0.1.0");
        registry.set_latest(Variant::Chat, Some("0.1.0"));
        assert_eq!(
            resolve_version(&registry, Some(""), Variant::Chat).unwrap(),
            "0.1.0"
        );
    }

    #[test]
    fn test_suggestions_are_capped() {
        let mut registry = MockRegistry::new();
        for minor in 10..40 {
            registry.add_version(Variant::Chat, format!("0.{}.0", minor));
        }
        match resolve_version(&registry, Some("9.9.9"), Variant::Chat).unwrap_err() {
            ReleaseError::VersionNotFound { available, .. } => {
                assert_eq!(available.len(), SUGGESTION_LIMIT);
                assert_eq!(available[0], "0.39.0");
                assert_eq!(available[19], "0.20.0");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
