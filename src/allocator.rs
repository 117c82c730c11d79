//! Build number allocation.
//!
//! The next build number is derived from the tags of releases that already
//! exist rather than from a private counter, so an allocation never collides
//! with a published release. A release created moments ago may not be listed
//! yet; that lag is not retried.

use serde::Serialize;
use tracing::debug;

use crate::domain::tag::render;
use crate::domain::{BuildKey, ReleaseRecord, TagPattern, Variant};
use crate::error::{ReleaseError, Result};

/// Names derived from one allocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildIdentifiers {
    pub tag_name: String,
    pub artifact_name: String,
}

/// The tag pattern used both to scan and to format tags for a variant and key
pub fn tag_pattern(variant: Variant, key: &BuildKey) -> Result<TagPattern> {
    TagPattern::new(variant.naming(key.classification()).tag)
}

/// Returns one more than the highest build number among releases tagged for
/// the same variant and build key, or 1 when there are none.
///
/// Tags belonging to other variants, other classifications or unrelated
/// naming schemes are skipped silently.
///
/// Fails when the highest existing build number is already `u64::MAX`.
pub fn next_build_number(
    releases: &[ReleaseRecord],
    variant: Variant,
    key: &BuildKey,
) -> Result<u64> {
    let pattern = tag_pattern(variant, key)?;

    let highest = releases
        .iter()
        .filter_map(|release| release.tag_name.as_deref())
        .filter_map(|tag| pattern.parse(tag))
        .filter(|fields| fields.belongs_to(key))
        .filter_map(|fields| fields.build_number())
        .max()
        .unwrap_or(0);

    debug!(
        variant = %variant,
        source = %key.classification(),
        scanned = releases.len(),
        highest,
        "allocated build number"
    );

    highest
        .checked_add(1)
        .ok_or_else(|| ReleaseError::BuildNumberExhausted {
            variant: variant.to_string(),
            key: key.to_string(),
        })
}

/// Formats the tag and artifact names for an allocated build number
pub fn format_identifiers(variant: Variant, build_number: u64, key: &BuildKey) -> BuildIdentifiers {
    let rule = variant.naming(key.classification());
    BuildIdentifiers {
        tag_name: render(rule.tag, key, build_number),
        artifact_name: render(rule.artifact, key, build_number),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(tags: &[&str]) -> Vec<ReleaseRecord> {
        tags.iter().map(|t| ReleaseRecord::new(*t)).collect()
    }

    fn published(version: &str) -> BuildKey {
        BuildKey::Published {
            version: version.to_string(),
        }
    }

    #[test]
    fn test_empty_listing_starts_at_one() {
        assert_eq!(
            next_build_number(&[], Variant::Chat, &published("1.0.0")).unwrap(),
            1
        );
    }

    #[test]
    fn test_gaps_do_not_matter() {
        let releases = records(&[
            "standalone-v1.0.0-build1",
            "standalone-v1.0.0-build2",
            "standalone-v1.0.0-build5",
        ]);
        assert_eq!(
            next_build_number(&releases, Variant::Chat, &published("1.0.0")).unwrap(),
            6
        );
    }

    #[test]
    fn test_records_without_tags_are_skipped() {
        let releases = vec![
            ReleaseRecord::default(),
            ReleaseRecord::new("standalone-v1.0.0-build2"),
        ];
        assert_eq!(
            next_build_number(&releases, Variant::Chat, &published("1.0.0")).unwrap(),
            3
        );
    }

    #[test]
    fn test_highest_possible_build_is_an_error() {
        let releases = records(&["standalone-v1.0-build18446744073709551615"]);
        let err = next_build_number(&releases, Variant::Chat, &published("1.0")).unwrap_err();
        assert!(matches!(err, ReleaseError::BuildNumberExhausted { .. }));
        assert!(err.to_string().contains("version 1.0"));
    }

    #[test]
    fn test_highest_possible_build_of_other_key_is_ignored() {
        let releases = records(&[
            "standalone-v1.0-build18446744073709551615",
            "standalone-v1.1-build3",
        ]);
        assert_eq!(
            next_build_number(&releases, Variant::Chat, &published("1.1")).unwrap(),
            4
        );
    }

    #[test]
    fn test_format_published() {
        let ids = format_identifiers(Variant::Chat, 4, &published("1.2.0"));
        assert_eq!(ids.tag_name, "standalone-v1.2.0-build4");
        assert_eq!(ids.artifact_name, "aider-1.2.0-build4");
    }

    #[test]
    fn test_format_snapshot_ce() {
        let key = BuildKey::Snapshot {
            date: "20240101".to_string(),
            commit: "abc123".to_string(),
        };
        let ids = format_identifiers(Variant::Ce, 2, &key);
        assert_eq!(ids.tag_name, "standalone-ce-main-20240101-abc123-build2");
        assert_eq!(ids.artifact_name, "aider-ce-main-20240101-abc123-build2");
    }
}
