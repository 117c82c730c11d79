//! Result records written at the end of an invocation.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::allocator::BuildIdentifiers;
use crate::domain::{BuildKey, SourceClassification, Variant};
use crate::error::Result;

/// Outcome of a build number computation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedMetadata {
    pub variant: Variant,
    pub version: String,
    pub build_number: u64,
    pub tag_name: String,
    pub artifact_name: String,
    pub source: SourceClassification,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ResolvedMetadata {
    pub fn new(
        variant: Variant,
        key: &BuildKey,
        build_number: u64,
        identifiers: BuildIdentifiers,
    ) -> Self {
        Self::at(variant, key, build_number, identifiers, Utc::now())
    }

    /// Same as [`ResolvedMetadata::new`] with an explicit timestamp
    pub fn at(
        variant: Variant,
        key: &BuildKey,
        build_number: u64,
        identifiers: BuildIdentifiers,
        created_at: DateTime<Utc>,
    ) -> Self {
        let (date, commit) = match key {
            BuildKey::Published { .. } => (None, None),
            BuildKey::Snapshot { date, commit } => (Some(date.clone()), Some(commit.clone())),
        };
        ResolvedMetadata {
            variant,
            version: key.version_label().to_string(),
            build_number,
            tag_name: identifiers.tag_name,
            artifact_name: identifiers.artifact_name,
            source: key.classification(),
            date,
            commit,
            created_at,
        }
    }

    /// Lines appended to the CI output file
    pub fn ci_outputs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("build_number", self.build_number.to_string()),
            ("tag_name", self.tag_name.clone()),
            ("artifact_name", self.artifact_name.clone()),
        ]
    }
}

/// Manifest describing a packaged artifact
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildManifest {
    pub variant: Variant,
    pub version: String,
    pub build_number: u64,
    pub artifact_path: PathBuf,
    pub artifact_sha256: String,
    pub lock_file: PathBuf,
}

/// Writes `value` as pretty JSON with a trailing newline
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut contents = serde_json::to_string_pretty(value)?;
    contents.push('\n');
    fs::write(path, contents)?;
    Ok(())
}

/// Appends `key=value` lines for an external automation system
pub fn append_ci_outputs<K: AsRef<str>, V: AsRef<str>>(
    path: &Path,
    pairs: &[(K, V)],
) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    for (key, value) in pairs {
        writeln!(file, "{}={}", key.as_ref(), value.as_ref())?;
    }
    Ok(())
}
