use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ReleaseError, Result};

/// Whether a build is tied to a published version or to a development snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SourceClassification {
    Published,
    Snapshot,
}

impl SourceClassification {
    pub const ALL: [SourceClassification; 2] = [
        SourceClassification::Published,
        SourceClassification::Snapshot,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SourceClassification::Published => "published",
            SourceClassification::Snapshot => "snapshot",
        }
    }
}

impl fmt::Display for SourceClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The key a build number counter is scoped to.
///
/// Two builds share a counter only when their keys are equal by plain
/// string comparison: `1.0` and `1.0.0` are different keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildKey {
    Published { version: String },
    Snapshot { date: String, commit: String },
}

impl BuildKey {
    /// Builds a key from the raw optional fields of an invocation.
    ///
    /// Fields that the classification does not use are ignored. Empty
    /// strings count as missing. When several fields are missing they are
    /// reported together in one error.
    pub fn from_parts(
        classification: SourceClassification,
        version: Option<&str>,
        date: Option<&str>,
        commit: Option<&str>,
    ) -> Result<Self> {
        match classification {
            SourceClassification::Published => {
                let version = present(version).ok_or_else(|| ReleaseError::MissingFields {
                    classification: classification.to_string(),
                    fields: vec!["version"],
                })?;
                check_field("version", version)?;
                Ok(BuildKey::Published {
                    version: version.to_string(),
                })
            }
            SourceClassification::Snapshot => {
                let (date, commit) = match (present(date), present(commit)) {
                    (Some(date), Some(commit)) => (date, commit),
                    (date, commit) => {
                        let mut fields = Vec::new();
                        if date.is_none() {
                            fields.push("date");
                        }
                        if commit.is_none() {
                            fields.push("commit");
                        }
                        return Err(ReleaseError::MissingFields {
                            classification: classification.to_string(),
                            fields,
                        });
                    }
                };
                check_field("date", date)?;
                check_field("commit", commit)?;
                Ok(BuildKey::Snapshot {
                    date: date.to_string(),
                    commit: commit.to_string(),
                })
            }
        }
    }

    pub fn classification(&self) -> SourceClassification {
        match self {
            BuildKey::Published { .. } => SourceClassification::Published,
            BuildKey::Snapshot { .. } => SourceClassification::Snapshot,
        }
    }

    /// Version label recorded in build metadata. Snapshots are labelled `main`.
    pub fn version_label(&self) -> &str {
        match self {
            BuildKey::Published { version } => version,
            BuildKey::Snapshot { .. } => "main",
        }
    }
}

impl fmt::Display for BuildKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildKey::Published { version } => write!(f, "version {}", version),
            BuildKey::Snapshot { date, commit } => {
                write!(f, "snapshot {} at {}", date, commit)
            }
        }
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

// Tag fields are separated by '-' and templates use '{name}' placeholders;
// a field containing either could not be read back from the tag it produced.
fn check_field(field: &'static str, value: &str) -> Result<()> {
    let forbidden = |c: char| c == '-' || c == '{' || c == '}' || c.is_whitespace();
    if value.contains(forbidden) {
        return Err(ReleaseError::InvalidField {
            field,
            value: value.to_string(),
            reason: "must not contain '-', '{', '}' or whitespace".to_string(),
        });
    }
    Ok(())
}
