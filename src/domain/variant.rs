use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::source::SourceClassification;

/// Product flavor being packaged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// The upstream `aider-chat` distribution
    Chat,
    /// The community edition, published as `aider-ce`
    Ce,
}

/// Static description of a variant: where it is published and how its
/// releases and artifacts are named.
#[derive(Debug)]
pub struct VariantProfile {
    /// Package name on the registry
    pub package: &'static str,
    /// Importable module whose `__main__.main` starts the application
    pub module: &'static str,
    /// Name PyInstaller gives the bundled executable
    pub binary_name: &'static str,
    pub published: NamingRule,
    pub snapshot: NamingRule,
}

/// Tag and artifact templates for one (variant, classification) pair.
///
/// Placeholders: `{version}`, `{date}`, `{commit}`, `{build}`.
#[derive(Debug)]
pub struct NamingRule {
    pub tag: &'static str,
    pub artifact: &'static str,
}

static CHAT: VariantProfile = VariantProfile {
    package: "aider-chat",
    module: "aider",
    binary_name: "aider-standalone",
    published: NamingRule {
        tag: "standalone-v{version}-build{build}",
        artifact: "aider-{version}-build{build}",
    },
    snapshot: NamingRule {
        tag: "standalone-main-{date}-{commit}-build{build}",
        artifact: "aider-main-{date}-{commit}-build{build}",
    },
};

static CE: VariantProfile = VariantProfile {
    package: "aider-ce",
    module: "aider",
    binary_name: "aider-ce-standalone",
    published: NamingRule {
        tag: "standalone-ce-v{version}-build{build}",
        artifact: "aider-ce-{version}-build{build}",
    },
    snapshot: NamingRule {
        tag: "standalone-ce-main-{date}-{commit}-build{build}",
        artifact: "aider-ce-main-{date}-{commit}-build{build}",
    },
};

impl Variant {
    pub const ALL: [Variant; 2] = [Variant::Chat, Variant::Ce];

    pub fn profile(self) -> &'static VariantProfile {
        match self {
            Variant::Chat => &CHAT,
            Variant::Ce => &CE,
        }
    }

    pub fn naming(self, classification: SourceClassification) -> &'static NamingRule {
        let profile = self.profile();
        match classification {
            SourceClassification::Published => &profile.published,
            SourceClassification::Snapshot => &profile.snapshot,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Variant::Chat => "chat",
            Variant::Ce => "ce",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles_point_at_distinct_packages() {
        assert_eq!(Variant::Chat.profile().package, "aider-chat");
        assert_eq!(Variant::Ce.profile().package, "aider-ce");
    }

    #[test]
    fn test_naming_rules_are_distinct_across_table() {
        let mut tags = Vec::new();
        for variant in Variant::ALL {
            for classification in SourceClassification::ALL {
                tags.push(variant.naming(classification).tag);
            }
        }
        let mut deduped = tags.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(tags.len(), deduped.len());
    }

    #[test]
    fn test_every_template_carries_build_placeholder() {
        for variant in Variant::ALL {
            for classification in SourceClassification::ALL {
                let rule = variant.naming(classification);
                assert!(rule.tag.contains("{build}"));
                assert!(rule.artifact.contains("{build}"));
            }
        }
    }

    #[test]
    fn test_variant_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Variant::Ce).unwrap(), "\"ce\"");
        assert_eq!(Variant::Chat.to_string(), "chat");
    }
}
