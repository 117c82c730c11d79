use regex::Regex;

use crate::domain::source::BuildKey;
use crate::error::{ReleaseError, Result};

const FIELD_GROUP: &str = "[^-]+";
const BUILD_GROUP: &str = r"\d+";

/// Fields captured from a tag name that matched a [`TagPattern`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagFields {
    pub version: Option<String>,
    pub date: Option<String>,
    pub commit: Option<String>,
    pub build: String,
}

impl TagFields {
    /// Whether the captured fields identify the same build key
    pub fn belongs_to(&self, key: &BuildKey) -> bool {
        match key {
            BuildKey::Published { version } => self.version.as_deref() == Some(version.as_str()),
            BuildKey::Snapshot { date, commit } => {
                self.date.as_deref() == Some(date.as_str())
                    && self.commit.as_deref() == Some(commit.as_str())
            }
        }
    }

    /// The captured build number, or `None` if it does not fit in a `u64`
    pub fn build_number(&self) -> Option<u64> {
        self.build.parse().ok()
    }
}

/// Tag naming pattern (e.g. "standalone-v{version}-build{build}").
///
/// The same template is used to format tag names with [`render`] and to
/// recognise them again through [`TagPattern::parse`].
#[derive(Debug, Clone)]
pub struct TagPattern {
    pub template: String,
    regex: Regex,
}

impl TagPattern {
    /// Compile a template into a pattern
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        if !template.contains("{build}") {
            return Err(ReleaseError::config(format!(
                "Tag template '{}' must contain the {{build}} placeholder",
                template
            )));
        }

        // Escape everything, then turn the escaped placeholders into groups
        let escaped = regex::escape(&template);
        let pattern = escaped
            .replace(r"\{version\}", &format!("(?P<version>{FIELD_GROUP})"))
            .replace(r"\{date\}", &format!("(?P<date>{FIELD_GROUP})"))
            .replace(r"\{commit\}", &format!("(?P<commit>{FIELD_GROUP})"))
            .replace(r"\{build\}", &format!("(?P<build>{BUILD_GROUP})"));

        let regex = Regex::new(&format!("^{}$", pattern)).map_err(|e| {
            ReleaseError::config(format!("Invalid tag template '{}': {}", template, e))
        })?;

        Ok(TagPattern { template, regex })
    }

    /// Match a tag name against this pattern, full-string only
    pub fn parse(&self, tag: &str) -> Option<TagFields> {
        let caps = self.regex.captures(tag)?;
        let group = |name: &str| caps.name(name).map(|m| m.as_str().to_string());
        Some(TagFields {
            version: group("version"),
            date: group("date"),
            commit: group("commit"),
            build: group("build")?,
        })
    }
}

/// Placeholder substitution shared by tag and artifact templates.
///
/// The template is scanned once, so text inserted for one placeholder is
/// never substituted again. Placeholders the key does not carry are left
/// as they are.
pub fn render(template: &str, key: &BuildKey, build_number: u64) -> String {
    let build = build_number.to_string();
    let mut out = String::with_capacity(template.len() + build.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let substituted = tail
            .find('}')
            .and_then(|end| placeholder(key, &build, &tail[1..end]).map(|v| (v, end + 1)));
        match substituted {
            Some((value, consumed)) => {
                out.push_str(value);
                rest = &tail[consumed..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn placeholder<'a>(key: &'a BuildKey, build: &'a str, name: &str) -> Option<&'a str> {
    match (name, key) {
        ("build", _) => Some(build),
        ("version", BuildKey::Published { version }) => Some(version.as_str()),
        ("date", BuildKey::Snapshot { date, .. }) => Some(date.as_str()),
        ("commit", BuildKey::Snapshot { commit, .. }) => Some(commit.as_str()),
        _ => None,
    }
}
