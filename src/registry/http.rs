use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde_json::Value;
use std::env;
use tracing::{debug, info};

use crate::config::{GithubConfig, RegistryConfig};
use crate::domain::{ReleaseRecord, Variant};
use crate::error::{ReleaseError, Result};
use crate::registry::{PackageRegistry, RegistryIndex, ReleaseListing};

const USER_AGENT: &str = concat!("standalone-release/", env!("CARGO_PKG_VERSION"));

fn http_client() -> std::result::Result<Client, reqwest::Error> {
    Client::builder().user_agent(USER_AGENT).build()
}

/// JSON registry client (PyPI layout: `{base_url}/{package}/json`)
pub struct PypiRegistry {
    base_url: String,
    client: Client,
}

impl PypiRegistry {
    pub fn new(config: &RegistryConfig) -> Result<Self> {
        let client = http_client().map_err(|e| ReleaseError::RegistryUnreachable(e.to_string()))?;
        Ok(PypiRegistry {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn endpoint(&self, variant: Variant) -> String {
        format!("{}/{}/json", self.base_url, variant.profile().package)
    }
}

impl PackageRegistry for PypiRegistry {
    fn fetch_index(&self, variant: Variant) -> Result<RegistryIndex> {
        let url = self.endpoint(variant);
        debug!(%url, "fetching registry index");

        let body = self
            .client
            .get(&url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.text())
            .map_err(|e| ReleaseError::RegistryUnreachable(format!("{}: {}", url, e)))?;

        let index = RegistryIndex::from_json(&url, &body)?;
        info!(
            package = variant.profile().package,
            versions = index.releases.len(),
            "registry index fetched"
        );
        Ok(index)
    }
}

/// Repository and credential for the release listing.
///
/// Passed explicitly to [`GithubReleases`]; only [`GithubSettings::from_env`]
/// looks at the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GithubSettings {
    /// `owner/name`
    pub repository: String,
    pub token: String,
}

impl GithubSettings {
    pub const REPOSITORY_VAR: &'static str = "GITHUB_REPOSITORY";
    pub const TOKEN_VAR: &'static str = "GITHUB_TOKEN";

    pub fn from_env() -> Result<Self> {
        let read = |name: &str| env::var(name).ok().filter(|v| !v.is_empty());
        match (read(Self::REPOSITORY_VAR), read(Self::TOKEN_VAR)) {
            (Some(repository), Some(token)) => Ok(GithubSettings { repository, token }),
            _ => Err(ReleaseError::config(format!(
                "{} and {} must be set to compute build numbers automatically",
                Self::REPOSITORY_VAR,
                Self::TOKEN_VAR
            ))),
        }
    }
}

/// Paginated GitHub releases listing
pub struct GithubReleases {
    api_base: String,
    per_page: u32,
    settings: GithubSettings,
    client: Client,
}

impl GithubReleases {
    pub fn new(config: &GithubConfig, settings: GithubSettings) -> Result<Self> {
        if config.per_page == 0 {
            return Err(ReleaseError::config("github.per_page must be at least 1"));
        }
        let client =
            http_client().map_err(|e| ReleaseError::ReleaseListingUnreachable(e.to_string()))?;
        Ok(GithubReleases {
            api_base: config.api_base.trim_end_matches('/').to_string(),
            per_page: config.per_page,
            settings,
            client,
        })
    }

    pub fn page_url(&self, page: u32) -> String {
        format!(
            "{}/repos/{}/releases?per_page={}&page={}",
            self.api_base, self.settings.repository, self.per_page, page
        )
    }

    fn fetch_page(&self, page: u32) -> Result<Vec<ReleaseRecord>> {
        let url = self.page_url(page);
        debug!(%url, "fetching release page");

        let body = self
            .client
            .get(&url)
            .header(AUTHORIZATION, format!("Bearer {}", self.settings.token))
            .header(ACCEPT, "application/vnd.github+json")
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.text())
            .map_err(|e| ReleaseError::ReleaseListingUnreachable(format!("{}: {}", url, e)))?;

        parse_release_page(&url, &body)
    }
}

impl ReleaseListing for GithubReleases {
    fn list_releases(&self) -> Result<Vec<ReleaseRecord>> {
        let mut releases = Vec::new();
        let mut page = 1;
        loop {
            let batch = self.fetch_page(page)?;
            let last = batch.len() < self.per_page as usize;
            releases.extend(batch);
            if last {
                break;
            }
            page += 1;
        }
        info!(
            repository = %self.settings.repository,
            pages = page,
            releases = releases.len(),
            "release listing fetched"
        );
        Ok(releases)
    }
}

/// Parse one page of the listing; the body must be a JSON array.
pub fn parse_release_page(endpoint: &str, body: &str) -> Result<Vec<ReleaseRecord>> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| ReleaseError::malformed(endpoint, e.to_string()))?;
    match value {
        Value::Array(items) => Ok(items.iter().map(ReleaseRecord::from_value).collect()),
        _ => Err(ReleaseError::malformed(endpoint, "expected a JSON array of releases")),
    }
}
