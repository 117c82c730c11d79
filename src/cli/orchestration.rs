//! Command workflows
//!
//! Each command of the binary is a function here, taking its arguments as a
//! plain struct and its remote sources as trait objects. This keeps `main.rs`
//! down to argument parsing and lets the workflows run against mocks.

use std::path::PathBuf;
use tracing::info;

use crate::allocator::{format_identifiers, next_build_number};
use crate::domain::{BuildKey, SourceClassification, Variant};
use crate::error::{ReleaseError, Result};
use crate::metadata::{append_ci_outputs, write_json, BuildManifest, ResolvedMetadata};
use crate::package::{build_standalone, BuildRequest, CommandRunner};
use crate::registry::{PackageRegistry, ReleaseListing};
use crate::resolver::resolve_version;

/// Arguments for the version resolution workflow
#[derive(Debug, Clone, PartialEq)]
pub struct ResolveArgs {
    pub variant: Variant,
    /// Explicit version to validate; `None` selects the latest
    pub requested: Option<String>,
    pub github_output: Option<PathBuf>,
}

/// Arguments for the build number workflow
#[derive(Debug, Clone, PartialEq)]
pub struct ComputeArgs {
    pub variant: Variant,
    pub source: SourceClassification,
    pub version: Option<String>,
    pub date: Option<String>,
    pub commit: Option<String>,
    /// Skip the release listing and use this build number
    pub override_build_number: Option<u64>,
    pub output: PathBuf,
    pub github_output: Option<PathBuf>,
}

/// Arguments for the packaging workflow
#[derive(Debug, Clone, PartialEq)]
pub struct BuildArgs {
    pub variant: Variant,
    pub version: String,
    pub build_number: u64,
    /// Defaults to the artifact name the allocator would give this build
    pub artifact_name: Option<String>,
    pub output_dir: PathBuf,
    pub metadata: PathBuf,
    pub python: PathBuf,
}

/// Resolve the version to build and record it for CI
pub fn run_resolve<R: PackageRegistry + ?Sized>(
    registry: &R,
    args: &ResolveArgs,
) -> Result<String> {
    let version = resolve_version(registry, args.requested.as_deref(), args.variant)?;
    if let Some(path) = &args.github_output {
        append_ci_outputs(path, &[("aider_version", version.as_str())])?;
    }
    Ok(version)
}

/// Allocate a build number and write the resulting metadata.
///
/// Fields are validated before `listing` is called, so a missing date or
/// commit never costs a network round trip. `listing` is not called at all
/// when a build number override is given.
pub fn run_compute<F, L>(args: &ComputeArgs, listing: F) -> Result<ResolvedMetadata>
where
    F: FnOnce() -> Result<L>,
    L: ReleaseListing,
{
    let key = BuildKey::from_parts(
        args.source,
        args.version.as_deref(),
        args.date.as_deref(),
        args.commit.as_deref(),
    )?;

    let build_number = match args.override_build_number {
        Some(0) => {
            return Err(ReleaseError::InvalidField {
                field: "build number",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            })
        }
        Some(n) => {
            info!(build_number = n, "using build number override");
            n
        }
        None => {
            let releases = listing()?.list_releases()?;
            next_build_number(&releases, args.variant, &key)?
        }
    };

    let identifiers = format_identifiers(args.variant, build_number, &key);
    let metadata = ResolvedMetadata::new(args.variant, &key, build_number, identifiers);

    write_json(&args.output, &metadata)?;
    if let Some(path) = &args.github_output {
        append_ci_outputs(path, &metadata.ci_outputs())?;
    }
    Ok(metadata)
}

/// Package a published version and write its manifest
pub fn run_build<R: CommandRunner + ?Sized>(runner: &R, args: &BuildArgs) -> Result<BuildManifest> {
    let key = BuildKey::from_parts(
        SourceClassification::Published,
        Some(&args.version),
        None,
        None,
    )?;
    let artifact_name = match &args.artifact_name {
        Some(name) => name.clone(),
        None => format_identifiers(args.variant, args.build_number, &key).artifact_name,
    };

    let request = BuildRequest {
        variant: args.variant,
        version: args.version.clone(),
        artifact_name,
        output_dir: args.output_dir.clone(),
        python: args.python.clone(),
    };
    let output = build_standalone(runner, &request)?;

    let manifest = BuildManifest {
        variant: args.variant,
        version: args.version.clone(),
        build_number: args.build_number,
        artifact_path: output.artifact,
        artifact_sha256: output.checksum,
        lock_file: output.lock_file,
    };
    write_json(&args.metadata, &manifest)?;
    Ok(manifest)
}
