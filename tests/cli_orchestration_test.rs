use standalone_release::cli::{run_compute, run_resolve, ComputeArgs, ResolveArgs};
use standalone_release::domain::{SourceClassification, Variant};
use standalone_release::registry::{MockRegistry, MockReleaseListing};
use standalone_release::{ReleaseError, Result};
use std::cell::Cell;
use std::fs;
use std::path::Path;

fn compute_args(dir: &Path, source: SourceClassification) -> ComputeArgs {
    ComputeArgs {
        variant: Variant::Chat,
        source,
        version: None,
        date: None,
        commit: None,
        override_build_number: None,
        output: dir.join("metadata.json"),
        github_output: None,
    }
}

#[test]
fn test_compute_published_writes_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let mut args = compute_args(dir.path(), SourceClassification::Published);
    args.version = Some("1.2.0".to_string());
    args.github_output = Some(dir.path().join("github_output"));

    let listing = MockReleaseListing::with_tags([
        "standalone-v1.2.0-build1",
        "standalone-v1.2.0-build3",
        "standalone-v1.3.0-build1",
    ]);
    let metadata = run_compute(&args, || Ok(&listing)).unwrap();

    assert_eq!(metadata.build_number, 4);
    assert_eq!(metadata.tag_name, "standalone-v1.2.0-build4");
    assert_eq!(metadata.artifact_name, "aider-1.2.0-build4");

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&args.output).unwrap()).unwrap();
    assert_eq!(written["tag_name"], "standalone-v1.2.0-build4");
    assert_eq!(written["source"], "published");
    assert_eq!(written["variant"], "chat");
    assert!(written["created_at"].as_str().unwrap().ends_with('Z'));

    let outputs = fs::read_to_string(dir.path().join("github_output")).unwrap();
    assert_eq!(
        outputs,
        "build_number=4\ntag_name=standalone-v1.2.0-build4\nartifact_name=aider-1.2.0-build4\n"
    );
}

#[test]
fn test_compute_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let mut args = compute_args(dir.path(), SourceClassification::Snapshot);
    args.date = Some("20240101".to_string());
    args.commit = Some("abc123".to_string());

    let listing = MockReleaseListing::with_tags([
        "standalone-main-20240101-abc123-build2",
        "standalone-main-20240102-abc123-build9",
    ]);
    let metadata = run_compute(&args, || Ok(&listing)).unwrap();

    assert_eq!(metadata.build_number, 3);
    assert_eq!(metadata.version, "main");
    assert_eq!(metadata.commit.as_deref(), Some("abc123"));
}

#[test]
fn test_missing_commit_fails_before_listing() {
    let dir = tempfile::tempdir().unwrap();
    let mut args = compute_args(dir.path(), SourceClassification::Snapshot);
    args.date = Some("20240101".to_string());

    let requested = Cell::new(false);
    let err = run_compute(&args, || -> Result<MockReleaseListing> {
        requested.set(true);
        Ok(MockReleaseListing::new())
    })
    .unwrap_err();

    assert!(!requested.get(), "listing must not be touched");
    match &err {
        ReleaseError::MissingFields { fields, .. } => assert_eq!(fields, &vec!["commit"]),
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("commit"));
    assert!(!args.output.exists());
}

#[test]
fn test_missing_date_and_commit_in_one_message() {
    let dir = tempfile::tempdir().unwrap();
    let args = compute_args(dir.path(), SourceClassification::Snapshot);

    let err = run_compute(&args, || Ok(MockReleaseListing::new())).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Missing required field(s) for snapshot build: date, commit"
    );
}

#[test]
fn test_override_skips_listing() {
    let dir = tempfile::tempdir().unwrap();
    let mut args = compute_args(dir.path(), SourceClassification::Published);
    args.version = Some("0.86.0".to_string());
    args.override_build_number = Some(7);

    let metadata = run_compute(&args, || -> Result<MockReleaseListing> {
        Err(ReleaseError::config("listing must not be requested"))
    })
    .unwrap();
    assert_eq!(metadata.build_number, 7);
    assert_eq!(metadata.tag_name, "standalone-v0.86.0-build7");
}

#[test]
fn test_zero_override_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut args = compute_args(dir.path(), SourceClassification::Published);
    args.version = Some("0.86.0".to_string());
    args.override_build_number = Some(0);

    let err = run_compute(&args, || Ok(MockReleaseListing::new())).unwrap_err();
    assert!(matches!(err, ReleaseError::InvalidField { .. }));
}

#[test]
fn test_listing_failure_aborts_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let mut args = compute_args(dir.path(), SourceClassification::Published);
    args.version = Some("0.86.0".to_string());

    let err = run_compute(&args, || -> Result<MockReleaseListing> {
        Err(ReleaseError::ReleaseListingUnreachable("connection reset".to_string()))
    })
    .unwrap_err();
    assert!(err.is_transport());
    assert!(!args.output.exists());
}

#[test]
fn test_resolve_appends_ci_output() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("github_output");
    fs::write(&output, "existing=1\n").unwrap();

    let mut registry = MockRegistry::new();
    registry.add_version(Variant::Ce, "0.87.3");
    registry.set_latest(Variant::Ce, Some("0.87.3"));

    let version = run_resolve(
        &registry,
        &ResolveArgs {
            variant: Variant::Ce,
            requested: None,
            github_output: Some(output.clone()),
        },
    )
    .unwrap();

    assert_eq!(version, "0.87.3");
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "existing=1\naider_version=0.87.3\n"
    );
}
