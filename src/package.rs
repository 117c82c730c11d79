//! Packaging driver: turns a published version into a single-file executable.
//!
//! The heavy lifting is done by external tools (venv, pip-tools, PyInstaller).
//! This module only sequences them, checks what they produced and checksums
//! the result.

use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::info;

use crate::domain::Variant;
use crate::error::{ReleaseError, Result};

/// PyInstaller flags collecting data files and submodules that are loaded
/// dynamically and therefore missed by import analysis.
const COLLECT_FLAGS: &[(&str, &str)] = &[
    ("--collect-data", "litellm"),
    ("--collect-submodules", "litellm"),
    ("--collect-data", "tiktoken"),
    ("--collect-data", "tiktoken_ext"),
    ("--collect-submodules", "tiktoken_ext"),
    ("--collect-data", "tiktoken_ext.openai_public"),
    ("--collect-submodules", "tiktoken_ext.openai_public"),
];

/// Runs one external command to completion
pub trait CommandRunner {
    /// Run `program` with `args`, optionally inside `cwd`.
    /// A non-zero exit status is an error.
    fn run(&self, program: &Path, args: &[String], cwd: Option<&Path>) -> Result<()>;
}

/// Runs commands as child processes, inheriting stdio
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &Path, args: &[String], cwd: Option<&Path>) -> Result<()> {
        let command_line = describe(program, args);
        info!(command = %command_line, "running");

        let mut cmd = Command::new(program);
        cmd.args(args);
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }

        let status = cmd.status().map_err(|e| {
            ReleaseError::package(format!("failed to start {}: {}", command_line, e))
        })?;

        if !status.success() {
            return Err(ReleaseError::package(format!(
                "{} exited with code {}",
                command_line,
                status.code().unwrap_or(-1)
            )));
        }
        Ok(())
    }
}

/// Human-readable command line for logs and errors
pub fn describe(program: &Path, args: &[String]) -> String {
    let mut parts = vec![program.display().to_string()];
    parts.extend(args.iter().cloned());
    parts.join(" ")
}

/// What to build and where to put it
#[derive(Debug, Clone, PartialEq)]
pub struct BuildRequest {
    pub variant: Variant,
    pub version: String,
    pub artifact_name: String,
    pub output_dir: PathBuf,
    pub python: PathBuf,
}

/// Files produced by a successful build
#[derive(Debug, Clone, PartialEq)]
pub struct BuildOutput {
    pub artifact: PathBuf,
    pub checksum: String,
    pub lock_file: PathBuf,
}

fn args<const N: usize>(items: [&str; N]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn path_arg(path: &Path) -> String {
    path.display().to_string()
}

/// Source of the launcher script handed to PyInstaller
pub fn launcher_source(module: &str) -> String {
    format!(
        "from {module}.__main__ import main\n\n\nif __name__ == \"__main__\":\n    main()\n"
    )
}

/// PyInstaller arguments for a one-file build of `variant`
pub fn pyinstaller_args(variant: Variant, launcher: &Path) -> Vec<String> {
    let profile = variant.profile();
    let mut out = args([
        "-m",
        "PyInstaller",
        "--clean",
        "--noconfirm",
        "--name",
        profile.binary_name,
        "--onefile",
        "--runtime-tmpdir",
        &format!("./.{}-tmp", profile.binary_name),
        "--collect-all",
        profile.module,
    ]);
    for (flag, value) in COLLECT_FLAGS {
        out.push(flag.to_string());
        out.push(value.to_string());
    }
    out.push(path_arg(launcher));
    out
}

/// Builds the standalone executable for `request` and checksums it.
///
/// Work happens in a temporary directory removed on return; only the
/// artifact and the hash-locked requirements survive in `output_dir`.
pub fn build_standalone<R: CommandRunner + ?Sized>(
    runner: &R,
    request: &BuildRequest,
) -> Result<BuildOutput> {
    let profile = request.variant.profile();
    fs::create_dir_all(&request.output_dir)?;

    let work = tempfile::Builder::new()
        .prefix("aider-standalone-")
        .tempdir()?;
    let tmp = work.path();

    let venv = tmp.join("venv");
    runner.run(&request.python, &args(["-m", "venv", &path_arg(&venv)]), None)?;

    let venv_python = venv.join("bin").join("python");
    let venv_pip = venv.join("bin").join("pip");
    runner.run(
        &venv_pip,
        &args(["install", "--upgrade", "pip", "setuptools", "wheel"]),
        None,
    )?;
    runner.run(&venv_pip, &args(["install", "pip-tools", "pyinstaller"]), None)?;

    let requirements_in = tmp.join("requirements.in");
    let requirements_lock = tmp.join("requirements.lock");
    fs::write(
        &requirements_in,
        format!("{}=={}\n", profile.package, request.version),
    )?;

    runner.run(
        &venv_python,
        &args([
            "-m",
            "piptools",
            "compile",
            "--generate-hashes",
            "--resolver=backtracking",
            &path_arg(&requirements_in),
            "-o",
            &path_arg(&requirements_lock),
        ]),
        None,
    )?;
    runner.run(
        &venv_pip,
        &args([
            "install",
            "--require-hashes",
            "-r",
            &path_arg(&requirements_lock),
        ]),
        None,
    )?;

    let launcher = tmp.join("launch.py");
    fs::write(&launcher, launcher_source(profile.module))?;
    runner.run(
        &venv_python,
        &pyinstaller_args(request.variant, &launcher),
        Some(tmp),
    )?;

    let built = tmp.join("dist").join(profile.binary_name);
    if !built.exists() {
        return Err(ReleaseError::package(format!(
            "PyInstaller did not produce the expected artifact at {}",
            built.display()
        )));
    }

    let artifact = request.output_dir.join(&request.artifact_name);
    fs::copy(&built, &artifact)?;
    make_executable(&artifact)?;

    let lock_file = request.output_dir.join("requirements.lock");
    fs::copy(&requirements_lock, &lock_file)?;

    let checksum = sha256_file(&artifact)?;
    info!(artifact = %artifact.display(), %checksum, "artifact ready");

    Ok(BuildOutput {
        artifact,
        checksum,
        lock_file,
    })
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    Ok(())
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

/// Hex SHA-256 of a file, read in 1 MiB chunks
pub fn sha256_file(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; 1024 * 1024];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}
