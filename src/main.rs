use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use standalone_release::cli::{self, BuildArgs, ComputeArgs, ResolveArgs};
use standalone_release::config::{self, Config};
use standalone_release::domain::{SourceClassification, Variant};
use standalone_release::logging;
use standalone_release::package::SystemRunner;
use standalone_release::registry::{GithubReleases, GithubSettings, PypiRegistry};
use standalone_release::{ui, ReleaseError};

const TRANSPORT_HINT: &str =
    "A remote service did not answer as expected; nothing was written, so rerunning is safe";

#[derive(clap::Parser)]
#[command(
    name = "standalone-release",
    version,
    about = "Resolve versions, allocate build numbers and package standalone aider executables"
)]
struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(long, global = true, help = "Enable debug logging")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the upstream version to package
    ResolveVersion {
        #[arg(long, value_enum, default_value_t = Variant::Chat)]
        variant: Variant,

        #[arg(long, help = "Explicit version to use instead of the latest")]
        requested: Option<String>,

        #[arg(long, help = "CI output file to append key=value lines to")]
        github_output: Option<PathBuf>,
    },

    /// Compute the next build number and the release names derived from it
    ComputeVersion {
        #[arg(long, value_enum, default_value_t = Variant::Chat)]
        variant: Variant,

        #[arg(long, value_enum, default_value_t = SourceClassification::Published)]
        source: SourceClassification,

        #[arg(long, help = "Upstream version (published builds)")]
        version: Option<String>,

        #[arg(long, help = "Build date, e.g. 20240101 (snapshot builds)")]
        date: Option<String>,

        #[arg(long, help = "Commit identifier (snapshot builds)")]
        commit: Option<String>,

        #[arg(long, help = "Explicit build number to use instead of auto-increment")]
        override_build_number: Option<u64>,

        #[arg(long, help = "Path to write JSON metadata")]
        output: PathBuf,

        #[arg(long, help = "CI output file to append key=value lines to")]
        github_output: Option<PathBuf>,
    },

    /// Package a published version as a single-file executable
    Build {
        #[arg(long, value_enum, default_value_t = Variant::Chat)]
        variant: Variant,

        #[arg(long)]
        version: String,

        #[arg(long)]
        build_number: u64,

        #[arg(long, help = "Artifact file name (defaults to the allocated artifact name)")]
        artifact_name: Option<String>,

        #[arg(long, help = "Directory for the artifact and lock file")]
        output_dir: Option<PathBuf>,

        #[arg(long, help = "Path to write the build manifest JSON")]
        metadata: PathBuf,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init_tracing(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ui::display_error(&format!("{:#}", e));
            if e
                .downcast_ref::<ReleaseError>()
                .is_some_and(ReleaseError::is_transport)
            {
                ui::display_status(TRANSPORT_HINT);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let config = config::load_config(args.config.as_deref()).context("Error loading config")?;

    match args.command {
        Commands::ResolveVersion {
            variant,
            requested,
            github_output,
        } => {
            let registry = PypiRegistry::new(&config.registry)?;
            let version = cli::run_resolve(
                &registry,
                &ResolveArgs {
                    variant,
                    requested,
                    github_output,
                },
            )?;
            println!("{}", version);
        }
        Commands::ComputeVersion {
            variant,
            source,
            version,
            date,
            commit,
            override_build_number,
            output,
            github_output,
        } => {
            let compute = ComputeArgs {
                variant,
                source,
                version,
                date,
                commit,
                override_build_number,
                output,
                github_output,
            };
            let metadata = cli::run_compute(&compute, || release_listing(&config))?;
            ui::display_allocation(&metadata);
            println!("{}", serde_json::to_string(&metadata)?);
        }
        Commands::Build {
            variant,
            version,
            build_number,
            artifact_name,
            output_dir,
            metadata,
        } => {
            let build = BuildArgs {
                variant,
                version,
                build_number,
                artifact_name,
                output_dir: output_dir.unwrap_or_else(|| config.build.output_dir.clone()),
                metadata,
                python: PathBuf::from(&config.build.python),
            };
            ui::display_status(&format!(
                "Building {} {} (build {})",
                build.variant, build.version, build.build_number
            ));
            let manifest = cli::run_build(&SystemRunner, &build)?;
            ui::display_manifest(&manifest);
            ui::display_success("Build complete");
            println!("{}", serde_json::to_string(&manifest)?);
        }
    }

    Ok(())
}

fn release_listing(config: &Config) -> standalone_release::Result<GithubReleases> {
    let settings = GithubSettings::from_env()?;
    GithubReleases::new(&config.github, settings)
}
