//! ocdiff CLI entry point

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;

use config::{Config, OutputFormat};

/// Overrides the log filter when set.
const LOG_ENV: &str = "OCDIFF_LOG";

#[derive(Parser)]
#[command(name = "ocdiff")]
#[command(about = "Backward-compatibility checker for OpenConfig YANG models", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to ./ocdiff.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Report node-level differences between two sets of YANG files
    Diff {
        /// Search path for the old set of YANG files
        #[arg(long, value_delimiter = ',')]
        oldp: Vec<PathBuf>,

        /// Search path for the new set of YANG files
        #[arg(long, value_delimiter = ',')]
        newp: Vec<PathBuf>,

        /// Root directory whose .yang files make up the old set
        #[arg(long)]
        oldroot: Option<PathBuf>,

        /// Root directory whose .yang files make up the new set
        #[arg(long)]
        newroot: Option<PathBuf>,

        /// Comma-separated list of old YANG files
        #[arg(long, value_delimiter = ',')]
        oldfiles: Vec<PathBuf>,

        /// Comma-separated list of new YANG files
        #[arg(long, value_delimiter = ',')]
        newfiles: Vec<PathBuf>,

        /// Only show backward-incompatible changes not covered by a version bump
        #[arg(long)]
        disallowed_incompats: bool,

        /// Format the report for a GitHub comment
        #[arg(long)]
        github_comment: bool,

        /// Output format
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// List the openconfig-version of each module
    Versions {
        /// Search path for imported modules
        #[arg(short = 'p', long = "path", value_delimiter = ',')]
        paths: Vec<PathBuf>,

        /// YANG files to read
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Show version
    Version,
}

fn init_logging(verbose: bool, config: &Config) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        let level = if verbose {
            "debug"
        } else {
            config.log.level.as_deref().unwrap_or("info")
        };
        EnvFilter::new(format!("ocdiff={0},ocdiff_core={0},ocdiff_yang={0}", level))
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    init_logging(cli.verbose, &config);

    tracing::debug!("ocdiff v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Diff {
            oldp,
            newp,
            oldroot,
            newroot,
            oldfiles,
            newfiles,
            disallowed_incompats,
            github_comment,
            format,
        } => {
            let args = commands::DiffArgs {
                old_paths: oldp.into_iter().chain(config.diff.oldp).collect(),
                new_paths: newp.into_iter().chain(config.diff.newp).collect(),
                old_root: oldroot,
                new_root: newroot,
                old_files: oldfiles,
                new_files: newfiles,
                disallowed_incompats,
                github_comment: github_comment || config.diff.github_comment,
                format: format.or(config.diff.format).unwrap_or_default(),
            };
            commands::diff(args)
        }
        Commands::Versions { paths, files } => commands::versions(paths, files),
        Commands::Version => {
            println!("ocdiff v{}", env!("CARGO_PKG_VERSION"));
            Ok(ExitCode::SUCCESS)
        }
    }
}
