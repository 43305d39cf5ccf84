//! CLI command implementations

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context};
use ocdiff_core::{module_versions_listing, DiffReport, ReportOptions};
use ocdiff_yang::{yang_files_under, YangEntryProvider};

use crate::config::OutputFormat;

/// Printed before a non-empty disallowed-incompatibilities report.
pub const DISALLOWED_HEADER: &str =
    "Backward-incompatible changes not covered by version increments per semver.org:";

/// Resolved inputs of `ocdiff diff`.
#[derive(Debug, Clone, Default)]
pub struct DiffArgs {
    pub old_paths: Vec<PathBuf>,
    pub new_paths: Vec<PathBuf>,
    pub old_root: Option<PathBuf>,
    pub new_root: Option<PathBuf>,
    pub old_files: Vec<PathBuf>,
    pub new_files: Vec<PathBuf>,
    pub disallowed_incompats: bool,
    pub github_comment: bool,
    pub format: OutputFormat,
}

/// Files under `root` (if any) followed by `explicit`, without duplicates.
fn collect_files(root: Option<&Path>, explicit: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    if let Some(root) = root {
        if !root.is_dir() {
            bail!("model root {} is not a directory", root.display());
        }
        files = yang_files_under(root);
        tracing::debug!("Found {} YANG files under {}", files.len(), root.display());
    }
    for file in explicit {
        if !files.contains(file) {
            files.push(file.clone());
        }
    }
    Ok(files)
}

fn search_paths(paths: Vec<PathBuf>, root: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = paths;
    if let Some(root) = root {
        paths.push(root.to_path_buf());
    }
    paths
}

pub fn diff(args: DiffArgs) -> anyhow::Result<ExitCode> {
    let old_files = collect_files(args.old_root.as_deref(), &args.old_files)?;
    let new_files = collect_files(args.new_root.as_deref(), &args.new_files)?;
    if old_files.is_empty() && new_files.is_empty() {
        bail!("no YANG files given; use --oldfiles/--newfiles or --oldroot/--newroot");
    }
    let old_paths = search_paths(args.old_paths, args.old_root.as_deref());
    let new_paths = search_paths(args.new_paths, args.new_root.as_deref());

    tracing::info!("Comparing {} old files against {} new files", old_files.len(), new_files.len());

    let provider = YangEntryProvider::new();
    let mut report = DiffReport::new(&provider, &old_paths, &new_paths, &old_files, &new_files)
        .context("failed to load YANG models")?;

    let mut options = ReportOptions::new();
    if args.disallowed_incompats {
        options = options.with_disallowed_incompats_only();
    }
    if args.github_comment {
        options = options.with_github_comment_style();
    }

    let has_output = match args.format {
        OutputFormat::Text => {
            let out = report.report(&options);
            if args.disallowed_incompats {
                if !out.is_empty() {
                    print!("{}\n{}", DISALLOWED_HEADER, out);
                }
            } else {
                print!("{}", out);
            }
            !out.is_empty()
        }
        OutputFormat::Json => {
            let summary = report.summary(&options);
            println!("{}", serde_json::to_string_pretty(&summary)?);
            !summary.is_empty()
        }
    };

    if args.disallowed_incompats && has_output {
        tracing::debug!("Disallowed backward-incompatible changes found");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

pub fn versions(search_paths: Vec<PathBuf>, files: Vec<PathBuf>) -> anyhow::Result<ExitCode> {
    let set = YangEntryProvider::new()
        .load(&files, &search_paths)
        .context("failed to load YANG models")?;
    print!("{}", module_versions_listing(set.units().map(|u| u.info.as_ref())));
    Ok(ExitCode::SUCCESS)
}
