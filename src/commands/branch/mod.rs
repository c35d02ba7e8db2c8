mod discover;
mod engine;
mod report;

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use clap::{Args, Subcommand};

use super::error::{CommandError, Result};
use crate::shared::config::CleanupConfig;
use crate::shared::output::{OutputArgs, OutputMode, Printer};
use crate::shared::progress::Progress;
use report::CleanupReport;

#[derive(Subcommand, Clone, PartialEq, Eq, Debug)]
pub enum BranchCommands {
    /// Reset every repository under a directory to its trunk branch.
    ///
    /// Uncommitted work is stashed, every other local branch is force-deleted
    /// and the trunk is fast-forwarded from its remote. Do not run two
    /// cleanups against the same directory at once.
    Cleanup(CleanupArgs),
}

#[derive(Args, Clone, PartialEq, Eq, Debug)]
pub struct CleanupArgs {
    /// Directory containing the repositories (default: cleanup.root, else the current directory)
    pub path: Option<PathBuf>,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl BranchCommands {
    pub fn output(&self) -> &OutputArgs {
        match self {
            Self::Cleanup(args) => &args.output,
        }
    }

    pub fn run<W: Write>(&self, config: &CleanupConfig, out: &mut Printer<W>) -> Result<()> {
        match self {
            Self::Cleanup(args) => run_cleanup(args, config, out),
        }
    }
}

fn resolve_root(args: &CleanupArgs, config: &CleanupConfig) -> Result<PathBuf> {
    if let Some(path) = args.path.clone().or_else(|| config.root_path()) {
        return Ok(path);
    }
    Ok(std::env::current_dir()?)
}

fn run_cleanup<W: Write>(
    args: &CleanupArgs,
    config: &CleanupConfig,
    out: &mut Printer<W>,
) -> Result<()> {
    let root = resolve_root(args, config)?;
    if !root.is_dir() {
        return Err(CommandError::validation(
            "PATH",
            format!("{} is not a directory", root.display()),
        )
        .into());
    }

    let report = clean_all(&root, &config.trunk_branches, out.mode() == OutputMode::Human)?;
    out.emit(&report)?;
    Ok(())
}

/// Process every entry under `root` in discovery order and fold the outcomes.
fn clean_all(root: &Path, trunk_names: &[String], show_progress: bool) -> Result<CleanupReport> {
    let entries = discover::discover(root)?;
    let stash_message = format!(
        "ghk auto-stash {}",
        Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
    );
    tracing::debug!(root = %root.display(), count = entries.len(), "cleaning repositories");

    let progress = Progress::new(show_progress);
    let report = entries
        .iter()
        .enumerate()
        .map(|(index, path)| {
            progress.step(&path.display().to_string(), index, entries.len());
            let outcome = engine::clean_repository(path, trunk_names, &stash_message);
            tracing::info!(
                repo = %outcome.name,
                code = outcome.disposition.code(),
                reason = %outcome.disposition.reason(),
                "processed repository"
            );
            outcome
        })
        .collect();
    progress.finish();
    Ok(report)
}
