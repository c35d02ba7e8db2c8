//! Cleanup outcomes and the report folded from them.

use std::io::{self, Write};
use std::path::PathBuf;

use serde::Serialize;

use crate::infra::git::BranchDeletion;
use crate::shared::output::{Render, Style};
use crate::shared::table::{color, pad_or_truncate};

const NAME_WIDTH: usize = 24;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NotADirectory,
    NotARepository,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    NoTrunkBranch { tried: Vec<String> },
    StashFailed(String),
    CheckoutFailed(String),
    PullFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    Succeeded,
    Failed(FailureReason),
    Skipped(SkipReason),
}

impl Disposition {
    /// Stable machine-readable code; empty for success.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Succeeded => "",
            Self::Failed(FailureReason::NoTrunkBranch { .. }) => "no_trunk_branch",
            Self::Failed(FailureReason::StashFailed(_)) => "stash_failed",
            Self::Failed(FailureReason::CheckoutFailed(_)) => "checkout_failed",
            Self::Failed(FailureReason::PullFailed(_)) => "pull_failed",
            Self::Skipped(SkipReason::NotADirectory) => "not_a_directory",
            Self::Skipped(SkipReason::NotARepository) => "not_a_repository",
        }
    }

    pub fn reason(&self) -> String {
        match self {
            Self::Succeeded => String::new(),
            Self::Failed(FailureReason::NoTrunkBranch { tried }) => {
                format!("no trunk branch (tried {})", tried.join(", "))
            }
            Self::Failed(FailureReason::StashFailed(e)) => format!("stash failed: {e}"),
            Self::Failed(FailureReason::CheckoutFailed(e)) => format!("checkout failed: {e}"),
            Self::Failed(FailureReason::PullFailed(e)) => format!("pull failed: {e}"),
            Self::Skipped(SkipReason::NotADirectory) => "not a directory".to_string(),
            Self::Skipped(SkipReason::NotARepository) => "not a git repository".to_string(),
        }
    }
}

/// What happened to one discovered entry. Never changed once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupOutcome {
    pub name: String,
    pub path: PathBuf,
    pub disposition: Disposition,
    pub trunk: Option<String>,
    pub stashed: bool,
    pub deletions: Vec<BranchDeletion>,
}

impl CleanupOutcome {
    pub fn new(name: String, path: PathBuf) -> Self {
        Self {
            name,
            path,
            disposition: Disposition::Succeeded,
            trunk: None,
            stashed: false,
            deletions: Vec::new(),
        }
    }

    pub fn deleted(&self) -> impl Iterator<Item = &str> {
        self.deletions.iter().filter_map(|d| match d {
            BranchDeletion::Deleted { branch } => Some(branch.as_str()),
            BranchDeletion::DeletionFailed { .. } => None,
        })
    }
}

#[derive(Serialize)]
struct NotDeleted<'a> {
    branch: &'a str,
    reason: &'a str,
}

impl Serialize for CleanupOutcome {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let not_deleted: Vec<NotDeleted<'_>> = self
            .deletions
            .iter()
            .filter_map(|d| match d {
                BranchDeletion::DeletionFailed { branch, reason } => Some(NotDeleted { branch, reason }),
                BranchDeletion::Deleted { .. } => None,
            })
            .collect();

        let mut s = serializer.serialize_struct("CleanupOutcome", 8)?;
        s.serialize_field("name", &self.name)?;
        s.serialize_field("path", &self.path.display().to_string())?;
        s.serialize_field("code", self.disposition.code())?;
        s.serialize_field("reason", &self.disposition.reason())?;
        s.serialize_field("trunk", self.trunk.as_deref().unwrap_or(""))?;
        s.serialize_field("stashed", &self.stashed)?;
        s.serialize_field("deleted", &self.deleted().collect::<Vec<_>>())?;
        s.serialize_field("not_deleted", &not_deleted)?;
        s.end()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub success: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Three append-only lists in processing order.
#[derive(Debug, Default, Serialize)]
pub struct CleanupReport {
    pub success: Vec<CleanupOutcome>,
    pub failed: Vec<CleanupOutcome>,
    pub skipped: Vec<CleanupOutcome>,
    pub counts: Counts,
}

impl CleanupReport {
    /// Fold step: file `outcome` under its disposition.
    pub fn record(mut self, outcome: CleanupOutcome) -> Self {
        match outcome.disposition {
            Disposition::Succeeded => {
                self.counts.success += 1;
                self.success.push(outcome);
            }
            Disposition::Failed(_) => {
                self.counts.failed += 1;
                self.failed.push(outcome);
            }
            Disposition::Skipped(_) => {
                self.counts.skipped += 1;
                self.skipped.push(outcome);
            }
        }
        self
    }

    fn summary(&self) -> String {
        format!(
            "{} cleaned, {} failed, {} skipped",
            self.counts.success, self.counts.failed, self.counts.skipped
        )
    }
}

impl FromIterator<CleanupOutcome> for CleanupReport {
    fn from_iter<I: IntoIterator<Item = CleanupOutcome>>(iter: I) -> Self {
        iter.into_iter().fold(Self::default(), Self::record)
    }
}

fn success_detail(outcome: &CleanupOutcome) -> String {
    let mut parts = vec![outcome.trunk.clone().unwrap_or_default()];
    if outcome.stashed {
        parts.push("stashed".to_string());
    }
    let deleted = outcome.deleted().count();
    if deleted > 0 {
        parts.push(format!(
            "{deleted} branch{} deleted",
            if deleted == 1 { "" } else { "es" }
        ));
    }
    let kept = outcome.deletions.len() - deleted;
    if kept > 0 {
        parts.push(format!("{kept} not deleted"));
    }
    parts.join(", ")
}

impl Render for CleanupReport {
    fn render_human(&self, w: &mut dyn Write, style: &Style) -> io::Result<()> {
        write!(w, "{}", style.title("Branch cleanup"))?;

        if !self.success.is_empty() {
            write!(w, "{}", style.section(&format!("Cleaned ({})", self.counts.success)))?;
            for outcome in &self.success {
                writeln!(
                    w,
                    "{} {} {}",
                    style.ok_mark(),
                    pad_or_truncate(&outcome.name, NAME_WIDTH),
                    success_detail(outcome)
                )?;
            }
        }
        if !self.failed.is_empty() {
            write!(w, "{}", style.section(&format!("Failed ({})", self.counts.failed)))?;
            for outcome in &self.failed {
                writeln!(
                    w,
                    "{} {} {}",
                    style.paint("✗", color::RED),
                    pad_or_truncate(&outcome.name, NAME_WIDTH),
                    outcome.disposition.reason()
                )?;
            }
        }
        if !self.skipped.is_empty() {
            write!(w, "{}", style.section(&format!("Skipped ({})", self.counts.skipped)))?;
            for outcome in &self.skipped {
                writeln!(
                    w,
                    "{} {} {}",
                    style.dim("-"),
                    pad_or_truncate(&outcome.name, NAME_WIDTH),
                    style.dim(&outcome.disposition.reason())
                )?;
            }
        }
        writeln!(w, "{}", self.summary())
    }

    fn render_quiet(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "{}", self.summary())
    }
}
