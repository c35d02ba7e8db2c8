//! State shared by the issue and pr commands for one invocation.

use std::cell::{Cell, OnceCell};
use std::path::PathBuf;

use super::error::CommandError;
use crate::infra::gh::{RepoId, TrackerClient};
use crate::infra::git;
use crate::shared::config::GhConfig;
use crate::shared::editor;

/// Determines the target repository: `--repo` when given, else the `origin`
/// remote of the working copy. The working-copy lookup runs at most once.
pub struct RepoResolver {
    cwd: PathBuf,
    detected: OnceCell<RepoId>,
}

impl RepoResolver {
    pub fn new(cwd: PathBuf) -> Self {
        Self {
            cwd,
            detected: OnceCell::new(),
        }
    }

    pub fn resolve(&self, explicit: Option<&str>) -> Result<RepoId, CommandError> {
        if let Some(repo) = explicit {
            return repo
                .parse()
                .map_err(|e| CommandError::validation("--repo", e));
        }
        if let Some(repo) = self.detected.get() {
            return Ok(repo.clone());
        }

        let repo = git::open_repo_at(&self.cwd)
            .and_then(|r| git::github_repo_id(&r))
            .map_err(|e| CommandError::Resolution(e.to_string()))?;
        tracing::debug!(%repo, cwd = %self.cwd.display(), "detected repository from origin");
        Ok(self.detected.get_or_init(|| repo).clone())
    }

    /// Branch checked out in the working copy.
    pub fn current_branch(&self) -> Result<String, CommandError> {
        git::open_repo_at(&self.cwd)
            .and_then(|r| git::current_branch(&r))
            .map_err(|e| CommandError::Resolution(format!("no current branch for --head: {e}")))
    }
}

pub struct Context<C> {
    client: C,
    pub resolver: RepoResolver,
    pub settings: GhConfig,
    preflight_done: Cell<bool>,
}

impl<C: TrackerClient> Context<C> {
    pub fn new(client: C, resolver: RepoResolver, settings: GhConfig) -> Self {
        Self {
            client,
            resolver,
            settings,
            preflight_done: Cell::new(false),
        }
    }

    /// The client, after its preconditions have been checked once.
    pub async fn client(&self) -> Result<&C, CommandError> {
        if !self.preflight_done.get() {
            self.client.preflight().await?;
            self.preflight_done.set(true);
        }
        Ok(&self.client)
    }

    /// A context whose working-copy detection always fails and whose list
    /// delay is zero.
    #[cfg(test)]
    pub fn for_tests(client: C) -> Self {
        Self::new(
            client,
            RepoResolver::new(PathBuf::from("/nonexistent/ghk-test")),
            GhConfig {
                list_delay_ms: 0,
                ..GhConfig::default()
            },
        )
    }

    #[cfg(test)]
    pub fn raw_client(&self) -> &C {
        &self.client
    }
}

/// Reject empty or whitespace-only values for `flag`.
pub fn ensure_not_blank(flag: &str, value: &str) -> Result<(), CommandError> {
    if value.trim().is_empty() {
        return Err(CommandError::validation(flag, "must not be blank"));
    }
    Ok(())
}

/// A single-line value such as a title, with surrounding whitespace removed.
pub fn require_text(flag: &str, value: &str) -> Result<String, CommandError> {
    ensure_not_blank(flag, value)?;
    Ok(value.trim().to_string())
}

/// Open the editor on `initial`; an empty result is a validation error.
pub fn compose_in_editor(initial: &str, what: &str) -> anyhow::Result<String> {
    let text = editor::compose(initial, ".md")?;
    if text.trim().is_empty() {
        return Err(CommandError::validation("--editor", format!("the {what} is empty")).into());
    }
    Ok(text)
}

/// Flatten repeated, comma-separated values (`-l a,b -l c`) into a list.
pub fn split_list(values: &[String]) -> Vec<String> {
    values
        .iter()
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}
