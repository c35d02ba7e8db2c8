//! `issue list`: one repository, or every repository owned by a user.

use std::io::{self, Write};

use chrono::{DateTime, Utc};
use clap::Args;
use serde::{Serialize, Serializer};

use crate::commands::context::Context;
use crate::commands::error::{CommandError, Result};
use crate::commands::render::state_cell;
use crate::infra::gh::{IssueFilter, IssueSummary, RepoId, StateFilter, TrackerClient};
use crate::shared::output::{OutputArgs, OutputMode, Printer, Render, Style};
use crate::shared::progress::Progress;
use crate::shared::table::{color, first_line, pad_or_truncate};
use crate::shared::time::format_relative_time;

const NUMBER_WIDTH: usize = 7;
const STATE_WIDTH: usize = 7;
const TITLE_WIDTH: usize = 44;

#[derive(Args, Clone, PartialEq, Eq, Debug)]
pub struct ListArgs {
    /// Repository as owner/name (default: the origin remote of the current directory)
    #[arg(short, long, conflicts_with = "user")]
    pub repo: Option<String>,

    /// List issues across every repository owned by this user or organization
    #[arg(short, long)]
    pub user: Option<String>,

    /// Issue state
    #[arg(short, long, value_enum, default_value_t = StateFilter::Open)]
    pub state: StateFilter,

    /// Maximum number of issues per repository
    #[arg(short, long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..))]
    pub limit: u32,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoIssues {
    pub repo: RepoId,
    pub issues: Vec<IssueSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListScope {
    Repo,
    User(String),
}

/// Issues grouped by repository, plus the repositories that could not be listed.
///
/// JSON is the bare issue array for a single repository and
/// `[{repo, issues}]` for a user-wide listing.
#[derive(Debug)]
pub struct ListReport {
    pub scope: ListScope,
    pub entries: Vec<RepoIssues>,
    pub failures: Vec<(RepoId, String)>,
    pub now: DateTime<Utc>,
}

impl ListReport {
    fn new(scope: ListScope) -> Self {
        Self {
            scope,
            entries: Vec::new(),
            failures: Vec::new(),
            now: Utc::now(),
        }
    }

    pub fn issue_count(&self) -> usize {
        self.entries.iter().map(|e| e.issues.len()).sum()
    }

    fn write_rows(&self, w: &mut dyn Write, style: &Style, issues: &[IssueSummary]) -> io::Result<()> {
        for issue in issues {
            let labels = if issue.labels.is_empty() {
                String::new()
            } else {
                format!(" {}", style.paint(&issue.labels.join(", "), color::YELLOW))
            };
            writeln!(
                w,
                "{} {} {} {}{}",
                pad_or_truncate(&format!("#{}", issue.number), NUMBER_WIDTH),
                state_cell(issue.state, STATE_WIDTH, style),
                pad_or_truncate(first_line(&issue.title), TITLE_WIDTH),
                style.dim(&format_relative_time(&issue.created, self.now)),
                labels
            )?;
        }
        Ok(())
    }
}

impl Serialize for ListReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.scope {
            ListScope::Repo => {
                let issues = self.entries.first().map(|e| e.issues.as_slice()).unwrap_or(&[]);
                issues.serialize(serializer)
            }
            ListScope::User(_) => self.entries.serialize(serializer),
        }
    }
}

fn count_issues(count: usize) -> String {
    format!("{count} issue{}", if count == 1 { "" } else { "s" })
}

fn count_repositories(count: usize) -> String {
    format!("{count} {}", if count == 1 { "repository" } else { "repositories" })
}

impl Render for ListReport {
    fn render_human(&self, w: &mut dyn Write, style: &Style) -> io::Result<()> {
        match &self.scope {
            ListScope::Repo => {
                let Some(entry) = self.entries.first() else {
                    return Ok(());
                };
                write!(w, "{}", style.title(&format!("Issues in {}", entry.repo)))?;
                if entry.issues.is_empty() {
                    return writeln!(w, "{}", style.dim("No issues found."));
                }
                self.write_rows(w, style, &entry.issues)
            }
            ListScope::User(user) => {
                write!(w, "{}", style.title(&format!("Issues across {user}'s repositories")))?;
                for entry in self.entries.iter().filter(|e| !e.issues.is_empty()) {
                    write!(
                        w,
                        "{}",
                        style.section(&format!("{} ({})", entry.repo, entry.issues.len()))
                    )?;
                    self.write_rows(w, style, &entry.issues)?;
                }
                writeln!(
                    w,
                    "{} in {}",
                    count_issues(self.issue_count()),
                    count_repositories(self.entries.len())
                )?;
                if !self.failures.is_empty() {
                    let failed = format!("{} failed", count_repositories(self.failures.len()));
                    writeln!(w, "{}", style.paint(&failed, color::YELLOW))?;
                }
                Ok(())
            }
        }
    }

    fn render_quiet(&self, w: &mut dyn Write) -> io::Result<()> {
        match self.scope {
            ListScope::Repo => writeln!(w, "{}", count_issues(self.issue_count())),
            ListScope::User(_) => writeln!(
                w,
                "{} in {} ({} failed)",
                count_issues(self.issue_count()),
                count_repositories(self.entries.len()),
                self.failures.len()
            ),
        }
    }
}

pub async fn run<C: TrackerClient, W: Write>(
    args: &ListArgs,
    ctx: &Context<C>,
    out: &mut Printer<W>,
) -> Result<()> {
    let filter = IssueFilter {
        state: args.state,
        limit: args.limit,
    };

    let report = match args.user.as_deref() {
        Some(user) => {
            let user = user.trim();
            if user.is_empty() {
                return Err(CommandError::validation("--user", "must not be blank").into());
            }
            list_for_user(ctx, user, &filter, out.mode()).await?
        }
        None => {
            let repo = ctx.resolver.resolve(args.repo.as_deref())?;
            let client = ctx.client().await?;
            let issues = client
                .list_issues(&repo, &filter)
                .await
                .map_err(CommandError::from)?;
            let mut report = ListReport::new(ListScope::Repo);
            report.entries.push(RepoIssues { repo, issues });
            report
        }
    };

    out.emit(&report)?;
    Ok(())
}

/// List every repository of `user` in turn, pausing between calls.
/// A repository that fails is reported on stderr and skipped.
async fn list_for_user<C: TrackerClient>(
    ctx: &Context<C>,
    user: &str,
    filter: &IssueFilter,
    mode: OutputMode,
) -> Result<ListReport> {
    let client = ctx.client().await?;
    let repos = client
        .list_user_repos(user, ctx.settings.repo_list_limit)
        .await
        .map_err(CommandError::from)?;
    tracing::debug!(user, count = repos.len(), "listing issues across repositories");

    let progress = Progress::new(mode == OutputMode::Human);
    let mut report = ListReport::new(ListScope::User(user.to_string()));
    let total = repos.len();
    for (index, repo) in repos.into_iter().enumerate() {
        if index > 0 {
            tokio::time::sleep(ctx.settings.list_delay()).await;
        }
        progress.step(&repo.to_string(), index, total);
        match client.list_issues(&repo, filter).await {
            Ok(issues) => report.entries.push(RepoIssues { repo, issues }),
            Err(e) => {
                progress.suspend(|| eprintln!("Warning: failed to list issues for {repo}: {e}"));
                report.failures.push((repo, e.to_string()));
            }
        }
    }
    progress.finish();

    if !report.failures.is_empty() {
        tracing::info!(failed = report.failures.len(), "some repositories could not be listed");
    }
    Ok(report)
}
