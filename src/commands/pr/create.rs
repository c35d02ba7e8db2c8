use std::io::Write;

use clap::Args;

use crate::commands::context::{Context, compose_in_editor, require_text, split_list};
use crate::commands::error::{CommandError, Result};
use crate::commands::render::{CreatedReport, ItemKind};
use crate::infra::gh::{NewPullRequest, TrackerClient};
use crate::shared::output::{OutputArgs, Printer};

#[derive(Args, Clone, PartialEq, Eq, Debug)]
pub struct CreateArgs {
    /// Repository as owner/name (default: the origin remote of the current directory)
    #[arg(short, long)]
    pub repo: Option<String>,

    /// Pull request title
    #[arg(short, long)]
    pub title: String,

    /// Pull request body
    #[arg(short, long)]
    pub body: Option<String>,

    /// Branch to merge into (default: the repository's default branch)
    #[arg(short = 'B', long)]
    pub base: Option<String>,

    /// Branch containing the changes (default: the current branch)
    #[arg(short = 'H', long)]
    pub head: Option<String>,

    /// Labels, comma-separated or repeated
    #[arg(short = 'l', long = "labels", value_name = "LABELS")]
    pub labels: Vec<String>,

    /// Reviewers, comma-separated or repeated
    #[arg(short = 'v', long = "reviewers", value_name = "REVIEWERS")]
    pub reviewers: Vec<String>,

    /// Open as a draft
    #[arg(short, long)]
    pub draft: bool,

    /// Write the body in $VISUAL / $EDITOR, starting from --body
    #[arg(short, long)]
    pub editor: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub async fn run<C: TrackerClient, W: Write>(
    args: &CreateArgs,
    ctx: &Context<C>,
    out: &mut Printer<W>,
) -> Result<()> {
    let title = require_text("--title", &args.title)?;
    let repo = ctx.resolver.resolve(args.repo.as_deref())?;
    let head = non_blank(args.head.as_deref()).or_else(|| {
        ctx.resolver
            .current_branch()
            .inspect_err(|e| tracing::debug!(error = %e, "leaving --head to gh"))
            .ok()
    });
    let client = ctx.client().await?;

    let mut body = args.body.clone().unwrap_or_default();
    if args.editor {
        body = compose_in_editor(&body, "pull request body")?;
    }

    let pr = NewPullRequest {
        title,
        body,
        base: non_blank(args.base.as_deref()),
        head,
        labels: split_list(&args.labels),
        reviewers: split_list(&args.reviewers),
        draft: args.draft,
    };
    tracing::debug!(%repo, head = ?pr.head, base = ?pr.base, "creating pull request");
    let created = client
        .create_pr(&repo, &pr)
        .await
        .map_err(CommandError::from)?;

    out.emit(&CreatedReport {
        created,
        kind: ItemKind::PullRequest,
        repo,
    })?;
    Ok(())
}
