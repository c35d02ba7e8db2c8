use std::io::Write;

use clap::Args;

use crate::commands::context::{Context, compose_in_editor, require_text, split_list};
use crate::commands::error::{CommandError, Result};
use crate::commands::render::{CreatedReport, ItemKind};
use crate::infra::gh::{NewIssue, TrackerClient};
use crate::shared::output::{OutputArgs, Printer};

#[derive(Args, Clone, PartialEq, Eq, Debug)]
pub struct CreateArgs {
    /// Repository as owner/name (default: the origin remote of the current directory)
    #[arg(short, long)]
    pub repo: Option<String>,

    /// Issue title
    #[arg(short, long)]
    pub title: String,

    /// Issue body
    #[arg(short, long)]
    pub body: Option<String>,

    /// Labels, comma-separated or repeated
    #[arg(short = 'l', long = "labels", value_name = "LABELS")]
    pub labels: Vec<String>,

    /// Assignees, comma-separated or repeated
    #[arg(short = 'a', long = "assignees", value_name = "ASSIGNEES")]
    pub assignees: Vec<String>,

    /// Milestone name
    #[arg(short, long)]
    pub milestone: Option<String>,

    /// Write the body in $VISUAL / $EDITOR, starting from --body
    #[arg(short, long)]
    pub editor: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

pub async fn run<C: TrackerClient, W: Write>(
    args: &CreateArgs,
    ctx: &Context<C>,
    out: &mut Printer<W>,
) -> Result<()> {
    let title = require_text("--title", &args.title)?;
    let repo = ctx.resolver.resolve(args.repo.as_deref())?;
    let client = ctx.client().await?;

    let mut body = args.body.clone().unwrap_or_default();
    if args.editor {
        body = compose_in_editor(&body, "issue body")?;
    }

    let issue = NewIssue {
        title,
        body,
        labels: split_list(&args.labels),
        assignees: split_list(&args.assignees),
        milestone: args
            .milestone
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string),
    };
    tracing::debug!(%repo, title = %issue.title, "creating issue");
    let created = client
        .create_issue(&repo, &issue)
        .await
        .map_err(CommandError::from)?;

    out.emit(&CreatedReport {
        created,
        kind: ItemKind::Issue,
        repo,
    })?;
    Ok(())
}
