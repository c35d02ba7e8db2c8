use std::io::Write;

use clap::Args;

use crate::commands::context::{Context, compose_in_editor, ensure_not_blank};
use crate::commands::error::{CommandError, Result};
use crate::commands::render::{CommentReport, ItemKind};
use crate::infra::gh::TrackerClient;
use crate::shared::output::{OutputArgs, Printer};

#[derive(Args, Clone, PartialEq, Eq, Debug)]
pub struct CommentArgs {
    /// Repository as owner/name (default: the origin remote of the current directory)
    #[arg(short, long)]
    pub repo: Option<String>,

    /// Issue number
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    pub number: u64,

    /// Comment text
    #[arg(short, long, required_unless_present = "editor")]
    pub body: Option<String>,

    /// Write the comment in $VISUAL / $EDITOR, starting from --body
    #[arg(short, long)]
    pub editor: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

pub async fn run<C: TrackerClient, W: Write>(
    args: &CommentArgs,
    ctx: &Context<C>,
    out: &mut Printer<W>,
) -> Result<()> {
    let initial = args.body.as_deref().unwrap_or_default();
    if !args.editor {
        ensure_not_blank("--body", initial)?;
    }
    let repo = ctx.resolver.resolve(args.repo.as_deref())?;
    let client = ctx.client().await?;
    let body = if args.editor {
        compose_in_editor(initial, "comment")?
    } else {
        initial.to_string()
    };

    let url = client
        .comment_issue(&repo, args.number, &body)
        .await
        .map_err(CommandError::from)?;

    out.emit(&CommentReport {
        url,
        kind: ItemKind::Issue,
        number: args.number,
    })?;
    Ok(())
}
