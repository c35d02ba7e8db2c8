use std::io::Write;

use chrono::Utc;
use clap::Args;

use crate::commands::context::Context;
use crate::commands::error::{CommandError, Result};
use crate::commands::render::ItemReport;
use crate::infra::gh::TrackerClient;
use crate::shared::output::{OutputArgs, Printer};

#[derive(Args, Clone, PartialEq, Eq, Debug)]
pub struct ReadArgs {
    /// Repository as owner/name (default: the origin remote of the current directory)
    #[arg(short, long)]
    pub repo: Option<String>,

    /// Pull request number
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    pub number: u64,

    /// Do not fetch comments
    #[arg(long)]
    pub no_comments: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

pub async fn run<C: TrackerClient, W: Write>(
    args: &ReadArgs,
    ctx: &Context<C>,
    out: &mut Printer<W>,
) -> Result<()> {
    let repo = ctx.resolver.resolve(args.repo.as_deref())?;
    let client = ctx.client().await?;

    let item = client
        .view_pr(&repo, args.number, !args.no_comments)
        .await
        .map_err(CommandError::from)?;

    out.emit(&ItemReport {
        item,
        comments_requested: !args.no_comments,
        now: Utc::now(),
    })?;
    Ok(())
}
