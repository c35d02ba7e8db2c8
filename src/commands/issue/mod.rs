mod comment;
mod create;
mod list;
mod read;

use std::io::Write;

use clap::Subcommand;

use super::context::Context;
use super::error::Result;
use crate::infra::gh::TrackerClient;
use crate::shared::output::{OutputArgs, Printer};

#[derive(Subcommand, Clone, PartialEq, Eq, Debug)]
pub enum IssueCommands {
    /// Create an issue
    Create(create::CreateArgs),

    /// Show an issue with its comments
    Read(read::ReadArgs),

    /// Comment on an issue
    Comment(comment::CommentArgs),

    /// List issues in a repository, or across a user's repositories
    List(list::ListArgs),
}

impl IssueCommands {
    pub fn output(&self) -> &OutputArgs {
        match self {
            Self::Create(args) => &args.output,
            Self::Read(args) => &args.output,
            Self::Comment(args) => &args.output,
            Self::List(args) => &args.output,
        }
    }

    pub async fn run<C: TrackerClient, W: Write>(
        &self,
        ctx: &Context<C>,
        out: &mut Printer<W>,
    ) -> Result<()> {
        match self {
            Self::Create(args) => create::run(args, ctx, out).await,
            Self::Read(args) => read::run(args, ctx, out).await,
            Self::Comment(args) => comment::run(args, ctx, out).await,
            Self::List(args) => list::run(args, ctx, out).await,
        }
    }
}
