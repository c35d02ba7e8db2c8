mod comment;
mod create;
mod read;

use std::io::Write;

use clap::Subcommand;

use super::context::Context;
use super::error::Result;
use crate::infra::gh::TrackerClient;
use crate::shared::output::{OutputArgs, Printer};

#[derive(Subcommand, Clone, PartialEq, Eq, Debug)]
pub enum PrCommands {
    /// Open a pull request
    Create(create::CreateArgs),

    /// Show a pull request with its reviews and comments
    Read(read::ReadArgs),

    /// Comment on a pull request
    Comment(comment::CommentArgs),
}

impl PrCommands {
    pub fn output(&self) -> &OutputArgs {
        match self {
            Self::Create(args) => &args.output,
            Self::Read(args) => &args.output,
            Self::Comment(args) => &args.output,
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
        }
    }
}
