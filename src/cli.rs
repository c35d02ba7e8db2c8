use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::commands::branch::BranchCommands;
use crate::commands::issue::IssueCommands;
use crate::commands::pr::PrCommands;

#[derive(Parser, Debug)]
#[command(
    name = "ghkit",
    bin_name = "ghk",
    version,
    about,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Timeout in seconds for each gh call (default: gh.timeout_secs from the config file)
    #[arg(long, global = true, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Clone, PartialEq, Eq, Debug)]
pub enum Commands {
    /// Create, read, comment on and list issues
    #[command(subcommand)]
    Issue(IssueCommands),

    /// Create, read and comment on pull requests
    #[command(subcommand)]
    Pr(PrCommands),

    /// Local branch maintenance across many repositories
    #[command(subcommand)]
    Branch(BranchCommands),

    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}
