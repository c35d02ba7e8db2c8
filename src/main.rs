mod cli;
mod commands;
mod infra;
mod logging;
mod shared;

use std::io::{self, ErrorKind};
use std::process::ExitCode;
use std::time::Duration;

use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use commands::context::{Context, RepoResolver};
use commands::error::CommandError;
use infra::gh::GhCli;
use shared::config::{Config, load_config};
use shared::output::{Printer, Style};
use shared::table::color;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // A closed stderr leaves nowhere to report the failure.
            e.print().ok();
            return parse_error_exit(&e);
        }
    };
    logging::init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if is_broken_pipe(&err) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let Config { gh, cleanup } = load_config()?;
    let timeout = cli.timeout.map(Duration::from_secs).unwrap_or_else(|| gh.timeout());

    match cli.command {
        Commands::Issue(cmd) => {
            let ctx = Context::new(
                GhCli::from_path(timeout),
                RepoResolver::new(std::env::current_dir()?),
                gh,
            );
            cmd.run(&ctx, &mut Printer::stdout(cmd.output().mode())).await
        }
        Commands::Pr(cmd) => {
            let ctx = Context::new(
                GhCli::from_path(timeout),
                RepoResolver::new(std::env::current_dir()?),
                gh,
            );
            cmd.run(&ctx, &mut Printer::stdout(cmd.output().mode())).await
        }
        Commands::Branch(cmd) => cmd.run(&cleanup, &mut Printer::stdout(cmd.output().mode())),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "ghk", &mut io::stdout());
            Ok(())
        }
    }
}

/// Usage errors exit 1 like every other failure; help and version exit 0.
fn parse_error_exit(err: &clap::Error) -> ExitCode {
    if err.use_stderr() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn is_broken_pipe(err: &anyhow::Error) -> bool {
    err.downcast_ref::<io::Error>()
        .is_some_and(|e| e.kind() == ErrorKind::BrokenPipe)
}

/// `error: ...` plus an optional `hint: ...`, always on stderr.
fn report_error(err: &anyhow::Error) {
    let style = Style::detect_stderr();
    eprintln!("{} {err:#}", style.paint("error:", color::RED));
    if let Some(hint) = err.downcast_ref::<CommandError>().and_then(CommandError::hint) {
        eprintln!("{} {hint}", style.paint("hint:", color::YELLOW));
    }
}
