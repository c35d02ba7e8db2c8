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

    /// Pull request number
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
        .comment_pr(&repo, args.number, &body)
        .await
        .map_err(CommandError::from)?;

    out.emit(&CommentReport {
        url,
        kind: ItemKind::PullRequest,
        number: args.number,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::gh::{MockTrackerClient, RepoId};
    use crate::shared::output::{OutputMode, Style};
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: CommentArgs,
    }

    #[tokio::test]
    async fn quiet_prints_comment_url() {
        let ctx = Context::for_tests(MockTrackerClient::new());
        let args = TestCli::parse_from(["comment", "-r", "acme/widgets", "-n", "8", "-b", "LGTM", "--quiet"]).args;
        let mut out = Printer::new(Vec::new(), args.output.mode(), Style::decorated());

        run(&args, &ctx, &mut out).await.unwrap();

        assert_eq!(
            String::from_utf8(out.into_inner()).unwrap(),
            "https://github.com/acme/widgets/pull/8#issuecomment-1\n"
        );
        assert_eq!(
            *ctx.raw_client().calls.borrow(),
            vec!["preflight", "comment_pr acme/widgets#8"]
        );
    }

    #[tokio::test]
    async fn indented_body_keeps_its_first_line() {
        let ctx = Context::for_tests(MockTrackerClient::new());
        let body = "    fn main() {}\n";
        let args = TestCli::parse_from(["comment", "-r", "acme/widgets", "-n", "8", "-b", body]).args;
        let mut out = Printer::new(Vec::new(), OutputMode::Human, Style::plain());

        run(&args, &ctx, &mut out).await.unwrap();

        assert_eq!(
            *ctx.raw_client().comments.borrow(),
            vec![(RepoId::new("acme", "widgets"), 8, body.to_string())]
        );
    }

    #[tokio::test]
    async fn unauthenticated_client_fails_with_hint() {
        let ctx = Context::for_tests(MockTrackerClient::new().unauthenticated());
        let args = TestCli::parse_from(["comment", "-r", "acme/widgets", "-n", "8", "-b", "LGTM"]).args;
        let mut out = Printer::new(Vec::new(), OutputMode::Human, Style::plain());

        let err = run(&args, &ctx, &mut out).await.unwrap_err();

        let err = err.downcast_ref::<CommandError>().unwrap();
        assert_eq!(err.hint(), Some("Run: gh auth login"));
        assert!(ctx.raw_client().comments.borrow().is_empty());
    }
}
