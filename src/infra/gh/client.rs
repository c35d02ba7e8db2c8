//! Tracker operations backed by the GitHub CLI.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use super::error::{GhError, Result};
use super::models::{
    Comment, Created, IssueFilter, IssueSummary, ItemState, NewIssue, NewPullRequest,
    PullDetails, RepoId, Review, TrackerItem,
};
use super::runner::{GhRunner, ProcessRunner};

const ISSUE_VIEW_FIELDS: &str = "number,title,state,author,labels,assignees,body,createdAt,updatedAt,url";
const PR_VIEW_FIELDS: &str = "number,title,state,author,labels,assignees,body,createdAt,updatedAt,url,baseRefName,headRefName,isDraft,reviews";
const ISSUE_LIST_FIELDS: &str = "number,title,state,labels,createdAt";

/// Operations the commands need from the remote tracker.
///
/// One call per operation; callers decide ordering and pacing.
pub trait TrackerClient {
    /// Fail with an actionable error when the client cannot be used at all.
    async fn preflight(&self) -> Result<()>;

    async fn create_issue(&self, repo: &RepoId, issue: &NewIssue) -> Result<Created>;

    async fn view_issue(&self, repo: &RepoId, number: u64, with_comments: bool)
    -> Result<TrackerItem>;

    /// Returns the new comment's URL.
    async fn comment_issue(&self, repo: &RepoId, number: u64, body: &str) -> Result<String>;

    async fn list_issues(&self, repo: &RepoId, filter: &IssueFilter) -> Result<Vec<IssueSummary>>;

    /// Repositories owned by `user`, in the order the service returns them.
    async fn list_user_repos(&self, user: &str, limit: u32) -> Result<Vec<RepoId>>;

    async fn create_pr(&self, repo: &RepoId, pr: &NewPullRequest) -> Result<Created>;

    async fn view_pr(&self, repo: &RepoId, number: u64, with_comments: bool)
    -> Result<TrackerItem>;

    /// Returns the new comment's URL.
    async fn comment_pr(&self, repo: &RepoId, number: u64, body: &str) -> Result<String>;
}

/// Production client: shells out to `gh`.
pub struct GhCli<R: GhRunner = ProcessRunner> {
    runner: R,
    program: Option<PathBuf>,
}

impl GhCli<ProcessRunner> {
    /// Locate `gh` on PATH. A missing binary is reported by [`TrackerClient::preflight`].
    pub fn from_path(timeout: Duration) -> Self {
        let program = find_command_path("gh");
        let runner = ProcessRunner::new(program.clone().unwrap_or_else(|| "gh".into()), timeout);
        Self { runner, program }
    }
}

impl<R: GhRunner> GhCli<R> {
    #[cfg(test)]
    pub fn with_runner(runner: R) -> Self {
        Self {
            runner,
            program: Some(PathBuf::from("gh")),
        }
    }

    #[cfg(test)]
    pub fn runner(&self) -> &R {
        &self.runner
    }

    async fn run(&self, args: Vec<String>) -> Result<String> {
        let output = self.runner.run(&args).await?;
        output.into_stdout(&args)
    }

    async fn run_json<T: serde::de::DeserializeOwned>(&self, args: Vec<String>) -> Result<T> {
        let stdout = self.run(args).await?;
        Ok(serde_json::from_str(&stdout)?)
    }

    /// `gh <kind> create` prints the new URL as its last stdout line.
    async fn run_create(&self, args: Vec<String>) -> Result<Created> {
        let stdout = self.run(args).await?;
        let url = last_url(&stdout).ok_or(GhError::MissingUrl)?;
        Created::from_url(url)
    }

    async fn run_comment(&self, kind: &str, repo: &RepoId, number: u64, body: &str) -> Result<String> {
        let args = strings([
            kind,
            "comment",
            &number.to_string(),
            "--repo",
            &repo.to_string(),
            "--body",
            body,
        ]);
        let stdout = self.run(args).await?;
        last_url(&stdout)
            .map(str::to_string)
            .ok_or(GhError::MissingUrl)
    }

    async fn run_view(
        &self,
        kind: &str,
        fields: &str,
        repo: &RepoId,
        number: u64,
        with_comments: bool,
    ) -> Result<ViewPayload> {
        let fields = if with_comments {
            format!("{fields},comments")
        } else {
            fields.to_string()
        };
        self.run_json(strings([
            kind,
            "view",
            &number.to_string(),
            "--repo",
            &repo.to_string(),
            "--json",
            &fields,
        ]))
        .await
    }
}

impl<R: GhRunner> TrackerClient for GhCli<R> {
    async fn preflight(&self) -> Result<()> {
        if self.program.is_none() {
            return Err(GhError::NotInstalled);
        }
        let output = self.runner.run(&strings(["auth", "status"])).await?;
        if output.success {
            Ok(())
        } else {
            let detail = first_non_empty_line(&output.stderr)
                .or_else(|| first_non_empty_line(&output.stdout))
                .unwrap_or("not logged in");
            Err(GhError::NotAuthenticated(detail.to_string()))
        }
    }

    async fn create_issue(&self, repo: &RepoId, issue: &NewIssue) -> Result<Created> {
        let mut args = strings([
            "issue",
            "create",
            "--repo",
            &repo.to_string(),
            "--title",
            &issue.title,
            "--body",
            &issue.body,
        ]);
        push_repeated(&mut args, "--label", &issue.labels);
        push_repeated(&mut args, "--assignee", &issue.assignees);
        if let Some(milestone) = &issue.milestone {
            args.extend(strings(["--milestone", milestone]));
        }
        self.run_create(args).await
    }

    async fn view_issue(
        &self,
        repo: &RepoId,
        number: u64,
        with_comments: bool,
    ) -> Result<TrackerItem> {
        let payload = self
            .run_view("issue", ISSUE_VIEW_FIELDS, repo, number, with_comments)
            .await?;
        Ok(payload.into_item(false))
    }

    async fn comment_issue(&self, repo: &RepoId, number: u64, body: &str) -> Result<String> {
        self.run_comment("issue", repo, number, body).await
    }

    async fn list_issues(&self, repo: &RepoId, filter: &IssueFilter) -> Result<Vec<IssueSummary>> {
        let rows: Vec<ListPayload> = self
            .run_json(strings([
                "issue",
                "list",
                "--repo",
                &repo.to_string(),
                "--state",
                filter.state.as_gh_arg(),
                "--limit",
                &filter.limit.to_string(),
                "--json",
                ISSUE_LIST_FIELDS,
            ]))
            .await?;
        Ok(rows.into_iter().map(ListPayload::into_summary).collect())
    }

    async fn list_user_repos(&self, user: &str, limit: u32) -> Result<Vec<RepoId>> {
        let rows: Vec<RepoPayload> = self
            .run_json(strings([
                "repo",
                "list",
                user,
                "--limit",
                &limit.to_string(),
                "--json",
                "nameWithOwner",
            ]))
            .await?;
        // Skip anything gh returns that is not owner/name rather than failing the run.
        Ok(rows
            .into_iter()
            .filter_map(|r| r.name_with_owner.parse().ok())
            .collect())
    }

    async fn create_pr(&self, repo: &RepoId, pr: &NewPullRequest) -> Result<Created> {
        let mut args = strings([
            "pr",
            "create",
            "--repo",
            &repo.to_string(),
            "--title",
            &pr.title,
            "--body",
            &pr.body,
        ]);
        if let Some(base) = &pr.base {
            args.extend(strings(["--base", base]));
        }
        if let Some(head) = &pr.head {
            args.extend(strings(["--head", head]));
        }
        push_repeated(&mut args, "--label", &pr.labels);
        push_repeated(&mut args, "--reviewer", &pr.reviewers);
        if pr.draft {
            args.push("--draft".to_string());
        }
        self.run_create(args).await
    }

    async fn view_pr(&self, repo: &RepoId, number: u64, with_comments: bool) -> Result<TrackerItem> {
        let payload = self
            .run_view("pr", PR_VIEW_FIELDS, repo, number, with_comments)
            .await?;
        Ok(payload.into_item(true))
    }

    async fn comment_pr(&self, repo: &RepoId, number: u64, body: &str) -> Result<String> {
        self.run_comment("pr", repo, number, body).await
    }
}

fn strings<const N: usize>(items: [&str; N]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn push_repeated(args: &mut Vec<String>, flag: &str, values: &[String]) {
    for value in values {
        args.push(flag.to_string());
        args.push(value.clone());
    }
}

fn first_non_empty_line(text: &str) -> Option<&str> {
    text.lines().map(str::trim).find(|l| !l.is_empty())
}

/// Last stdout line that looks like a URL. gh may print progress text before it.
fn last_url(stdout: &str) -> Option<&str> {
    stdout
        .lines()
        .map(str::trim)
        .rev()
        .find(|l| l.starts_with("http://") || l.starts_with("https://"))
}

/// Find an executable on PATH.
pub fn find_command_path(cmd: &str) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(cmd))
        .find(|path| is_executable(path))
}

#[cfg(unix)]
fn is_executable(path: &std::path::Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.is_file()
        && path
            .metadata()
            .map(|m| m.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &std::path::Path) -> bool {
    path.is_file()
}

// ---------------------------------------------------------------------------
// gh --json payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
struct Login {
    #[serde(default)]
    login: String,
}

#[derive(Debug, Deserialize)]
struct Named {
    name: String,
}

fn login_or_ghost(author: Option<Login>) -> String {
    author
        .map(|a| a.login)
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| "ghost".to_string())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentPayload {
    author: Option<Login>,
    #[serde(default)]
    body: String,
    #[serde(default)]
    created_at: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewPayload {
    author: Option<Login>,
    #[serde(default)]
    body: String,
    #[serde(default)]
    state: String,
    #[serde(default)]
    submitted_at: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ViewPayload {
    number: u64,
    title: String,
    state: String,
    author: Option<Login>,
    #[serde(default)]
    labels: Vec<Named>,
    #[serde(default)]
    assignees: Vec<Login>,
    body: Option<String>,
    #[serde(default)]
    created_at: String,
    #[serde(default)]
    updated_at: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    comments: Vec<CommentPayload>,
    #[serde(default)]
    base_ref_name: String,
    #[serde(default)]
    head_ref_name: String,
    #[serde(default)]
    is_draft: bool,
    #[serde(default)]
    reviews: Vec<ReviewPayload>,
}

impl ViewPayload {
    fn into_item(self, is_pull: bool) -> TrackerItem {
        let mut comments: Vec<Comment> = self
            .comments
            .into_iter()
            .map(|c| Comment {
                author: login_or_ghost(c.author),
                created: c.created_at,
                body: c.body,
            })
            .collect();
        // RFC 3339 UTC timestamps from gh sort correctly as strings.
        comments.sort_by(|a, b| a.created.cmp(&b.created));

        let pull = is_pull.then(|| PullDetails {
            base: self.base_ref_name,
            head: self.head_ref_name,
            draft: self.is_draft,
            reviews: self
                .reviews
                .into_iter()
                .map(|r| Review {
                    author: login_or_ghost(r.author),
                    state: r.state,
                    body: r.body,
                    submitted: r.submitted_at.unwrap_or_default(),
                })
                .collect(),
        });

        TrackerItem {
            number: self.number,
            title: self.title,
            state: ItemState::from_gh(&self.state),
            author: login_or_ghost(self.author),
            labels: self.labels.into_iter().map(|l| l.name).collect(),
            assignees: self.assignees.into_iter().map(|a| a.login).collect(),
            body: self.body.unwrap_or_default(),
            created: self.created_at,
            updated: self.updated_at,
            url: self.url,
            comments,
            pull,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListPayload {
    number: u64,
    title: String,
    state: String,
    #[serde(default)]
    labels: Vec<Named>,
    #[serde(default)]
    created_at: String,
}

impl ListPayload {
    fn into_summary(self) -> IssueSummary {
        IssueSummary {
            number: self.number,
            title: self.title,
            state: ItemState::from_gh(&self.state),
            labels: self.labels.into_iter().map(|l| l.name).collect(),
            created: self.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepoPayload {
    name_with_owner: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::gh::runner::GhOutput;
    use crate::infra::gh::StateFilter;
    use indoc::indoc;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Records arguments and replays queued outputs in order.
    #[derive(Default)]
    struct FakeRunner {
        calls: RefCell<Vec<Vec<String>>>,
        outputs: RefCell<VecDeque<GhOutput>>,
    }

    impl FakeRunner {
        fn replying(outputs: impl IntoIterator<Item = GhOutput>) -> Self {
            Self {
                calls: RefCell::default(),
                outputs: RefCell::new(outputs.into_iter().collect()),
            }
        }

        fn calls(&self) -> Vec<Vec<String>> {
            self.calls.borrow().clone()
        }
    }

    impl GhRunner for FakeRunner {
        async fn run(&self, args: &[String]) -> Result<GhOutput> {
            self.calls.borrow_mut().push(args.to_vec());
            Ok(self.outputs.borrow_mut().pop_front().unwrap_or(GhOutput {
                success: true,
                ..GhOutput::default()
            }))
        }
    }

    fn ok(stdout: &str) -> GhOutput {
        GhOutput {
            success: true,
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    fn failed(stderr: &str) -> GhOutput {
        GhOutput {
            success: false,
            stdout: String::new(),
            stderr: stderr.to_string(),
        }
    }

    fn repo() -> RepoId {
        RepoId::new("owner", "repo2")
    }

    #[tokio::test]
    async fn preflight_reports_missing_binary() {
        let client = GhCli {
            runner: FakeRunner::default(),
            program: None,
        };
        assert!(matches!(client.preflight().await, Err(GhError::NotInstalled)));
        assert!(client.runner().calls().is_empty());
    }

    #[tokio::test]
    async fn preflight_reports_unauthenticated() {
        let client = GhCli::with_runner(FakeRunner::replying([failed(
            "\nYou are not logged into any GitHub hosts. To log in, run: gh auth login\n",
        )]));
        let err = client.preflight().await.unwrap_err();
        assert!(matches!(err, GhError::NotAuthenticated(ref m) if m.starts_with("You are not logged")));
        assert_eq!(client.runner().calls(), vec![strings(["auth", "status"])]);
    }

    #[tokio::test]
    async fn create_issue_builds_args_and_parses_number() {
        let client = GhCli::with_runner(FakeRunner::replying([ok(
            "https://github.com/owner/repo2/issues/42\n",
        )]));
        let issue = NewIssue {
            title: "Crash on start".to_string(),
            body: "Steps...".to_string(),
            labels: vec!["bug".to_string(), "p1".to_string()],
            assignees: vec!["alice".to_string()],
            milestone: Some("v1".to_string()),
        };

        let created = client.create_issue(&repo(), &issue).await.unwrap();

        assert_eq!(created.number, 42);
        assert_eq!(created.url, "https://github.com/owner/repo2/issues/42");
        assert_eq!(
            client.runner().calls()[0],
            strings([
                "issue", "create", "--repo", "owner/repo2", "--title", "Crash on start",
                "--body", "Steps...", "--label", "bug", "--label", "p1", "--assignee", "alice",
                "--milestone", "v1",
            ])
        );
    }

    #[tokio::test]
    async fn create_pr_passes_optional_flags() {
        let client = GhCli::with_runner(FakeRunner::replying([ok(indoc! {"
            Warning: 1 uncommitted change
            https://github.com/owner/repo2/pull/8
        "})]));
        let pr = NewPullRequest {
            title: "Add feature".to_string(),
            body: String::new(),
            base: Some("main".to_string()),
            head: Some("feature".to_string()),
            labels: vec![],
            reviewers: vec!["bob".to_string()],
            draft: true,
        };

        let created = client.create_pr(&repo(), &pr).await.unwrap();

        assert_eq!(created.number, 8);
        assert_eq!(
            client.runner().calls()[0],
            strings([
                "pr", "create", "--repo", "owner/repo2", "--title", "Add feature", "--body", "",
                "--base", "main", "--head", "feature", "--reviewer", "bob", "--draft",
            ])
        );
    }

    #[tokio::test]
    async fn create_without_url_is_an_error() {
        let client = GhCli::with_runner(FakeRunner::replying([ok("\n")]));
        let err = client
            .create_issue(&repo(), &NewIssue::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GhError::MissingUrl));
    }

    #[tokio::test]
    async fn remote_failure_preserves_gh_error_text() {
        let client = GhCli::with_runner(FakeRunner::replying([failed(
            "GraphQL: Could not resolve to a Repository with the name 'owner/repo2'.\n",
        )]));
        let err = client.view_issue(&repo(), 1, true).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "gh issue view failed: GraphQL: Could not resolve to a Repository with the name 'owner/repo2'."
        );
    }

    #[tokio::test]
    async fn view_issue_sorts_comments_and_fills_defaults() {
        let json = r#"{
            "number": 3,
            "title": "Docs typo",
            "state": "OPEN",
            "author": {"login": "alice", "name": ""},
            "labels": [{"name": "docs", "color": "0075ca"}],
            "assignees": [],
            "body": null,
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-03T00:00:00Z",
            "url": "https://github.com/owner/repo2/issues/3",
            "comments": [
                {"author": {"login": "bob"}, "body": "second", "createdAt": "2024-01-02T12:00:00Z"},
                {"author": null, "body": "first", "createdAt": "2024-01-02T08:00:00Z"}
            ]
        }"#;
        let client = GhCli::with_runner(FakeRunner::replying([ok(json)]));

        let item = client.view_issue(&repo(), 3, true).await.unwrap();

        assert_eq!(item.state, ItemState::Open);
        assert_eq!(item.body, "");
        assert_eq!(item.labels, vec!["docs"]);
        assert_eq!(
            item.comments,
            vec![
                Comment {
                    author: "ghost".to_string(),
                    created: "2024-01-02T08:00:00Z".to_string(),
                    body: "first".to_string(),
                },
                Comment {
                    author: "bob".to_string(),
                    created: "2024-01-02T12:00:00Z".to_string(),
                    body: "second".to_string(),
                },
            ]
        );
        assert!(item.pull.is_none());
        let args = &client.runner().calls()[0];
        assert_eq!(args.last().unwrap(), &format!("{ISSUE_VIEW_FIELDS},comments"));
    }

    #[tokio::test]
    async fn view_issue_without_comments_does_not_request_them() {
        let json = r#"{"number": 3, "title": "t", "state": "CLOSED", "author": {"login": "a"},
            "labels": [], "assignees": [], "body": "b", "createdAt": "", "updatedAt": "", "url": ""}"#;
        let client = GhCli::with_runner(FakeRunner::replying([ok(json)]));

        let item = client.view_issue(&repo(), 3, false).await.unwrap();

        assert!(item.comments.is_empty());
        assert_eq!(item.state, ItemState::Closed);
        assert_eq!(client.runner().calls()[0].last().unwrap(), ISSUE_VIEW_FIELDS);
    }

    #[tokio::test]
    async fn view_pr_includes_reviews() {
        let json = r#"{
            "number": 8, "title": "Add feature", "state": "MERGED",
            "author": {"login": "alice"}, "labels": [], "assignees": [{"login": "carol"}],
            "body": "desc", "createdAt": "2024-01-01T00:00:00Z", "updatedAt": "2024-01-02T00:00:00Z",
            "url": "https://github.com/owner/repo2/pull/8",
            "baseRefName": "main", "headRefName": "feature", "isDraft": false,
            "reviews": [{"author": {"login": "bob"}, "state": "APPROVED", "body": "", "submittedAt": "2024-01-01T10:00:00Z"}],
            "comments": []
        }"#;
        let client = GhCli::with_runner(FakeRunner::replying([ok(json)]));

        let item = client.view_pr(&repo(), 8, true).await.unwrap();

        assert_eq!(item.state, ItemState::Merged);
        assert_eq!(item.assignees, vec!["carol"]);
        let pull = item.pull.unwrap();
        assert_eq!(pull.base, "main");
        assert_eq!(pull.head, "feature");
        assert_eq!(
            pull.reviews,
            vec![Review {
                author: "bob".to_string(),
                state: "APPROVED".to_string(),
                body: String::new(),
                submitted: "2024-01-01T10:00:00Z".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn list_issues_maps_rows() {
        let json = r#"[{"number": 5, "title": "Bug", "state": "OPEN",
            "labels": [{"name": "bug"}], "createdAt": "2024-02-01T00:00:00Z"}]"#;
        let client = GhCli::with_runner(FakeRunner::replying([ok(json)]));
        let filter = IssueFilter {
            state: StateFilter::All,
            limit: 10,
        };

        let rows = client.list_issues(&repo(), &filter).await.unwrap();

        assert_eq!(
            rows,
            vec![IssueSummary {
                number: 5,
                title: "Bug".to_string(),
                state: ItemState::Open,
                labels: vec!["bug".to_string()],
                created: "2024-02-01T00:00:00Z".to_string(),
            }]
        );
        assert_eq!(
            client.runner().calls()[0],
            strings([
                "issue", "list", "--repo", "owner/repo2", "--state", "all", "--limit", "10",
                "--json", ISSUE_LIST_FIELDS,
            ])
        );
    }

    #[tokio::test]
    async fn list_user_repos_skips_malformed_names() {
        let json = r#"[{"nameWithOwner": "alice/one"}, {"nameWithOwner": "broken"}, {"nameWithOwner": "alice/two"}]"#;
        let client = GhCli::with_runner(FakeRunner::replying([ok(json)]));

        let repos = client.list_user_repos("alice", 100).await.unwrap();

        assert_eq!(repos, vec![RepoId::new("alice", "one"), RepoId::new("alice", "two")]);
    }

    #[tokio::test]
    async fn comment_returns_url() {
        let client = GhCli::with_runner(FakeRunner::replying([ok(
            "https://github.com/owner/repo2/issues/3#issuecomment-99\n",
        )]));

        let url = client.comment_issue(&repo(), 3, "Thanks!").await.unwrap();

        assert_eq!(url, "https://github.com/owner/repo2/issues/3#issuecomment-99");
        assert_eq!(
            client.runner().calls()[0],
            strings(["issue", "comment", "3", "--repo", "owner/repo2", "--body", "Thanks!"])
        );
    }

    #[test]
    fn find_command_path_for_missing_command() {
        assert!(find_command_path("definitely-not-a-real-command-12345").is_none());
    }
}
