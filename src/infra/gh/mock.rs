//! In-memory [`TrackerClient`] for command tests.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use super::client::TrackerClient;
use super::error::{GhError, Result};
use super::models::{
    Created, IssueFilter, IssueSummary, ItemState, NewIssue, NewPullRequest, RepoId, TrackerItem,
};

#[derive(Default)]
pub struct MockTrackerClient {
    unauthenticated: bool,
    items: HashMap<(RepoId, u64), TrackerItem>,
    issues: HashMap<RepoId, Vec<IssueSummary>>,
    failing: HashSet<RepoId>,
    user_repos: Vec<RepoId>,
    next_number: u64,
    /// Every remote operation in call order, e.g. "list_issues owner/repo".
    pub calls: RefCell<Vec<String>>,
    pub created_issues: RefCell<Vec<NewIssue>>,
    pub created_prs: RefCell<Vec<NewPullRequest>>,
    pub comments: RefCell<Vec<(RepoId, u64, String)>>,
}

impl MockTrackerClient {
    pub fn new() -> Self {
        Self {
            next_number: 1,
            ..Self::default()
        }
    }

    pub fn unauthenticated(mut self) -> Self {
        self.unauthenticated = true;
        self
    }

    pub fn with_item(mut self, repo: &RepoId, item: TrackerItem) -> Self {
        self.items.insert((repo.clone(), item.number), item);
        self
    }

    pub fn with_issues(mut self, repo: &RepoId, issues: Vec<IssueSummary>) -> Self {
        self.issues.insert(repo.clone(), issues);
        self
    }

    /// Every call against `repo` fails like an unreachable remote.
    pub fn failing_for(mut self, repo: &RepoId) -> Self {
        self.failing.insert(repo.clone());
        self
    }

    pub fn with_user_repos(mut self, repos: Vec<RepoId>) -> Self {
        self.user_repos = repos;
        self
    }

    pub fn with_next_number(mut self, number: u64) -> Self {
        self.next_number = number;
        self
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }

    fn check(&self, repo: &RepoId) -> Result<()> {
        if self.failing.contains(repo) {
            return Err(GhError::CommandFailed {
                command: "mock".to_string(),
                stderr: format!("HTTP 502 for {repo}"),
            });
        }
        Ok(())
    }

    fn view(&self, repo: &RepoId, number: u64, with_comments: bool) -> Result<TrackerItem> {
        self.check(repo)?;
        let mut item = self
            .items
            .get(&(repo.clone(), number))
            .cloned()
            .ok_or_else(|| GhError::CommandFailed {
                command: "view".to_string(),
                stderr: format!("Could not resolve #{number} in {repo}"),
            })?;
        if !with_comments {
            item.comments.clear();
        }
        Ok(item)
    }
}

impl TrackerClient for MockTrackerClient {
    async fn preflight(&self) -> Result<()> {
        self.record("preflight".to_string());
        if self.unauthenticated {
            return Err(GhError::NotAuthenticated(
                "You are not logged into any GitHub hosts.".to_string(),
            ));
        }
        Ok(())
    }

    async fn create_issue(&self, repo: &RepoId, issue: &NewIssue) -> Result<Created> {
        self.record(format!("create_issue {repo}"));
        self.check(repo)?;
        self.created_issues.borrow_mut().push(issue.clone());
        Created::from_url(&format!(
            "https://github.com/{repo}/issues/{}",
            self.next_number
        ))
    }

    async fn view_issue(
        &self,
        repo: &RepoId,
        number: u64,
        with_comments: bool,
    ) -> Result<TrackerItem> {
        self.record(format!("view_issue {repo}#{number}"));
        self.view(repo, number, with_comments)
    }

    async fn comment_issue(&self, repo: &RepoId, number: u64, body: &str) -> Result<String> {
        self.record(format!("comment_issue {repo}#{number}"));
        self.check(repo)?;
        self.comments
            .borrow_mut()
            .push((repo.clone(), number, body.to_string()));
        Ok(format!(
            "https://github.com/{repo}/issues/{number}#issuecomment-1"
        ))
    }

    async fn list_issues(&self, repo: &RepoId, filter: &IssueFilter) -> Result<Vec<IssueSummary>> {
        self.record(format!("list_issues {repo}"));
        self.check(repo)?;
        let issues = self.issues.get(repo).cloned().unwrap_or_default();
        Ok(issues
            .into_iter()
            .filter(|i| match filter.state {
                super::StateFilter::Open => i.state == ItemState::Open,
                super::StateFilter::Closed => i.state != ItemState::Open,
                super::StateFilter::All => true,
            })
            .take(filter.limit as usize)
            .collect())
    }

    async fn list_user_repos(&self, user: &str, limit: u32) -> Result<Vec<RepoId>> {
        self.record(format!("list_user_repos {user}"));
        Ok(self
            .user_repos
            .iter()
            .filter(|r| r.owner == user)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn create_pr(&self, repo: &RepoId, pr: &NewPullRequest) -> Result<Created> {
        self.record(format!("create_pr {repo}"));
        self.check(repo)?;
        self.created_prs.borrow_mut().push(pr.clone());
        Created::from_url(&format!("https://github.com/{repo}/pull/{}", self.next_number))
    }

    async fn view_pr(&self, repo: &RepoId, number: u64, with_comments: bool) -> Result<TrackerItem> {
        self.record(format!("view_pr {repo}#{number}"));
        self.view(repo, number, with_comments)
    }

    async fn comment_pr(&self, repo: &RepoId, number: u64, body: &str) -> Result<String> {
        self.record(format!("comment_pr {repo}#{number}"));
        self.check(repo)?;
        self.comments
            .borrow_mut()
            .push((repo.clone(), number, body.to_string()));
        Ok(format!(
            "https://github.com/{repo}/pull/{number}#issuecomment-1"
        ))
    }
}
