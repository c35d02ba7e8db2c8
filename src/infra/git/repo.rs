//! Repository operations.

use git2::{Repository, RepositoryOpenFlags, StatusOptions};
use std::path::Path;

use super::error::{GitError, Result};

/// Open the git repository containing `path` (searching parent directories).
pub fn open_repo_at(path: &Path) -> Result<Repository> {
    Repository::open_ext(
        path,
        RepositoryOpenFlags::empty(),
        std::iter::empty::<&Path>(),
    )
    .map_err(|_| GitError::NotInRepo)
}

/// Open exactly `path` as a repository, without searching parents.
pub fn open_repo_exact(path: &Path) -> Result<Repository> {
    Repository::open_ext(
        path,
        RepositoryOpenFlags::NO_SEARCH,
        std::iter::empty::<&Path>(),
    )
    .map_err(|_| GitError::NotInRepo)
}

/// Get the current branch name.
pub fn current_branch(repo: &Repository) -> Result<String> {
    let head = repo.head()?;
    if !head.is_branch() {
        return Err(GitError::DetachedHead);
    }
    head.shorthand()
        .map(str::to_string)
        .ok_or(GitError::DetachedHead)
}

/// Get the remote URL for "origin".
pub fn origin_url(repo: &Repository) -> Result<String> {
    let remote = repo
        .find_remote("origin")
        .map_err(|_| GitError::NoOriginRemote)?;
    remote
        .url()
        .map(str::to_string)
        .ok_or(GitError::NoOriginRemote)
}

/// True when the working tree or index has changes, untracked files included.
pub fn has_uncommitted_changes(repo: &Repository) -> Result<bool> {
    let mut opts = StatusOptions::new();
    opts.include_untracked(true)
        .recurse_untracked_dirs(false)
        .include_ignored(false)
        .exclude_submodules(true);
    let statuses = repo.statuses(Some(&mut opts))?;
    Ok(!statuses.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::git::test_utils::TempRepo;
    use std::fs;

    #[test]
    fn open_repo_at_searches_parents() {
        let temp = TempRepo::new("main");
        let nested = temp.path().join("a/b");
        fs::create_dir_all(&nested).unwrap();

        assert!(open_repo_at(&nested).is_ok());
        assert!(matches!(
            open_repo_exact(&nested),
            Err(GitError::NotInRepo)
        ));
    }

    #[test]
    fn open_repo_at_outside_repo_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(matches!(open_repo_exact(dir.path()), Err(GitError::NotInRepo)));
    }

    #[test]
    fn current_branch_reports_branch_name() {
        let temp = TempRepo::new("trunk");
        assert_eq!(current_branch(&temp.open()).unwrap(), "trunk");
    }

    #[test]
    fn current_branch_rejects_detached_head() {
        let temp = TempRepo::new("main");
        let repo = temp.open();
        let oid = repo.head().unwrap().target().unwrap();
        repo.set_head_detached(oid).unwrap();

        assert!(matches!(current_branch(&repo), Err(GitError::DetachedHead)));
    }

    #[test]
    fn origin_url_missing() {
        let temp = TempRepo::new("main");
        assert!(matches!(
            origin_url(&temp.open()),
            Err(GitError::NoOriginRemote)
        ));
    }

    #[test]
    fn detects_uncommitted_changes() {
        let temp = TempRepo::new("main");
        let repo = temp.open();
        assert!(!has_uncommitted_changes(&repo).unwrap());

        fs::write(temp.path().join("notes.txt"), "draft").unwrap();
        assert!(has_uncommitted_changes(&repo).unwrap());
    }

    #[test]
    fn detects_modified_tracked_file() {
        let temp = TempRepo::new("main");
        temp.commit_file("README.md", "hello", "add readme");
        let repo = temp.open();
        assert!(!has_uncommitted_changes(&repo).unwrap());

        fs::write(temp.path().join("README.md"), "changed").unwrap();
        assert!(has_uncommitted_changes(&repo).unwrap());
    }
}
