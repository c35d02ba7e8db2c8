//! Test utilities for creating temporary git repositories.

use git2::{Oid, Repository, RepositoryInitOptions, Signature};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary git repository with one commit on `branch`.
pub struct TempRepo {
    pub dir: TempDir,
}

impl TempRepo {
    pub fn new(branch: &str) -> Self {
        let dir = TempDir::new().expect("create temp dir");
        init_repo_at(dir.path(), branch);
        Self { dir }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    pub fn open(&self) -> Repository {
        Repository::open(self.dir.path()).expect("open temp repo")
    }

    pub fn commit_file(&self, name: &str, content: &str, message: &str) -> Oid {
        commit_file(&self.open(), name, content, message)
    }

    pub fn set_origin(&self, url: &str) {
        let repo = self.open();
        if repo.find_remote("origin").is_ok() {
            repo.remote_set_url("origin", url).expect("set origin url");
        } else {
            repo.remote("origin", url).expect("add origin");
        }
    }
}

/// Initialize a repository at `path` with an initial commit on `branch`.
pub fn init_repo_at(path: &Path, branch: &str) -> Repository {
    let mut opts = RepositoryInitOptions::new();
    opts.initial_head(branch);
    let repo = Repository::init_opts(path, &opts).expect("init repo");
    {
        let sig = signature();
        let tree_id = repo.index().unwrap().write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        repo.commit(Some("HEAD"), &sig, &sig, "Initial commit", &tree, &[])
            .expect("create initial commit");
    }
    repo.config()
        .unwrap()
        .set_str("user.name", "Test")
        .unwrap();
    repo.config()
        .unwrap()
        .set_str("user.email", "test@example.com")
        .unwrap();
    repo
}

/// Write `name` in the working tree and commit it on HEAD.
pub fn commit_file(repo: &Repository, name: &str, content: &str, message: &str) -> Oid {
    let workdir = repo.workdir().expect("non-bare repo");
    std::fs::write(workdir.join(name), content).expect("write file");

    let mut index = repo.index().unwrap();
    index.add_path(Path::new(name)).unwrap();
    index.write().unwrap();
    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();

    let sig = signature();
    let parent = repo.head().unwrap().peel_to_commit().unwrap();
    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &[&parent])
        .expect("commit")
}

/// Clone the repository at `upstream` (a local path) into `dest`.
pub fn clone_repo(upstream: &Path, dest: &Path) -> Repository {
    let url = upstream.to_str().expect("utf-8 path");
    Repository::clone(url, dest).expect("clone")
}

/// Create a local branch at HEAD.
pub fn create_branch(repo: &Repository, name: &str) {
    let head = repo.head().unwrap().peel_to_commit().unwrap();
    repo.branch(name, &head, false).expect("create branch");
}

/// Names of all local branches, sorted.
pub fn local_branches(repo: &Repository) -> Vec<String> {
    let mut names: Vec<String> = repo
        .branches(Some(git2::BranchType::Local))
        .unwrap()
        .filter_map(|b| b.ok())
        .filter_map(|(b, _)| b.name().ok().flatten().map(str::to_string))
        .collect();
    names.sort();
    names
}

fn signature() -> Signature<'static> {
    Signature::now("Test", "test@example.com").unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::git::current_branch;

    #[test]
    fn test_temp_repo_creates_valid_repo() {
        let temp = TempRepo::new("main");
        let repo = temp.open();

        assert_eq!(current_branch(&repo).unwrap(), "main");
        assert_eq!(local_branches(&repo), vec!["main"]);
    }

    #[test]
    fn clone_tracks_upstream_branch() {
        let upstream = TempRepo::new("main");
        let dest = TempDir::new().unwrap();

        let clone = clone_repo(&upstream.path(), &dest.path().join("c"));

        assert!(
            clone
                .find_branch("origin/main", git2::BranchType::Remote)
                .is_ok()
        );
        assert_eq!(current_branch(&clone).unwrap(), "main");
    }
}
