use git2::{ObjectType, Oid, Repository, Sort, TreeWalkMode, TreeWalkResult};
use std::path::Path;
use tempfile::TempDir;

use crate::error::{AppError, Result};
use crate::git::blame::{blame_with_git_command, blame_with_library};
use crate::git::{CommitIter, HistoryProvider};
use crate::models::{BlameLine, BlameMode, Commit, CommitAuthor, EntryType, TreeFile};

pub struct GitRepository {
    pub repo: Repository,
    pub path: String,
    blame_mode: BlameMode,
    /// Holds the clone target of a remote repository; removed on drop
    _clone_dir: Option<TempDir>,
}

impl GitRepository {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        tracing::info!("Opening repository: {}", path_str);
        let repo = Repository::discover(&path).map_err(|_| AppError::RepoNotFound(path_str.clone()))?;

        Ok(Self {
            repo,
            path: path_str,
            blame_mode: BlameMode::Library,
            _clone_dir: None,
        })
    }

    /// Clone `url` into a temporary directory that lives as long as `self`.
    pub fn clone_from(url: &str) -> Result<Self> {
        let dir = TempDir::new()?;
        tracing::info!("Cloning repository: url={}, path={}", url, dir.path().display());
        let repo = Repository::clone(url, dir.path())?;
        tracing::info!("Clone completed: {}", url);

        Ok(Self {
            repo,
            path: url.to_string(),
            blame_mode: BlameMode::Library,
            _clone_dir: Some(dir),
        })
    }

    pub fn with_blame_mode(mut self, mode: BlameMode) -> Self {
        self.blame_mode = mode;
        self
    }

    /// URL of `origin`, else of the first remote that has one.
    pub fn remote_location(&self) -> Result<Option<String>> {
        if let Ok(origin) = self.repo.find_remote("origin") {
            if let Some(url) = origin.url() {
                return Ok(Some(url.to_string()));
            }
        }

        let names = self.repo.remotes()?;
        for name in names.iter().flatten() {
            let remote = self.repo.find_remote(name)?;
            if let Some(url) = remote.url() {
                return Ok(Some(url.to_string()));
            }
        }

        Ok(None)
    }

    fn find_commit(&self, hash: &str) -> Result<git2::Commit<'_>> {
        let oid = Oid::from_str(hash).map_err(|_| AppError::CommitNotFound(hash.to_string()))?;
        self.repo
            .find_commit(oid)
            .map_err(|_| AppError::CommitNotFound(hash.to_string()))
    }
}

pub fn commit_to_model(commit: &git2::Commit) -> Commit {
    let seconds = commit.author().when().seconds();
    Commit::new(
        commit.id().to_string(),
        chrono::DateTime::from_timestamp(seconds, 0).unwrap_or_default(),
    )
}

impl HistoryProvider for GitRepository {
    fn head(&self) -> Result<String> {
        let head = self.repo.head()?;
        Ok(head.peel_to_commit()?.id().to_string())
    }

    fn log(&self, from: &str) -> Result<CommitIter<'_>> {
        let oid = self.find_commit(from)?.id();

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TIME)?;
        revwalk.push(oid)?;

        let repo = &self.repo;
        Ok(Box::new(revwalk.map(move |oid| -> Result<Commit> {
            let commit = repo.find_commit(oid?)?;
            Ok(commit_to_model(&commit))
        })))
    }

    fn tree(&self, commit: &Commit) -> Result<Vec<TreeFile>> {
        let tree = self.find_commit(&commit.hash)?.tree()?;

        let mut files = Vec::new();
        tree.walk(TreeWalkMode::PreOrder, |root, entry| {
            let kind = match entry.kind() {
                Some(ObjectType::Blob) => EntryType::File,
                Some(ObjectType::Tree) => EntryType::Directory,
                Some(ObjectType::Commit) => EntryType::Submodule,
                _ => return TreeWalkResult::Ok,
            };
            files.push(TreeFile {
                path: format!("{}{}", root, entry.name().unwrap_or("")),
                kind,
            });
            TreeWalkResult::Ok
        })?;

        Ok(files)
    }

    fn blame(&self, commit: &Commit, path: &str) -> Result<Vec<BlameLine>> {
        let result = match self.blame_mode {
            BlameMode::Library => {
                let target = self.find_commit(&commit.hash)?;
                blame_with_library(&self.repo, &target, path)
            }
            BlameMode::GitCommand => blame_with_git_command(&self.repo, &commit.hash, path),
        };

        result.map_err(|e| match e {
            AppError::Blame { .. } => e,
            other => AppError::Blame {
                commit: commit.hash.clone(),
                path: path.to_string(),
                message: other.to_string(),
            },
        })
    }

    fn commit_author(&self, hash: &str) -> Result<CommitAuthor> {
        let commit = self.find_commit(hash)?;
        let author = commit.author();
        Ok(CommitAuthor {
            name: author.name().unwrap_or("Unknown").to_string(),
            email: author.email().unwrap_or("").to_string(),
        })
    }

    fn blame_mode(&self) -> BlameMode {
        self.blame_mode
    }
}
