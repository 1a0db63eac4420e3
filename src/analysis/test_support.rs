//! In-memory history for pipeline tests.

use chrono::{DateTime, Utc};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use crate::error::{AppError, Result};
use crate::git::{CommitIter, HistoryProvider};
use crate::models::{BlameLine, BlameMode, Commit, CommitAuthor, TreeFile};

/// Every commit shares the same tree and blame data.
pub struct FakeHistory {
    pub commits: Vec<Commit>,
    pub files: Vec<TreeFile>,
    pub blames: HashMap<String, Vec<BlameLine>>,
    pub authors: HashMap<String, CommitAuthor>,
    pub failing: HashSet<String>,
    pub mode: BlameMode,
    calls: RefCell<Vec<String>>,
}

impl FakeHistory {
    pub fn new() -> Self {
        Self {
            commits: vec![Commit::new("head", at(1_000))],
            files: Vec::new(),
            blames: HashMap::new(),
            authors: HashMap::new(),
            failing: HashSet::new(),
            mode: BlameMode::Library,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn head_commit(&self) -> Commit {
        self.commits[0].clone()
    }

    /// Add a blob whose lines are `(author, hash, count)` runs.
    pub fn add_file(&mut self, path: &str, runs: &[(&str, &str, usize)]) {
        let mut lines = Vec::new();
        for (author, hash, count) in runs {
            for n in 0..*count {
                lines.push(BlameLine::new(*author, *hash, format!("line {}", n)));
            }
        }
        self.files.push(TreeFile::file(path));
        self.blames.insert(path.to_string(), lines);
    }

    pub fn add_author(&mut self, hash: &str, name: &str, email: &str) {
        self.authors.insert(
            hash.to_string(),
            CommitAuthor {
                name: name.to_string(),
                email: email.to_string(),
            },
        );
    }

    pub fn fail_blame(&mut self, path: &str) {
        self.failing.insert(path.to_string());
    }

    pub fn blame_calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

pub fn at(seconds: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(seconds, 0).unwrap()
}

impl HistoryProvider for FakeHistory {
    fn head(&self) -> Result<String> {
        Ok(self.commits[0].hash.clone())
    }

    fn log(&self, _from: &str) -> Result<CommitIter<'_>> {
        Ok(Box::new(self.commits.clone().into_iter().map(Ok)))
    }

    fn tree(&self, _commit: &Commit) -> Result<Vec<TreeFile>> {
        Ok(self.files.clone())
    }

    fn blame(&self, commit: &Commit, path: &str) -> Result<Vec<BlameLine>> {
        self.calls.borrow_mut().push(path.to_string());
        if self.failing.contains(path) {
            return Err(AppError::Blame {
                commit: commit.hash.clone(),
                path: path.to_string(),
                message: "corrupt object".to_string(),
            });
        }
        self.blames
            .get(path)
            .cloned()
            .ok_or_else(|| AppError::PathNotFound(path.to_string()))
    }

    fn commit_author(&self, hash: &str) -> Result<CommitAuthor> {
        self.authors
            .get(hash)
            .cloned()
            .ok_or_else(|| AppError::CommitNotFound(hash.to_string()))
    }

    fn blame_mode(&self) -> BlameMode {
        self.mode
    }
}
