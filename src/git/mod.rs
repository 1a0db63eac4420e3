//! Access to repository history.
//!
//! `HistoryProvider` is the seam between the analysis pipeline and the
//! place commits and blame come from. `GitRepository` implements it on top
//! of libgit2; tests use in-memory providers.

pub mod blame;
pub mod history;
pub mod repository;

pub use history::search_commits;
pub use repository::GitRepository;

use crate::error::Result;
use crate::models::{BlameLine, BlameMode, Commit, CommitAuthor, TreeFile};

pub type CommitIter<'a> = Box<dyn Iterator<Item = Result<Commit>> + 'a>;

pub trait HistoryProvider {
    /// OID of the commit HEAD points to.
    fn head(&self) -> Result<String>;

    /// Single-pass walk of the commits reachable from `from`.
    fn log(&self, from: &str) -> Result<CommitIter<'_>>;

    /// Every entry of the commit's tree, recursively, in walk order.
    fn tree(&self, commit: &Commit) -> Result<Vec<TreeFile>>;

    /// Per-line attribution of `path` as of `commit`.
    fn blame(&self, commit: &Commit, path: &str) -> Result<Vec<BlameLine>>;

    fn commit_author(&self, hash: &str) -> Result<CommitAuthor>;

    fn blame_mode(&self) -> BlameMode;
}
