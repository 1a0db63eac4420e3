//! Blame data transfer objects.
//!
//! Provides per-line author attribution for file content at a specific commit.
//! Used by the line counter to decide who owns each line.

use serde::Serialize;

/// Blame information for a single line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlameLine {
    /// Raw identity (e-mail) of the author who last modified this line
    pub author: String,
    /// OID of the commit that last modified this line
    pub hash: String,
    /// Line content
    pub text: String,
}

impl BlameLine {
    pub fn new(author: impl Into<String>, hash: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            hash: hash.into(),
            text: text.into(),
        }
    }
}

/// How a provider computes blame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlameMode {
    /// libgit2 blame; a failing file is skipped and counting continues.
    Library,
    /// `git blame` subprocess; failures abort the run.
    GitCommand,
}

impl BlameMode {
    pub fn skips_failed_files(self) -> bool {
        matches!(self, BlameMode::Library)
    }
}
