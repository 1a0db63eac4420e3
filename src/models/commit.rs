use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A commit reachable from HEAD, reduced to what sampling needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub hash: String,
    pub authored_at: DateTime<Utc>,
}

impl Commit {
    pub fn new(hash: impl Into<String>, authored_at: DateTime<Utc>) -> Self {
        Self {
            hash: hash.into(),
            authored_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitAuthor {
    pub name: String,
    pub email: String,
}
