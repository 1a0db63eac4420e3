//! Report DTOs.
//!
//! These structs are serialized to JSON (camelCase) as the output of a
//! generate run:
//! - `GenerateResult`: repository, source and one entry per sampled commit
//! - `CommitReport`: one sampled commit with a line count per filter
//! - `LineCountReport`: areas and ranked authors for one filter
//! - `AreaReport`, `AuthorReport`: leaves of the above

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResult {
    pub repository: String,
    pub source: String,
    pub generated_at: DateTime<Utc>,
    pub commits: Vec<CommitReport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitReport {
    pub hash: String,
    pub committed_at: DateTime<Utc>,
    pub line_counts: Vec<LineCountReport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineCountReport {
    pub filter_regex: String,
    pub file_count: usize,
    pub areas: Vec<AreaReport>,
    pub authors: Vec<AuthorReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaReport {
    pub name: String,
    pub size: f64,
    pub ratio: f64,
    /// Empty when the area went unassigned
    pub author_email: String,
    pub author_rank: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorReport {
    pub email: String,
    pub name: String,
    pub git_hub_login: String,
    pub line_count: usize,
    pub rank: usize,
}
