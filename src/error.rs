//! Application error types.
//!
//! Defines `AppError` enum for all error conditions of a generate run.
//!
//! Error groups:
//! - Configuration: `Config`, `RegionNotFound`, `EmptyAttribution`
//! - History reads: `Git`, `Io`, `Blame`, `RepoNotFound`, `CommitNotFound`, `PathNotFound`
//! - Identity lookups: `Identity`, `Http`
//!
//! None of these are retried. Recoverable per-file blame failures are logged
//! by the line counter and never reach this type.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Repository not found: {0}")]
    RepoNotFound(String),

    #[error("Path not found: {0}")]
    PathNotFound(String),

    #[error("Commit not found: {0}")]
    CommitNotFound(String),

    #[error("Failed to blame {path} at {commit}: {message}")]
    Blame {
        commit: String,
        path: String,
        message: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Region not found: {0}")]
    RegionNotFound(String),

    #[error("Line count result is empty: commit={commit}, filter={filter}")]
    EmptyAttribution { commit: String, filter: String },

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Identity lookup failed: {0}")]
    Identity(String),

    #[error("HTTP error: {0}")]
    Http(#[from] ureq::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
