//! Run options and environment switches.
//!
//! Options are built by the CLI in `main.rs`; the environment switches are
//! read once when a run starts.

use chrono::{DateTime, TimeDelta, Utc};
use regex::Regex;
use std::path::PathBuf;

use crate::error::{AppError, Result};
use crate::models::AuthorRule;

/// Bearer token for the GitHub search API.
pub const GITHUB_ACCESS_TOKEN_KEY: &str = "GITHUB_ACCESS_TOKEN";
/// Blame through the `git` executable instead of libgit2.
pub const USE_GIT_COMMAND_KEY: &str = "KUNITORI_USE_GIT_COMMAND";
/// Never call the GitHub API; every login resolves to "".
pub const SKIP_REQUEST_GITHUB_API_KEY: &str = "KUNITORI_SKIP_REQUEST_GITHUB_API";

/// Hard ceiling on the number of sampled commits.
pub const SEARCH_COMMIT_MAX_LIMIT: usize = 15;

fn env_flag(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

pub fn github_access_token() -> Option<String> {
    env_flag(GITHUB_ACCESS_TOKEN_KEY)
}

pub fn use_git_command() -> bool {
    env_flag(USE_GIT_COMMAND_KEY).is_some()
}

pub fn skip_github_api() -> bool {
    env_flag(SKIP_REQUEST_GITHUB_API_KEY).is_some()
}

#[derive(Debug, Clone, Default)]
pub struct SearchCommitsOptions {
    /// Exclusive lower bound, defaults to the Unix epoch
    pub since: Option<DateTime<Utc>>,
    /// Exclusive upper bound, defaults to now
    pub until: Option<DateTime<Utc>>,
    /// Minimum spacing between kept commits; negative means zero
    pub interval: TimeDelta,
    /// Number of commits to keep; clamped to `1..=SEARCH_COMMIT_MAX_LIMIT`
    pub limit: i64,
}

impl SearchCommitsOptions {
    pub fn effective_interval(&self) -> TimeDelta {
        self.interval.max(TimeDelta::zero())
    }

    pub fn effective_limit(&self) -> usize {
        match usize::try_from(self.limit) {
            Ok(limit) if limit > 0 && limit < SEARCH_COMMIT_MAX_LIMIT => limit,
            _ => SEARCH_COMMIT_MAX_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CountLinesOptions {
    pub filters: Vec<Regex>,
    pub author_rules: Vec<AuthorRule>,
}

impl CountLinesOptions {
    /// Compile filter and `author=regex` rule strings.
    ///
    /// No filters means every file (`.+`).
    pub fn parse(filters: &[String], authors: &[String]) -> Result<Self> {
        let mut compiled = filters
            .iter()
            .map(|filter| Regex::new(filter))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        if compiled.is_empty() {
            compiled.push(Regex::new(".+")?);
        }

        let author_rules = authors
            .iter()
            .map(|author| parse_author_rule(author))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            filters: compiled,
            author_rules,
        })
    }
}

fn parse_author_rule(value: &str) -> Result<AuthorRule> {
    let parts: Vec<&str> = value.split('=').collect();
    match parts.as_slice() {
        [author, condition] if !author.is_empty() => {
            Ok(AuthorRule::new(Regex::new(condition)?, *author))
        }
        _ => Err(AppError::Config(format!(
            "invalid author format (expected author=regex): {}",
            value
        ))),
    }
}

/// Where the history comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositorySource {
    Url(String),
    Path(PathBuf),
}

impl RepositorySource {
    /// A URL wins over a path when both are given.
    pub fn resolve(url: Option<String>, path: Option<PathBuf>) -> Result<Self> {
        match (url.filter(|u| !u.is_empty()), path) {
            (Some(url), _) => Ok(Self::Url(url)),
            (None, Some(path)) => Ok(Self::Path(path)),
            (None, None) => Err(AppError::Config("should specify url or path".to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub source: RepositorySource,
    pub region: String,
    pub search: SearchCommitsOptions,
    pub count_lines: CountLinesOptions,
}

/// Parse durations such as `30d`, `720h`, `1d12h` or `90s`.
pub fn parse_duration(value: &str) -> Result<TimeDelta> {
    let invalid = || AppError::Config(format!("invalid duration: {}", value));

    let trimmed = value.trim();
    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    if body.is_empty() {
        return Err(invalid());
    }

    let mut total = TimeDelta::zero();
    let mut digits = String::new();
    for ch in body.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
            continue;
        }
        let amount: i64 = digits.parse().map_err(|_| invalid())?;
        digits.clear();
        let part = match ch {
            'd' => TimeDelta::try_days(amount),
            'h' => TimeDelta::try_hours(amount),
            'm' => TimeDelta::try_minutes(amount),
            's' => TimeDelta::try_seconds(amount),
            _ => None,
        }
        .ok_or_else(invalid)?;
        total = total.checked_add(&part).ok_or_else(invalid)?;
    }
    if !digits.is_empty() {
        return Err(invalid());
    }

    Ok(if negative { -total } else { total })
}
