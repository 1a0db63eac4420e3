//! Commit sampling.
//!
//! Picks an evenly spaced, most-recent-first subset of the commits reachable
//! from HEAD:
//! 1. keep commits authored strictly inside `(since, until)`
//! 2. stable sort by author time, newest first
//! 3. thin greedily so kept neighbours are at least `interval` apart
//! 4. stop at the effective limit

use chrono::{DateTime, Utc};

use crate::config::SearchCommitsOptions;
use crate::error::Result;
use crate::git::HistoryProvider;
use crate::models::Commit;

/// Walk history from HEAD and sample it.
pub fn search_commits<P: HistoryProvider + ?Sized>(
    provider: &P,
    options: &SearchCommitsOptions,
) -> Result<Vec<Commit>> {
    let head = provider.head()?;
    tracing::info!("Searching commits from {}", head);

    // Materialize so read errors surface before sampling starts.
    let commits = provider.log(&head)?.collect::<Result<Vec<_>>>()?;
    Ok(sample_commits(commits, options, Utc::now()))
}

pub fn sample_commits<I>(commits: I, options: &SearchCommitsOptions, now: DateTime<Utc>) -> Vec<Commit>
where
    I: IntoIterator<Item = Commit>,
{
    let since = options
        .since
        .unwrap_or_else(|| DateTime::from_timestamp(0, 0).unwrap_or_default());
    let until = options.until.unwrap_or(now);

    let mut commit_count = 0;
    let mut filtered: Vec<Commit> = Vec::new();
    for commit in commits {
        commit_count += 1;
        if commit.authored_at > since && commit.authored_at < until {
            filtered.push(commit);
        }
    }

    tracing::debug!(
        "Filter complete: commits={}, picked={}, since={}, until={}",
        commit_count,
        filtered.len(),
        since,
        until
    );

    if filtered.is_empty() {
        return filtered;
    }

    // sort_by is stable: equal timestamps keep walk order
    filtered.sort_by(|a, b| b.authored_at.cmp(&a.authored_at));

    let interval = options.effective_interval();
    let limit = options.effective_limit();

    let mut picked: Vec<Commit> = Vec::with_capacity(limit);
    for commit in filtered {
        if let Some(recent) = picked.last() {
            if recent.authored_at - commit.authored_at < interval {
                continue;
            }
        }

        tracing::debug!("Picked commit: hash={}, when={}", commit.hash, commit.authored_at);
        picked.push(commit);

        if picked.len() >= limit {
            break;
        }
    }

    tracing::info!(
        "Thin complete: picked={}, interval={}, limit={}",
        picked.len(),
        interval,
        limit
    );

    picked
}
