//! Generate run orchestration.
//!
//! For every sampled commit and every filter: count lines, allocate areas,
//! then list the authors. Allocated authors come first in order of their
//! first area; authors left without an area follow, ranked by line count
//! after the highest allocated rank. Handles are resolved through one
//! `IdentityCache` shared by the whole run.

use chrono::Utc;

use crate::analysis::attribution::count_lines;
use crate::analysis::kunitori::{allocate_areas, compare_authors};
use crate::config::{self, CountLinesOptions, GenerateOptions, RepositorySource};
use crate::error::Result;
use crate::git::{search_commits, GitRepository, HistoryProvider};
use crate::identity::{IdentityCache, IdentityResolver};
use crate::models::{
    AreaInfo, AreaReport, AuthorReport, BlameMode, Commit, CommitReport, GenerateResult,
    LineCountReport, LineCountResult,
};

const GITHUB_HTTPS_PREFIX: &str = "https://github.com/";
const GITHUB_SSH_PREFIX: &str = "git@github.com:";

pub struct Generator<'a, P: HistoryProvider + ?Sized> {
    provider: &'a P,
    area_info: &'a AreaInfo,
    options: &'a CountLinesOptions,
    identities: IdentityCache<'a>,
}

impl<'a, P: HistoryProvider + ?Sized> Generator<'a, P> {
    pub fn new(
        provider: &'a P,
        area_info: &'a AreaInfo,
        options: &'a CountLinesOptions,
        resolver: &'a dyn IdentityResolver,
    ) -> Self {
        Self {
            provider,
            area_info,
            options,
            identities: IdentityCache::new(resolver),
        }
    }

    pub fn generate(&mut self, commits: &[Commit]) -> Result<Vec<CommitReport>> {
        let mut reports = Vec::with_capacity(commits.len());
        for (index, commit) in commits.iter().enumerate() {
            tracing::info!(
                "Count lines: progress={}/{}, hash={}, when={}",
                index + 1,
                commits.len(),
                commit.hash,
                commit.authored_at
            );

            let results = count_lines(self.provider, commit, self.options)?;
            let line_counts = results
                .iter()
                .map(|result| self.line_count_report(result))
                .collect::<Result<Vec<_>>>()?;

            reports.push(CommitReport {
                hash: commit.hash.clone(),
                committed_at: commit.authored_at,
                line_counts,
            });
        }

        tracing::info!("Identity cache: {:?}", self.identities.stats());
        Ok(reports)
    }

    fn line_count_report(&mut self, result: &LineCountResult) -> Result<LineCountReport> {
        let assignments = allocate_areas(self.area_info, result)?;

        let mut areas = Vec::with_capacity(assignments.len());
        let mut authors: Vec<AuthorReport> = Vec::new();
        for assignment in &assignments {
            areas.push(AreaReport {
                name: assignment.area.name.clone(),
                size: assignment.area.size,
                ratio: assignment.ratio,
                author_email: assignment.author.clone().unwrap_or_default(),
                author_rank: assignment.rank,
            });

            let Some(email) = &assignment.author else {
                continue;
            };
            if authors.iter().any(|author| &author.email == email) {
                continue;
            }
            authors.push(self.author_report(result, email, assignment.rank)?);
        }

        let top_rank = authors.iter().map(|author| author.rank).max().unwrap_or(0);
        let mut unallocated: Vec<(&str, usize)> = result
            .lines_by_author
            .iter()
            .filter(|(email, _)| !authors.iter().any(|author| &author.email == *email))
            .map(|(email, lines)| (email.as_str(), *lines))
            .collect();
        unallocated.sort_by(|a, b| compare_authors(*a, *b));

        for (index, (email, _)) in unallocated.into_iter().enumerate() {
            authors.push(self.author_report(result, email, top_rank + index + 1)?);
        }

        Ok(LineCountReport {
            filter_regex: result.filter.to_string(),
            file_count: result.matched_files.len(),
            areas,
            authors,
        })
    }

    fn author_report(&mut self, result: &LineCountResult, email: &str, rank: usize) -> Result<AuthorReport> {
        Ok(AuthorReport {
            email: email.to_string(),
            name: result.display_name(email).to_string(),
            git_hub_login: self.identities.login_for(email)?,
            line_count: result.line_count(email),
            rank,
        })
    }
}

/// `github` for GitHub remotes, `unknown` otherwise.
pub fn repository_source(location: &str) -> &'static str {
    if location.starts_with(GITHUB_HTTPS_PREFIX) || location.starts_with(GITHUB_SSH_PREFIX) {
        "github"
    } else {
        "unknown"
    }
}

/// Browsable URL of a GitHub remote; other locations are returned unchanged.
pub fn repository_url(location: &str) -> String {
    let path = location
        .strip_prefix(GITHUB_HTTPS_PREFIX)
        .or_else(|| location.strip_prefix(GITHUB_SSH_PREFIX));
    match path {
        Some(path) => format!(
            "{}{}",
            GITHUB_HTTPS_PREFIX,
            path.strip_suffix(".git").unwrap_or(path)
        ),
        None => location.to_string(),
    }
}

/// Open or clone the repository, sample it and build the full report.
pub fn generate(options: &GenerateOptions, resolver: &dyn IdentityResolver) -> Result<GenerateResult> {
    let area_info = AreaInfo::for_region(&options.region)?;

    let (repository, location) = match &options.source {
        RepositorySource::Url(url) => (GitRepository::clone_from(url)?, url.clone()),
        RepositorySource::Path(path) => {
            let absolute = std::path::absolute(path)?;
            let location = absolute.to_string_lossy().to_string();
            (GitRepository::open(&absolute)?, location)
        }
    };

    let repository = if config::use_git_command() {
        repository.with_blame_mode(BlameMode::GitCommand)
    } else {
        tracing::warn!(
            "If the environment variable {} is not set, blame operation will be very slow.",
            config::USE_GIT_COMMAND_KEY
        );
        repository
    };

    let remote = match repository.remote_location() {
        Ok(Some(remote)) => remote,
        Ok(None) => location,
        Err(e) => {
            tracing::warn!("Failed to read remotes: {}", e);
            location
        }
    };
    tracing::info!("Location: repository={}, remote={}", repository.path, remote);

    let commits = search_commits(&repository, &options.search)?;
    tracing::info!("Matched commits: count={}", commits.len());

    let mut generator = Generator::new(&repository, &area_info, &options.count_lines, resolver);
    let commits = generator.generate(&commits)?;

    Ok(GenerateResult {
        repository: repository_url(&remote),
        source: repository_source(&remote).to_string(),
        generated_at: Utc::now(),
        commits,
    })
}
