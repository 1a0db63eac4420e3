//! Resolving author identities to public handles.
//!
//! - `IdentityResolver`: one lookup per call, "" when nobody matches
//! - `IdentityCache`: run-scoped memo in front of a resolver
//! - `GitHubResolver`: GitHub user search by e-mail
//! - `OfflineResolver`: never resolves anything

pub mod cache;
pub mod github;

pub use cache::IdentityCache;
pub use github::GitHubResolver;

use crate::error::Result;

pub trait IdentityResolver {
    /// Handle for `identity`, or an empty string when not found.
    fn resolve_login(&self, identity: &str) -> Result<String>;
}

/// Used when API requests are disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineResolver;

impl IdentityResolver for OfflineResolver {
    fn resolve_login(&self, _identity: &str) -> Result<String> {
        Ok(String::new())
    }
}

/// Pick the resolver for this run from the environment.
pub fn resolver_from_env() -> Box<dyn IdentityResolver> {
    if crate::config::skip_github_api() {
        tracing::info!("GitHub API requests are disabled");
        return Box::new(OfflineResolver);
    }

    let token = crate::config::github_access_token();
    if token.is_none() {
        tracing::warn!(
            "If the environment variable {} is not set, API searches will be very slow.",
            crate::config::GITHUB_ACCESS_TOKEN_KEY
        );
    }
    Box::new(GitHubResolver::new(token))
}
