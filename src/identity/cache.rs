//! Identity cache for one generate run.
//!
//! The same author shows up in every filter of every sampled commit, while
//! each resolver call may hit a rate-limited API. The cache guarantees at
//! most one resolver call per distinct identity for as long as it lives; it
//! has no eviction and is dropped with the run.

use std::collections::HashMap;
use std::time::Instant;

use crate::error::Result;
use crate::identity::IdentityResolver;

pub struct IdentityCache<'a> {
    resolver: &'a dyn IdentityResolver,

    /// identity -> resolved handle ("" when not found)
    logins: HashMap<String, String>,

    lookups: usize,
    hits: usize,

    /// When the cache was created
    created_at: Instant,
}

impl<'a> IdentityCache<'a> {
    pub fn new(resolver: &'a dyn IdentityResolver) -> Self {
        Self {
            resolver,
            logins: HashMap::new(),
            lookups: 0,
            hits: 0,
            created_at: Instant::now(),
        }
    }

    /// Cached handle for `identity`, resolving it on first use.
    ///
    /// Failures are not cached, and they abort the caller's run anyway.
    pub fn login_for(&mut self, identity: &str) -> Result<String> {
        if let Some(login) = self.logins.get(identity) {
            self.hits += 1;
            return Ok(login.clone());
        }

        self.lookups += 1;
        let login = self.resolver.resolve_login(identity)?;
        tracing::debug!("Resolved identity: {} => {:?}", identity, login);
        self.logins.insert(identity.to_string(), login.clone());
        Ok(login)
    }

    /// Get cache statistics for debugging
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            identities: self.logins.len(),
            lookups: self.lookups,
            hits: self.hits,
            age_secs: self.created_at.elapsed().as_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub identities: usize,
    pub lookups: usize,
    pub hits: usize,
    pub age_secs: u64,
}
