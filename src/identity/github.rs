//! GitHub identity resolver.
//!
//! Looks up the GitHub login of a commit e-mail:
//! - GitHub noreply addresses carry the login and need no request
//! - everything else goes through the user search API
//!
//! The search API is heavily rate limited, so every request is followed by
//! a fixed cooldown: 7s anonymous, 3s with a token.

use serde::Deserialize;
use std::time::Duration;

use crate::error::{AppError, Result};
use crate::identity::IdentityResolver;

const GITHUB_API_URL: &str = "https://api.github.com";
const NOREPLY_SUFFIX: &str = "@users.noreply.github.com";

pub const ANONYMOUS_COOLDOWN: Duration = Duration::from_secs(7);
pub const AUTHENTICATED_COOLDOWN: Duration = Duration::from_secs(3);

#[derive(Debug, Deserialize)]
struct SearchUsersResponse {
    total_count: u64,
    items: Vec<SearchUser>,
}

#[derive(Debug, Deserialize)]
struct SearchUser {
    login: String,
}

pub struct GitHubResolver {
    api_url: String,
    token: Option<String>,
    cooldown: Duration,
    agent: ureq::Agent,
}

fn make_agent() -> ureq::Agent {
    ureq::config::Config::builder()
        .http_status_as_error(false)
        .timeout_global(Some(Duration::from_secs(30)))
        .build()
        .new_agent()
}

impl GitHubResolver {
    pub fn new(token: Option<String>) -> Self {
        let cooldown = if token.is_some() {
            AUTHENTICATED_COOLDOWN
        } else {
            ANONYMOUS_COOLDOWN
        };
        Self {
            api_url: GITHUB_API_URL.to_string(),
            token,
            cooldown,
            agent: make_agent(),
        }
    }

    #[cfg(test)]
    fn with_endpoint(mut self, api_url: impl Into<String>, cooldown: Duration) -> Self {
        self.api_url = api_url.into();
        self.cooldown = cooldown;
        self.agent = ureq::config::Config::builder()
            .http_status_as_error(false)
            .proxy(None)
            .build()
            .new_agent();
        self
    }

    fn search_login(&self, email: &str) -> Result<String> {
        let query = format!("{} in:email", email);
        tracing::info!("Search users: query={}, cooldown={:?}", query, self.cooldown);

        // https://docs.github.com/en/rest/search/search#search-users
        let url = format!("{}/search/users", self.api_url);
        let mut request = self
            .agent
            .get(&url)
            .query("q", &query)
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", "kunitori");
        if let Some(token) = &self.token {
            request = request.header("Authorization", &format!("Bearer {}", token));
        }

        let response = request.call();
        std::thread::sleep(self.cooldown);
        let response = response?;

        let status = response.status().as_u16();
        if status >= 400 {
            let error_text = response.into_body().read_to_string().unwrap_or_default();
            return Err(AppError::Identity(format!(
                "user search failed ({}) for {}: {}",
                status, email, error_text
            )));
        }

        let result: SearchUsersResponse = response.into_body().read_json()?;
        match result.items.into_iter().next() {
            Some(user) if result.total_count > 0 => {
                tracing::info!("User found: email={}, login={}", email, user.login);
                Ok(user.login)
            }
            _ => {
                tracing::info!("User not found: email={}", email);
                Ok(String::new())
            }
        }
    }
}

/// Login embedded in a GitHub noreply address, `None` for other addresses.
///
/// Accepts `<id>+<login>@users.noreply.github.com` and the older
/// `<login>@users.noreply.github.com`.
pub fn login_from_noreply(email: &str) -> Option<Result<String>> {
    let local = email.strip_suffix(NOREPLY_SUFFIX)?;
    let parts: Vec<&str> = local.split('+').collect();
    let login = match parts.as_slice() {
        [login] | [_, login] if !login.is_empty() => Ok(login.to_string()),
        _ => Err(AppError::Identity(format!("invalid github email: email={}", email))),
    };
    Some(login)
}

impl IdentityResolver for GitHubResolver {
    fn resolve_login(&self, identity: &str) -> Result<String> {
        if identity.is_empty() {
            return Ok(String::new());
        }

        if let Some(login) = login_from_noreply(identity) {
            tracing::debug!("GitHub user email: email={}, login={:?}", identity, login);
            return login;
        }

        self.search_login(identity)
    }
}
