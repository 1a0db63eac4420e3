//! Line attribution DTOs.
//!
//! - `AuthorRule`: ordered rewrite of raw author identities to a canonical label
//! - `LineCountResult`: per-filter line counts produced for one commit

use regex::Regex;
use std::collections::BTreeMap;

/// Maps every raw identity matching `condition` to `author`.
///
/// Rules are evaluated in list order and the first match wins.
#[derive(Debug, Clone)]
pub struct AuthorRule {
    pub condition: Regex,
    pub author: String,
}

impl AuthorRule {
    pub fn new(condition: Regex, author: impl Into<String>) -> Self {
        Self {
            condition,
            author: author.into(),
        }
    }
}

/// Resolve a raw identity through `rules`, falling back to the identity itself.
pub fn canonical_author<'a>(rules: &'a [AuthorRule], raw: &'a str) -> &'a str {
    rules
        .iter()
        .find(|rule| rule.condition.is_match(raw))
        .map(|rule| rule.author.as_str())
        .unwrap_or(raw)
}

/// Line counts for one filter at one commit.
#[derive(Debug, Clone)]
pub struct LineCountResult {
    /// Commit the counts were taken at
    pub commit: String,
    pub filter: Regex,
    /// Canonical author -> number of lines last touched by them
    pub lines_by_author: BTreeMap<String, usize>,
    /// Canonical author -> display name of the first commit seen for them
    pub name_by_author: BTreeMap<String, String>,
    /// Matched paths in tree-walk order
    pub matched_files: Vec<String>,
}

impl LineCountResult {
    pub fn new(commit: impl Into<String>, filter: Regex) -> Self {
        Self {
            commit: commit.into(),
            filter,
            lines_by_author: BTreeMap::new(),
            name_by_author: BTreeMap::new(),
            matched_files: Vec::new(),
        }
    }

    pub fn total_lines(&self) -> usize {
        self.lines_by_author.values().sum()
    }

    pub fn display_name(&self, author: &str) -> &str {
        self.name_by_author.get(author).map(String::as_str).unwrap_or("")
    }

    pub fn line_count(&self, author: &str) -> usize {
        self.lines_by_author.get(author).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_matching_rule_wins() {
        let rules = vec![
            AuthorRule::new(Regex::new("^alice@").unwrap(), "alice"),
            AuthorRule::new(Regex::new("@x\\.com$").unwrap(), "x-team"),
        ];

        assert_eq!(canonical_author(&rules, "alice@x.com"), "alice");
        assert_eq!(canonical_author(&rules, "bob@x.com"), "x-team");
        assert_eq!(canonical_author(&rules, "carol@z.com"), "carol@z.com");
    }

    #[test]
    fn test_empty_result_has_no_lines() {
        let result = LineCountResult::new("abc", Regex::new(".+").unwrap());
        assert_eq!(result.total_lines(), 0);
        assert_eq!(result.display_name("nobody"), "");
        assert_eq!(result.line_count("nobody"), 0);
    }
}
