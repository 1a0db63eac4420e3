//! Per-line blame for a file at a given commit.
//!
//! Two backends:
//! - `blame_with_library`: libgit2 blame, bounded by the target commit
//! - `blame_with_git_command`: parses `git blame -sl`, much faster on large
//!   histories but needs a working directory and a `git` executable
//!
//! Both report the author e-mail as the raw identity of a line.

use git2::{BlameOptions, Repository};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::process::Command;
use std::sync::LazyLock;

use crate::error::{AppError, Result};
use crate::models::BlameLine;

/// `<hash> [<file>] <lineno>) <text>`; boundary commits carry a `^` prefix.
/// The file column only shows up for lines from renamed files and may hold spaces.
static BLAME_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\^?([0-9a-f]+)\s(?:.*?\s)??\s*\d+\) ?(.*)$").expect("valid blame line regex")
});

pub fn blame_with_library(
    repo: &Repository,
    commit: &git2::Commit,
    path: &str,
) -> Result<Vec<BlameLine>> {
    let mut opts = BlameOptions::new();
    opts.newest_commit(commit.id());

    let blame = repo.blame_file(Path::new(path), Some(&mut opts))?;
    let content = read_blob(repo, commit, path)?;
    let texts: Vec<&str> = content.lines().collect();

    let mut lines = Vec::with_capacity(texts.len());
    for hunk in blame.iter() {
        let hash = hunk.final_commit_id().to_string();
        let sig = hunk.final_signature();
        let author = sig.email().unwrap_or("").to_string();

        // final_start_line is 1-indexed
        let start = hunk.final_start_line().saturating_sub(1);
        for offset in 0..hunk.lines_in_hunk() {
            let text = texts.get(start + offset).copied().unwrap_or("");
            lines.push(BlameLine::new(author.clone(), hash.clone(), text));
        }
    }

    Ok(lines)
}

fn read_blob(repo: &Repository, commit: &git2::Commit, path: &str) -> Result<String> {
    let tree = commit.tree()?;
    let entry = tree
        .get_path(Path::new(path))
        .map_err(|_| AppError::PathNotFound(path.to_string()))?;
    let blob = entry.to_object(repo)?.peel_to_blob()?;
    Ok(String::from_utf8_lossy(blob.content()).into_owned())
}

pub fn blame_with_git_command(repo: &Repository, hash: &str, path: &str) -> Result<Vec<BlameLine>> {
    let workdir = repo.workdir().ok_or_else(|| {
        AppError::Config("git command blame requires a repository with a working directory".to_string())
    })?;

    let output = Command::new("git")
        .arg("-C")
        .arg(workdir)
        .args(["blame", "-sl", hash, "--", path])
        .output()?;

    if !output.status.success() {
        return Err(AppError::Blame {
            commit: hash.to_string(),
            path: path.to_string(),
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(parse_blame_output(&stdout, |line_hash| {
        let commit = repo.find_commit_by_prefix(line_hash)?;
        let email = commit.author().email().unwrap_or("").to_string();
        Ok((commit.id().to_string(), email))
    }))
}

/// Turn `git blame -sl` output into lines.
///
/// `resolve` maps an abbreviated or full hash to `(full hash, author e-mail)`.
/// It is called once per distinct hash; lines of hashes it cannot resolve
/// are dropped.
fn parse_blame_output<F>(output: &str, mut resolve: F) -> Vec<BlameLine>
where
    F: FnMut(&str) -> Result<(String, String)>,
{
    let mut bad_commits: HashSet<String> = HashSet::new();
    let mut authors: HashMap<String, (String, String)> = HashMap::new();

    let mut lines = Vec::new();
    for raw in output.lines() {
        let Some(caps) = BLAME_LINE_REGEX.captures(raw) else {
            tracing::warn!("Unrecognized blame line: {}", raw);
            continue;
        };
        let line_hash = &caps[1];
        let text = caps.get(2).map(|m| m.as_str()).unwrap_or("");

        if bad_commits.contains(line_hash) {
            continue;
        }
        if !authors.contains_key(line_hash) {
            match resolve(line_hash) {
                Ok(resolved) => {
                    authors.insert(line_hash.to_string(), resolved);
                }
                Err(e) => {
                    tracing::warn!("Invalid commit: hash={}, error={}", line_hash, e);
                    bad_commits.insert(line_hash.to_string());
                    continue;
                }
            }
        }

        if let Some((full_hash, email)) = authors.get(line_hash) {
            lines.push(BlameLine::new(email.clone(), full_hash.clone(), text));
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::repository::test_support::{commit_files, create_test_repo};

    const A: &str = "1111111111111111111111111111111111111111";
    const B: &str = "2222222222222222222222222222222222222222";

    #[test]
    fn test_parse_blame_output() {
        let output = format!(
            "{A}  1) fn main() {{\n^{short} 2)     println!(\"a) b\");\n{A} src/old.rs  3) }}\n{B} 4) \n",
            short = &B[..39],
        );

        let mut calls = Vec::new();
        let lines = parse_blame_output(&output, |hash| {
            calls.push(hash.to_string());
            if hash.starts_with('1') {
                Ok((A.to_string(), "alice@x.com".to_string()))
            } else {
                Ok((B.to_string(), "bob@x.com".to_string()))
            }
        });

        assert_eq!(
            lines,
            vec![
                BlameLine::new("alice@x.com", A, "fn main() {"),
                BlameLine::new("bob@x.com", B, "    println!(\"a) b\");"),
                BlameLine::new("alice@x.com", A, "}"),
                BlameLine::new("bob@x.com", B, ""),
            ]
        );
        // One lookup per distinct hash as printed.
        assert_eq!(calls, vec![A.to_string(), B[..39].to_string(), B.to_string()]);
    }

    #[test]
    fn test_parse_blame_output_with_renamed_file_column() {
        let output = format!(
            "{A} old name.rs 1) one\n{A} new.rs      2) two\n{B} new.rs      3) f(1) 2) g\n{B} 12) x 3) y\n"
        );

        let lines = parse_blame_output(&output, |hash| {
            let email = if hash == A { "alice@x.com" } else { "bob@x.com" };
            Ok((hash.to_string(), email.to_string()))
        });

        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "two", "f(1) 2) g", "x 3) y"]);
        assert_eq!(lines.iter().filter(|l| l.author == "alice@x.com").count(), 2);
    }

    #[test]
    fn test_blame_with_git_command_follows_rename() -> std::result::Result<(), Box<dyn std::error::Error>> {
        if Command::new("git").arg("--version").output().is_err() {
            return Ok(());
        }

        let (dir, repo) = create_test_repo()?;
        let original: String = (1..=10).map(|n| format!("line {}\n", n)).collect();
        commit_files(dir.path(), &repo, "alice@x.com", 1_000, &[("old name.rs", original.as_str())])?;

        std::fs::remove_file(dir.path().join("old name.rs"))?;
        let mut index = repo.index()?;
        index.remove_path(Path::new("old name.rs"))?;
        index.write()?;
        let renamed = format!("{}line 11\n", original);
        let head = commit_files(dir.path(), &repo, "bob@x.com", 2_000, &[("new.rs", renamed.as_str())])?;

        let lines = blame_with_git_command(&repo, &head.to_string(), "new.rs")?;

        assert_eq!(lines.len(), 11);
        assert_eq!(lines.iter().filter(|l| l.author == "alice@x.com").count(), 10);
        assert_eq!(lines[10], BlameLine::new("bob@x.com", head.to_string(), "line 11"));
        assert_eq!(lines[0].text, "line 1");
        Ok(())
    }

    #[test]
    fn test_parse_blame_output_skips_unresolvable_commits() {
        let output = format!("{A} 1) one\n{B} 2) two\n{B} 3) three\n");

        let mut calls = 0;
        let lines = parse_blame_output(&output, |hash| {
            calls += 1;
            if hash == A {
                Ok((A.to_string(), "alice@x.com".to_string()))
            } else {
                Err(AppError::CommitNotFound(hash.to_string()))
            }
        });

        assert_eq!(lines, vec![BlameLine::new("alice@x.com", A, "one")]);
        assert_eq!(calls, 2);
    }
}
