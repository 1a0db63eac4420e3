//! Line attribution.
//!
//! For one commit, blames every blob matched by at least one path filter and
//! counts the lines per canonical author, separately for each filter. The
//! display name of an author is taken from the commit that introduced the
//! first of their lines we manage to look up.

use crate::config::CountLinesOptions;
use crate::error::Result;
use crate::git::HistoryProvider;
use crate::models::{canonical_author, Commit, LineCountResult};

pub fn count_lines<P: HistoryProvider + ?Sized>(
    provider: &P,
    commit: &Commit,
    options: &CountLinesOptions,
) -> Result<Vec<LineCountResult>> {
    tracing::info!(
        "Counting lines: commit={}, filters={}, author_rules={}",
        commit.hash,
        options.filters.len(),
        options.author_rules.len()
    );

    let mut results: Vec<LineCountResult> = options
        .filters
        .iter()
        .map(|filter| LineCountResult::new(commit.hash.clone(), filter.clone()))
        .collect();

    let skip_failed = provider.blame_mode().skips_failed_files();
    let (mut file_count, mut target_count, mut line_count, mut error_count) = (0, 0, 0, 0);

    for file in provider.tree(commit)? {
        file_count += 1;
        if !file.is_blob() {
            continue;
        }

        let matched: Vec<usize> = results
            .iter()
            .enumerate()
            .filter(|(_, result)| result.filter.is_match(&file.path))
            .map(|(index, _)| index)
            .collect();
        if matched.is_empty() {
            continue;
        }

        for &index in &matched {
            tracing::debug!("Match: file={}, filter={}", file.path, results[index].filter);
            results[index].matched_files.push(file.path.clone());
            target_count += 1;
        }

        let lines = match provider.blame(commit, &file.path) {
            Ok(lines) => lines,
            Err(e) if skip_failed => {
                tracing::warn!(
                    "Failed to blame, skipping file: commit={}, file={}, error={}",
                    commit.hash,
                    file.path,
                    e
                );
                error_count += 1;
                continue;
            }
            Err(e) => return Err(e),
        };

        for &index in &matched {
            let result = &mut results[index];
            for line in &lines {
                let author = canonical_author(&options.author_rules, &line.author);
                *result.lines_by_author.entry(author.to_string()).or_insert(0) += 1;
                line_count += 1;

                if !result.display_name(author).is_empty() {
                    continue;
                }
                match provider.commit_author(&line.hash) {
                    Ok(line_author) => {
                        result.name_by_author.insert(author.to_string(), line_author.name);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to get line commit: hash={}, error={}", line.hash, e);
                    }
                }
            }
        }
    }

    tracing::info!(
        "Traverse complete: files={}, targets={}, lines={}, errors={}",
        file_count,
        target_count,
        line_count,
        error_count
    );

    Ok(results)
}
