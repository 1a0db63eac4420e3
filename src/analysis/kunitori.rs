//! Kunitori: proportional area allocation.
//!
//! Authors are ranked by line count (descending, ties by identity). Each area,
//! in input order, goes to the first author in rank order whose line ratio
//! still has room for it; if nobody has room the area stays unassigned.
//!
//! Recorded ratios are rounded to 3 decimals and the rounding residual is
//! added to the last area so that the ratios sum to 1.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::error::{AppError, Result};
use crate::models::{AreaAssignment, AreaInfo, LineCountResult};

#[derive(Debug, Clone, PartialEq)]
pub struct RankedAuthor {
    pub author: String,
    pub lines: usize,
    /// 1-based
    pub rank: usize,
    pub lines_ratio: f64,
    /// Sum of the area ratios allocated so far
    pub area_ratio: f64,
}

/// Order by lines descending, then identity ascending.
pub fn compare_authors(a: (&str, usize), b: (&str, usize)) -> Ordering {
    b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0))
}

pub fn rank_authors(lines_by_author: &BTreeMap<String, usize>) -> Vec<RankedAuthor> {
    let total_lines: usize = lines_by_author.values().sum();

    let mut ranks: Vec<RankedAuthor> = lines_by_author
        .iter()
        .map(|(author, &lines)| RankedAuthor {
            author: author.clone(),
            lines,
            rank: 0,
            lines_ratio: lines as f64 / total_lines as f64,
            area_ratio: 0.0,
        })
        .collect();

    ranks.sort_by(|a, b| compare_authors((&a.author, a.lines), (&b.author, b.lines)));
    for (index, rank) in ranks.iter_mut().enumerate() {
        rank.rank = index + 1;
    }

    ranks
}

fn round_ratio(ratio: f64) -> f64 {
    // f64::round rounds half away from zero
    (ratio * 1000.0).round() / 1000.0
}

pub fn allocate_areas(area_info: &AreaInfo, result: &LineCountResult) -> Result<Vec<AreaAssignment>> {
    let total_lines = result.total_lines();
    if total_lines == 0 {
        return Err(AppError::EmptyAttribution {
            commit: result.commit.clone(),
            filter: result.filter.to_string(),
        });
    }

    let total_area_size = area_info.total_size();
    if total_area_size.is_nan() || total_area_size <= 0.0 {
        return Err(AppError::Config(format!(
            "total area size must be positive: region={}, size={}",
            area_info.region, total_area_size
        )));
    }

    let mut ranks = rank_authors(&result.lines_by_author);

    tracing::debug!(
        "Start kunitori: authors={}, lines={}, areas={}, total_area_size={}",
        ranks.len(),
        total_lines,
        area_info.areas.len(),
        total_area_size
    );

    let mut assignments: Vec<AreaAssignment> = Vec::with_capacity(area_info.areas.len());
    let mut fraction = 1.0_f64;
    for area in &area_info.areas {
        let area_ratio = area.size / total_area_size;

        let winner = ranks
            .iter_mut()
            .find(|rank| rank.lines_ratio >= rank.area_ratio + area_ratio);

        let (author, rank) = match winner {
            Some(winner) => {
                tracing::debug!(
                    "Allocate: area={}, area_ratio={:.2} => author={}, lines_ratio={:.2}, author_area_ratio={:.2} => {:.2}",
                    area.name,
                    area_ratio,
                    winner.author,
                    winner.lines_ratio,
                    winner.area_ratio,
                    winner.area_ratio + area_ratio
                );
                winner.area_ratio += area_ratio;
                (Some(winner.author.clone()), winner.rank)
            }
            None => {
                tracing::debug!("Skip: area={}, area_ratio={}", area.name, area_ratio);
                (None, 0)
            }
        };

        let ratio = round_ratio(area_ratio);
        fraction -= ratio;
        assignments.push(AreaAssignment {
            area: area.clone(),
            ratio,
            author,
            rank,
        });
    }

    let rounded_fraction = round_ratio(fraction);
    if let Some(last) = assignments.last_mut() {
        last.ratio += rounded_fraction;
    }

    tracing::debug!(
        "Complete kunitori: areas={}, rounded_fraction={}",
        assignments.len(),
        rounded_fraction
    );

    Ok(assignments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Area;
    use proptest::prelude::*;
    use regex::Regex;

    fn line_counts(counts: &[(&str, usize)]) -> LineCountResult {
        let mut result = LineCountResult::new("abc", Regex::new(".+").unwrap());
        for (author, lines) in counts {
            result.lines_by_author.insert(author.to_string(), *lines);
        }
        result
    }

    fn test_areas() -> AreaInfo {
        AreaInfo::new(
            "TestArea",
            [100.0, 75.0, 50.0, 25.0, 20.0, 15.0, 10.0, 5.0]
                .iter()
                .map(|size| Area::new(format!("Area{}", size), *size))
                .collect(),
        )
    }

    #[test]
    fn test_allocate_areas() {
        let result = line_counts(&[("userA", 300), ("userB", 200), ("userC", 100)]);
        let assignments = allocate_areas(&test_areas(), &result).unwrap();

        let expected = [
            ("Area100", 0.333, "userA", 1),
            ("Area75", 0.25, "userB", 2),
            ("Area50", 0.167, "userA", 1),
            ("Area25", 0.083, "userB", 2),
            ("Area20", 0.067, "userC", 3),
            ("Area15", 0.05, "userC", 3),
            ("Area10", 0.033, "userC", 3),
            ("Area5", 0.017, "userC", 3),
        ];
        assert_eq!(assignments.len(), expected.len());
        for (assignment, (name, ratio, author, rank)) in assignments.iter().zip(expected) {
            assert_eq!(assignment.area.name, name);
            assert_eq!(assignment.ratio, ratio);
            assert_eq!(assignment.author.as_deref(), Some(author));
            assert_eq!(assignment.rank, rank);
        }

        let total: f64 = assignments.iter().map(|a| a.ratio).sum();
        assert_eq!(total, 1.0);
    }

    #[test]
    fn test_empty_attribution() {
        let result = line_counts(&[]);
        let err = allocate_areas(&test_areas(), &result).unwrap_err();
        assert!(matches!(err, AppError::EmptyAttribution { commit, filter } if commit == "abc" && filter == ".+"));
    }

    #[test]
    fn test_zero_area_size() {
        let result = line_counts(&[("userA", 1)]);
        let empty = AreaInfo::new("Nowhere", vec![]);
        assert!(matches!(allocate_areas(&empty, &result), Err(AppError::Config(_))));

        let zero = AreaInfo::new("Zero", vec![Area::new("a", 0.0)]);
        assert!(matches!(allocate_areas(&zero, &result), Err(AppError::Config(_))));
    }

    #[test]
    fn test_area_larger_than_any_share_is_unassigned() {
        // Each author owns a quarter; the first area is half the map.
        let result = line_counts(&[("a", 1), ("b", 1), ("c", 1), ("d", 1)]);
        let info = AreaInfo::new(
            "Test",
            vec![Area::new("big", 2.0), Area::new("small", 1.0), Area::new("tail", 1.0)],
        );
        let assignments = allocate_areas(&info, &result).unwrap();

        assert_eq!(assignments[0].author, None);
        assert_eq!(assignments[0].rank, 0);
        assert_eq!(assignments[0].ratio, 0.5);
        assert_eq!(assignments[1].author.as_deref(), Some("a"));
        assert_eq!(assignments[2].author.as_deref(), Some("b"));
        assert_eq!(assignments[2].ratio, 0.25);
    }

    #[test]
    fn test_residual_goes_to_last_area_even_if_unassigned() {
        let result = line_counts(&[("a", 1), ("b", 2)]);
        let info = AreaInfo::new(
            "Thirds",
            vec![Area::new("x", 1.0), Area::new("y", 1.0), Area::new("z", 1.0)],
        );
        let assignments = allocate_areas(&info, &result).unwrap();
        let ratios: Vec<f64> = assignments.iter().map(|a| a.ratio).collect();
        assert_eq!(ratios, vec![0.333, 0.333, 0.333 + 0.001]);

        let result = line_counts(&[("a", 1), ("b", 1), ("c", 1), ("d", 100)]);
        let info = AreaInfo::new(
            "Thirds",
            vec![Area::new("x", 1.0), Area::new("y", 1.0), Area::new("z", 1.0)],
        );
        let assignments = allocate_areas(&info, &result).unwrap();
        assert_eq!(assignments[2].author, None);
        assert_eq!(assignments[2].ratio, 0.333 + 0.001);
    }

    #[test]
    fn test_rank_ties_break_by_identity() {
        let result = line_counts(&[("carol", 5), ("bob", 5), ("alice", 5), ("dave", 9)]);
        let ranks = rank_authors(&result.lines_by_author);
        let order: Vec<(&str, usize)> = ranks.iter().map(|r| (r.author.as_str(), r.rank)).collect();
        assert_eq!(order, vec![("dave", 1), ("alice", 2), ("bob", 3), ("carol", 4)]);
    }

    proptest! {
        #[test]
        fn prop_allocation_invariants(
            lines in proptest::collection::vec(1usize..1_000, 1..12),
            sizes in proptest::collection::vec(1u32..10_000, 1..50),
        ) {
            let counts: Vec<(String, usize)> = lines
                .iter()
                .enumerate()
                .map(|(i, l)| (format!("author{:02}", i), *l))
                .collect();
            let mut result = LineCountResult::new("abc", Regex::new(".+").unwrap());
            for (author, l) in &counts {
                result.lines_by_author.insert(author.clone(), *l);
            }
            let info = AreaInfo::new(
                "Prop",
                sizes.iter().enumerate().map(|(i, s)| Area::new(format!("a{}", i), *s as f64)).collect(),
            );

            let assignments = allocate_areas(&info, &result).unwrap();
            let again = allocate_areas(&info, &result).unwrap();
            prop_assert_eq!(&assignments, &again);
            prop_assert_eq!(assignments.len(), info.areas.len());

            let total: f64 = assignments.iter().map(|a| a.ratio).sum();
            prop_assert!((total - 1.0).abs() < 1e-9, "ratios sum to {}", total);

            // Replay the raw ratios: no author ever exceeds their line share.
            let ranks = rank_authors(&result.lines_by_author);
            let total_size = info.total_size();
            let mut assigned: BTreeMap<&str, f64> = BTreeMap::new();
            for (area, assignment) in info.areas.iter().zip(&assignments) {
                if let Some(author) = &assignment.author {
                    let entry = assigned.entry(author.as_str()).or_insert(0.0);
                    *entry += area.size / total_size;
                    let rank = ranks.iter().find(|r| &r.author == author).unwrap();
                    prop_assert!(*entry <= rank.lines_ratio);
                    prop_assert_eq!(rank.rank, assignment.rank);
                } else {
                    prop_assert_eq!(assignment.rank, 0);
                }
            }
        }
    }
}
