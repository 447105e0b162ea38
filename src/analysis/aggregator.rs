//! Repository aggregation and statistics.
//!
//! This module turns a repository listing into the numbers shown on the
//! dashboard: total stars, the most used languages and the most starred
//! repositories.

use crate::models::{AggregationResult, LanguageCount, Repository};
use std::cmp::Reverse;
use std::collections::HashMap;

/// Number of entries kept in each ranking.
pub const TOP_N: usize = 5;

/// Compute all dashboard statistics for a repository listing.
pub fn aggregate(repos: &[Repository]) -> AggregationResult {
    let counts = language_counts(repos);
    let labeled_repositories = counts.iter().map(|c| c.count).sum();

    AggregationResult {
        total_stars: total_stars(repos),
        top_languages: rank_languages(counts, TOP_N),
        top_repositories: top_repositories(repos, TOP_N),
        labeled_repositories,
    }
}

/// Sum of star counts.
pub fn total_stars(repos: &[Repository]) -> u64 {
    repos.iter().map(|r| r.stargazers_count).sum()
}

/// Count repositories per language, in order of first appearance.
///
/// Repositories without a language label are skipped.
pub fn language_counts(repos: &[Repository]) -> Vec<LanguageCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<LanguageCount> = Vec::new();

    for lang in repos.iter().filter_map(Repository::language_label) {
        match index.get(lang) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(lang, counts.len());
                counts.push(LanguageCount {
                    language: lang.to_string(),
                    count: 1,
                });
            }
        }
    }

    counts
}

/// Order languages by descending count and keep the first `n`.
///
/// The sort is stable: equal counts keep first-appearance order.
pub fn rank_languages(mut counts: Vec<LanguageCount>, n: usize) -> Vec<LanguageCount> {
    counts.sort_by_key(|c| Reverse(c.count));
    counts.truncate(n);
    counts
}

/// Get the `n` most starred repositories.
///
/// Equal star counts keep their listing order.
pub fn top_repositories(repos: &[Repository], n: usize) -> Vec<Repository> {
    let mut sorted = repos.to_vec();
    sorted.sort_by_key(|r| Reverse(r.stargazers_count));
    sorted.truncate(n);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo(id: u64, stars: u64, language: Option<&str>) -> Repository {
        Repository {
            id,
            name: format!("repo-{}", id),
            html_url: format!("https://github.com/test/repo-{}", id),
            stargazers_count: stars,
            forks_count: 0,
            language: language.map(String::from),
            description: None,
        }
    }

    fn labels(result: &AggregationResult) -> Vec<(&str, usize)> {
        result
            .top_languages
            .iter()
            .map(|c| (c.language.as_str(), c.count))
            .collect()
    }

    #[test]
    fn test_single_user_scenario() {
        let repos = vec![
            repo(1, 10, Some("C")),
            repo(2, 50, Some("C")),
            repo(3, 5, None),
        ];

        let result = aggregate(&repos);

        assert_eq!(result.total_stars, 65);
        assert_eq!(labels(&result), vec![("C", 2)]);
        assert_eq!(result.labeled_repositories, 2);
        assert_eq!(result.language_share(&result.top_languages[0]), 100.0);

        let stars: Vec<u64> = result
            .top_repositories
            .iter()
            .map(|r| r.stargazers_count)
            .collect();
        assert_eq!(stars, vec![50, 10, 5]);
    }

    #[test]
    fn test_empty_listing() {
        let result = aggregate(&[]);

        assert_eq!(result.total_stars, 0);
        assert!(result.top_languages.is_empty());
        assert!(result.top_repositories.is_empty());
        assert_eq!(result.labeled_repositories, 0);
    }

    #[test]
    fn test_total_stars_is_sum() {
        let repos: Vec<Repository> = (0..40).map(|i| repo(i, i * 3, Some("Go"))).collect();
        let expected: u64 = (0..40).map(|i| i * 3).sum();
        assert_eq!(aggregate(&repos).total_stars, expected);
    }

    #[test]
    fn test_language_ties_keep_first_appearance() {
        // Python appears first, then Rust, then Go; all tie at 2 except Go.
        let repos = vec![
            repo(1, 0, Some("Python")),
            repo(2, 0, Some("Rust")),
            repo(3, 0, Some("Go")),
            repo(4, 0, Some("Rust")),
            repo(5, 0, Some("Python")),
            repo(6, 0, Some("Go")),
            repo(7, 0, Some("Go")),
        ];

        let result = aggregate(&repos);
        assert_eq!(
            labels(&result),
            vec![("Go", 3), ("Python", 2), ("Rust", 2)]
        );
    }

    #[test]
    fn test_language_ties_many_labels() {
        // Enough equal counts that an unstable sort would be free to reorder.
        let names = ["A", "B", "C", "D", "E", "F", "G", "H", "I", "J"];
        let repos: Vec<Repository> = names
            .iter()
            .enumerate()
            .map(|(i, n)| repo(i as u64, 0, Some(*n)))
            .collect();

        let result = aggregate(&repos);
        assert_eq!(
            labels(&result),
            vec![("A", 1), ("B", 1), ("C", 1), ("D", 1), ("E", 1)]
        );
    }

    #[test]
    fn test_unlabeled_excluded_from_share() {
        let repos = vec![
            repo(1, 0, Some("Rust")),
            repo(2, 0, None),
            repo(3, 0, Some("")),
            repo(4, 0, Some("Rust")),
            repo(5, 0, Some("Shell")),
            repo(6, 0, None),
        ];

        let result = aggregate(&repos);
        assert_eq!(labels(&result), vec![("Rust", 2), ("Shell", 1)]);
        assert_eq!(result.labeled_repositories, 3);

        let share = result.language_share(&result.top_languages[0]);
        assert!((share - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_share_denominator_counts_languages_outside_top_five() {
        let mut repos = Vec::new();
        let mut id = 0;
        for (lang, n) in [("A", 4), ("B", 3), ("C", 2), ("D", 2), ("E", 2), ("F", 1), ("G", 1)] {
            for _ in 0..n {
                repos.push(repo(id, 0, Some(lang)));
                id += 1;
            }
        }

        let result = aggregate(&repos);
        assert_eq!(result.top_languages.len(), TOP_N);
        assert_eq!(result.labeled_repositories, 15);
        assert!((result.language_share(&result.top_languages[0]) - 400.0 / 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_top_repositories_stable_and_truncated() {
        let repos = vec![
            repo(1, 7, None),
            repo(2, 9, None),
            repo(3, 7, None),
            repo(4, 1, None),
            repo(5, 9, None),
            repo(6, 7, None),
            repo(7, 0, None),
        ];

        let top = top_repositories(&repos, TOP_N);
        let ids: Vec<u64> = top.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 5, 1, 3, 6]);
    }

    #[test]
    fn test_language_counts_first_appearance_order() {
        let repos = vec![
            repo(1, 0, Some("Zig")),
            repo(2, 0, None),
            repo(3, 0, Some("Ada")),
            repo(4, 0, Some("Zig")),
        ];

        let counts = language_counts(&repos);
        assert_eq!(counts[0].language, "Zig");
        assert_eq!(counts[0].count, 2);
        assert_eq!(counts[1].language, "Ada");
    }
}
