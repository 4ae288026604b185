//! Filtering, totals and rankings over aggregated repos.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use super::AggregatedRepo;
use crate::model::ResourceType;

/// Type selector: one category or all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Only(ResourceType),
}

impl TypeFilter {
    pub fn matches(self, kind: ResourceType) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(k) => k == kind,
        }
    }
}

impl FromStr for TypeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(TypeFilter::All);
        }
        s.parse::<ResourceType>().map(TypeFilter::Only)
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeFilter::All => f.pad("all"),
            TypeFilter::Only(k) => fmt::Display::fmt(k, f),
        }
    }
}

/// Repos whose derived username equals `username` exactly (case-sensitive).
pub fn by_username<'a, I>(repos: I, username: &str) -> Vec<&'a AggregatedRepo>
where
    I: IntoIterator<Item = &'a AggregatedRepo>,
{
    repos.into_iter().filter(|r| r.username == username).collect()
}

pub fn by_type<'a, I>(repos: I, filter: TypeFilter) -> Vec<&'a AggregatedRepo>
where
    I: IntoIterator<Item = &'a AggregatedRepo>,
{
    repos.into_iter().filter(|r| filter.matches(r.kind())).collect()
}

pub fn total_downloads<'a, I>(repos: I) -> u64
where
    I: IntoIterator<Item = &'a AggregatedRepo>,
{
    repos
        .into_iter()
        .fold(0u64, |acc, r| acc.saturating_add(r.downloads))
}

/// One row of the author ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorRank {
    pub username: String,
    pub total_downloads: u64,
    pub repo_count: usize,
}

/// Authors by total downloads, descending. Ties keep first-encountered order.
pub fn rank_by_username<'a, I>(repos: I) -> Vec<AuthorRank>
where
    I: IntoIterator<Item = &'a AggregatedRepo>,
{
    let mut ranks: Vec<AuthorRank> = Vec::new();
    let mut slot: HashMap<&'a str, usize> = HashMap::new();
    for r in repos {
        let i = *slot.entry(r.username.as_str()).or_insert_with(|| {
            ranks.push(AuthorRank {
                username: r.username.clone(),
                total_downloads: 0,
                repo_count: 0,
            });
            ranks.len() - 1
        });
        ranks[i].total_downloads = ranks[i].total_downloads.saturating_add(r.downloads);
        ranks[i].repo_count += 1;
    }
    // sort_by is stable
    ranks.sort_by(|a, b| b.total_downloads.cmp(&a.total_downloads));
    ranks
}

/// Individual repos by downloads, descending. Ties keep input order.
pub fn rank_repos<'a, I>(repos: I) -> Vec<&'a AggregatedRepo>
where
    I: IntoIterator<Item = &'a AggregatedRepo>,
{
    let mut out: Vec<&AggregatedRepo> = repos.into_iter().collect();
    out.sort_by(|a, b| b.downloads.cmp(&a.downloads));
    out
}

/// Count and downloads of one resource type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeTotal {
    #[serde(rename = "type")]
    pub kind: ResourceType,
    pub count: usize,
    pub downloads: u64,
}

/// Per-type totals in canonical type order; types with no repos are omitted.
pub fn type_breakdown<'a, I>(repos: I) -> Vec<TypeTotal>
where
    I: IntoIterator<Item = &'a AggregatedRepo>,
{
    let mut totals: Vec<TypeTotal> = ResourceType::ALL
        .into_iter()
        .map(|kind| TypeTotal {
            kind,
            count: 0,
            downloads: 0,
        })
        .collect();
    for r in repos {
        if let Some(t) = totals.iter_mut().find(|t| t.kind == r.kind()) {
            t.count += 1;
            t.downloads = t.downloads.saturating_add(r.downloads);
        }
    }
    totals.retain(|t| t.count > 0);
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PackageInfo, ResourceEntry};

    fn repo(kind: ResourceType, username: &str, name: &str, downloads: u64) -> AggregatedRepo {
        let key = format!("{username}/{name}");
        AggregatedRepo {
            entry: ResourceEntry::new(kind, Some(&format!("{key}@v1")), PackageInfo::default()),
            repo_key: key,
            username: username.to_string(),
            downloads,
        }
    }

    fn sample() -> Vec<AggregatedRepo> {
        vec![
            repo(ResourceType::Plugin, "alice", "p1", 10),
            repo(ResourceType::Theme, "bob", "t1", 7),
            repo(ResourceType::Theme, "alice", "t2", 3),
            repo(ResourceType::Widget, "Alice", "w1", 100),
            repo(ResourceType::Template, "bob", "tp", 0),
        ]
    }

    #[test]
    fn by_username_is_exact_and_case_sensitive() {
        let repos = sample();
        let alice = by_username(&repos, "alice");
        assert_eq!(alice.len(), 2);
        assert!(alice.iter().all(|r| r.username == "alice"));
        assert!(by_username(&repos, "nobody").is_empty());
    }

    #[test]
    fn by_type_ignores_user() {
        let repos = sample();
        let themes = by_type(&repos, TypeFilter::Only(ResourceType::Theme));
        assert_eq!(themes.len(), 2);
        assert!(themes.iter().all(|r| r.kind() == ResourceType::Theme));
        assert_eq!(by_type(&repos, TypeFilter::All).len(), repos.len());
    }

    #[test]
    fn total_of_user_matches_manual_sum() {
        let repos = sample();
        for user in ["alice", "bob", "Alice", "nobody"] {
            let expected: u64 = repos
                .iter()
                .filter(|r| r.username == user)
                .map(|r| r.downloads)
                .sum();
            assert_eq!(total_downloads(by_username(&repos, user)), expected);
        }
    }

    #[test]
    fn views_compose() {
        let repos = sample();
        let alice = by_username(&repos, "alice");
        let alice_themes = by_type(alice.iter().copied(), TypeFilter::Only(ResourceType::Theme));
        assert_eq!(alice_themes.len(), 1);
        assert_eq!(total_downloads(alice_themes), 3);
    }

    #[test]
    fn rank_ties_keep_first_seen_order() {
        let repos = vec![
            repo(ResourceType::Plugin, "a", "x", 4),
            repo(ResourceType::Plugin, "c", "y", 5),
            repo(ResourceType::Theme, "b", "z", 10),
            repo(ResourceType::Theme, "a", "w", 6),
        ];
        let ranks = rank_by_username(&repos);
        let order: Vec<(&str, u64)> = ranks
            .iter()
            .map(|r| (r.username.as_str(), r.total_downloads))
            .collect();
        assert_eq!(order, vec![("a", 10), ("b", 10), ("c", 5)]);
        assert_eq!(ranks[0].repo_count, 2);
    }

    #[test]
    fn rank_is_descending() {
        let ranks = rank_by_username(&sample());
        assert!(ranks
            .windows(2)
            .all(|w| w[0].total_downloads >= w[1].total_downloads));
        assert_eq!(ranks[0].username, "Alice");
    }

    #[test]
    fn rank_repos_descending_stable() {
        let repos = vec![
            repo(ResourceType::Plugin, "a", "one", 1),
            repo(ResourceType::Plugin, "a", "two", 5),
            repo(ResourceType::Plugin, "b", "three", 5),
        ];
        let keys: Vec<&str> = rank_repos(&repos)
            .into_iter()
            .map(|r| r.repo_key.as_str())
            .collect();
        assert_eq!(keys, vec!["a/two", "b/three", "a/one"]);
    }

    #[test]
    fn breakdown_in_canonical_order_without_empty_types() {
        let repos = sample();
        let alice = by_username(&repos, "alice");
        let breakdown = type_breakdown(alice.iter().copied());
        assert_eq!(
            breakdown,
            vec![
                TypeTotal {
                    kind: ResourceType::Plugin,
                    count: 1,
                    downloads: 10
                },
                TypeTotal {
                    kind: ResourceType::Theme,
                    count: 1,
                    downloads: 3
                },
            ]
        );
    }

    #[test]
    fn type_filter_parses() {
        assert_eq!("all".parse::<TypeFilter>(), Ok(TypeFilter::All));
        assert_eq!(
            "theme".parse::<TypeFilter>(),
            Ok(TypeFilter::Only(ResourceType::Theme))
        );
        assert!("everything".parse::<TypeFilter>().is_err());
        assert_eq!(TypeFilter::Only(ResourceType::Plugin).to_string(), "plugin");
    }

    #[test]
    fn totals_saturate() {
        let repos = vec![
            repo(ResourceType::Plugin, "a", "x", u64::MAX),
            repo(ResourceType::Plugin, "a", "y", 1),
        ];
        assert_eq!(total_downloads(&repos), u64::MAX);
    }
}
