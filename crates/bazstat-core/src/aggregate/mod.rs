//! Join catalogs against the download index and derive per-author views.
//!
//! [`aggregate`] is pure: it takes the fetched catalogs and index and returns
//! a fresh [`Aggregation`] each call. Entries whose url cannot be split into
//! `owner/repo@ref` are skipped and reported in [`Aggregation::skipped`].

mod repo_key;
mod views;

pub use repo_key::{parse_repo_key, RepoKey};
pub use views::{
    by_type, by_username, rank_by_username, rank_repos, total_downloads, type_breakdown,
    AuthorRank, TypeFilter, TypeTotal,
};

use serde::Serialize;

use crate::error::LookupError;
use crate::model::{Catalogs, DownloadIndex, ResourceEntry, ResourceType};

/// A catalog entry annotated with its owner and download count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedRepo {
    #[serde(flatten)]
    pub entry: ResourceEntry,
    /// `owner/repo`.
    pub repo_key: String,
    /// Owner segment of the repository key.
    pub username: String,
    /// Download count from the index; 0 when not indexed.
    pub downloads: u64,
}

impl AggregatedRepo {
    pub fn kind(&self) -> ResourceType {
        self.entry.kind
    }

    /// Name for display: `locale`, then `default`, then package name, then repo key.
    pub fn display_name(&self, locale: Option<&str>) -> &str {
        let names = &self.entry.package.display_name;
        locale
            .and_then(|l| names.get(l))
            .or_else(|| names.get("default"))
            .map(String::as_str)
            .filter(|n| !n.trim().is_empty())
            .or_else(|| Some(self.entry.package.name.as_str()).filter(|n| !n.is_empty()))
            .unwrap_or(&self.repo_key)
    }
}

/// Catalog entry left out of the aggregation because its url is unusable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub kind: ResourceType,
    /// Position within its catalog.
    pub index: usize,
    pub url: Option<String>,
    pub error: LookupError,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregation {
    /// Plugins, templates, themes, widgets; source order within each.
    pub repos: Vec<AggregatedRepo>,
    pub skipped: Vec<SkippedEntry>,
}

/// Annotate every catalog entry with username and downloads.
pub fn aggregate(catalogs: &Catalogs, index: &DownloadIndex) -> Aggregation {
    let mut out = Aggregation {
        repos: Vec::with_capacity(catalogs.len()),
        skipped: Vec::new(),
    };

    for kind in ResourceType::ALL {
        for (i, entry) in catalogs.get(kind).iter().enumerate() {
            match parse_repo_key(entry.url.as_deref()) {
                Ok(key) => {
                    let downloads = index.downloads(key.as_str());
                    let username = key.owner().to_string();
                    out.repos.push(AggregatedRepo {
                        entry: entry.clone(),
                        repo_key: key.into_string(),
                        username,
                        downloads,
                    });
                }
                Err(error) => {
                    tracing::warn!("skipping {} #{}: {}", kind, i, error);
                    out.skipped.push(SkippedEntry {
                        kind,
                        index: i,
                        url: entry.url.clone(),
                        error,
                    });
                }
            }
        }
    }

    tracing::debug!(
        "aggregated {} repos ({} skipped)",
        out.repos.len(),
        out.skipped.len()
    );
    out
}
