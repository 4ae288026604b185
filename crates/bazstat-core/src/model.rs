//! Marketplace data model: snapshot id, resource types, catalog entries, download index.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

/// Content hash naming one version-pinned bazaar snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnapshotId(String);

impl SnapshotId {
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Marketplace category. Declaration order is the canonical concatenation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Plugin,
    Template,
    Theme,
    Widget,
}

impl ResourceType {
    pub const ALL: [ResourceType; 4] = [
        ResourceType::Plugin,
        ResourceType::Template,
        ResourceType::Theme,
        ResourceType::Widget,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceType::Plugin => "plugin",
            ResourceType::Template => "template",
            ResourceType::Theme => "theme",
            ResourceType::Widget => "widget",
        }
    }

    /// File stem of this category's stage catalog (`plugins` for `plugins.json`).
    pub fn catalog_stem(self) -> &'static str {
        match self {
            ResourceType::Plugin => "plugins",
            ResourceType::Template => "templates",
            ResourceType::Theme => "themes",
            ResourceType::Widget => "widgets",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        ResourceType::ALL
            .into_iter()
            .find(|t| t.as_str() == lower || t.catalog_stem() == lower)
            .ok_or_else(|| {
                format!("unknown resource type: {s} (expected plugin, template, theme or widget)")
            })
    }
}

/// `package` object of a catalog entry. Every field may be absent upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PackageInfo {
    pub name: String,
    pub version: String,
    pub author: String,
    /// Locale (e.g. "default", "zh_CN", "en_US") to display name.
    pub display_name: BTreeMap<String, String>,
    pub url: String,
}

/// One marketplace listing, tagged with the catalog it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceEntry {
    /// `owner/repo@ref`; `None` when the upstream entry lacks it.
    pub url: Option<String>,
    pub package: PackageInfo,
    #[serde(rename = "type")]
    pub kind: ResourceType,
    pub stars: u64,
    pub open_issues: u64,
    pub updated: String,
    pub size: u64,
    pub install_size: u64,
}

impl ResourceEntry {
    /// Bare entry with only a url and package, as used by tests and fixtures.
    pub fn new(kind: ResourceType, url: Option<&str>, package: PackageInfo) -> Self {
        Self {
            url: url.map(str::to_string),
            package,
            kind,
            stars: 0,
            open_issues: 0,
            updated: String::new(),
            size: 0,
            install_size: 0,
        }
    }
}

/// Per-repository statistics in the download index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DownloadStat {
    pub downloads: u64,
}

/// A count that is absent, null, negative, fractional or not a number reads as 0,
/// so one bad entry never fails the whole index.
impl<'de> Deserialize<'de> for DownloadStat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        let downloads = value
            .get("downloads")
            .and_then(serde_json::Value::as_u64)
            .unwrap_or(0);
        Ok(Self { downloads })
    }
}

/// Repository key (`owner/repo`) to download statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DownloadIndex(HashMap<String, DownloadStat>);

impl DownloadIndex {
    /// Download count for `repo_key`; 0 when the key is not indexed.
    pub fn downloads(&self, repo_key: &str) -> u64 {
        self.0.get(repo_key).map(|s| s.downloads).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, u64)> for DownloadIndex {
    fn from_iter<I: IntoIterator<Item = (K, u64)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, downloads)| (k.into(), DownloadStat { downloads }))
                .collect(),
        )
    }
}

/// The four stage catalogs of one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalogs {
    pub plugins: Vec<ResourceEntry>,
    pub templates: Vec<ResourceEntry>,
    pub themes: Vec<ResourceEntry>,
    pub widgets: Vec<ResourceEntry>,
}

impl Catalogs {
    pub fn get(&self, kind: ResourceType) -> &[ResourceEntry] {
        match kind {
            ResourceType::Plugin => &self.plugins,
            ResourceType::Template => &self.templates,
            ResourceType::Theme => &self.themes,
            ResourceType::Widget => &self.widgets,
        }
    }

    /// All entries: plugins, templates, themes, widgets; source order within each.
    pub fn iter(&self) -> impl Iterator<Item = &ResourceEntry> + '_ {
        ResourceType::ALL.into_iter().flat_map(move |k| self.get(k).iter())
    }

    pub fn len(&self) -> usize {
        ResourceType::ALL.into_iter().map(|k| self.get(k).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Everything one activation fetches: snapshot id, download index, catalogs.
#[derive(Debug, Clone)]
pub struct BazaarData {
    pub snapshot: SnapshotId,
    pub download_index: DownloadIndex,
    pub catalogs: Catalogs,
}
