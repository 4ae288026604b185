//! Parse endpoint response bodies into model types.

use serde::Deserialize;

use crate::error::BazaarError;
use crate::model::{DownloadIndex, PackageInfo, ResourceEntry, ResourceType, SnapshotId};

#[derive(Debug, Deserialize)]
struct VersionResponse {
    #[serde(default)]
    bazaar: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StageCatalog {
    #[serde(default)]
    repos: Option<Vec<StageRepo>>,
}

/// One element of a stage catalog's `repos` array.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct StageRepo {
    url: Option<String>,
    package: PackageInfo,
    stars: u64,
    open_issues: u64,
    updated: String,
    size: u64,
    install_size: u64,
}

impl StageRepo {
    fn into_entry(self, kind: ResourceType) -> ResourceEntry {
        ResourceEntry {
            url: self.url,
            package: self.package,
            kind,
            stars: self.stars,
            open_issues: self.open_issues,
            updated: self.updated,
            size: self.size,
            install_size: self.install_size,
        }
    }
}

fn json<'a, T: Deserialize<'a>>(url: &str, body: &'a [u8]) -> Result<T, BazaarError> {
    serde_json::from_slice(body).map_err(|source| BazaarError::Parse {
        url: url.to_string(),
        source,
    })
}

/// Extract the bazaar hash from a version-resolution response.
pub(crate) fn parse_snapshot(url: &str, body: &[u8]) -> Result<SnapshotId, BazaarError> {
    let resp: VersionResponse = json(url, body)?;
    let hash = match resp.bazaar.as_deref().map(str::trim) {
        Some(hash) if !hash.is_empty() => hash,
        _ => {
            return Err(BazaarError::MissingField {
                url: url.to_string(),
                field: "bazaar",
            })
        }
    };
    // The hash becomes a URL path segment.
    if !hash.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(BazaarError::InvalidSnapshot {
            url: url.to_string(),
            hash: hash.to_string(),
        });
    }
    Ok(SnapshotId::new(hash))
}

pub(crate) fn parse_download_index(url: &str, body: &[u8]) -> Result<DownloadIndex, BazaarError> {
    json(url, body)
}

/// Parse a stage catalog and tag every entry with `kind`. Source order is kept.
pub(crate) fn parse_catalog(
    url: &str,
    body: &[u8],
    kind: ResourceType,
) -> Result<Vec<ResourceEntry>, BazaarError> {
    let catalog: StageCatalog = json(url, body)?;
    let repos = catalog.repos.ok_or_else(|| BazaarError::MissingField {
        url: url.to_string(),
        field: "repos",
    })?;
    Ok(repos.into_iter().map(|r| r.into_entry(kind)).collect())
}
