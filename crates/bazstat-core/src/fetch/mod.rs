//! Remote catalog fetching.
//!
//! Resolves the bazaar snapshot for a host version, fetches the download index,
//! and fetches the four stage catalogs of that snapshot. Each GET is a blocking
//! libcurl transfer on the tokio blocking pool; independent requests are joined
//! concurrently and any failure aborts the whole load.

mod endpoints;
mod http;
mod parse;

pub use endpoints::Endpoints;

use crate::config::{BazstatConfig, HttpConfig, ServerConfig};
use crate::error::BazaarError;
use crate::model::{BazaarData, Catalogs, DownloadIndex, ResourceEntry, ResourceType, SnapshotId};

/// Fetches snapshot id, download index and catalogs from the configured servers.
#[derive(Debug, Clone)]
pub struct CatalogFetcher {
    endpoints: Endpoints,
    limits: HttpConfig,
}

impl CatalogFetcher {
    pub fn new(servers: &ServerConfig, limits: HttpConfig) -> Self {
        Self {
            endpoints: Endpoints::new(servers),
            limits,
        }
    }

    pub fn from_config(cfg: &BazstatConfig) -> Self {
        Self::new(&cfg.servers, cfg.http_or_default())
    }

    async fn get(&self, url: String) -> Result<Vec<u8>, BazaarError> {
        let limits = self.limits.clone();
        tokio::task::spawn_blocking({
            let url = url.clone();
            move || http::get_body(&url, &limits)
        })
        .await
        .map_err(|source| BazaarError::Task { url, source })?
    }

    /// Resolve the bazaar snapshot hash pinned to `host_version`.
    pub async fn resolve_snapshot(&self, host_version: &str) -> Result<SnapshotId, BazaarError> {
        let url = self.endpoints.version_url(host_version)?;
        let body = self.get(url.clone()).await?;
        let snapshot = parse::parse_snapshot(&url, &body)?;
        tracing::info!("host version {} resolved to bazaar snapshot {}", host_version, snapshot);
        Ok(snapshot)
    }

    pub async fn fetch_download_index(&self) -> Result<DownloadIndex, BazaarError> {
        let url = self.endpoints.download_index_url();
        let body = self.get(url.clone()).await?;
        let index = parse::parse_download_index(&url, &body)?;
        tracing::debug!("download index has {} repositories", index.len());
        Ok(index)
    }

    /// Fetch one stage catalog, each entry tagged with `kind`.
    pub async fn fetch_catalog(
        &self,
        snapshot: &SnapshotId,
        kind: ResourceType,
    ) -> Result<Vec<ResourceEntry>, BazaarError> {
        let url = self.endpoints.catalog_url(snapshot, kind);
        let body = self.get(url.clone()).await?;
        let entries = parse::parse_catalog(&url, &body, kind)?;
        tracing::debug!("{} catalog: {} entries", kind, entries.len());
        Ok(entries)
    }

    /// Fetch all four catalogs concurrently. Any failure aborts; no partial result.
    pub async fn fetch_catalogs(&self, snapshot: &SnapshotId) -> Result<Catalogs, BazaarError> {
        let (plugins, templates, themes, widgets) = tokio::try_join!(
            self.fetch_catalog(snapshot, ResourceType::Plugin),
            self.fetch_catalog(snapshot, ResourceType::Template),
            self.fetch_catalog(snapshot, ResourceType::Theme),
            self.fetch_catalog(snapshot, ResourceType::Widget),
        )?;
        Ok(Catalogs {
            plugins,
            templates,
            themes,
            widgets,
        })
    }

    /// Full load: snapshot and download index concurrently, then the catalogs
    /// (whose URLs need the snapshot id).
    pub async fn fetch_all(&self, host_version: &str) -> Result<BazaarData, BazaarError> {
        let (snapshot, download_index) = tokio::try_join!(
            self.resolve_snapshot(host_version),
            self.fetch_download_index(),
        )?;
        let catalogs = self.fetch_catalogs(&snapshot).await?;
        tracing::info!(
            "loaded snapshot {}: {} catalog entries, {} indexed repositories",
            snapshot,
            catalogs.len(),
            download_index.len()
        );
        Ok(BazaarData {
            snapshot,
            download_index,
            catalogs,
        })
    }
}
