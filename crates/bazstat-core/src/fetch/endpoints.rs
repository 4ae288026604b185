//! URLs of the version, download-index and stage-catalog endpoints.

use crate::config::ServerConfig;
use crate::error::BazaarError;
use crate::model::{ResourceType, SnapshotId};

/// Endpoint builder over the configured server roots (trailing `/` trimmed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    aliyun_server: String,
    bazaar_stat_server: String,
    bazaar_oss_server: String,
}

impl Endpoints {
    pub fn new(servers: &ServerConfig) -> Self {
        let trim = |s: &str| s.trim().trim_end_matches('/').to_string();
        Self {
            aliyun_server: trim(&servers.aliyun_server),
            bazaar_stat_server: trim(&servers.bazaar_stat_server),
            bazaar_oss_server: trim(&servers.bazaar_oss_server),
        }
    }

    /// `{aliyun}/apis/siyuan/version?ver={host_version}` with the version query-encoded.
    pub fn version_url(&self, host_version: &str) -> Result<String, BazaarError> {
        let base = format!("{}/apis/siyuan/version", self.aliyun_server);
        let url = url::Url::parse_with_params(&base, &[("ver", host_version)])
            .map_err(|source| BazaarError::InvalidEndpoint { url: base, source })?;
        Ok(url.into())
    }

    pub fn download_index_url(&self) -> String {
        format!("{}/bazaar/index.json", self.bazaar_stat_server)
    }

    /// `{oss}/bazaar@{snapshot}/stage/{plugins|templates|themes|widgets}.json`.
    pub fn catalog_url(&self, snapshot: &SnapshotId, kind: ResourceType) -> String {
        format!(
            "{}/bazaar@{}/stage/{}.json",
            self.bazaar_oss_server,
            snapshot,
            kind.catalog_stem()
        )
    }
}
