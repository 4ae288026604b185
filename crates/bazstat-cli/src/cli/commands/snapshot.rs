//! `bazstat snapshot` – print the bazaar snapshot hash for a SiYuan version.

use anyhow::{Context, Result};
use bazstat_core::config::BazstatConfig;
use bazstat_core::fetch::CatalogFetcher;

use super::host_version;

pub async fn run_snapshot(cfg: &BazstatConfig, host_version_arg: Option<&str>) -> Result<()> {
    let version = host_version(cfg, host_version_arg);
    let snapshot = CatalogFetcher::from_config(cfg)
        .resolve_snapshot(version)
        .await
        .with_context(|| format!("resolve bazaar snapshot for SiYuan {version}"))?;
    println!("{snapshot}");
    Ok(())
}
