//! CLI command handlers, one file per command plus shared loading helpers.

mod chart;
mod completions;
mod prefs;
mod rank;
mod repos;
mod snapshot;

pub use completions::{run_completions, run_manpage};
pub use prefs::{run_set_user, run_show_prefs};
pub use rank::{run_rank, RankOptions};
pub use repos::{run_repos, ReposOptions};
pub use snapshot::run_snapshot;

use anyhow::{Context, Result};
use bazstat_core::config::BazstatConfig;
use bazstat_core::fetch::CatalogFetcher;
use bazstat_core::prefs::PreferenceStore;
use bazstat_core::session::{LoadedStats, StatsSession};
use std::sync::Arc;

/// Host version from the command line, else from config.
fn host_version<'a>(cfg: &'a BazstatConfig, arg: Option<&'a str>) -> &'a str {
    arg.map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(&cfg.host_version)
}

/// Fetch and aggregate everything for one activation.
async fn load_stats(cfg: &BazstatConfig, host_version_arg: Option<&str>) -> Result<Arc<LoadedStats>> {
    let version = host_version(cfg, host_version_arg);
    let session = StatsSession::new(CatalogFetcher::from_config(cfg), version);
    let stats = session
        .refresh()
        .await
        .with_context(|| format!("load bazaar stats for SiYuan {version}"))?;
    if !stats.aggregation.skipped.is_empty() {
        eprintln!(
            "note: {} catalog entries skipped (unusable url)",
            stats.aggregation.skipped.len()
        );
    }
    Ok(stats)
}

/// Username from `--user`, else the saved preference.
fn resolve_username(arg: Option<&str>, store: &dyn PreferenceStore) -> Result<String> {
    if let Some(user) = arg.map(str::trim).filter(|u| !u.is_empty()) {
        return Ok(user.to_string());
    }
    let prefs = store.load()?;
    match prefs.username() {
        Some(user) => Ok(user.to_string()),
        None => anyhow::bail!("no username given; pass --user or run `bazstat set-user <name>`"),
    }
}
