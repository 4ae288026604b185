//! `bazstat rank` – authors ranked by total downloads, as a bar chart.

use anyhow::Result;
use bazstat_core::aggregate::{by_type, rank_by_username, AuthorRank, TypeFilter};
use bazstat_core::config::BazstatConfig;
use bazstat_core::prefs::PreferenceStore;

use super::chart;
use super::load_stats;

const BAR_WIDTH: usize = 40;

#[derive(Debug, Clone)]
pub struct RankOptions {
    pub filter: TypeFilter,
    pub top: usize,
    pub host_version: Option<String>,
    pub json: bool,
}

pub async fn run_rank(
    cfg: &BazstatConfig,
    store: &dyn PreferenceStore,
    opts: RankOptions,
) -> Result<()> {
    let stats = load_stats(cfg, opts.host_version.as_deref()).await?;
    let mut ranks = rank_by_username(by_type(&stats.aggregation.repos, opts.filter));
    ranks.truncate(opts.top);

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&ranks)?);
        return Ok(());
    }

    // Missing or unreadable prefs only lose the highlight.
    let me = store.load().ok().and_then(|p| p.username().map(str::to_string));
    for line in chart_lines(&ranks, me.as_deref()) {
        println!("{line}");
    }
    Ok(())
}

fn chart_lines(ranks: &[AuthorRank], highlight: Option<&str>) -> Vec<String> {
    let Some(max) = ranks.first().map(|r| r.total_downloads) else {
        return vec!["No authors found.".to_string()];
    };
    let name_width = ranks
        .iter()
        .map(|r| r.username.chars().count())
        .max()
        .unwrap_or(0)
        .clamp(8, 24);
    ranks
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let mark = if highlight == Some(r.username.as_str()) { '*' } else { ' ' };
            format!(
                "{:>4}.{}{:<name_width$} {:>10}  {}",
                i + 1,
                mark,
                r.username,
                r.total_downloads,
                chart::bar(r.total_downloads, max, BAR_WIDTH),
            )
        })
        .collect()
}
