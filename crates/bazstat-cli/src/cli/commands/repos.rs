//! `bazstat repos` – one author's repos with download counts.

use anyhow::Result;
use bazstat_core::aggregate::{
    by_type, by_username, total_downloads, type_breakdown, AggregatedRepo, TypeFilter,
};
use bazstat_core::config::BazstatConfig;
use bazstat_core::prefs::PreferenceStore;

use super::{load_stats, resolve_username};

#[derive(Debug, Clone, Default)]
pub struct ReposOptions {
    pub user: Option<String>,
    pub filter: TypeFilter,
    pub host_version: Option<String>,
    pub locale: Option<String>,
    pub json: bool,
}

pub async fn run_repos(
    cfg: &BazstatConfig,
    store: &dyn PreferenceStore,
    opts: ReposOptions,
) -> Result<()> {
    let username = resolve_username(opts.user.as_deref(), store)?;
    let stats = load_stats(cfg, opts.host_version.as_deref()).await?;
    let repos = by_type(by_username(&stats.aggregation.repos, &username), opts.filter);
    let locale = opts.locale.as_deref().or(cfg.locale.as_deref());

    if opts.json {
        let doc = serde_json::json!({
            "username": username,
            "snapshot": stats.snapshot,
            "type": opts.filter.to_string(),
            "totalDownloads": total_downloads(repos.iter().copied()),
            "breakdown": type_breakdown(repos.iter().copied()),
            "repos": repos,
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    print_repos(&username, &repos, locale);
    Ok(())
}

fn print_repos(username: &str, repos: &[&AggregatedRepo], locale: Option<&str>) {
    if repos.is_empty() {
        println!("No repos found for {username}.");
        return;
    }
    println!("Repos of {username}");
    println!("{:<32} {:<9} {:>10} {}", "NAME", "TYPE", "DOWNLOADS", "VERSION");
    for r in repos {
        println!(
            "{:<32} {:<9} {:>10} {}",
            truncate(r.display_name(locale), 32),
            r.kind(),
            r.downloads,
            r.entry.package.version
        );
    }
    println!();
    println!("Total downloads: {}", total_downloads(repos.iter().copied()));
    for t in type_breakdown(repos.iter().copied()) {
        println!("  {:<9} {:>3} repos {:>10} downloads", t.kind, t.count, t.downloads);
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_names() {
        assert_eq!(truncate("foo", 32), "foo");
    }

    #[test]
    fn truncate_marks_cut_names() {
        let t = truncate("abcdefghij", 5);
        assert_eq!(t, "abcd…");
        assert_eq!(t.chars().count(), 5);
    }
}
