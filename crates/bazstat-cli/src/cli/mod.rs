//! CLI for bazstat: SiYuan bazaar statistics per author.

mod commands;

use anyhow::Result;
use bazstat_core::aggregate::TypeFilter;
use bazstat_core::config::{self, BazstatConfig};
use bazstat_core::prefs::FilePreferenceStore;
use clap::{Parser, Subcommand};
use clap_complete::Shell;

use commands::{
    run_completions, run_manpage, run_rank, run_repos, run_set_user, run_show_prefs, run_snapshot,
    RankOptions, ReposOptions,
};

/// Top-level CLI for bazstat.
#[derive(Debug, Parser)]
#[command(name = "bazstat")]
#[command(about = "bazstat: download statistics and rankings for SiYuan bazaar authors", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// List an author's plugins, templates, themes and widgets with download counts.
    Repos {
        /// Author (repository owner). Defaults to the saved username.
        #[arg(long, short)]
        user: Option<String>,
        /// Only show one type: plugin, template, theme, widget, or all.
        #[arg(long = "type", value_name = "TYPE", default_value = "all")]
        kind: TypeFilter,
        /// SiYuan version whose bazaar snapshot is used (overrides config).
        #[arg(long, value_name = "VERSION")]
        host_version: Option<String>,
        /// Locale for display names, e.g. zh_CN (overrides config).
        #[arg(long)]
        locale: Option<String>,
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Rank authors by total downloads and draw a bar chart.
    Rank {
        /// Only count one type: plugin, template, theme, widget, or all.
        #[arg(long = "type", value_name = "TYPE", default_value = "all")]
        kind: TypeFilter,
        /// Show at most N authors.
        #[arg(
            long,
            default_value = "20",
            value_name = "N",
            value_parser = clap::value_parser!(u64).range(1..)
        )]
        top: u64,
        /// SiYuan version whose bazaar snapshot is used (overrides config).
        #[arg(long, value_name = "VERSION")]
        host_version: Option<String>,
        /// Print JSON instead of a chart.
        #[arg(long)]
        json: bool,
    },

    /// Print the bazaar snapshot hash pinned to a SiYuan version.
    Snapshot {
        /// SiYuan version to resolve (overrides config).
        #[arg(long, value_name = "VERSION")]
        host_version: Option<String>,
    },

    /// Save the default author for `repos`.
    SetUser {
        /// Author (repository owner) name.
        username: String,
    },

    /// Show saved preferences.
    Prefs,

    /// Print a shell completion script.
    Completions {
        shell: Shell,
    },

    /// Print the man page (roff).
    Manpage,
}

fn load_config() -> Result<BazstatConfig> {
    let cfg = config::load_or_init()?;
    tracing::debug!("loaded config: {:?}", cfg);
    Ok(cfg)
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Repos {
                user,
                kind,
                host_version,
                locale,
                json,
            } => {
                let cfg = load_config()?;
                let store = FilePreferenceStore::open_default()?;
                let opts = ReposOptions {
                    user,
                    filter: kind,
                    host_version,
                    locale,
                    json,
                };
                run_repos(&cfg, &store, opts).await?;
            }
            CliCommand::Rank {
                kind,
                top,
                host_version,
                json,
            } => {
                let cfg = load_config()?;
                let store = FilePreferenceStore::open_default()?;
                let opts = RankOptions {
                    filter: kind,
                    top: usize::try_from(top).unwrap_or(usize::MAX),
                    host_version,
                    json,
                };
                run_rank(&cfg, &store, opts).await?;
            }
            CliCommand::Snapshot { host_version } => {
                let cfg = load_config()?;
                run_snapshot(&cfg, host_version.as_deref()).await?;
            }
            CliCommand::SetUser { username } => {
                let store = FilePreferenceStore::open_default()?;
                run_set_user(&store, &username)?;
            }
            CliCommand::Prefs => {
                let store = FilePreferenceStore::open_default()?;
                run_show_prefs(&store)?;
            }
            CliCommand::Completions { shell } => run_completions(shell),
            CliCommand::Manpage => run_manpage()?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
