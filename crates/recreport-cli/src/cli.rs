//! Command-line interface definition.

use std::path::PathBuf;

use clap::Parser;

/// recreport - Recording metadata reports for Webex sites
#[derive(Debug, Parser)]
#[command(name = "recreport")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "RECREPORT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    // --- Report scope ---
    /// How many days of history to report on
    #[arg(long)]
    pub days: Option<i64>,

    /// Report on this site URL (can be repeated)
    #[arg(long = "site", group = "site_selection", action = clap::ArgAction::Append)]
    pub sites: Vec<String>,

    /// Report on every accessible site
    #[arg(long, group = "site_selection")]
    pub all_sites: bool,

    /// Report on the default site only
    #[arg(long, group = "site_selection")]
    pub default_site: bool,

    // --- Output ---
    /// Directory the CSV report is written into
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    // --- Tuning ---
    /// Maximum number of concurrent audit lookups
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Path to the OAuth tokens file
    #[arg(long)]
    pub tokens_file: Option<PathBuf>,
}
