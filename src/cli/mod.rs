//! Command-line parsing for the FRED indicator miner.
//!
//! Parsing only; dispatch lives in `app`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "fredmine",
    version,
    about = "Find FRED indicators that lead or track your own series (lagged Pearson/Spearman)"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Browse the local category table.
    Categories(CategoriesArgs),
    /// Walk FRED's category tree down to leaf series and list their codes.
    Search(SearchArgs),
    /// Harvest series codes from a FRED listing page (all of its pages).
    Scrape(ScrapeArgs),
    /// Correlate baseline uploads against a list of indicator codes.
    Analyze(AnalyzeArgs),
    /// Re-apply thresholds to a previously exported results CSV.
    Filter(FilterArgs),
}

#[derive(Debug, Args, Clone)]
pub struct CategoriesArgs {
    /// Category table CSV (`id,name,parent_id`).
    #[arg(long, value_name = "CSV")]
    pub table: PathBuf,

    /// List the children of this category instead of the top level.
    #[arg(long, value_name = "ID")]
    pub parent: Option<u32>,
}

#[derive(Debug, Args, Clone)]
pub struct SearchArgs {
    /// Category table CSV used to resolve names.
    #[arg(long, value_name = "CSV")]
    pub table: Option<PathBuf>,

    /// Top-level category name (repeatable).
    #[arg(long, value_name = "NAME")]
    pub level1: Vec<String>,

    /// Second-level category name (repeatable); replaces its parent as a root.
    #[arg(long, value_name = "NAME")]
    pub level2: Vec<String>,

    /// Third-level category name (repeatable); replaces its parent as a root.
    #[arg(long, value_name = "NAME")]
    pub level3: Vec<String>,

    /// Additional root category id (repeatable).
    #[arg(long = "category-id", value_name = "ID")]
    pub category_id: Vec<u32>,

    /// Depth below which subcategories are not followed.
    #[arg(long, default_value_t = 3)]
    pub max_depth: usize,

    /// Maximum series requested per leaf category.
    #[arg(long, default_value_t = 1000)]
    pub limit: usize,

    /// Write the collected codes to CSV (`code,name`).
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct ScrapeArgs {
    /// Listing page URL (e.g. a FRED search or release page).
    #[arg(long)]
    pub url: String,

    /// Write the harvested codes to CSV (`code,name`).
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct ThresholdArgs {
    /// Minimum |Pearson r| to keep a row.
    #[arg(long, default_value_t = 0.65)]
    pub pearson: f64,

    /// Minimum |Spearman rho| to keep a row.
    #[arg(long, default_value_t = 0.65)]
    pub spearman: f64,
}

#[derive(Debug, Args, Clone)]
pub struct AnalyzeArgs {
    /// Baseline CSV (date, value); repeatable. The file name is the series name.
    #[arg(long, value_name = "CSV", required = true)]
    pub baseline: Vec<PathBuf>,

    /// Indicator-code list CSV (`code[,name]`).
    #[arg(long, value_name = "CSV")]
    pub codes: PathBuf,

    /// Snap every baseline's dates to quarter starts.
    #[arg(long)]
    pub quarterly: bool,

    /// Snap only the named baseline's dates to quarter starts (repeatable).
    #[arg(long, value_name = "NAME")]
    pub quarterly_for: Vec<String>,

    /// Periods for the indicator percent change (0 = raw values).
    #[arg(long, default_value_t = 1)]
    pub pct_change: usize,

    /// Largest lag to test (inclusive).
    #[arg(long, default_value_t = 5)]
    pub lag: usize,

    #[command(flatten)]
    pub thresholds: ThresholdArgs,

    /// Export results to CSV (rows passing thresholds unless --export-all).
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export every row, not only those passing thresholds.
    #[arg(long)]
    pub export_all: bool,

    /// Show only the N strongest passing rows (0 = all).
    #[arg(long, default_value_t = 25)]
    pub top: usize,

    /// Override FRED_PAUSE_EVERY.
    #[arg(long, value_name = "N")]
    pub pause_every: Option<usize>,

    /// Override FRED_PAUSE_SECS.
    #[arg(long, value_name = "SECS")]
    pub pause_secs: Option<u64>,
}

#[derive(Debug, Args, Clone)]
pub struct FilterArgs {
    /// Results CSV produced by `fredmine analyze --export`.
    #[arg(long, value_name = "CSV")]
    pub results: PathBuf,

    #[command(flatten)]
    pub thresholds: ThresholdArgs,

    /// Write the rows that pass to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Show only the N strongest passing rows (0 = all).
    #[arg(long, default_value_t = 25)]
    pub top: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn analyze_defaults() {
        let cli = Cli::parse_from(["fredmine", "analyze", "--baseline", "a.csv", "--codes", "codes.csv"]);
        let Command::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.baseline, vec![PathBuf::from("a.csv")]);
        assert_eq!(args.pct_change, 1);
        assert_eq!(args.lag, 5);
        assert_eq!(args.thresholds.pearson, 0.65);
        assert!(!args.export_all);
        assert!(args.pause_every.is_none());
    }

    #[test]
    fn search_collects_repeated_levels() {
        let cli = Cli::parse_from([
            "fredmine",
            "search",
            "--level1",
            "Money, Banking, & Finance",
            "--level2",
            "Interest Rates",
            "--level2",
            "Exchange Rates",
            "--category-id",
            "125",
        ]);
        let Command::Search(args) = cli.command else {
            panic!("expected search");
        };
        assert_eq!(args.level2.len(), 2);
        assert_eq!(args.category_id, vec![125]);
        assert_eq!(args.max_depth, 3);
    }
}
