//! Shared run logic behind the subcommands.
//!
//! Each function takes its provider/fetcher and throttle from the caller, so
//! `app` wires in the live FRED client and tests wire in stubs:
//! - `run_analyze`: uploads -> orchestrator -> threshold filter
//! - `run_search`: category names/ids -> descent -> code list
//! - `run_filter`: exported results -> threshold filter

use std::path::Path;
use std::time::Duration;

use crate::analysis::{AnalysisOutcome, CancelToken, filter_rows, run_analysis};
use crate::cli::{AnalyzeArgs, SearchArgs, ThresholdArgs};
use crate::config::AppConfig;
use crate::data::{BatchPause, CategoryTable, DescentOptions, NoPause, SeriesProvider, Throttle, collect_series};
use crate::domain::{AnalysisConfig, BaselineSeries, IndicatorCode, ResultRow, Thresholds};
use crate::error::AppError;

/// All computed outputs of a single `fredmine analyze` run.
#[derive(Debug, Clone)]
pub struct AnalyzeRun {
    pub baselines: Vec<BaselineSeries>,
    pub codes: Vec<IndicatorCode>,
    pub config: AnalysisConfig,
    pub thresholds: Thresholds,
    pub outcome: AnalysisOutcome,
    /// Rows passing `thresholds`, in table order.
    pub passing: Vec<ResultRow>,
}

impl AnalyzeRun {
    /// Rows to export: all of them, or only those passing thresholds.
    pub fn export_rows(&self, all: bool) -> &[ResultRow] {
        if all { &self.outcome.rows } else { &self.passing }
    }
}

pub fn thresholds_from_args(args: &ThresholdArgs) -> Result<Thresholds, AppError> {
    Thresholds::new(args.pearson, args.spearman)
}

/// Batch size and pause for an analysis run; CLI values override the config.
/// `None` when either is zero.
pub fn pair_pacing(config: &AppConfig, args: &AnalyzeArgs) -> Option<(usize, Duration)> {
    let every = args.pause_every.unwrap_or(config.pause_every);
    let pause = args.pause_secs.map_or_else(|| config.pause(), Duration::from_secs);
    (every > 0 && !pause.is_zero()).then_some((every, pause))
}

/// Pair-level throttle for an analysis run. The batch count restarts with each baseline.
pub fn analysis_throttle(config: &AppConfig, args: &AnalyzeArgs) -> Box<dyn Throttle> {
    match pair_pacing(config, args) {
        Some((every, pause)) => Box::new(BatchPause::new(every, pause, "pairs")),
        None => Box::new(NoPause),
    }
}

pub fn category_throttle(config: &AppConfig) -> Box<dyn Throttle> {
    if config.category_pause_secs == 0 {
        return Box::new(NoPause);
    }
    Box::new(BatchPause::new(1, config.category_pause(), "categories"))
}

/// Load uploads and apply quarterly normalization.
pub fn prepare_baselines(args: &AnalyzeArgs) -> Result<Vec<BaselineSeries>, AppError> {
    let mut baselines = crate::io::load_baselines(&args.baseline)?;

    for name in &args.quarterly_for {
        if !baselines.iter().any(|b| &b.name == name) {
            return Err(AppError::input(format!(
                "--quarterly-for '{name}' does not match any baseline file name."
            )));
        }
    }

    for b in &mut baselines {
        if args.quarterly || args.quarterly_for.contains(&b.name) {
            log::info!("Normalizing '{}' to quarter starts", b.name);
            b.normalize_quarterly();
        }
    }
    Ok(baselines)
}

/// Execute the analysis with pre-loaded inputs.
pub fn run_analyze_with(
    baselines: Vec<BaselineSeries>,
    codes: Vec<IndicatorCode>,
    config: AnalysisConfig,
    thresholds: Thresholds,
    provider: &dyn SeriesProvider,
    throttle: &mut dyn Throttle,
    cancel: &CancelToken,
) -> Result<AnalyzeRun, AppError> {
    if codes.is_empty() {
        return Err(AppError::no_data("The indicator-code list is empty."));
    }

    let outcome = run_analysis(&baselines, &codes, &config, provider, throttle, cancel);
    let passing = filter_rows(&outcome.rows, thresholds);

    Ok(AnalyzeRun {
        baselines,
        codes,
        config,
        thresholds,
        outcome,
        passing,
    })
}

pub fn run_analyze(
    args: &AnalyzeArgs,
    app_config: &AppConfig,
    provider: &dyn SeriesProvider,
    cancel: &CancelToken,
) -> Result<AnalyzeRun, AppError> {
    let thresholds = thresholds_from_args(&args.thresholds)?;
    let baselines = prepare_baselines(args)?;
    let codes = crate::io::read_codes(&args.codes)?;
    let config = AnalysisConfig {
        change_interval: args.pct_change,
        max_lag: args.lag,
    };
    let mut throttle = analysis_throttle(app_config, args);

    run_analyze_with(baselines, codes, config, thresholds, provider, throttle.as_mut(), cancel)
}

/// Descent roots: ids resolved from the table's level names plus explicit ids.
pub fn search_roots(args: &SearchArgs) -> Result<Vec<u32>, AppError> {
    let mut roots = Vec::new();

    let has_names = !(args.level1.is_empty() && args.level2.is_empty() && args.level3.is_empty());
    if has_names {
        let path = args
            .table
            .as_deref()
            .ok_or_else(|| AppError::input("--table is required when selecting categories by name."))?;
        let table = CategoryTable::from_csv(path)?;
        roots.extend(table.search_roots(&args.level1, &args.level2, &args.level3));
    }

    for id in &args.category_id {
        if !roots.contains(id) {
            roots.push(*id);
        }
    }

    if roots.is_empty() {
        return Err(AppError::input(
            "No categories selected: pass --level1/--level2/--level3 names or --category-id.",
        ));
    }
    Ok(roots)
}

pub fn run_search(
    args: &SearchArgs,
    provider: &dyn SeriesProvider,
    throttle: &mut dyn Throttle,
) -> Result<Vec<IndicatorCode>, AppError> {
    let roots = search_roots(args)?;
    log::info!("Descending from {} root categor(ies): {roots:?}", roots.len());

    let options = DescentOptions {
        max_depth: args.max_depth,
        limit: args.limit,
    };
    let outcome = collect_series(provider, &roots, &options, throttle);

    if outcome.series.is_empty() && !outcome.failures.is_empty() {
        let (id, err) = &outcome.failures[0];
        return Err(AppError::network(format!(
            "Category search failed ({} failing categor(ies), first {id}: {err}).",
            outcome.failures.len()
        )));
    }

    log::info!(
        "Search done: {} series from {} leaf categor(ies), {} truncated, {} failed",
        outcome.series.len(),
        outcome.leaves_visited,
        outcome.truncated.len(),
        outcome.failures.len()
    );
    Ok(outcome.series.iter().map(IndicatorCode::from).collect())
}

/// Re-filter an exported results file.
pub fn run_filter(results: &Path, thresholds: Thresholds) -> Result<(Vec<ResultRow>, Vec<ResultRow>), AppError> {
    let rows = crate::io::read_results_csv(results)?;
    if rows.is_empty() {
        return Err(AppError::no_data(format!("Results file '{}' has no rows.", results.display())));
    }
    let passing = filter_rows(&rows, thresholds);
    Ok((rows, passing))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    use clap::Parser;

    use crate::cli::{Cli, Command};

    fn analyze_args(argv: &[&str]) -> AnalyzeArgs {
        let mut full = vec!["fredmine", "analyze"];
        full.extend_from_slice(argv);
        match Cli::parse_from(full).command {
            Command::Analyze(args) => args,
            _ => unreachable!(),
        }
    }

    fn search_args(argv: &[&str]) -> SearchArgs {
        let mut full = vec!["fredmine", "search"];
        full.extend_from_slice(argv);
        match Cli::parse_from(full).command {
            Command::Search(args) => args,
            _ => unreachable!(),
        }
    }

    fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn quarterly_for_applies_only_to_named_baseline() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a.csv", "date,v\n2020-03-31,1\n");
        let b = write(dir.path(), "b.csv", "date,v\n2020-03-31,1\n");
        let (a, b) = (a.to_string_lossy().to_string(), b.to_string_lossy().to_string());
        let (a, b) = (a.as_str(), b.as_str());

        let args = analyze_args(&["--baseline", a, "--baseline", b, "--codes", "x.csv", "--quarterly-for", "b.csv"]);
        let baselines = prepare_baselines(&args).unwrap();
        assert_eq!(baselines[0].points[0].0.to_string(), "2020-03-31");
        assert_eq!(baselines[1].points[0].0.to_string(), "2020-01-01");

        let args = analyze_args(&["--baseline", a, "--codes", "x.csv", "--quarterly-for", "nope.csv"]);
        assert!(prepare_baselines(&args).is_err());
    }

    #[test]
    fn cli_pacing_overrides_config() {
        let config = AppConfig::default();
        let args = analyze_args(&["--baseline", "a.csv", "--codes", "c.csv", "--pause-secs", "0"]);
        // Zero pause never sleeps, so ticking many times returns immediately.
        let mut throttle = analysis_throttle(&config, &args);
        for _ in 0..250 {
            throttle.tick();
        }
    }

    #[test]
    fn pair_pacing_falls_back_to_config() {
        let config = AppConfig {
            pause_every: 100,
            pause_secs: 60,
            ..AppConfig::default()
        };
        let args = analyze_args(&["--baseline", "a.csv", "--codes", "c.csv"]);
        assert_eq!(pair_pacing(&config, &args), Some((100, config.pause())));

        let args = analyze_args(&[
            "--baseline",
            "a.csv",
            "--codes",
            "c.csv",
            "--pause-every",
            "7",
            "--pause-secs",
            "3",
        ]);
        assert_eq!(pair_pacing(&config, &args), Some((7, Duration::from_secs(3))));

        let args = analyze_args(&["--baseline", "a.csv", "--codes", "c.csv", "--pause-every", "0"]);
        assert_eq!(pair_pacing(&config, &args), None);
    }

    #[test]
    fn search_roots_need_a_selection() {
        let args = search_args(&[]);
        assert_eq!(search_roots(&args).unwrap_err().exit_code(), crate::error::EXIT_INPUT);

        let args = search_args(&["--level1", "Prices"]);
        assert!(search_roots(&args).unwrap_err().message().contains("--table"));

        let args = search_args(&["--category-id", "9", "--category-id", "9", "--category-id", "32"]);
        assert_eq!(search_roots(&args).unwrap(), vec![9, 32]);
    }

    #[test]
    fn search_roots_resolve_names_from_table() {
        let dir = tempfile::tempdir().unwrap();
        let table = write(
            dir.path(),
            "cats.csv",
            "id,name,parent_id\n32455,Prices,0\n9,Consumer Price Indexes (CPI and PCE),32455\n",
        );
        let table = table.to_string_lossy().to_string();
        let args = search_args(&[
            "--table",
            table.as_str(),
            "--level1",
            "Prices",
            "--level2",
            "Consumer Price Indexes (CPI and PCE)",
        ]);
        assert_eq!(search_roots(&args).unwrap(), vec![9]);
    }

    #[test]
    fn filter_reads_back_exported_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "results.csv",
            "lag,pearsoncorr,pearson_pval,spearmancorr,spearman_pval,baseline_data,indicator_code\n\
             0,0.7,0.01,0.5,0.02,a.csv,WEAK\n\
             1,-0.8,0.01,-0.9,0.02,a.csv,STRONG\n",
        );
        let (rows, passing) = run_filter(&path, Thresholds::default()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(passing.len(), 1);
        assert_eq!(passing[0].code, "STRONG");

        let empty = write(
            dir.path(),
            "empty.csv",
            "lag,pearsoncorr,pearson_pval,spearmancorr,spearman_pval,baseline_data,indicator_code\n",
        );
        assert_eq!(
            run_filter(&empty, Thresholds::default()).unwrap_err().exit_code(),
            crate::error::EXIT_NO_DATA
        );
    }
}
