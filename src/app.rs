//! Top-level application orchestration.
//!
//! `src/main.rs` only maps the result to an exit code; this module parses the
//! CLI, builds the live clients from `AppConfig`, runs the pipeline for the
//! chosen subcommand, prints reports and writes optional exports.

use std::time::Duration;

use clap::Parser;

use crate::analysis::CancelToken;
use crate::cli::{AnalyzeArgs, CategoriesArgs, Cli, Command, FilterArgs, ScrapeArgs, SearchArgs};
use crate::config::AppConfig;
use crate::data::{CategoryTable, FredClient, HttpFetcher, ScrapeSource};
use crate::error::AppError;
use crate::report;

pub mod pipeline;

/// Entry point for the `fredmine` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Categories(args) => handle_categories(args),
        Command::Search(args) => handle_search(args),
        Command::Scrape(args) => handle_scrape(args),
        Command::Analyze(args) => handle_analyze(args),
        Command::Filter(args) => handle_filter(args),
    }
}

fn handle_categories(args: CategoriesArgs) -> Result<(), AppError> {
    let table = CategoryTable::from_csv(&args.table)?;
    let listed = match args.parent {
        Some(parent) => table.children_of(&[parent]),
        None => table.top_level(),
    };
    if listed.is_empty() {
        return Err(AppError::no_data("No categories at this level."));
    }
    print!("{}", report::format_categories(&listed));
    Ok(())
}

fn handle_search(args: SearchArgs) -> Result<(), AppError> {
    let config = AppConfig::from_env();
    let client = FredClient::from_config(&config)?;
    let mut throttle = pipeline::category_throttle(&config);

    let codes = pipeline::run_search(&args, &client, throttle.as_mut())?;
    print!("{}", report::format_codes(&codes));

    if let Some(path) = &args.export {
        crate::io::write_codes(path, &codes)?;
    }
    Ok(())
}

fn handle_scrape(args: ScrapeArgs) -> Result<(), AppError> {
    let config = AppConfig::from_env();
    let fetcher = HttpFetcher::new(Duration::from_secs(config.timeout_secs))
        .map_err(|e| AppError::network(e.to_string()))?;

    let codes = ScrapeSource::new(fetcher)
        .harvest(&args.url)
        .map_err(|e| AppError::network(format!("Scrape failed: {e}")))?;
    if codes.is_empty() {
        return Err(AppError::no_data(format!("No series links found at '{}'.", args.url)));
    }
    print!("{}", report::format_codes(&codes));

    if let Some(path) = &args.export {
        crate::io::write_codes(path, &codes)?;
    }
    Ok(())
}

fn handle_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let config = AppConfig::from_env();
    let client = FredClient::from_config(&config)?;
    let cancel = CancelToken::new();

    let run = pipeline::run_analyze(&args, &config, &client, &cancel)?;

    println!(
        "{}",
        report::format_run_summary(
            &run.baselines,
            run.codes.len(),
            &run.config,
            &run.thresholds,
            &run.outcome,
            run.passing.len(),
        )
    );
    if run.passing.is_empty() {
        println!("No rows pass the thresholds.");
    } else {
        print!("{}", report::format_results(&report::strongest(&run.passing, args.top)));
    }

    if let Some(path) = &args.export {
        crate::io::write_results_csv(path, run.export_rows(args.export_all))?;
    }
    Ok(())
}

fn handle_filter(args: FilterArgs) -> Result<(), AppError> {
    let thresholds = pipeline::thresholds_from_args(&args.thresholds)?;
    let (rows, passing) = pipeline::run_filter(&args.results, thresholds)?;

    println!(
        "{} of {} row(s) pass |r|>={:.2} and |rho|>={:.2}\n",
        passing.len(),
        rows.len(),
        thresholds.pearson,
        thresholds.spearman
    );
    if !passing.is_empty() {
        print!("{}", report::format_results(&report::strongest(&passing, args.top)));
    }

    if let Some(path) = &args.export {
        crate::io::write_results_csv(path, &passing)?;
    }
    Ok(())
}
