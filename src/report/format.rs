//! Plain-text tables for the terminal.

use crate::analysis::{AnalysisOutcome, SkipReason};
use crate::domain::{AnalysisConfig, BaselineSeries, Category, IndicatorCode, ResultRow, Thresholds};

/// Header block for an `analyze` run.
pub fn format_run_summary(
    baselines: &[BaselineSeries],
    code_count: usize,
    config: &AnalysisConfig,
    thresholds: &Thresholds,
    outcome: &AnalysisOutcome,
    passing: usize,
) -> String {
    let mut out = String::new();

    out.push_str("=== fredmine - lagged indicator correlation ===\n");
    for b in baselines {
        let span = match (b.min_date(), b.max_date()) {
            (Some(lo), Some(hi)) => format!("{lo} .. {hi}"),
            _ => "-".to_string(),
        };
        out.push_str(&format!("Baseline: {} (n={}, {span})\n", b.name, b.len()));
    }
    out.push_str(&format!("Indicators: {code_count}\n"));
    out.push_str(&format!(
        "Settings: pct-change={} | max lag={} | |r|>={:.2} | |rho|>={:.2}\n",
        config.change_interval, config.max_lag, thresholds.pearson, thresholds.spearman
    ));

    out.push_str(&format!(
        "Pairs: {} attempted | {} analyzed | {} insufficient data | {} provider errors\n",
        outcome.pairs_attempted,
        outcome.pairs_analyzed,
        outcome.skipped_for_insufficient_data(),
        outcome.skipped_for_provider()
    ));
    out.push_str(&format!("Rows: {} total | {passing} pass thresholds\n", outcome.rows.len()));
    if outcome.cancelled {
        out.push_str("Run cancelled: results are partial.\n");
    }

    let provider_skips: Vec<_> = outcome
        .skipped
        .iter()
        .filter(|s| !matches!(s.reason, SkipReason::InsufficientData(_)))
        .collect();
    if !provider_skips.is_empty() {
        out.push_str("\nProvider skips:\n");
        for s in provider_skips {
            out.push_str(&format!("  {} x {}: {}\n", s.baseline, s.code, s.reason));
        }
    }
    out.push('\n');

    out
}

/// Result table; `*` in the last column marks a degenerate (undefined) row.
pub fn format_results(rows: &[ResultRow]) -> String {
    let mut out = String::new();
    push_line(
        &mut out,
        format!(
            "{:<20} {:<16} {:>4} {:>9} {:>10} {:>9} {:>10} {:<1}",
            "baseline", "indicator", "lag", "pearson", "p", "spearman", "p", ""
        ),
    );
    push_line(
        &mut out,
        format!(
            "{:-<20} {:-<16} {:-<4} {:-<9} {:-<10} {:-<9} {:-<10}",
            "", "", "", "", "", "", ""
        ),
    );

    for r in rows {
        push_line(
            &mut out,
            format!(
                "{:<20} {:<16} {:>4} {:>9.4} {:>10.3e} {:>9.4} {:>10.3e} {}",
                truncate(&r.baseline, 20),
                truncate(&r.code, 16),
                r.lag,
                r.pearson,
                r.pearson_pval,
                r.spearman,
                r.spearman_pval,
                if r.degenerate { "*" } else { "" },
            ),
        );
    }

    if rows.iter().any(|r| r.degenerate) {
        out.push_str("* statistic undefined for this lag (constant input); values set to 0\n");
    }
    out
}

pub fn format_categories(categories: &[&Category]) -> String {
    let mut out = String::new();
    push_line(&mut out, format!("{:>8} {:>8} {:<60}", "id", "parent", "name"));
    push_line(&mut out, format!("{:-<8} {:-<8} {:-<60}", "", "", ""));
    for c in categories {
        push_line(&mut out, format!("{:>8} {:>8} {:<60}", c.id, c.parent_id, truncate(&c.name, 60)));
    }
    out
}

pub fn format_codes(codes: &[IndicatorCode]) -> String {
    let mut out = String::new();
    push_line(&mut out, format!("{:<20} {:<60}", "code", "name"));
    push_line(&mut out, format!("{:-<20} {:-<60}", "", ""));
    for c in codes {
        push_line(&mut out, format!("{:<20} {:<60}", truncate(&c.code, 20), truncate(&c.name, 60)));
    }
    out.push_str(&format!("{} code(s)\n", codes.len()));
    out
}

fn push_line(out: &mut String, line: String) {
    out.push_str(line.trim_end());
    out.push('\n');
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}
