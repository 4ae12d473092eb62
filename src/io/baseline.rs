//! Baseline CSV uploads.
//!
//! One file per baseline series. The first column is the observation date,
//! the second the value; anything after that is ignored and the header row is
//! skipped without being interpreted. The series takes its name from the file
//! name, so two uploads with the same file name cannot coexist.
//!
//! Values tolerate a trailing `%` (spreadsheet exports of rates). Anything else
//! that does not parse is a malformed upload and stops the run before any
//! provider request is made.

use std::collections::HashSet;
use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};

use crate::domain::BaselineSeries;
use crate::error::AppError;

pub fn load_baseline(path: &Path) -> Result<BaselineSeries, AppError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| AppError::input(format!("Baseline path '{}' has no file name.", path.display())))?;

    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open baseline CSV '{}': {e}", path.display())))?;
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut points = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // records() starts after the header; CSV lines are 1-based.
        let line = idx + 2;
        let record =
            result.map_err(|e| AppError::input(format!("Failed to read baseline '{name}' line {line}: {e}")))?;

        let raw_date = record.get(0).unwrap_or("");
        let date = parse_date(raw_date)
            .map_err(|e| AppError::input(format!("Malformed upload '{name}' line {line}: {e}")))?;

        let raw_value = record.get(1).unwrap_or("");
        let value = parse_value(raw_value).ok_or_else(|| AppError::malformed_upload(&name, line, raw_value))?;

        points.push((date, value));
    }

    if points.is_empty() {
        return Err(AppError::input(format!("Baseline '{name}' has no data rows.")));
    }

    log::info!("Loaded baseline '{name}': {} rows", points.len());
    Ok(BaselineSeries::new(name, points))
}

/// Load several uploads, rejecting two files that share a name.
pub fn load_baselines(paths: &[PathBuf]) -> Result<Vec<BaselineSeries>, AppError> {
    if paths.is_empty() {
        return Err(AppError::no_data("No baseline files given."));
    }

    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(paths.len());
    for path in paths {
        let series = load_baseline(path)?;
        if !seen.insert(series.name.clone()) {
            return Err(AppError::input(format!(
                "Duplicate baseline name '{}': each upload must have a distinct file name.",
                series.name
            )));
        }
        out.push(series);
    }
    Ok(out)
}

/// Numeric value with whitespace and `%` stripped.
pub fn parse_value(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| *c != '%' && !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return None;
    }
    let v = cleaned.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    const FMTS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
    let s = s.trim().trim_start_matches('\u{feff}');
    for fmt in FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt.date());
    }
    Err(format!(
        "invalid date '{s}'. Expected one of: YYYY-MM-DD, YYYY/MM/DD, MM/DD/YYYY, YYYY-MM-DD HH:MM:SS."
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn parses_dates_in_accepted_formats() {
        assert_eq!(parse_date("2020-03-31").unwrap(), ymd(2020, 3, 31));
        assert_eq!(parse_date("2020/03/31").unwrap(), ymd(2020, 3, 31));
        assert_eq!(parse_date("03/31/2020").unwrap(), ymd(2020, 3, 31));
        assert_eq!(parse_date("2020-03-31 00:00:00").unwrap(), ymd(2020, 3, 31));
        assert!(parse_date("31.03.2020").is_err());
    }

    #[test]
    fn value_strips_percent_signs() {
        assert_eq!(parse_value("4.5%"), Some(4.5));
        assert_eq!(parse_value(" -1.25 % "), Some(-1.25));
        assert_eq!(parse_value("12"), Some(12.0));
        assert_eq!(parse_value(""), None);
        assert_eq!(parse_value("n/a"), None);
    }

    #[test]
    fn loads_first_two_columns_and_names_by_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "sales.csv",
            "date,sales,notes\n2020-01-01,100,first\n2020-04-01,4.5%,\n2020-07-01,102,x\n",
        );
        let series = load_baseline(&path).unwrap();
        assert_eq!(series.name, "sales.csv");
        assert_eq!(
            series.points,
            vec![(ymd(2020, 1, 1), 100.0), (ymd(2020, 4, 1), 4.5), (ymd(2020, 7, 1), 102.0)]
        );
    }

    #[test]
    fn non_numeric_value_is_a_malformed_upload() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "bad.csv", "date,value\n2020-01-01,1\n2020-04-01,abc\n");
        let err = load_baseline(&path).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_INPUT);
        assert!(err.message().contains("bad.csv"), "{err}");
        assert!(err.message().contains("line 3"), "{err}");
        assert!(err.message().contains("'abc'"), "{err}");
    }

    #[test]
    fn empty_value_and_empty_file_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let blank = write(dir.path(), "blank.csv", "date,value\n2020-01-01,\n");
        assert!(load_baseline(&blank).is_err());

        let empty = write(dir.path(), "empty.csv", "date,value\n");
        let err = load_baseline(&empty).unwrap_err();
        assert!(err.message().contains("no data rows"), "{err}");
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        let first = write(a.path(), "gdp.csv", "date,value\n2020-01-01,1\n");
        let second = write(b.path(), "gdp.csv", "date,value\n2020-01-01,2\n");
        let err = load_baselines(&[first.clone(), second]).unwrap_err();
        assert!(err.message().contains("Duplicate baseline name 'gdp.csv'"), "{err}");

        let other = write(b.path(), "cpi.csv", "date,value\n2020-01-01,2\n");
        let loaded = load_baselines(&[first, other]).unwrap();
        assert_eq!(loaded.len(), 2);
    }
}
