//! Result table export and re-import.
//!
//! The CSV carries seven columns in a fixed order, no index column:
//! `lag,pearsoncorr,pearson_pval,spearmancorr,spearman_pval,baseline_data,indicator_code`.
//! The in-memory `degenerate` flag is not exported; a re-imported row whose four
//! statistics are all zero is marked degenerate again.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::domain::ResultRow;
use crate::error::AppError;

pub fn write_results<W: Write>(writer: W, rows: &[ResultRow]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(writer);
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| AppError::input(format!("Failed to write results row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::input(format!("Failed to write results: {e}")))?;
    Ok(())
}

pub fn read_results<R: Read>(reader: R, source: &str) -> Result<Vec<ResultRow>, AppError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut rows = Vec::new();
    for (idx, result) in reader.deserialize::<ResultRow>().enumerate() {
        let mut row = result
            .map_err(|e| AppError::input(format!("Invalid results file '{source}' line {}: {e}", idx + 2)))?;
        row.degenerate =
            row.pearson == 0.0 && row.pearson_pval == 0.0 && row.spearman == 0.0 && row.spearman_pval == 0.0;
        rows.push(row);
    }
    Ok(rows)
}

pub fn write_results_csv(path: &Path, rows: &[ResultRow]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::input(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_results(file, rows)?;
    log::info!("Wrote {} row(s) to '{}'", rows.len(), path.display());
    Ok(())
}

pub fn read_results_csv(path: &Path) -> Result<Vec<ResultRow>, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open results CSV '{}': {e}", path.display())))?;
    read_results(file, &path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LagResult;

    fn row(lag: usize, pearson: f64, spearman: f64) -> ResultRow {
        ResultRow::from_lag(
            "sales.csv",
            "GDP",
            &LagResult {
                lag,
                pearson,
                pearson_pval: 0.01,
                spearman,
                spearman_pval: 0.02,
                degenerate: false,
            },
        )
    }

    #[test]
    fn header_and_column_order() {
        let mut buf = Vec::new();
        write_results(&mut buf, &[row(2, 0.5, -0.25)]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("lag,pearsoncorr,pearson_pval,spearmancorr,spearman_pval,baseline_data,indicator_code")
        );
        assert_eq!(lines.next(), Some("2,0.5,0.01,-0.25,0.02,sales.csv,GDP"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn reimport_restores_rows_and_degenerate_marker() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        let mut undefined = ResultRow::from_lag("sales.csv", "FLAT", &LagResult::undefined(0));
        let rows = vec![row(0, 0.7, 0.8), undefined.clone()];
        write_results_csv(&path, &rows).unwrap();

        let back = read_results_csv(&path).unwrap();
        assert_eq!(back[0], rows[0]);
        undefined.degenerate = true;
        assert_eq!(back[1], undefined);
    }

    #[test]
    fn bad_rows_name_the_line() {
        let data = "lag,pearsoncorr,pearson_pval,spearmancorr,spearman_pval,baseline_data,indicator_code\n\
                    0,0.1,0.2,0.3,0.4,a.csv,GDP\n\
                    x,0.1,0.2,0.3,0.4,a.csv,GDP\n";
        let err = read_results(data.as_bytes(), "mem").unwrap_err();
        assert!(err.message().contains("line 3"), "{err}");
    }
}
