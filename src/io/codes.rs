//! Indicator-code lists (`code,name`).

use std::fs::File;
use std::path::Path;

use crate::domain::IndicatorCode;
use crate::error::AppError;

/// Read a code list: first column is the code, second (optional) its name.
///
/// Blank codes are skipped; columns past the second are ignored.
pub fn read_codes(path: &Path) -> Result<Vec<IndicatorCode>, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open code list '{}': {e}", path.display())))?;
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut codes = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| {
            AppError::input(format!("Failed to read code list '{}' line {}: {e}", path.display(), idx + 2))
        })?;
        let code = record.get(0).unwrap_or("");
        if code.is_empty() {
            continue;
        }
        codes.push(IndicatorCode::new(code, record.get(1).unwrap_or("")));
    }

    log::info!("Loaded {} indicator code(s) from '{}'", codes.len(), path.display());
    Ok(codes)
}

pub fn write_codes(path: &Path, codes: &[IndicatorCode]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::input(format!("Failed to create code list '{}': {e}", path.display())))?;
    for code in codes {
        writer
            .serialize(code)
            .map_err(|e| AppError::input(format!("Failed to write code list row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::input(format!("Failed to write code list '{}': {e}", path.display())))?;
    Ok(())
}
