//! Blocking workbook I/O
//!
//! Low-level xlsx helpers shared by the store: read a named sheet into rows
//! of cell text, write rows out as a fresh single-sheet workbook. Writes go
//! to a temp file in the destination directory and are renamed into place,
//! so a concurrent reader never observes a partial file.
//!
//! Callers run these on the blocking pool; nothing here is async.

use std::path::Path;

use anyhow::{bail, Context, Result};
use calamine::{open_workbook, Data, Reader, Xlsx};
use rust_xlsxwriter::Workbook;

/// Read every row of `sheet` as cell text. Non-text cell types are
/// normalized to their string form; empty cells become empty strings.
pub fn read_sheet_rows(path: &Path, sheet: &str) -> Result<Vec<Vec<String>>> {
    let mut workbook: Xlsx<_> =
        open_workbook(path).with_context(|| format!("open workbook {}", path.display()))?;

    if !workbook.sheet_names().iter().any(|name| name == sheet) {
        bail!("sheet {sheet:?} not found in {}", path.display());
    }

    let range = workbook
        .worksheet_range(sheet)
        .with_context(|| format!("read sheet {sheet:?} from {}", path.display()))?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect())
}

/// Write `rows` to `path` as a single-sheet workbook named `sheet`,
/// replacing any existing file.
pub fn write_sheet_rows(path: &Path, sheet: &str, rows: &[Vec<String>]) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(sheet)
        .with_context(|| format!("name sheet {sheet:?}"))?;

    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value.as_str())
                .with_context(|| format!("write cell ({row_idx}, {col_idx})"))?;
        }
    }

    // Write to temp file first, then rename into place.
    let temp_path = path.with_extension("xlsx.tmp");
    workbook
        .save(&temp_path)
        .with_context(|| format!("save workbook {}", temp_path.display()))?;
    std::fs::rename(&temp_path, path).with_context(|| format!("replace {}", path.display()))?;

    Ok(())
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(text) => text.clone(),
        Data::Int(value) => value.to_string(),
        Data::Float(value) if value.fract() == 0.0 => (*value as i64).to_string(),
        Data::Float(value) => value.to_string(),
        Data::Bool(value) => value.to_string(),
        Data::DateTime(value) => value.as_f64().to_string(),
        Data::DateTimeIso(text) | Data::DurationIso(text) => text.clone(),
        Data::Error(error) => error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn rows() -> Vec<Vec<String>> {
        vec![
            vec!["Name".to_string(), "Age".to_string(), "Place".to_string()],
            vec!["Asha".to_string(), "".to_string(), "Pune".to_string()],
        ]
    }

    #[test]
    fn write_then_read_round_trips_rows() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("patients.xlsx");

        write_sheet_rows(&path, "Patients", &rows()).unwrap();
        let read_back = read_sheet_rows(&path, "Patients").unwrap();

        assert_eq!(read_back, rows());
    }

    #[test]
    fn write_replaces_previous_content() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("patients.xlsx");

        write_sheet_rows(&path, "Patients", &rows()).unwrap();
        let replacement = vec![vec!["Name".to_string()]];
        write_sheet_rows(&path, "Patients", &replacement).unwrap();

        assert_eq!(read_sheet_rows(&path, "Patients").unwrap(), replacement);
    }

    #[test]
    fn read_missing_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("absent.xlsx");

        assert!(read_sheet_rows(&path, "Patients").is_err());
    }

    #[test]
    fn read_missing_sheet_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("patients.xlsx");
        write_sheet_rows(&path, "Patients", &rows()).unwrap();

        let result = read_sheet_rows(&path, "Visits");

        assert!(result.is_err());
    }
}
