//! Row codec for the patient sheet
//!
//! Maps a `PatientRecord` to and from a 9-cell row. Decode is driven by
//! header-title lookup, so a file whose columns were reordered by external
//! tooling still maps cells to the right fields.

use super::models::PatientRecord;

/// Column titles in canonical write order. Written verbatim by both store
/// initialization and export, so external tooling sees identical headers
/// on every file this crate produces.
pub const HEADERS: [&str; 9] = [
    "Date",
    "IP No",
    "S.No",
    "Name",
    "Age",
    "Phone",
    "Place",
    "Referral Name",
    "Referral Phone",
];

/// Slot of the name column in [`HEADERS`]; the blank-row rule keys on it.
const NAME_SLOT: usize = 3;

/// The constant header row
pub fn header_row() -> Vec<String> {
    HEADERS.iter().map(|title| title.to_string()).collect()
}

/// Encode a record as one data row, in canonical column order
pub fn encode_row(record: &PatientRecord) -> Vec<String> {
    vec![
        record.date.clone(),
        record.ip_no.clone(),
        record.s_no.clone(),
        record.name.clone(),
        record.age.clone(),
        record.phone.clone(),
        record.place.clone(),
        record.referral_name.clone(),
        record.referral_phone.clone(),
    ]
}

/// Resolved positions of the canonical columns in an observed header row
#[derive(Debug, Clone)]
pub struct ColumnSchema {
    positions: [Option<usize>; HEADERS.len()],
}

impl ColumnSchema {
    /// Resolve each canonical title against the header actually present in
    /// the file. A title that is absent decodes as empty for every row.
    pub fn from_header(header: &[String]) -> Self {
        let mut positions = [None; HEADERS.len()];
        for (slot, title) in HEADERS.iter().enumerate() {
            positions[slot] = header.iter().position(|cell| cell.trim() == *title);
        }
        Self { positions }
    }

    fn cell(&self, row: &[String], slot: usize) -> String {
        self.positions[slot]
            .and_then(|idx| row.get(idx))
            .cloned()
            .unwrap_or_default()
    }

    /// Decode one data row. Returns `None` for blank rows: a row whose name
    /// cell trims to empty is a spreadsheet artifact, not a record.
    pub fn decode(&self, row: &[String]) -> Option<PatientRecord> {
        let name = self.cell(row, NAME_SLOT);
        if name.trim().is_empty() {
            return None;
        }
        Some(PatientRecord {
            date: self.cell(row, 0),
            ip_no: self.cell(row, 1),
            s_no: self.cell(row, 2),
            name,
            age: self.cell(row, 4),
            phone: self.cell(row, 5),
            place: self.cell(row, 6),
            referral_name: self.cell(row, 7),
            referral_phone: self.cell(row, 8),
        })
    }
}
