//! Application configuration
//!
//! Naming constants for the store file and export snapshots, plus the
//! store location value injected into the store at construction.

use std::path::PathBuf;

/// Directory under the user documents folder holding the primary store
pub const STORE_DIR_NAME: &str = "PatientManagement";

/// Name of the primary store file
pub const STORE_FILE_NAME: &str = "patients.xlsx";

/// The single worksheet every store and export file contains
pub const SHEET_NAME: &str = "Patients";

/// Export filename prefix when no filter is active
pub const EXPORT_PREFIX_ALL: &str = "all_patients";

/// Export filename prefix when the export reflects an active filter
pub const EXPORT_PREFIX_FILTERED: &str = "filtered_patients";

/// Timestamp layout for export filenames. Colons are not filename-safe on
/// every platform, so the time-of-day separators are dashes.
pub const EXPORT_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H-%M-%S";

/// Where the store keeps its files.
///
/// Injected into [`crate::store::PatientStore`] at construction so tests
/// can point a store at a temporary directory.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory containing the primary store file
    pub store_dir: PathBuf,
    /// Directory export snapshots are written to
    pub export_dir: PathBuf,
}

impl StoreConfig {
    pub fn new(store_dir: impl Into<PathBuf>, export_dir: impl Into<PathBuf>) -> Self {
        Self {
            store_dir: store_dir.into(),
            export_dir: export_dir.into(),
        }
    }

    /// Conventional locations: `Documents/PatientManagement` for the store,
    /// the downloads folder for exports. `None` when the platform exposes
    /// no such directories.
    pub fn from_user_dirs() -> Option<Self> {
        let documents = dirs::document_dir()?;
        let downloads = dirs::download_dir()?;
        Some(Self {
            store_dir: documents.join(STORE_DIR_NAME),
            export_dir: downloads,
        })
    }

    /// Full path of the primary store file
    pub fn store_path(&self) -> PathBuf {
        self.store_dir.join(STORE_FILE_NAME)
    }
}
