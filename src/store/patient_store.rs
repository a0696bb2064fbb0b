//! Patient record store
//!
//! Owns the primary spreadsheet file: creation, full reads, appends and
//! export snapshots. The file format has no incremental append, so every
//! append is a read-modify-write cycle over the whole sheet; a store-scoped
//! mutex serializes writers so a rapid double-submit cannot drop a row.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::fs;
use tokio::sync::Mutex;
use tokio::task;

use crate::config::{StoreConfig, SHEET_NAME};
use crate::error::{AppError, Result};

use super::codec::{self, ColumnSchema};
use super::models::PatientRecord;
use super::workbook;

/// Store for patient visit records
#[derive(Clone)]
pub struct PatientStore {
    store_path: PathBuf,
    export_dir: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl PatientStore {
    /// Create a store over the given locations. No file I/O happens here;
    /// the primary file is created lazily on first write.
    pub fn new(config: StoreConfig) -> Self {
        Self {
            store_path: config.store_path(),
            export_dir: config.export_dir,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Path of the primary store file
    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    /// Whether the primary file is present. Access failures count as absent.
    pub async fn exists(&self) -> bool {
        fs::try_exists(&self.store_path).await.unwrap_or(false)
    }

    /// Reset the store to an empty state: ensure the directory exists and
    /// write a fresh header-only file, replacing any prior content.
    pub async fn initialize(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.write_fresh().await?;
        tracing::info!("Store initialized at: {:?}", self.store_path);
        Ok(())
    }

    /// Read all records, newest first. A missing file is an empty dataset,
    /// not an error, and is not created here.
    pub async fn list(&self) -> Result<Vec<PatientRecord>> {
        if !self.exists().await {
            return Ok(Vec::new());
        }

        let path = self.store_path.clone();
        let rows =
            task::spawn_blocking(move || workbook::read_sheet_rows(&path, SHEET_NAME)).await??;

        let mut rows = rows.into_iter();
        let Some(header) = rows.next() else {
            return Ok(Vec::new());
        };
        let schema = ColumnSchema::from_header(&header);

        let mut records: Vec<PatientRecord> =
            rows.filter_map(|row| schema.decode(&row)).collect();
        // stored oldest first, returned newest first
        records.reverse();

        tracing::debug!("Read {} records from store", records.len());
        Ok(records)
    }

    /// Append one record, creating the file first if it is missing. The
    /// whole read-modify-write cycle runs under the store write lock.
    pub async fn append(&self, record: PatientRecord) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        if !self.exists().await {
            tracing::info!("Store file missing, creating before append");
            self.write_fresh().await?;
        }

        let path = self.store_path.clone();
        let mut rows =
            task::spawn_blocking(move || workbook::read_sheet_rows(&path, SHEET_NAME)).await??;
        if rows.is_empty() {
            rows.push(codec::header_row());
        }
        rows.push(codec::encode_row(&record));

        let path = self.store_path.clone();
        task::spawn_blocking(move || workbook::write_sheet_rows(&path, SHEET_NAME, &rows))
            .await??;

        tracing::debug!("Appended record for {:?}", record.name);
        Ok(())
    }

    /// Write the given records, in caller order, to a new workbook under
    /// the export directory. The primary file is never touched.
    pub async fn export_snapshot(
        &self,
        records: &[PatientRecord],
        filename: &str,
    ) -> Result<PathBuf> {
        if filename.trim().is_empty() {
            return Err(AppError::Validation("export filename is empty".to_string()));
        }

        fs::create_dir_all(&self.export_dir).await?;
        let export_path = self.export_dir.join(filename);

        let mut rows = Vec::with_capacity(records.len() + 1);
        rows.push(codec::header_row());
        rows.extend(records.iter().map(codec::encode_row));

        let path = export_path.clone();
        task::spawn_blocking(move || workbook::write_sheet_rows(&path, SHEET_NAME, &rows))
            .await??;

        tracing::info!("Exported {} records to {:?}", records.len(), export_path);
        Ok(export_path)
    }

    async fn write_fresh(&self) -> Result<()> {
        if let Some(parent) = self.store_path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let path = self.store_path.clone();
        task::spawn_blocking(move || {
            workbook::write_sheet_rows(&path, SHEET_NAME, &[codec::header_row()])
        })
        .await??;
        Ok(())
    }
}
