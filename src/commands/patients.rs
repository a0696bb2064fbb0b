//! Patient register commands
//!
//! Store lifecycle, intake registration, stats, filtering and export. Write
//! failures surface to the UI as `false` so it can alert the operator; read
//! failures surface as an empty list, indistinguishable from an empty store.

use std::path::PathBuf;

use crate::app::AppState;
use crate::services::{PatientFilter, VisitStats};
use crate::store::{PatientIntake, PatientRecord};

/// Whether the primary store file exists on disk
pub async fn check_store_exists(state: &AppState) -> bool {
    state.store.exists().await
}

/// Reset the store to a fresh header-only file
pub async fn initialize_store(state: &AppState) -> bool {
    match state.store.initialize().await {
        Ok(()) => true,
        Err(error) => {
            tracing::error!("Failed to initialize store: {error}");
            false
        }
    }
}

/// All records, newest first
pub async fn read_patients(state: &AppState) -> Vec<PatientRecord> {
    match state.patients_service.list_patients().await {
        Ok(records) => records,
        Err(error) => {
            tracing::error!("Failed to read patients: {error}");
            Vec::new()
        }
    }
}

/// Register a new visit
pub async fn write_patient(state: &AppState, intake: PatientIntake) -> bool {
    match state.patients_service.register_patient(intake).await {
        Ok(record) => {
            tracing::debug!("Stored patient {}", record.ip_no);
            true
        }
        Err(error) => {
            tracing::error!("Failed to write patient: {error}");
            false
        }
    }
}

/// Export the given records under the supplied filename
pub async fn export_patients(
    state: &AppState,
    records: Vec<PatientRecord>,
    filename: String,
) -> Option<PathBuf> {
    match state
        .patients_service
        .export_patients(&records, &filename)
        .await
    {
        Ok(path) => Some(path),
        Err(error) => {
            tracing::error!("Failed to export patients: {error}");
            None
        }
    }
}

/// Dashboard stat-card counts; failures read as zero visits
pub async fn get_visit_stats(state: &AppState) -> VisitStats {
    match state.patients_service.visit_stats().await {
        Ok(stats) => stats,
        Err(error) => {
            tracing::error!("Failed to compute visit stats: {error}");
            VisitStats::default()
        }
    }
}

/// Records matching the given filter, newest first
pub async fn filter_patients(state: &AppState, filter: PatientFilter) -> Vec<PatientRecord> {
    match state.patients_service.filter_patients(&filter).await {
        Ok(records) => records,
        Err(error) => {
            tracing::error!("Failed to filter patients: {error}");
            Vec::new()
        }
    }
}

/// Filter and export with a timestamped filename
pub async fn export_filtered_patients(
    state: &AppState,
    filter: PatientFilter,
) -> Option<PathBuf> {
    match state.patients_service.export_filtered(&filter).await {
        Ok(path) => Some(path),
        Err(error) => {
            tracing::error!("Failed to export filtered patients: {error}");
            None
        }
    }
}
