//! Store module
//!
//! Spreadsheet-backed persistence for patient records:
//! - `models`: record and intake types
//! - `codec`: row encoding and the header column schema
//! - `workbook`: blocking xlsx read/write helpers
//! - `patient_store`: the file-owning store

pub mod codec;
pub mod models;
pub mod patient_store;
pub mod workbook;

pub use models::{PatientIntake, PatientRecord};
pub use patient_store::PatientStore;
