//! Services module
//!
//! Business logic services that coordinate between commands and the store.

pub mod patients;

pub use patients::{PatientFilter, PatientsService, VisitStats};
