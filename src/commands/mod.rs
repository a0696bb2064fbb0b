//! Commands exposed to the presentation layer
//!
//! The desktop shell calls these instead of touching the services directly:
//! - `patients`: store lifecycle, intake, stats, filtering and export
//!
//! Failures are absorbed here into the sentinel values the UI consumes
//! (`false`, empty lists, `None`) and logged; nothing below this layer
//! swallows errors.

pub mod patients;

pub use patients::*;
