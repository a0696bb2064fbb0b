//! Store models
//!
//! Rust structs representing patient register entities.
//! All models use serde with camelCase field names, the wire contract the
//! presentation layer consumes.

use serde::{Deserialize, Serialize};

/// One clinic visit entry, as stored in the spreadsheet.
///
/// Every field is a string at the cell level; `date` holds an RFC 3339 UTC
/// timestamp assigned at registration time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    pub date: String,
    /// Generated `IP` + zero-padded 3-digit daily sequence
    pub ip_no: String,
    /// Generated decimal daily sequence number
    pub s_no: String,
    pub name: String,
    pub age: String,
    pub phone: String,
    pub place: String,
    pub referral_name: String,
    pub referral_phone: String,
}

/// User-entered intake form fields. `date`, `ip_no` and `s_no` are
/// assigned by the service at registration time.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientIntake {
    pub name: String,
    pub age: String,
    #[serde(default)]
    pub phone: String,
    pub place: String,
    #[serde(default)]
    pub referral_name: String,
    #[serde(default)]
    pub referral_phone: String,
}
