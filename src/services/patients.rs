//! Patients service
//!
//! Intake business logic on top of the store: validation, server-side date
//! and sequence-number assignment, visit statistics, filtering and export
//! snapshots.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::config::{EXPORT_PREFIX_ALL, EXPORT_PREFIX_FILTERED, EXPORT_TIMESTAMP_FORMAT};
use crate::error::{AppError, Result};
use crate::store::{PatientIntake, PatientRecord, PatientStore};

/// Visit counts shown on the dashboard stat cards
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VisitStats {
    pub today: usize,
    pub week: usize,
    pub month: usize,
    pub total: usize,
}

/// Filter criteria applied to the record list. Unset and blank criteria
/// match everything.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatientFilter {
    pub name: Option<String>,
    pub place: Option<String>,
    /// `YYYY-MM-DD` or a full RFC 3339 timestamp; matches records from the
    /// same local calendar day
    pub date: Option<String>,
    /// Exact match
    pub age: Option<String>,
    pub referral_name: Option<String>,
    pub ip_no: Option<String>,
}

impl PatientFilter {
    /// True when no criterion is set
    pub fn is_empty(&self) -> bool {
        [
            &self.name,
            &self.place,
            &self.date,
            &self.age,
            &self.referral_name,
            &self.ip_no,
        ]
        .iter()
        .all(|criterion| active(criterion).is_none())
    }

    /// Whether a record satisfies every set criterion
    pub fn matches(&self, record: &PatientRecord) -> bool {
        contains(&record.name, &self.name)
            && contains(&record.place, &self.place)
            && contains(&record.referral_name, &self.referral_name)
            && contains(&record.ip_no, &self.ip_no)
            && active(&self.age).is_none_or(|age| record.age == age)
            && self.matches_date(record)
    }

    fn matches_date(&self, record: &PatientRecord) -> bool {
        let Some(wanted_raw) = active(&self.date) else {
            return true;
        };
        let Some(wanted) = parse_day(wanted_raw) else {
            return false;
        };
        parse_day(&record.date) == Some(wanted)
    }
}

/// Service for registering and querying patient visits
#[derive(Clone)]
pub struct PatientsService {
    store: PatientStore,
    register_lock: Arc<Mutex<()>>,
}

impl PatientsService {
    pub fn new(store: PatientStore) -> Self {
        Self {
            store,
            register_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Register a new visit: validate the intake, assign the visit date and
    /// the daily `s_no`/`ip_no` sequence, and append to the store.
    pub async fn register_patient(&self, intake: PatientIntake) -> Result<PatientRecord> {
        validate_intake(&intake)?;

        // Hold the lock across count-then-append so two rapid submissions
        // cannot be assigned the same sequence numbers.
        let _guard = self.register_lock.lock().await;

        let existing = self.store.list().await?;
        let now = Local::now();
        let today_count = existing
            .iter()
            .filter(|record| is_today(&record.date, now))
            .count();

        let s_no = (today_count + 1).to_string();
        let ip_no = format!("IP{s_no:0>3}");

        let record = PatientRecord {
            date: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            ip_no,
            s_no,
            name: intake.name,
            age: intake.age,
            phone: intake.phone,
            place: intake.place,
            referral_name: intake.referral_name,
            referral_phone: intake.referral_phone,
        };

        self.store.append(record.clone()).await?;

        tracing::info!("Registered patient {} ({})", record.name, record.ip_no);
        Ok(record)
    }

    /// All records, newest first
    pub async fn list_patients(&self) -> Result<Vec<PatientRecord>> {
        self.store.list().await
    }

    /// Dashboard counts, bucketed in local time
    pub async fn visit_stats(&self) -> Result<VisitStats> {
        let records = self.store.list().await?;
        Ok(bucket_visits(&records, Local::now()))
    }

    /// Records matching the given filter, newest first
    pub async fn filter_patients(&self, filter: &PatientFilter) -> Result<Vec<PatientRecord>> {
        let records = self.store.list().await?;
        Ok(records
            .into_iter()
            .filter(|record| filter.matches(record))
            .collect())
    }

    /// Export the given records under the supplied filename
    pub async fn export_patients(
        &self,
        records: &[PatientRecord],
        filename: &str,
    ) -> Result<PathBuf> {
        self.store.export_snapshot(records, filename).await
    }

    /// Filter, name and export in one step, mirroring the download action
    pub async fn export_filtered(&self, filter: &PatientFilter) -> Result<PathBuf> {
        let records = self.filter_patients(filter).await?;
        let filename = export_filename(!filter.is_empty(), Utc::now());

        tracing::info!("Exporting {} records as {}", records.len(), filename);
        self.store.export_snapshot(&records, &filename).await
    }
}

fn validate_intake(intake: &PatientIntake) -> Result<()> {
    if intake.name.trim().is_empty() {
        return Err(AppError::Validation("name is required".to_string()));
    }
    if intake.place.trim().is_empty() {
        return Err(AppError::Validation("place is required".to_string()));
    }
    if intake.age.trim().parse::<u32>().is_err() {
        return Err(AppError::Validation(
            "age must be a whole number".to_string(),
        ));
    }
    Ok(())
}

fn bucket_visits(records: &[PatientRecord], now: DateTime<Local>) -> VisitStats {
    VisitStats {
        today: records
            .iter()
            .filter(|record| is_today(&record.date, now))
            .count(),
        week: records
            .iter()
            .filter(|record| is_this_week(&record.date, now))
            .count(),
        month: records
            .iter()
            .filter(|record| is_this_month(&record.date, now))
            .count(),
        total: records.len(),
    }
}

fn is_today(raw: &str, now: DateTime<Local>) -> bool {
    parse_visit_date(raw).is_some_and(|date| date.date_naive() == now.date_naive())
}

/// Week starts on Sunday
fn is_this_week(raw: &str, now: DateTime<Local>) -> bool {
    let week_start =
        now.date_naive() - Duration::days(now.weekday().num_days_from_sunday() as i64);
    parse_visit_date(raw).is_some_and(|date| date.date_naive() >= week_start)
}

fn is_this_month(raw: &str, now: DateTime<Local>) -> bool {
    let Some(month_start) = now.date_naive().with_day(1) else {
        return false;
    };
    parse_visit_date(raw).is_some_and(|date| date.date_naive() >= month_start)
}

fn parse_visit_date(raw: &str) -> Option<DateTime<Local>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|date| date.with_timezone(&Local))
}

fn parse_day(raw: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    parse_visit_date(raw).map(|date| date.date_naive())
}

fn active(criterion: &Option<String>) -> Option<&str> {
    criterion
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn contains(value: &str, criterion: &Option<String>) -> bool {
    match active(criterion) {
        Some(needle) => value.to_lowercase().contains(&needle.to_lowercase()),
        None => true,
    }
}

fn export_filename(filtered: bool, now: DateTime<Utc>) -> String {
    let prefix = if filtered {
        EXPORT_PREFIX_FILTERED
    } else {
        EXPORT_PREFIX_ALL
    };
    format!("{prefix}_export_{}.xlsx", now.format(EXPORT_TIMESTAMP_FORMAT))
}
