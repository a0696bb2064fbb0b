//! Integration tests for patientdesk
//!
//! End-to-end flows through the command adapter over temporary
//! directories: store lifecycle, intake registration, filtering,
//! statistics and export snapshots.

use patientdesk::app::{self, AppState};
use patientdesk::commands;
use patientdesk::config::StoreConfig;
use patientdesk::services::PatientFilter;
use patientdesk::store::PatientIntake;
use tempfile::TempDir;

fn intake(name: &str, age: &str, place: &str) -> PatientIntake {
    PatientIntake {
        name: name.to_string(),
        age: age.to_string(),
        phone: String::new(),
        place: place.to_string(),
        referral_name: "Dr Rao".to_string(),
        referral_phone: String::new(),
    }
}

async fn create_test_state() -> (AppState, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let config = StoreConfig::new(
        temp_dir.path().join("store"),
        temp_dir.path().join("downloads"),
    );
    let state = app::setup(config).await.unwrap();
    (state, temp_dir)
}

#[tokio::test]
async fn test_store_lifecycle_and_intake() {
    let (state, _temp) = create_test_state().await;

    // setup created the store file with only the header
    assert!(commands::check_store_exists(&state).await);
    assert!(commands::read_patients(&state).await.is_empty());

    assert!(commands::write_patient(&state, intake("Asha", "30", "Pune")).await);
    let patients = commands::read_patients(&state).await;
    assert_eq!(patients.len(), 1);
    assert_eq!(patients[0].name, "Asha");
    assert_eq!(patients[0].s_no, "1");
    assert_eq!(patients[0].ip_no, "IP001");

    assert!(commands::write_patient(&state, intake("Ravi", "41", "Mumbai")).await);
    let patients = commands::read_patients(&state).await;
    assert_eq!(patients.len(), 2);
    // newest first
    assert_eq!(patients[0].name, "Ravi");
    assert_eq!(patients[0].ip_no, "IP002");
    assert_eq!(patients[1].name, "Asha");
}

#[tokio::test]
async fn test_initialize_resets_store() {
    let (state, _temp) = create_test_state().await;

    assert!(commands::write_patient(&state, intake("Asha", "30", "Pune")).await);
    assert!(commands::initialize_store(&state).await);
    assert!(commands::initialize_store(&state).await);

    assert!(commands::check_store_exists(&state).await);
    assert!(commands::read_patients(&state).await.is_empty());
}

#[tokio::test]
async fn test_write_rejects_invalid_intake() {
    let (state, _temp) = create_test_state().await;

    assert!(!commands::write_patient(&state, intake("", "30", "Pune")).await);
    assert!(!commands::write_patient(&state, intake("Asha", "thirty", "Pune")).await);

    assert!(commands::read_patients(&state).await.is_empty());
}

#[tokio::test]
async fn test_filter_and_stats() {
    let (state, _temp) = create_test_state().await;

    assert!(commands::write_patient(&state, intake("Asha", "30", "Pune")).await);
    assert!(commands::write_patient(&state, intake("Ravi", "41", "Mumbai")).await);

    let by_name = commands::filter_patients(
        &state,
        PatientFilter {
            name: Some("ash".to_string()),
            ..Default::default()
        },
    )
    .await;
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].name, "Asha");

    let by_age = commands::filter_patients(
        &state,
        PatientFilter {
            age: Some("41".to_string()),
            ..Default::default()
        },
    )
    .await;
    assert_eq!(by_age.len(), 1);
    assert_eq!(by_age[0].name, "Ravi");

    // both visits were registered just now
    let stats = commands::get_visit_stats(&state).await;
    assert_eq!(stats.today, 2);
    assert_eq!(stats.week, 2);
    assert_eq!(stats.month, 2);
    assert_eq!(stats.total, 2);
}

#[tokio::test]
async fn test_export_snapshot_isolation_and_naming() {
    let (state, _temp) = create_test_state().await;

    assert!(commands::write_patient(&state, intake("Asha", "30", "Pune")).await);
    assert!(commands::write_patient(&state, intake("Ravi", "41", "Mumbai")).await);

    let all_path = commands::export_filtered_patients(&state, PatientFilter::default())
        .await
        .unwrap();
    assert!(all_path.exists());
    let all_name = all_path.file_name().unwrap().to_string_lossy().to_string();
    assert!(all_name.starts_with("all_patients_export_"));
    assert!(all_name.ends_with(".xlsx"));

    let filtered_path = commands::export_filtered_patients(
        &state,
        PatientFilter {
            place: Some("pune".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let filtered_name = filtered_path
        .file_name()
        .unwrap()
        .to_string_lossy()
        .to_string();
    assert!(filtered_name.starts_with("filtered_patients_export_"));

    // exports never touch the primary store
    assert_eq!(commands::read_patients(&state).await.len(), 2);
}

#[tokio::test]
async fn test_export_with_explicit_filename() {
    let (state, temp) = create_test_state().await;

    assert!(commands::write_patient(&state, intake("Asha", "30", "Pune")).await);
    let records = commands::read_patients(&state).await;

    let path = commands::export_patients(&state, records, "visits.xlsx".to_string())
        .await
        .unwrap();

    assert_eq!(path, temp.path().join("downloads").join("visits.xlsx"));
    assert!(path.exists());

    // blank filename is refused
    assert!(commands::export_patients(&state, Vec::new(), "  ".to_string())
        .await
        .is_none());
}

#[tokio::test]
async fn test_record_wire_format_uses_camel_case() {
    let (state, _temp) = create_test_state().await;

    assert!(commands::write_patient(&state, intake("Asha", "30", "Pune")).await);
    let patients = commands::read_patients(&state).await;

    let value = serde_json::to_value(&patients[0]).unwrap();
    let object = value.as_object().unwrap();
    for key in [
        "date",
        "ipNo",
        "sNo",
        "name",
        "age",
        "phone",
        "place",
        "referralName",
        "referralPhone",
    ] {
        assert!(object.contains_key(key), "missing key {key}");
    }
}
