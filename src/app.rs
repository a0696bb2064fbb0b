//! Application state and initialization
//!
//! Wires configuration into the store and services. The host shell calls
//! `init_tracing` once at startup, then `setup` to build the state it
//! passes to every command.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::StoreConfig;
use crate::error::Result;
use crate::services::PatientsService;
use crate::store::PatientStore;

/// Central application state holding all services
#[derive(Clone)]
pub struct AppState {
    pub store: PatientStore,
    pub patients_service: PatientsService,
}

/// Initialize logging. Called once by the host shell before `setup`.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "patientdesk=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Application setup - called once on startup
pub async fn setup(config: StoreConfig) -> Result<AppState> {
    tracing::info!("Initializing application");
    tracing::info!("Store directory: {:?}", config.store_dir);

    let store = PatientStore::new(config);

    // First run: create the store file so the first read sees a valid sheet.
    if !store.exists().await {
        store.initialize().await?;
    }

    let patients_service = PatientsService::new(store.clone());

    tracing::info!("Application initialized successfully");

    Ok(AppState {
        store,
        patients_service,
    })
}
