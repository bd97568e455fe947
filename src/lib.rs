//! Carer Intake Server Library
//!
//! Submission and sync backend for the carer-matching website: waitlist,
//! feedback and onboarding capture persisted to JSON files or Google Sheets,
//! CSV export, and reconciliation of legacy spreadsheet rows.

pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod models;
pub mod routes;
pub mod sheets;
pub mod store;
pub mod sync;

pub use config::{Config, StorageBackend};
pub use error::{AppError, Result};

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use routes::{
    admin_stats, export_records, health_check, onboarding_get, onboarding_post, organize_sheets,
    submit,
};
use sheets::{GoogleSheetsClient, MemorySheets, ServiceAccount, SheetsApi};
use store::{FileStore, RecordStore, SheetStore};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    /// Present when submissions live in a spreadsheet; required by sheet sync
    pub sheets: Option<Arc<dyn SheetsApi>>,
    pub config: Config,
}

impl AppState {
    /// Create a new AppState with the given store and configuration
    pub fn new(
        store: Arc<dyn RecordStore>,
        sheets: Option<Arc<dyn SheetsApi>>,
        config: Config,
    ) -> Self {
        Self {
            store,
            sheets,
            config,
        }
    }

    /// Build the configured storage backend
    pub async fn from_config(config: Config) -> Result<Self> {
        match config.storage_backend {
            StorageBackend::File => {
                let store = FileStore::open(&config.data_dir).await?;
                Ok(Self::new(Arc::new(store), None, config))
            }
            StorageBackend::Sheets => {
                let creds = config.sheets.clone().ok_or_else(|| {
                    AppError::InvalidInput("missing spreadsheet credentials".to_string())
                })?;
                let account = ServiceAccount::new(creds.client_email, &creds.private_key)?;
                let sheets: Arc<dyn SheetsApi> =
                    Arc::new(GoogleSheetsClient::new(account, creds.sheet_id));
                Ok(Self::with_sheets(sheets, config))
            }
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory storage; submissions are lost on restart");
                Ok(Self::with_sheets(Arc::new(MemorySheets::new()), config))
            }
        }
    }

    /// State whose records live in `sheets`
    pub fn with_sheets(sheets: Arc<dyn SheetsApi>, config: Config) -> Self {
        let store = Arc::new(SheetStore::new(sheets.clone()));
        Self::new(store, Some(sheets), config)
    }
}

/// Build the application router
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/submit", post(submit))
        .route("/api/export", get(export_records))
        .route("/api/onboarding", get(onboarding_get).post(onboarding_post))
        .route("/api/organize-sheets", get(organize_sheets))
        .route("/admin/stats", get(admin_stats))
        .with_state(state)
}
