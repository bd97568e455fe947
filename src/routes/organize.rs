use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::sync::{organize, SyncReport};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct OrganizeResponse {
    pub success: bool,
    #[serde(flatten)]
    pub report: SyncReport,
}

/// Move stray rows from catch-all sheets into the Waitlist and Feedback sheets
///
/// Not idempotent: calling it again copies the same source rows again.
pub async fn organize_sheets(State(state): State<AppState>) -> Result<Json<OrganizeResponse>> {
    let sheets = state
        .sheets
        .as_ref()
        .ok_or(AppError::SheetsNotConfigured)?;

    let report = organize(sheets.as_ref()).await?;
    if !report.errors.is_empty() {
        tracing::warn!("{} rows could not be organized", report.errors.len());
    }

    Ok(Json(OrganizeResponse {
        success: true,
        report,
    }))
}
