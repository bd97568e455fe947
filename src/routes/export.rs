use axum::{
    extract::rejection::QueryRejection,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Deserialize;

use crate::error::Result;
use crate::export::export;
use crate::models::Category;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ExportParams {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Download all waitlist or feedback records as a CSV attachment
///
/// GET /api/export?type=<waitlist|feedback>
pub async fn export_records(
    State(state): State<AppState>,
    params: std::result::Result<Query<ExportParams>, QueryRejection>,
) -> Result<Response> {
    let Query(params) = params?;
    let category: Category = params.kind.unwrap_or_default().parse()?;

    let csv = export(state.store.as_ref(), category).await?;
    let filename = format!("{}-{}.csv", category, Utc::now().format("%Y-%m-%d"));

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        csv,
    )
        .into_response())
}
