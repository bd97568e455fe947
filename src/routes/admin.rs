use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::models::Category;
use crate::{AppError, AppState, Result};

/// Query parameters for admin stats endpoint
#[derive(Debug, Deserialize)]
pub struct AdminQuery {
    /// Admin secret key for authentication
    pub key: Option<String>,
}

/// Record counts per category
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStatsResponse {
    pub backend: &'static str,
    pub waitlist_count: usize,
    pub feedback_count: usize,
    pub onboarding_count: usize,
}

/// Admin stats endpoint
///
/// Returns record counts for monitoring. Disabled unless `ADMIN_SECRET_KEY`
/// is set; the key must be passed as a query parameter.
///
/// GET /admin/stats?key=<admin_secret_key>
pub async fn admin_stats(
    State(state): State<AppState>,
    Query(params): Query<AdminQuery>,
) -> Result<Json<AdminStatsResponse>> {
    let admin_key = state
        .config
        .admin_secret_key
        .as_ref()
        .ok_or(AppError::Unauthorized)?;

    if params.key.as_deref() != Some(admin_key.as_str()) {
        tracing::warn!("Invalid admin key attempt");
        return Err(AppError::Unauthorized);
    }

    let mut counts = [0usize; 3];
    for category in Category::ALL {
        counts[category.index()] = state.store.list_all(category).await?.len();
    }

    tracing::info!(
        "Admin stats requested: {} waitlist, {} feedback, {} onboarding",
        counts[0],
        counts[1],
        counts[2]
    );

    Ok(Json(AdminStatsResponse {
        backend: state.store.backend(),
        waitlist_count: counts[Category::Waitlist.index()],
        feedback_count: counts[Category::Feedback.index()],
        onboarding_count: counts[Category::Onboarding.index()],
    }))
}
