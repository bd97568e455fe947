use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{Query, State},
    Json,
};

use super::SubmitResponse;
use crate::constants::MSG_ONBOARDING_RECEIVED;
use crate::error::{AppError, Result};
use crate::models::{Category, OnboardingForm, Submission};
use crate::store::{append, AppendOutcome};
use crate::AppState;

/// Accept an onboarding application sent as query parameters
pub async fn onboarding_get(
    State(state): State<AppState>,
    form: std::result::Result<Query<OnboardingForm>, QueryRejection>,
) -> Result<Json<SubmitResponse>> {
    let Query(form) = form?;
    record_application(&state, form).await
}

/// Accept an onboarding application sent as a JSON body
pub async fn onboarding_post(
    State(state): State<AppState>,
    form: std::result::Result<Json<OnboardingForm>, JsonRejection>,
) -> Result<Json<SubmitResponse>> {
    let Json(form) = form?;
    record_application(&state, form).await
}

async fn record_application(state: &AppState, form: OnboardingForm) -> Result<Json<SubmitResponse>> {
    match append(state.store.as_ref(), Submission::Onboarding(form)).await? {
        AppendOutcome::Appended(_) => Ok(Json(SubmitResponse::accepted(
            Category::Onboarding,
            MSG_ONBOARDING_RECEIVED,
        ))),
        // Only waitlist emails are unique
        AppendOutcome::Duplicate => Err(AppError::Internal(format!(
            "{} store reported a duplicate onboarding application",
            state.store.backend()
        ))),
    }
}
