use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{AppError, Result};
use crate::models::{Category, Submission};
use crate::store::{append, AppendOutcome};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub email: Option<String>,
    pub feedback: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
}

impl SubmitResponse {
    /// Successful submission, redirecting to the category's thank-you page
    pub fn accepted(category: Category, message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            redirect_url: Some(category.redirect_url().to_string()),
        }
    }

    /// Soft failure: HTTP 200 with `success: false`
    pub fn rejected(message: &str) -> Self {
        Self {
            success: false,
            message: message.to_string(),
            redirect_url: None,
        }
    }
}

/// Accept a waitlist or feedback form submission
///
/// A waitlist email that is already stored is a soft failure, not an error.
pub async fn submit(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SubmitRequest>, JsonRejection>,
) -> Result<Json<SubmitResponse>> {
    let Json(payload) = payload?;
    let category: Category = payload.kind.unwrap_or_default().parse()?;

    let (submission, message) = match category {
        Category::Waitlist => (
            Submission::Waitlist {
                email: payload.email,
            },
            MSG_WAITLIST_JOINED,
        ),
        Category::Feedback => (
            Submission::Feedback {
                email: payload.email,
                feedback: payload.feedback,
            },
            MSG_FEEDBACK_RECEIVED,
        ),
        Category::Onboarding => return Err(AppError::InvalidCategory(category.to_string())),
    };

    match append(state.store.as_ref(), submission).await {
        Ok(AppendOutcome::Appended(_)) => Ok(Json(SubmitResponse::accepted(category, message))),
        Ok(AppendOutcome::Duplicate) => Ok(Json(SubmitResponse::rejected(MSG_ALREADY_ON_WAITLIST))),
        Err(AppError::InvalidInput(msg)) => {
            tracing::info!("Rejected {} submission: {}", category, msg);
            Err(AppError::InvalidInput(msg))
        }
        Err(e) => Err(e),
    }
}
