use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::analysis::AnalysisResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
    #[serde(default)]
    pub resumes: Vec<String>,
    #[serde(default)]
    pub jobs: Vec<String>,
}

/// POST /analyze
///
/// Runs the query against a freshly provisioned assistant scoped to the
/// selected files. Any remote failure comes back as a 500 with its message.
pub async fn handle_analyze(
    State(state): State<AppState>,
    request: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalysisResult>, AppError> {
    let Json(request) = request.map_err(|e| AppError::InvalidInput(e.body_text()))?;

    let result = state
        .sessions
        .analyze(&request.text, &request.resumes, &request.jobs)
        .await?;

    Ok(Json(result))
}
