use axum::{extract::State, Json};
use serde::Serialize;

use crate::applications::repository::{insert_application, list_applications};
use crate::errors::AppError;
use crate::models::application::{ApplicationRow, NewApplication};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ApplicationListResponse {
    pub applications: Vec<ApplicationRow>,
}

#[derive(Debug, Serialize)]
pub struct ApplicationCreatedResponse {
    pub success: bool,
    pub application: ApplicationRow,
}

/// GET /api/applications
pub async fn handle_list_applications(
    State(state): State<AppState>,
) -> Result<Json<ApplicationListResponse>, AppError> {
    let applications = list_applications(&state.db).await?;
    Ok(Json(ApplicationListResponse { applications }))
}

/// POST /api/applications
pub async fn handle_create_application(
    State(state): State<AppState>,
    Json(request): Json<NewApplication>,
) -> Result<Json<ApplicationCreatedResponse>, AppError> {
    let application = insert_application(&state.db, request).await?;
    Ok(Json(ApplicationCreatedResponse {
        success: true,
        application,
    }))
}
