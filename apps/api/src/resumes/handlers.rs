//! Axum route handlers for resume files. Bytes live in object storage,
//! metadata in the `resumes` table.

use axum::{
    extract::{Multipart, Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::resume::ResumeRow;
use crate::resumes::storage::{delete_object, ensure_bucket, get_object, put_object};
use crate::resumes::upload::{
    format_file_size, object_key_for, parse_flag, sanitize_download_name, ResumeUpload,
};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ResumeListResponse {
    pub resumes: Vec<ResumeRow>,
}

#[derive(Debug, Serialize)]
pub struct ResumeUploadResponse {
    pub success: bool,
    pub resume: ResumeRow,
}

/// GET /api/resumes
///
/// Default resume first, then newest first.
pub async fn handle_list_resumes(
    State(state): State<AppState>,
) -> Result<Json<ResumeListResponse>, AppError> {
    let resumes = sqlx::query_as::<_, ResumeRow>(
        "SELECT * FROM resumes ORDER BY is_default DESC, created_at DESC, id DESC",
    )
    .fetch_all(&state.db)
    .await?;
    Ok(Json(ResumeListResponse { resumes }))
}

/// POST /api/resumes/upload
///
/// Multipart fields: `file` (required), `name`, `isDefault`.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ResumeUploadResponse>, AppError> {
    let upload = read_upload(multipart).await?;
    upload.validate()?;

    let bucket = &state.config.s3_bucket;
    ensure_bucket(&state.s3, bucket).await?;

    let object_key = object_key_for(&upload.file_name);
    let file_size = format_file_size(upload.bytes.len());
    put_object(
        &state.s3,
        bucket,
        &object_key,
        upload.bytes.clone(),
        &upload.content_type,
    )
    .await?;

    let resume = match insert_resume(&state.db, &upload, &object_key, &file_size).await {
        Ok(resume) => resume,
        Err(e) => {
            if let Err(cleanup) = delete_object(&state.s3, bucket, &object_key).await {
                warn!("Orphaned object {object_key} after failed insert: {cleanup}");
            }
            return Err(e);
        }
    };

    info!("Stored resume {} as {object_key} ({file_size})", resume.id);
    Ok(Json(ResumeUploadResponse {
        success: true,
        resume,
    }))
}

/// Inserts the metadata row. A new default clears the previous one in the
/// same transaction.
async fn insert_resume(
    db: &PgPool,
    upload: &ResumeUpload,
    object_key: &str,
    file_size: &str,
) -> Result<ResumeRow, AppError> {
    let mut tx = db.begin().await?;
    if upload.is_default {
        sqlx::query("UPDATE resumes SET is_default = FALSE, updated_at = NOW() WHERE is_default")
            .execute(&mut *tx)
            .await?;
    }
    let resume = sqlx::query_as::<_, ResumeRow>(
        r#"
        INSERT INTO resumes (name, file_name, file_size, file_type, object_key, is_default)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(upload.display_name())
    .bind(&upload.file_name)
    .bind(file_size)
    .bind(&upload.content_type)
    .bind(object_key)
    .bind(upload.is_default)
    .fetch_one(&mut *tx)
    .await?;
    tx.commit().await?;
    Ok(resume)
}

/// GET /api/resumes/:id/download
pub async fn handle_download_resume(
    State(state): State<AppState>,
    Path(resume_id): Path<i32>,
) -> Result<Response, AppError> {
    let resume = sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1")
        .bind(resume_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Resume not found".to_string()))?;

    let body = get_object(&state.s3, &state.config.s3_bucket, &resume.object_key).await?;

    let content_type = resume
        .file_type
        .clone()
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "application/octet-stream".to_string());
    let disposition = format!(
        "attachment; filename=\"{}\"",
        sanitize_download_name(&resume.file_name)
    );

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

async fn read_upload(mut multipart: Multipart) -> Result<ResumeUpload, AppError> {
    let mut file = None;
    let mut name = None;
    let mut is_default = false;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("resume").to_string();
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read file: {e}")))?;
                file = Some((file_name, content_type, bytes));
            }
            "name" => name = Some(read_text(field).await?),
            "isDefault" => is_default = parse_flag(&read_text(field).await?),
            _ => {}
        }
    }

    let (file_name, content_type, bytes) =
        file.ok_or_else(|| AppError::Validation("No file provided".to_string()))?;

    Ok(ResumeUpload {
        file_name,
        content_type,
        bytes,
        name,
        is_default,
    })
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid form field: {e}")))
}
