use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{ApiError, AppState};
use crate::handler::write::export_report;
use crate::report::Report;
use crate::uploads::StoredFile;

#[derive(Deserialize, Debug)]
pub struct GenerateRequest {
    pub template: Vec<String>,
    pub filenames: Vec<String>,
    pub tone: Option<String>,
    pub style: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct GenerateResponse {
    pub document: String,
}

#[derive(Deserialize, Debug)]
pub struct ClarifyRequest {
    pub template: Vec<String>,
    pub filenames: Vec<String>,
}

#[derive(Serialize, Debug)]
pub struct ClarifyResponse {
    pub questions: String,
}

#[derive(Serialize, Debug)]
pub struct FileList {
    pub files: Vec<StoredFile>,
}

pub async fn read_root() -> Json<Value> {
    Json(json!({ "message": "Welcome to the reportforge API" }))
}

pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "healthy", "message": "reportforge API is running" }))
}

/// Saves every file of the `files` multipart field. Nothing is written when any
/// of them has an unsupported extension or an unusable name.
pub async fn upload_files(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let mut files = Vec::new();
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ApiError::new(StatusCode::BAD_REQUEST, format!("Multipart error: {}", e))
    })? {
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let bytes = field.bytes().await.map_err(|e| {
            ApiError::new(StatusCode::BAD_REQUEST, format!("Failed to read {}: {}", filename, e))
        })?;
        files.push((filename, bytes));
    }

    if files.is_empty() {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "No files uploaded"));
    }
    for (name, _) in &files {
        state.uploads.validate(name).map_err(anyhow::Error::new)?;
    }

    let mut filenames = Vec::with_capacity(files.len());
    for (name, bytes) in files {
        state.uploads.save(&name, &bytes)?;
        filenames.push(name);
    }

    Ok(Json(json!({
        "filenames": filenames,
        "message": format!("Successfully uploaded {} files", filenames.len()),
    })))
}

async fn build_report(state: &AppState, request: GenerateRequest) -> Result<Report, ApiError> {
    let tone = request.tone.unwrap_or_else(|| state.default_tone.clone());
    let style = request.style.unwrap_or_else(|| state.default_style.clone());
    state.generator
        .create_final_document(&request.template, &request.filenames, &tone, &style)
        .await
        .map_err(|e| ApiError::internal("Failed to generate document", e))
}

pub async fn generate_document(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let report = build_report(&state, request).await?;
    Ok(Json(GenerateResponse { document: report.render() }))
}

pub async fn clarifying_questions(
    State(state): State<AppState>,
    Json(request): Json<ClarifyRequest>,
) -> Result<Json<ClarifyResponse>, ApiError> {
    let questions = state.generator
        .ask_clarifying_questions(&request.template, &request.filenames)
        .await
        .map_err(|e| ApiError::internal("Failed to generate clarifying questions", e))?;
    Ok(Json(ClarifyResponse { questions }))
}

pub async fn list_files(State(state): State<AppState>) -> Result<Json<FileList>, ApiError> {
    let files = state.uploads.list()
        .map_err(|e| ApiError::internal("Failed to list files", e))?;
    Ok(Json(FileList { files }))
}

pub async fn delete_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.uploads.remove(&filename)
        .map_err(|e| ApiError::internal("Failed to delete file", e))?;
    Ok(Json(json!({ "message": format!("File {} deleted successfully", filename) })))
}

pub async fn export_document(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<Value>, ApiError> {
    let report = build_report(&state, request).await?;
    let stem = format!("generated_report_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S%3f"));
    let export_dir = state.export_dir.clone();
    let path = tokio::task::spawn_blocking(move || export_report(&report, &export_dir, &stem))
        .await
        .map_err(|e| ApiError::internal("Export task failed", e.into()))?
        .map_err(|e| ApiError::internal("Failed to export report", e))?;
    info!("Report exported to {}", path.display());

    let filename = path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(Json(json!({
        "message": "Workbook generated successfully",
        "filename": filename,
        "path": path.display().to_string(),
    })))
}
