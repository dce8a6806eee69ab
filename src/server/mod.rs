use std::path::PathBuf;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use log::{error, info};
use tower_http::cors::CorsLayer;

use crate::report::Generator;
use crate::uploads::{UploadError, UploadStore};
use crate::Config;

mod api;

#[derive(Clone)]
pub struct AppState {
    generator: Generator,
    uploads: UploadStore,
    export_dir: PathBuf,
    default_tone: String,
    default_style: String,
    max_upload_bytes: usize,
}

impl AppState {
    pub fn new(generator: Generator, config: &Config) -> Self {
        Self {
            generator,
            uploads: UploadStore::new(&config.upload_dir),
            export_dir: PathBuf::from(&config.export_dir),
            default_tone: config.default_tone.clone(),
            default_style: config.default_style.clone(),
            max_upload_bytes: config.max_upload_bytes,
        }
    }
}

pub fn router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes;
    let api = Router::new()
        .route("/upload", post(api::upload_files))
        .route("/generate", post(api::generate_document))
        .route("/clarify", post(api::clarifying_questions))
        .route("/files", get(api::list_files))
        .route("/files/{filename}", delete(api::delete_file))
        .route("/export", post(api::export_document))
        .route("/health", get(api::health_check));

    Router::new()
        .route("/", get(api::read_root))
        .nest("/api", api)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

pub async fn serve(config: Config, bind: &str) -> anyhow::Result<()> {
    let generator = Generator::from_config(&config)?;
    let state = AppState::new(generator, &config);
    std::fs::create_dir_all(state.uploads.dir())?;

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", bind, e))?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {e}"))?;
    Ok(())
}

/// JSON error body `{"detail": ...}` with a matching status code.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self { status, detail: detail.into() }
    }

    pub fn internal(context: &str, err: anyhow::Error) -> Self {
        Self::from(err).with_context(context)
    }

    fn with_context(mut self, context: &str) -> Self {
        if self.status == StatusCode::INTERNAL_SERVER_ERROR {
            self.detail = format!("{}. Error: {}", context, self.detail);
        }
        self
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<UploadError>() {
            Some(UploadError::NotFound(_)) => Self::new(StatusCode::NOT_FOUND, err.to_string()),
            Some(_) => Self::new(StatusCode::BAD_REQUEST, err.to_string()),
            None => Self::new(StatusCode::INTERNAL_SERVER_ERROR, format!("{:#}", err)),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!("{}", self.detail);
        }
        (self.status, Json(serde_json::json!({ "detail": self.detail }))).into_response()
    }
}
