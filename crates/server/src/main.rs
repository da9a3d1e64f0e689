//! # cleansheet-server
//!
//! HTTP server for the cleansheet API: upload a spreadsheet, run cleaning
//! commands against it, download the result.

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use clap::Parser;
use cleansheet_codec::{CodecError, FileFormat};
use cleansheet_core::Row;
use cleansheet_pipeline::{CommandOutcome, CommandSpec};
use cleansheet_service::{CleaningService, ServiceError};
use cleansheet_store::{FileStore, MemoryStore, TableId, TableStore};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

/// Matches the upload limit the frontend enforces.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// cleansheet - upload, clean, and download spreadsheet data
#[derive(Parser)]
#[command(name = "cleansheet-server")]
#[command(author, version, about = "HTTP API for spreadsheet cleaning", long_about = None)]
struct Config {
    /// Port to listen on
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Storage backend for uploaded tables
    #[arg(long, value_enum, default_value = "memory")]
    storage: StorageBackend,

    /// Data directory for the file backend
    #[arg(long, default_value = "./data", value_name = "DIR")]
    data_dir: PathBuf,
}

/// Storage backend selection.
#[derive(Clone, Copy, Default, clap::ValueEnum)]
enum StorageBackend {
    /// Keep tables in process memory
    #[default]
    Memory,
    /// Persist tables as JSON files under the data directory
    File,
}

/// Health check response.
#[derive(Serialize, Deserialize)]
pub struct Health {
    /// Server status ("ok" when healthy).
    pub status: String,
    /// Server version from Cargo.toml.
    pub version: String,
}

/// Health check endpoint handler.
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    table_id: TableId,
    preview: Vec<Row>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CleanRequest {
    table_id: TableId,
    commands: Vec<CommandSpec>,
}

#[derive(Serialize, Deserialize)]
struct CleanResponse {
    preview: Vec<Row>,
    outcomes: Vec<CommandOutcome>,
}

#[derive(Deserialize)]
struct DownloadQuery {
    #[serde(default = "default_format")]
    format: String,
}

fn default_format() -> String {
    "csv".to_string()
}

/// User-visible request failures, mapped onto HTTP statuses.
enum ApiError {
    BadRequest(String),
    NotFound(String),
    UnsupportedFormat(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m),
            ApiError::UnsupportedFormat(m) => (StatusCode::UNSUPPORTED_MEDIA_TYPE, m),
            ApiError::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, m),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        if err.is_not_found() {
            ApiError::NotFound(err.to_string())
        } else {
            ApiError::Internal(err.to_string())
        }
    }
}

impl From<CodecError> for ApiError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::UnsupportedFormat(_) => ApiError::UnsupportedFormat(err.to_string()),
            _ => ApiError::BadRequest(err.to_string()),
        }
    }
}

/// Decode a multipart upload and store it.
async fn upload<S: TableStore>(
    State(service): State<Arc<CleaningService<S>>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let Some(filename) = field.file_name().map(str::to_string) else {
            return Err(ApiError::BadRequest(
                "uploaded file has no filename".to_string(),
            ));
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;

        let table = cleansheet_codec::decode(&bytes, &filename)?;
        let (table_id, preview) = service.upload(table).await?;
        return Ok(Json(UploadResponse { table_id, preview }));
    }

    Err(ApiError::BadRequest("no file uploaded".to_string()))
}

/// Run a command sequence against a stored table.
async fn clean<S: TableStore>(
    State(service): State<Arc<CleaningService<S>>>,
    Json(request): Json<CleanRequest>,
) -> Result<Json<CleanResponse>, ApiError> {
    let output = service.clean(&request.table_id, &request.commands).await?;
    Ok(Json(CleanResponse {
        preview: output.preview,
        outcomes: output.outcomes,
    }))
}

/// Encode a stored table for download.
async fn download<S: TableStore>(
    State(service): State<Arc<CleaningService<S>>>,
    Path(table_id): Path<String>,
    Query(query): Query<DownloadQuery>,
) -> Result<Response, ApiError> {
    let format = FileFormat::from_label(&query.format)?;
    let table = service.fetch(&TableId::from(table_id)).await?;

    let bytes = cleansheet_codec::encode(&table, format)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let headers = [
        (header::CONTENT_TYPE, format.mime_type().to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!(
                "attachment; filename=cleaned-data.{}",
                format.extension()
            ),
        ),
    ];
    Ok((headers, bytes).into_response())
}

/// Create the application router.
///
/// This is separated from `main()` to allow testing.
fn create_router<S: TableStore + 'static>(service: Arc<CleaningService<S>>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/upload", post(upload::<S>))
        .route("/clean", post(clean::<S>))
        .route("/download/:table_id", get(download::<S>))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();

    let app = match config.storage {
        StorageBackend::Memory => {
            create_router(Arc::new(CleaningService::new(MemoryStore::new())))
        }
        StorageBackend::File => {
            tracing::info!("persisting tables under {}", config.data_dir.display());
            create_router(Arc::new(CleaningService::new(FileStore::new(
                &config.data_dir,
            ))))
        }
    };

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("cleansheet-server listening on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
