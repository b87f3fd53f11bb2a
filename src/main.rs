//! Content Analyzer - upload a PDF/image or paste text, get engagement suggestions.

mod analysis;
mod config;
mod error;
mod extract;
mod gateway;
mod llm;
mod normalizer;
mod ocr;
mod pdf;
mod prompt;

use analysis::AnalysisResult;
use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use config::{AppConfig, MAX_TEXT_LENGTH, MIN_TEXT_LENGTH};
use error::{ApiError, ExtractError, InputError};
use extract::{Extractor, FileKind};
use gateway::Gateway;
use normalizer::Normalizer;
use ocr::tesseract::TesseractEngine;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Characters of pasted text echoed back in the response.
const ECHO_TEXT_CHARS: usize = 2000;
/// Headroom for multipart framing on top of the file size limit.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    gateway: Arc<Gateway>,
    extractor: Arc<Extractor>,
    config: Arc<AppConfig>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "content_analyzer=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    info!(
        "Loaded config: {} artifact rules, upload dir {:?}, model configured: {}",
        config.denylist.rules().len(),
        config.upload_dir,
        config.model_configured()
    );

    let gateway = Gateway::new(llm::from_config(&config), config.model_timeout);

    let ocr = TesseractEngine::new(config.tesseract_path.clone(), config.ocr_lang.clone());
    let extractor = Extractor::new(
        Arc::new(ocr),
        Normalizer::new(config.denylist.clone()),
        config.upload_dir.clone(),
    )
    .with_multi_pass(config.ocr_multi_pass);

    let bind_addr = config.bind_addr.clone();
    let state = AppState {
        gateway: Arc::new(gateway),
        extractor: Arc::new(extractor),
        config: Arc::new(config),
    };

    let app = create_router(state);

    // Run server
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Server listening on http://{}", bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

fn create_router(state: AppState) -> Router {
    let body_limit = state.config.max_file_size + MULTIPART_OVERHEAD;

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/analyze", post(analyze_file))
        .route("/analyze-text", post(analyze_text))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ============================================================================
// Handlers
// ============================================================================

async fn root() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "Social Media Content Analyzer API",
    }))
}

/// Health check endpoint.
async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "model_configured": state.gateway.model_name().is_some(),
        "model": state.gateway.model_name(),
    }))
}

#[derive(Debug, Serialize)]
struct FileAnalysisResponse {
    success: bool,
    filename: String,
    file_type: FileKind,
    extracted_text: String,
    char_count: usize,
    analysis: AnalysisResult,
}

/// Upload a document, extract its text and analyze it.
async fn analyze_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<FileAnalysisResponse>, ApiError> {
    let limit = state.config.max_file_size;
    let (filename, file_data) = read_upload(&mut multipart, limit).await?;

    let kind = FileKind::from_filename(&filename)
        .ok_or_else(|| InputError::UnsupportedFileType {
            filename: filename.clone(),
        })?;

    info!("Received file: {} ({} bytes, {:?})", filename, file_data.len(), kind);

    let extracted_text = state.extractor.extract(&file_data, kind).await.map_err(|e| {
        error!("Extraction failed for {}: {}", filename, e);
        e
    })?;

    if extracted_text.is_empty() {
        return Err(ExtractError::NoContent.into());
    }

    let analysis = state.gateway.analyze(&extracted_text).await;

    Ok(Json(FileAnalysisResponse {
        success: true,
        filename,
        file_type: kind,
        char_count: extracted_text.chars().count(),
        extracted_text,
        analysis,
    }))
}

/// Pull the `file` field out of the multipart body.
async fn read_upload(
    multipart: &mut Multipart,
    limit: usize,
) -> Result<(String, Vec<u8>), InputError> {
    let too_large = |e: &axum::extract::multipart::MultipartError| {
        e.status() == StatusCode::PAYLOAD_TOO_LARGE
    };

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        if too_large(&e) {
            InputError::FileTooLarge { limit }
        } else {
            InputError::Multipart(e.to_string())
        }
    })? {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or("document").to_string();
            let data = field.bytes().await.map_err(|e| {
                if too_large(&e) {
                    InputError::FileTooLarge { limit }
                } else {
                    InputError::Multipart(format!("Failed to read file: {}", e))
                }
            })?;

            if data.is_empty() {
                return Err(InputError::MissingFile);
            }
            if data.len() > limit {
                return Err(InputError::FileTooLarge { limit });
            }
            return Ok((filename, data.to_vec()));
        }
    }

    Err(InputError::MissingFile)
}

#[derive(Debug, Deserialize)]
struct TextAnalyzeRequest {
    text: String,
}

#[derive(Debug, Serialize)]
struct TextAnalysisResponse {
    success: bool,
    extracted_text: String,
    char_count: usize,
    analysis: AnalysisResult,
}

/// Analyze raw pasted text directly.
async fn analyze_text(
    State(state): State<AppState>,
    Json(body): Json<TextAnalyzeRequest>,
) -> Result<Json<TextAnalysisResponse>, ApiError> {
    let text = body.text.trim();
    let char_count = text.chars().count();

    if char_count < MIN_TEXT_LENGTH {
        return Err(InputError::TextTooShort.into());
    }
    if char_count > MAX_TEXT_LENGTH {
        return Err(InputError::TextTooLong.into());
    }

    let analysis = state.gateway.analyze(text).await;

    Ok(Json(TextAnalysisResponse {
        success: true,
        extracted_text: text.chars().take(ECHO_TEXT_CHARS).collect(),
        char_count,
        analysis,
    }))
}
