mod analyzer;
mod config;
mod error;
mod flow;
mod models;
mod prompt;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json},
    routing::{get, post},
    Router,
};
use config::Config;
use error::AnalysisError;
use flow::AnalysisFlow;
use models::Language;
use reqwest::Client;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::services::ServeDir;
use tracing::{error, info, warn};

use analyzer::GeminiClient;

struct AppState {
    gemini: GeminiClient,
    flow: RwLock<AnalysisFlow>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = Config::from_env();
    let port = config.port;

    let client = Client::builder()
        .timeout(std::time::Duration::from_secs(300))
        .build()
        .expect("Failed to create HTTP client");

    let state = Arc::new(AppState {
        gemini: GeminiClient::new(client, &config),
        flow: RwLock::new(AnalysisFlow::new()),
    });

    let app = Router::new()
        .route("/", get(index_handler))
        .route("/analyze", post(analyze_handler))
        .route("/status", get(status_handler))
        .nest_service("/static", ServeDir::new("static"))
        .with_state(state);

    let addr = format!("0.0.0.0:{}", port);
    info!("Server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind");

    axum::serve(listener, app).await.expect("Server failed");
}

async fn index_handler() -> impl IntoResponse {
    let html = include_str!("../static/index.html");
    Html(html)
}

async fn status_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let flow = state.flow.read().await;
    Json(flow.status())
}

async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mut image_bytes: Option<Vec<u8>> = None;
    let mut content_type = "image/jpeg".to_string();
    let mut language = Language::En;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("Multipart error: {}", e)))?
    {
        let name = field.name().map(|n| n.to_string());
        match name.as_deref() {
            Some("image") => {
                if let Some(ct) = field.content_type() {
                    content_type = ct.to_string();
                }
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| (StatusCode::BAD_REQUEST, format!("Failed to read image: {}", e)))?;
                image_bytes = Some(bytes.to_vec());
            }
            Some("language") => {
                let tag = field.text().await.map_err(|e| {
                    (StatusCode::BAD_REQUEST, format!("Failed to read language: {}", e))
                })?;
                language = Language::from_tag(&tag).unwrap_or(Language::En);
            }
            _ => {}
        }
    }

    // An analyze without an image is a local condition: no network call,
    // no flow transition.
    let image_bytes = match image_bytes {
        Some(bytes) if !bytes.is_empty() => bytes,
        _ => {
            warn!("Analyze requested without an image");
            return Err((
                StatusCode::BAD_REQUEST,
                AnalysisError::MissingInput.user_message().to_string(),
            ));
        }
    };

    info!(
        "Received image: {} bytes, type: {}, language: {:?}",
        image_bytes.len(),
        content_type,
        language
    );

    {
        let mut flow = state.flow.write().await;
        flow.image_uploaded();
        if let Err(e) = flow.begin_analysis() {
            return Err((StatusCode::BAD_REQUEST, e.user_message().to_string()));
        }
    }

    match state.gemini.analyze(&image_bytes, &content_type, language).await {
        Ok(result) => {
            let mut flow = state.flow.write().await;
            flow.complete(result.clone());
            Ok(Json(result))
        }
        Err(e) => {
            error!("Analysis failed: {}", e);
            let message = e.user_message().to_string();
            state.flow.write().await.fail(message.clone());
            Err((StatusCode::INTERNAL_SERVER_ERROR, message))
        }
    }
}
