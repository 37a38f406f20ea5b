//! HTTP API gateway for Agendai.
//!
//! Three routes:
//! - `GET /` liveness
//! - `GET /agenda` the calendar source's events
//! - `POST /analisar` task analysis, always answered with `200` and an envelope
//!
//! Built on Axum. The model client and calendar source are built once and
//! shared through state.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderValue, Method};
use axum::{
    Router,
    extract::State,
    response::Json,
    routing::{get, post},
};
use serde::Serialize;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{debug, info, warn};

use agendai_analysis::{AnalysisOutcome, AnalysisService, AnalyzeRequest};
use agendai_config::AppConfig;
use agendai_core::{AnalysisError, CalendarEvent};

/// Request body limit for `/analisar`.
const BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AnalysisService>,
}

impl AppState {
    pub fn new(service: AnalysisService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// Wire the model client and calendar source named by `config`.
    pub fn from_config(config: &AppConfig) -> Self {
        let client = agendai_providers::build_from_config(config);
        let calendar = agendai_calendar::build_from_config(config);
        Self::new(AnalysisService::from_config(config, client, calendar))
    }
}

/// Build the router with CORS, body limit and trace layers.
pub fn build_router(state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/agenda", get(agenda_handler))
        .route("/analisar", post(analyze_handler))
        .with_state(state)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(cors_layer(allowed_origins))
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// Any origin unless a list is configured. Unparseable entries are skipped.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origin = if allowed_origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|o| match o.parse() {
                Ok(v) => Some(v),
                Err(_) => {
                    warn!(origin = %o, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600))
}

/// Start the HTTP server and run until Ctrl-C.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let state = AppState::from_config(&config);
    if !state.service.client().is_configured() {
        warn!("No API key configured; /analisar will answer with provider errors");
    }
    let app = build_router(state, &config.gateway.allowed_origins);

    info!(addr = %addr, model = %config.model, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
struct RootResponse {
    status: &'static str,
}

async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse {
        status: "Servidor rodando",
    })
}

#[derive(Serialize)]
struct AgendaResponse {
    eventos: Vec<CalendarEvent>,
}

async fn agenda_handler(State(state): State<AppState>) -> Json<AgendaResponse> {
    let eventos = state.service.calendar().list_events().await;
    debug!(count = eventos.len(), "Agenda listed");
    Json(AgendaResponse { eventos })
}

async fn analyze_handler(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Json<AnalysisOutcome> {
    match payload {
        Ok(Json(request)) => Json(state.service.analyze(request).await),
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "Rejected /analisar body");
            Json(AnalysisOutcome::failure(AnalysisError::Validation(
                rejection.body_text(),
            )))
        }
    }
}
