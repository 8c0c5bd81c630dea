//! Nestegg Web Server
//!
//! Axum-based REST API for the Nestegg savings recommendation engine.
//!
//! The trained model artifact is loaded once at startup and shared read-only
//! across requests; a missing or corrupt artifact aborts startup. Individual
//! prediction failures are caught at the request boundary and returned as a
//! structured error payload while the service stays up.

use std::sync::Arc;

use axum::{
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use nestegg_core::ModelArtifact;

mod handlers;

/// Default HTTP listen port when neither `--port` nor `PORT` is set
pub const DEFAULT_PORT: u16 = 8080;

/// Shared application state
pub struct AppState {
    /// Trained model, loaded once at startup, never mutated
    pub model: Arc<ModelArtifact>,
}

/// Create the application router
pub fn create_router(model: ModelArtifact) -> Router {
    info!(
        kind = %model.kind,
        features = model.feature_names().len(),
        classes = model.classes.len(),
        "model artifact loaded"
    );

    let state = Arc::new(AppState {
        model: Arc::new(model),
    });

    let api_routes = Router::new()
        .route("/recommendations", post(handlers::get_recommendations))
        .route("/health", get(handlers::get_health));

    // Restrictive default: same-origin only
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Start the server
pub async fn serve(model: ModelArtifact, host: &str, port: u16) -> anyhow::Result<()> {
    let app = create_router(model);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn internal(msg: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            internal: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}
