use crate::dashboard::Dashboard;
use crate::render::escape_html;

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use chrono::Local;
use serde::Serialize;
use std::io::ErrorKind;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

// =============================================================================
// HTTP Surface
// =============================================================================

const NOT_GENERATED_HTML: &str = r#"<html><body>
<h1>Dashboard Not Found</h1>
<p>The dashboard has not been generated yet.</p>
<p>Open <a href="/api/refresh">/api/refresh</a> or run <code>rusty-portboard --once</code> to generate it.</p>
</body></html>"#;

const NOT_FOUND_HTML: &str = r#"<html><body>
<h1>404 Not Found</h1>
<p>The requested page was not found.</p>
<p>Available endpoints:</p>
<ul>
    <li><a href="/">Dashboard</a></li>
    <li><a href="/api/refresh">API Refresh</a></li>
</ul>
</body></html>"#;

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub status: &'static str,
    pub message: String,
    pub timestamp: String,
}

impl RefreshResponse {
    fn new(status: &'static str, message: String) -> Self {
        Self {
            status,
            message,
            timestamp: Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
        }
    }
}

pub fn router(dashboard: Arc<Dashboard>) -> Router {
    Router::new()
        .route("/", get(serve_dashboard))
        .route("/dashboard", get(serve_dashboard))
        .route("/api/refresh", get(refresh))
        .fallback(not_found)
        .with_state(dashboard)
}

/// Serves until the listener fails; the caller decides when to stop the task.
pub async fn serve(dashboard: Arc<Dashboard>, bind: &str, port: u16) -> Result<()> {
    let addr = format!("{}:{}", bind, port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind web server to {}", addr))?;

    info!("Web server listening on http://{}", addr);
    axum::serve(listener, router(dashboard))
        .await
        .context("Web server stopped unexpectedly")
}

/// GET / and GET /dashboard - the last generated page, straight from disk
async fn serve_dashboard(State(dashboard): State<Arc<Dashboard>>) -> Response {
    match tokio::fs::read_to_string(dashboard.output()).await {
        Ok(html) => Html(html).into_response(),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            (StatusCode::NOT_FOUND, Html(NOT_GENERATED_HTML)).into_response()
        }
        Err(e) => {
            error!(
                "Failed to read dashboard {}: {}",
                dashboard.output().display(),
                e
            );
            let body = format!(
                "<html><body>\n<h1>Server Error</h1>\n<p>Error loading dashboard: {}</p>\n</body></html>",
                escape_html(&e.to_string())
            );
            (StatusCode::INTERNAL_SERVER_ERROR, Html(body)).into_response()
        }
    }
}

/// GET /api/refresh - regenerate now and report the outcome
async fn refresh(
    State(dashboard): State<Arc<Dashboard>>,
) -> Result<Json<RefreshResponse>, (StatusCode, Json<RefreshResponse>)> {
    info!("Refresh requested over HTTP");
    match dashboard.refresh().await {
        Ok(_) => Ok(Json(RefreshResponse::new(
            "success",
            "Dashboard updated successfully".to_string(),
        ))),
        Err(e) => {
            error!("Requested refresh failed: {:#}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(RefreshResponse::new("error", format!("{:#}", e))),
            ))
        }
    }
}

async fn not_found() -> (StatusCode, Html<&'static str>) {
    (StatusCode::NOT_FOUND, Html(NOT_FOUND_HTML))
}
