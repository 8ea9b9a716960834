use std::{net::SocketAddr, sync::Arc};

use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode, Uri},
    response::Html,
    routing::get,
    Json, Router,
};
use server_api::{dispatch, ApiContext, EndpointRequest, Escaping, RenderOptions};
use shared::error::{ApiError, ErrorCode};
use storage::{ContactStore, Storage};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;

use app_state::AppState;
use config::{load_settings, prepare_database_url};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings();
    let database_url = prepare_database_url(&settings.database_url)?;
    let storage = Storage::new(&database_url).await.map_err(|error| {
        error!(
            %database_url,
            %error,
            "failed to open SQLite database; verify parent directory exists and permissions are correct"
        );
        error
    })?;

    if settings.render_escaping == Escaping::Trusted {
        warn!("contact fields are rendered without HTML escaping; only serve trusted clients");
    }

    let api = ApiContext {
        contacts: ContactStore::new(Arc::new(storage.clone())),
        render: RenderOptions {
            escaping: settings.render_escaping,
            htmx_script_url: settings.htmx_script_url.clone(),
        },
    };
    let state = AppState { api, storage };
    let app = build_router(Arc::new(state), settings.max_body_bytes);

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .fallback(endpoint)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz(
    State(state): State<Arc<AppState>>,
) -> Result<&'static str, (StatusCode, Json<ApiError>)> {
    state.storage.health_check().await.map_err(|e| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiError::new(ErrorCode::Unavailable, e.to_string())),
        )
    })?;
    Ok("ok")
}

/// Every path other than the health probe goes through the contact dispatcher.
async fn endpoint(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Result<Html<String>, (StatusCode, Json<ApiError>)> {
    let body = String::from_utf8(body.to_vec()).unwrap_or_else(|_| {
        warn!(path = uri.path(), "request body is not UTF-8; treating every field as absent");
        String::new()
    });
    let request = EndpointRequest::new(uri.path(), method.as_str(), body);

    match dispatch(&state.api, &request).await {
        Ok(Some(html)) => Ok(Html(html)),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ApiError::new(ErrorCode::NotFound, "route not found")),
        )),
        Err(e) => Err((StatusCode::INTERNAL_SERVER_ERROR, Json(e))),
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
