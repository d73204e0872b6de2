use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::{net::SocketAddr, sync::Arc};

use crate::api::{ApiThreadsRequest, ApiThreadsResponse};
use crate::backend::FeedBackend;
use ultrafeed_threads::{get_ranked_threads, FeedConfig, FeedError};

#[derive(Clone)]
struct AppState {
    backend: Arc<FeedBackend>,
    config: Arc<FeedConfig>,
}

pub async fn serve(args: crate::ServeArgs) -> Result<(), String> {
    let config = crate::load_config(args.config)?;
    let backend = FeedBackend::resolve(args.dataset.as_deref(), None, None, &config).await?;
    tracing::info!(backend = backend.label(), "feed backend ready");

    let state = AppState {
        backend: Arc::new(backend),
        config: Arc::new(config),
    };

    let app = Router::new()
        .route("/api/health", get(health))
        .route("/api/threads", post(threads_handler))
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .map_err(|err| format!("invalid bind address: {}", err))?;
    tracing::info!(%addr, "serving comment threads");

    axum::serve(
        tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|err| format!("failed to bind server: {}", err))?,
        app,
    )
    .await
    .map_err(|err| format!("server error: {}", err))?;

    Ok(())
}

async fn health() -> impl IntoResponse {
    StatusCode::OK
}

async fn threads_handler(
    State(state): State<AppState>,
    Json(request): Json<ApiThreadsRequest>,
) -> Result<Json<ApiThreadsResponse>, (StatusCode, String)> {
    let mut request = request
        .into_request()
        .map_err(|err| (StatusCode::BAD_REQUEST, err))?;
    request.windows = state.config.fetch.clone();

    let settings = state.config.ranking_settings();
    let threads = get_ranked_threads(&request, &settings, &state.backend.sources())
        .await
        .map_err(error_response)?;

    Ok(Json(ApiThreadsResponse::from_threads(
        threads,
        &request.served_thread_hashes,
    )))
}

fn error_response(err: FeedError) -> (StatusCode, String) {
    tracing::warn!(error = %err, "thread ranking failed");
    let status = match err {
        FeedError::Fetch { .. } => StatusCode::BAD_GATEWAY,
        FeedError::Config(_) | FeedError::Dataset(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, err.to_string())
}
