use std::net::SocketAddr;

use anyhow::Context;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use logsift_core::error::LogsiftError;
use logsift_core::filter::LogFilter;
use logsift_core::query::{LevelQuery, RangeQuery, TemplateQuery};
use logsift_engine::LogEngine;
use logsift_engine::query::render_envelope;
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::Level;

#[derive(Clone)]
pub struct QueryState {
    pub engine: LogEngine,
}

#[derive(Debug, Deserialize)]
struct RangeParams {
    #[serde(rename = "startDate")]
    start_date: Option<String>,
    #[serde(rename = "endDate")]
    end_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TemplateParams {
    message: Option<String>,
}

pub fn router(engine: LogEngine) -> Router {
    Router::new()
        .route("/api/filter-logs/level-logs", get(level_logs))
        .route("/api/filter-logs/date-range-logs", get(date_range_logs))
        .route("/api/filter-logs/message-template-logs", get(message_template_logs))
        .route("/api/filter-logs/status", get(status))
        .layer(
            TraceLayer::new_for_http()
                .on_request(tower_http::trace::DefaultOnRequest::new().level(Level::INFO))
                .on_response(tower_http::trace::DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(QueryState { engine })
}

pub async fn run_query_http_server(engine: LogEngine, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind HTTP query listener {addr}"))?;
    tracing::info!(%addr, dir = %engine.loader().dir().display(), "query server listening");
    axum::serve(listener, router(engine))
        .await
        .context("HTTP query server failed")
}

async fn level_logs(State(state): State<QueryState>, Query(q): Query<LevelQuery>) -> Response {
    run_filter(state.engine, q.into()).await
}

async fn date_range_logs(
    State(state): State<QueryState>,
    Query(params): Query<RangeParams>,
) -> Response {
    match RangeQuery::parse(params.start_date.as_deref(), params.end_date.as_deref()) {
        Ok(q) => run_filter(state.engine, q.into()).await,
        Err(err) => error_response(err),
    }
}

async fn message_template_logs(
    State(state): State<QueryState>,
    Query(params): Query<TemplateParams>,
) -> Response {
    let Some(message) = params.message else {
        return error_response(LogsiftError::InvalidArgument(
            "message is required".to_string(),
        ));
    };
    run_filter(state.engine, TemplateQuery { message }.into()).await
}

async fn status(State(state): State<QueryState>) -> Response {
    let result = tokio::task::spawn_blocking(move || state.engine.status()).await;
    match result {
        Ok(Ok(status)) => Json(status).into_response(),
        Ok(Err(err)) => error_response(err),
        Err(err) => error_response(LogsiftError::Internal(format!("status task failed: {err}"))),
    }
}

async fn run_filter(engine: LogEngine, filter: LogFilter) -> Response {
    let result = tokio::task::spawn_blocking(move || {
        engine
            .query(&filter)
            .and_then(|envelope| render_envelope(&envelope))
    })
    .await;

    match result {
        Ok(Ok(body)) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        Ok(Err(err)) => error_response(err),
        Err(err) => error_response(LogsiftError::Internal(format!("query task failed: {err}"))),
    }
}

fn error_response(err: LogsiftError) -> Response {
    let status = match err {
        LogsiftError::InvalidArgument(_) | LogsiftError::Parse(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        tracing::warn!(error = %err, "query failed");
    }
    let body = serde_json::json!({ "error": err.to_string() });
    (status, Json(body)).into_response()
}
