use crate::agent::ChatAgent;
use crate::models::api::{
    PanelRequest,
    PanelResponse,
    SaveRequest,
    SubmitRequest,
    SubmitResponse,
};
use crate::server::error::ApiError;
use crate::transcript::history_panel;

use std::num::NonZeroU32;
use std::sync::Arc;
use axum::{
    extract::{ rejection::JsonRejection, Request, State },
    http::StatusCode,
    middleware::{ self, Next },
    response::{ Html, IntoResponse, Response },
    routing::{ get, post },
    Json,
    Router,
};
use chrono::Utc;
use governor::{ RateLimiter, Quota, state::{ InMemoryState, NotKeyed }, clock::DefaultClock };
use tower::ServiceBuilder;
use tower_http::cors::{ Any, CorsLayer };
use log::{ debug, error, warn };

const INDEX_HTML: &str = include_str!("../../assets/index.html");

pub type RequestLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

#[derive(Clone)]
pub struct AppState {
    pub agent: ChatAgent,
    pub limiter: Arc<RequestLimiter>,
}

impl AppState {
    pub fn new(agent: ChatAgent, requests_per_second: u32) -> Self {
        let per_second = NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN);
        Self {
            agent,
            limiter: Arc::new(RateLimiter::direct(Quota::per_second(per_second))),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/api", post(submit_handler))
        .route("/api/history", get(history_handler))
        .route("/api/saveMessage", post(save_handler))
        .route("/api/panel", post(panel_handler))
        .layer(
            ServiceBuilder::new()
                .layer(cors)
                .layer(middleware::from_fn_with_state(state.clone(), rate_limit))
        )
        .with_state(state)
}

async fn rate_limit(State(state): State<AppState>, req: Request, next: Next) -> Response {
    if state.limiter.check().is_err() {
        warn!("Global request rate limit exceeded for {} {}", req.method(), req.uri().path());
        return ApiError::RateLimited.into_response();
    }
    next.run(req).await
}

async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health_handler() -> &'static str {
    "ok"
}

async fn submit_handler(
    State(state): State<AppState>,
    payload: Result<Json<SubmitRequest>, JsonRejection>
) -> Result<Json<SubmitResponse>, ApiError> {
    let Json(req) = payload?;
    debug!("Submission with {} message(s)", req.messages.len());
    let text = state.agent.process_messages(&req.messages).await?;
    Ok(Json(SubmitResponse { text }))
}

async fn history_handler(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let exchanges = state.agent
        .exchange_store()
        .list_all().await
        .map_err(|e| {
            error!("Failed to fetch history: {}", e);
            ApiError::HistoryUnavailable
        })?;
    Ok(Json(exchanges))
}

async fn save_handler(
    State(state): State<AppState>,
    payload: Result<Json<SaveRequest>, JsonRejection>
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let question = req.question.trim();
    if question.is_empty() {
        return Err(ApiError::BadRequest("question is required".to_string()));
    }

    let exchange = state.agent
        .exchange_store()
        .append(question, req.answer.as_deref()).await
        .map_err(|e| {
            error!("Failed to save message: {}", e);
            ApiError::SaveFailed
        })?;
    Ok((StatusCode::CREATED, Json(exchange)))
}

async fn panel_handler(
    payload: Result<Json<PanelRequest>, JsonRejection>
) -> Result<Json<PanelResponse>, ApiError> {
    let Json(req) = payload?;
    let entries = history_panel(&req.messages, Utc::now());
    Ok(Json(PanelResponse { empty: entries.is_empty(), entries }))
}
