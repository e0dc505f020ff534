use axum::{
    Router,
    extract::{Json, Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::Utc;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::core::{AccrualClock, IncomeSchedule, Profile};
use crate::estimate::{EstimatePayload, build_estimate, build_request, validate_profile};
use crate::store::{ConfigStore, load_or_default};

#[derive(Clone)]
pub struct ApiState {
    store: Arc<dyn ConfigStore>,
    clock: AccrualClock,
    schedule: Arc<IncomeSchedule>,
}

impl ApiState {
    pub fn new(store: Arc<dyn ConfigStore>, clock: AccrualClock, schedule: IncomeSchedule) -> Self {
        Self {
            store,
            clock,
            schedule: Arc::new(schedule),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route(
            "/api/estimate",
            get(estimate_get_handler).post(estimate_post_handler),
        )
        .route("/api/config", get(config_get_handler).put(config_put_handler))
        .fallback(not_found_handler)
        .with_state(state)
}

pub async fn run_http_server(addr: SocketAddr, state: ApiState) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "carrot HTTP API listening");
    tracing::info!("local access: http://127.0.0.1:{}/api/estimate", addr.port());

    axum::serve(listener, router(state)).await
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn estimate_get_handler(
    State(state): State<ApiState>,
    Query(payload): Query<EstimatePayload>,
) -> Response {
    estimate_handler_impl(&state, payload)
}

async fn estimate_post_handler(
    State(state): State<ApiState>,
    Json(payload): Json<EstimatePayload>,
) -> Response {
    estimate_handler_impl(&state, payload)
}

fn estimate_handler_impl(state: &ApiState, payload: EstimatePayload) -> Response {
    let profile = load_or_default(state.store.as_ref());
    let request = match build_request(&profile, &payload.into(), &state.clock) {
        Ok(request) => request,
        Err(msg) => {
            tracing::debug!(error = %msg, "rejected estimate request");
            return error_response(StatusCode::BAD_REQUEST, &msg);
        }
    };

    let estimate = build_estimate(&request, &state.clock, &state.schedule, Utc::now());
    tracing::debug!(
        support_years = estimate.support_years,
        current_deposit = estimate.current_deposit,
        "estimate computed"
    );
    json_response(StatusCode::OK, estimate)
}

async fn config_get_handler(State(state): State<ApiState>) -> Response {
    match state.store.load() {
        Ok(profile) => json_response(StatusCode::OK, profile),
        Err(err) => {
            tracing::error!(error = %err, "failed to load profile");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
        }
    }
}

async fn config_put_handler(
    State(state): State<ApiState>,
    Json(profile): Json<Profile>,
) -> Response {
    if let Err(msg) = validate_profile(&profile) {
        return error_response(StatusCode::BAD_REQUEST, &msg);
    }
    if let Err(err) = state.store.save(&profile) {
        tracing::error!(error = %err, "failed to save profile");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string());
    }
    tracing::info!(
        deposit = profile.deposit,
        annual_income = profile.annual_income,
        "profile updated"
    );
    json_response(StatusCode::OK, profile)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}
