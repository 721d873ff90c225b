//! HTTP Handlers

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Serialize;

use checkout_payments::{ApiResponse, PaymentRequest};

use crate::state::AppState;

pub const INVALID_BODY_MESSAGE: &str = "invalid request body";
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "only post method is allowed";

type ApiResult = Result<Json<ApiResponse>, (StatusCode, Json<ApiResponse>)>;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub processor: String,
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        processor: state.checkout.processor_name().to_string(),
    })
}

/// Create a hosted checkout session.
///
/// The body is parsed as JSON whatever its `Content-Type`.
pub async fn create_session(State(state): State<AppState>, body: Bytes) -> ApiResult {
    let request: PaymentRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected checkout request body");
            return Err(failure(StatusCode::BAD_REQUEST, INVALID_BODY_MESSAGE));
        }
    };

    let response = state.checkout.create_for(&request).await.map_err(|e| {
        if e.is_client_error() {
            tracing::warn!(error = %e, price = %request.price, "Checkout rejected");
        } else {
            tracing::error!(error = %e, "Checkout error");
        }
        failure(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    Ok(Json(response))
}

/// Any method other than POST on the checkout route
pub async fn method_not_allowed() -> (StatusCode, Json<ApiResponse>) {
    failure(StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED_MESSAGE)
}

fn failure(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<ApiResponse>) {
    (status, Json(ApiResponse::failure(status.as_u16(), message)))
}
