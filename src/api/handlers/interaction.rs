//! Interaction tracking handlers: generic intake plus the per-product
//! click and time-spend endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{ClickRequest, InteractionDto, TimeSpendRequest, TrackInteractionRequest};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};

/// `POST /interactions` — Record any interaction event.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] when the session id is
/// empty or a field required by the declared kind is missing.
#[utoipa::path(
    post,
    path = "/interactions",
    tag = "Interactions",
    summary = "Record an interaction event",
    request_body = TrackInteractionRequest,
    responses(
        (status = 201, description = "Event recorded (or merged)", body = InteractionDto),
        (status = 400, description = "Invalid event fields", body = ErrorResponse),
    )
)]
pub async fn track_interaction(
    State(state): State<AppState>,
    Json(req): Json<TrackInteractionRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let (session_id, kind) = req.into_parts()?;
    let stored = state.recorder.record(&session_id, kind).await?;
    Ok((StatusCode::CREATED, Json(InteractionDto::from(stored))))
}

/// `POST /products/{id}/click` — Record a click on a product.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] when the session id is
/// empty.
#[utoipa::path(
    post,
    path = "/products/{id}/click",
    tag = "Interactions",
    summary = "Record a product click",
    params(
        ("id" = String, Path, description = "Product identifier"),
    ),
    request_body = ClickRequest,
    responses(
        (status = 201, description = "Click recorded (or merged)", body = InteractionDto),
        (status = 400, description = "Invalid event fields", body = ErrorResponse),
    )
)]
pub async fn track_click(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Json(req): Json<ClickRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let stored = state
        .recorder
        .record_click(&req.session_id, &product_id)
        .await?;
    Ok((StatusCode::CREATED, Json(InteractionDto::from(stored))))
}

/// `POST /products/{id}/time-spend` — Record time spent on a product
/// page.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] when the session id is
/// empty or the duration is negative or not a number.
#[utoipa::path(
    post,
    path = "/products/{id}/time-spend",
    tag = "Interactions",
    summary = "Record time spent on a product",
    params(
        ("id" = String, Path, description = "Product identifier"),
    ),
    request_body = TimeSpendRequest,
    responses(
        (status = 201, description = "Duration recorded (or accumulated)", body = InteractionDto),
        (status = 400, description = "Invalid event fields", body = ErrorResponse),
    )
)]
pub async fn track_time_spent(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Json(req): Json<TimeSpendRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let stored = state
        .recorder
        .record_time_spent(&req.session_id, &product_id, req.time_spend)
        .await?;
    Ok((StatusCode::CREATED, Json(InteractionDto::from(stored))))
}

/// Interaction tracking routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/interactions", post(track_interaction))
        .route("/products/{id}/click", post(track_click))
        .route("/products/{id}/time-spend", post(track_time_spent))
}
