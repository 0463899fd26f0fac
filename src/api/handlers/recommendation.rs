//! AI recommendation handler.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{RecommendationParams, RecommendationResponse};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};

/// `GET /products/recommendations` — Recommend products for a query
/// using the recorded interaction history.
///
/// # Errors
///
/// Returns [`GatewayError::RecommendationUnavailable`] when the
/// completion API fails or is not configured.
#[utoipa::path(
    get,
    path = "/products/recommendations",
    tag = "Recommendations",
    summary = "AI product recommendations",
    params(RecommendationParams),
    responses(
        (status = 200, description = "Recommendation text and products", body = RecommendationResponse),
        (status = 502, description = "Completion API unavailable", body = ErrorResponse),
    )
)]
pub async fn get_recommendations(
    State(state): State<AppState>,
    Query(params): Query<RecommendationParams>,
) -> Result<impl IntoResponse, GatewayError> {
    let recommendation = state.recommendations.recommendations(&params.query).await?;
    Ok(Json(RecommendationResponse::from(recommendation)))
}

/// Recommendation routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/products/recommendations", get(get_recommendations))
}
