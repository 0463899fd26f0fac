//! Dashboard report handlers.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{
    ConversionFunnelDto, MostInteractedResponse, TrendBucketDto, TrendsParams,
};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};

/// `GET /dashboard/interaction-trends` — Hourly interaction trend
/// report; `lastHours` defaults to 24.
///
/// # Errors
///
/// Returns [`GatewayError`] on store failure.
#[utoipa::path(
    get,
    path = "/dashboard/interaction-trends",
    tag = "Dashboard",
    summary = "Hourly interaction trends",
    params(TrendsParams),
    responses(
        (status = 200, description = "One row per hourly bucket", body = Vec<TrendBucketDto>),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn interaction_trends(
    State(state): State<AppState>,
    Query(params): Query<TrendsParams>,
) -> Result<impl IntoResponse, GatewayError> {
    let buckets = state.dashboard.interaction_trends(params.last_hours).await?;
    let rows: Vec<TrendBucketDto> = buckets.into_iter().map(Into::into).collect();
    Ok(Json(rows))
}

/// `GET /dashboard/most-interacted-products` — Search-term and product
/// leaderboards.
///
/// # Errors
///
/// Returns [`GatewayError`] on store failure.
#[utoipa::path(
    get,
    path = "/dashboard/most-interacted-products",
    tag = "Dashboard",
    summary = "Most interacted products and search terms",
    responses(
        (status = 200, description = "Leaderboard report", body = MostInteractedResponse),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn most_interacted_products(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, GatewayError> {
    let report = state.dashboard.most_interacted_products().await?;
    Ok(Json(MostInteractedResponse::from(report)))
}

/// `GET /dashboard/conversion-funnel` — Search/view/click totals plus
/// engagement minutes.
///
/// # Errors
///
/// Returns [`GatewayError`] on store failure.
#[utoipa::path(
    get,
    path = "/dashboard/conversion-funnel",
    tag = "Dashboard",
    summary = "Conversion funnel",
    responses(
        (status = 200, description = "Funnel report", body = ConversionFunnelDto),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn conversion_funnel(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, GatewayError> {
    let funnel = state.dashboard.conversion_funnel().await?;
    Ok(Json(ConversionFunnelDto::from(funnel)))
}

/// Dashboard routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard/interaction-trends", get(interaction_trends))
        .route(
            "/dashboard/most-interacted-products",
            get(most_interacted_products),
        )
        .route("/dashboard/conversion-funnel", get(conversion_funnel))
}
