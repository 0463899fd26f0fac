//! Recommendation DTOs.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::product_dto::ProductDto;
use crate::service::recommendation::Recommendation;

/// Query parameters for `GET /products/recommendations`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct RecommendationParams {
    /// Free-text query to recommend against.
    pub query: String,
}

/// Response body for `GET /products/recommendations`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResponse {
    /// Human-readable recommendation text.
    pub recommendation_text: String,
    /// Catalog products named by the completion.
    pub recommended_products: Vec<ProductDto>,
}

impl From<Recommendation> for RecommendationResponse {
    fn from(recommendation: Recommendation) -> Self {
        Self {
            recommendation_text: recommendation.recommendation_text,
            recommended_products: recommendation
                .recommended_products
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }
}
