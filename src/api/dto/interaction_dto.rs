//! Interaction tracking DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{InteractionEvent, InteractionKind};
use crate::error::GatewayError;

/// Wire representation of the interaction kind discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum InteractionTypeDto {
    /// A catalog search.
    Search,
    /// A product detail view.
    View,
    /// A click on a product.
    Click,
    /// Time spent on a product page.
    TimeSpend,
}

impl From<&InteractionKind> for InteractionTypeDto {
    fn from(kind: &InteractionKind) -> Self {
        match kind {
            InteractionKind::Search { .. } => Self::Search,
            InteractionKind::View { .. } => Self::View,
            InteractionKind::Click { .. } => Self::Click,
            InteractionKind::TimeSpent { .. } => Self::TimeSpend,
        }
    }
}

/// Request body for `POST /interactions`, the generic event intake.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrackInteractionRequest {
    /// Session id of the actor.
    pub session_id: String,
    /// Interaction kind discriminant.
    pub interaction_type: InteractionTypeDto,
    /// Product id; required for view, click, and time_spend.
    #[serde(default)]
    pub product_id: Option<String>,
    /// Query text; only meaningful for search.
    #[serde(default)]
    pub search_query: Option<String>,
    /// Duration in seconds; required for time_spend.
    #[serde(default)]
    pub time_spend: Option<f64>,
}

impl TrackInteractionRequest {
    /// Splits the request into the session id and a typed kind.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] when a field required
    /// by the declared kind is missing.
    pub fn into_parts(self) -> Result<(String, InteractionKind), GatewayError> {
        let kind = match self.interaction_type {
            InteractionTypeDto::Search => InteractionKind::Search {
                query: self.search_query,
            },
            InteractionTypeDto::View => InteractionKind::View {
                product_id: require_product_id(self.product_id, "view")?,
            },
            InteractionTypeDto::Click => InteractionKind::Click {
                product_id: require_product_id(self.product_id, "click")?,
            },
            InteractionTypeDto::TimeSpend => InteractionKind::TimeSpent {
                product_id: require_product_id(self.product_id, "time_spend")?,
                seconds: self.time_spend.ok_or_else(|| {
                    GatewayError::InvalidRequest(
                        "timeSpend is required for time_spend interactions".to_string(),
                    )
                })?,
            },
        };
        Ok((self.session_id, kind))
    }
}

fn require_product_id(
    product_id: Option<String>,
    kind: &str,
) -> Result<String, GatewayError> {
    product_id.ok_or_else(|| {
        GatewayError::InvalidRequest(format!("productId is required for {kind} interactions"))
    })
}

/// Request body for `POST /products/{id}/click`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClickRequest {
    /// Session id of the actor.
    pub session_id: String,
}

/// Request body for `POST /products/{id}/time-spend`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimeSpendRequest {
    /// Session id of the actor.
    pub session_id: String,
    /// Duration in seconds.
    pub time_spend: f64,
}

/// A stored interaction as serialized in responses.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InteractionDto {
    /// Session id of the actor.
    pub session_id: String,
    /// Interaction kind discriminant.
    pub interaction_type: InteractionTypeDto,
    /// Product id, for product-scoped kinds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    /// Query text, for searches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,
    /// Record timestamp (refreshed on merge).
    pub timestamp: DateTime<Utc>,
    /// Occurrence counter.
    pub count: u64,
    /// Accumulated duration in seconds, for time-spent records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_spend: Option<f64>,
}

impl From<InteractionEvent> for InteractionDto {
    fn from(event: InteractionEvent) -> Self {
        Self {
            interaction_type: InteractionTypeDto::from(&event.kind),
            product_id: event.kind.product_id().map(str::to_string),
            search_query: event.kind.search_query().map(str::to_string),
            time_spend: event.kind.seconds(),
            session_id: event.session_id,
            timestamp: event.timestamp,
            count: event.count,
        }
    }
}
