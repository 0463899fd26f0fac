//! Dashboard façade over the analytics engine.
//!
//! No aggregation logic of its own; it only fills in parameter
//! defaults before delegating.

use std::sync::Arc;

use crate::domain::{ConversionFunnel, MostInteractedReport, TrendBucket};
use crate::error::GatewayError;
use crate::service::AnalyticsEngine;

/// Trend window used when the caller does not specify `lastHours`.
const DEFAULT_TREND_WINDOW_HOURS: u32 = 24;

/// Thin orchestration layer exposing the three dashboard reports.
#[derive(Debug, Clone)]
pub struct DashboardService {
    engine: Arc<AnalyticsEngine>,
}

impl DashboardService {
    /// Creates a new façade over the given engine.
    #[must_use]
    pub fn new(engine: Arc<AnalyticsEngine>) -> Self {
        Self { engine }
    }

    /// Returns the hourly trend report; `last_hours` defaults to 24.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] when the store query
    /// fails.
    pub async fn interaction_trends(
        &self,
        last_hours: Option<u32>,
    ) -> Result<Vec<TrendBucket>, GatewayError> {
        self.engine
            .interaction_trends(last_hours.unwrap_or(DEFAULT_TREND_WINDOW_HOURS))
            .await
    }

    /// Returns the leaderboard report.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] when a store query
    /// fails.
    pub async fn most_interacted_products(&self) -> Result<MostInteractedReport, GatewayError> {
        self.engine.most_interacted_products().await
    }

    /// Returns the conversion funnel report.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] when the store query
    /// fails.
    pub async fn conversion_funnel(&self) -> Result<ConversionFunnel, GatewayError> {
        self.engine.conversion_funnel().await
    }
}
