//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::service::{
    DashboardService, InteractionRecorder, ProductService, RecommendationService,
};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Catalog CRUD and search.
    pub products: Arc<ProductService>,
    /// Interaction event recording.
    pub recorder: Arc<InteractionRecorder>,
    /// Dashboard report façade.
    pub dashboard: Arc<DashboardService>,
    /// AI recommendation assembly.
    pub recommendations: Arc<RecommendationService>,
}
