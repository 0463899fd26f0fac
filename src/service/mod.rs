//! Service layer: recorder, analytics engine, dashboard façade,
//! catalog service, and recommendation service.

pub mod analytics;
pub mod dashboard;
pub mod product_service;
pub mod recommendation;
pub mod recorder;

pub use analytics::AnalyticsEngine;
pub use dashboard::DashboardService;
pub use product_service::ProductService;
pub use recommendation::RecommendationService;
pub use recorder::InteractionRecorder;
