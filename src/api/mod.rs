//! REST API layer: route handlers, DTOs, and router composition.
//!
//! Routes are mounted at the root to preserve the paths the dashboard
//! and storefront clients already call.

pub mod dto;
pub mod handlers;

use axum::Router;

use crate::app_state::AppState;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .merge(handlers::routes())
        .merge(handlers::system::routes())
}
