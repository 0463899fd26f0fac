//! REST endpoint handlers organized by resource.

pub mod dashboard;
pub mod interaction;
pub mod product;
pub mod recommendation;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(product::routes())
        .merge(interaction::routes())
        .merge(dashboard::routes())
        .merge(recommendation::routes())
}
