//! # storefront-gateway
//!
//! REST gateway for an e-commerce product catalog with user-interaction
//! tracking, an analytics dashboard, and AI-assisted product
//! recommendations.
//!
//! The heart of the service is the interaction subsystem: every
//! qualifying user action (search, view, click, time spent) is recorded
//! as an [`domain::interaction::InteractionEvent`] and merged into a
//! durable store, from which three on-demand reports are computed —
//! hourly trends, a most-interacted leaderboard, and a conversion
//! funnel.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── ProductService ─┬─ InteractionRecorder (service/)
//!     ├── DashboardService ── AnalyticsEngine
//!     ├── RecommendationService ── external completion API
//!     │
//!     └── InteractionStore / ProductStore (persistence/)
//!             PostgreSQL or in-memory
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
