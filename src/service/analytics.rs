//! Aggregation engine: trend, leaderboard, and funnel reports.
//!
//! Read-only. Every report is a deterministic function of the event
//! store (and, for the leaderboard, the product catalog) at call time;
//! there is no caching or incremental state. Store failures propagate
//! unchanged, so each report is all-or-nothing.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Timelike, Utc};
use uuid::Uuid;

use crate::domain::{
    ConversionFunnel, InteractionKind, MostInteractedReport, ProductLeaderboardEntry, SearchTrend,
    TrendBucket,
};
use crate::error::GatewayError;
use crate::persistence::{InteractionStore, ProductStore};

/// Placeholder title for leaderboard rows whose product id does not
/// resolve to a catalog entry.
pub const UNKNOWN_PRODUCT: &str = "Unknown Product";

/// Computes the three dashboard reports from the event store.
#[derive(Debug, Clone)]
pub struct AnalyticsEngine {
    interactions: Arc<dyn InteractionStore>,
    products: Arc<dyn ProductStore>,
}

#[derive(Default)]
struct ProductTotals {
    interactions: u64,
    clicks: u64,
    time_spent: f64,
}

impl AnalyticsEngine {
    /// Creates a new engine over the given stores.
    #[must_use]
    pub fn new(interactions: Arc<dyn InteractionStore>, products: Arc<dyn ProductStore>) -> Self {
        Self {
            interactions,
            products,
        }
    }

    /// Buckets the last `last_hours` hours of interactions into
    /// contiguous one-hour buckets.
    ///
    /// The window is `[now - last_hours, now)`. All buckets are
    /// emitted, zero-filled when empty. Each in-range event is assigned
    /// to the bucket containing its timestamp, so an event at
    /// `now - 90min` always lands in the middle of a three-hour window.
    /// Rows are sorted ascending by the 0-23 `hour` label of the
    /// bucket start.
    ///
    /// `last_hours = 0` yields an empty report.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] when the store query
    /// fails.
    pub async fn interaction_trends(
        &self,
        last_hours: u32,
    ) -> Result<Vec<TrendBucket>, GatewayError> {
        if last_hours == 0 {
            return Ok(Vec::new());
        }

        let end = Utc::now();
        let start = end - Duration::hours(i64::from(last_hours));
        let events = self.interactions.events_between(start, end).await?;

        let mut buckets: Vec<TrendBucket> = (0..last_hours)
            .map(|i| TrendBucket {
                hour: (start + Duration::hours(i64::from(i))).hour(),
                searches: 0,
                views: 0,
                clicks: 0,
                time_spend: 0.0,
            })
            .collect();

        let last_index = buckets.len().saturating_sub(1);
        for event in &events {
            let offset_secs = (event.timestamp - start).num_seconds().max(0);
            let index = usize::try_from(offset_secs / 3600)
                .unwrap_or(last_index)
                .min(last_index);

            if let Some(bucket) = buckets.get_mut(index) {
                match &event.kind {
                    InteractionKind::Search { .. } => {
                        bucket.searches = bucket.searches.saturating_add(event.count);
                    }
                    InteractionKind::View { .. } => {
                        bucket.views = bucket.views.saturating_add(event.count);
                    }
                    InteractionKind::Click { .. } => {
                        bucket.clicks = bucket.clicks.saturating_add(event.count);
                    }
                    InteractionKind::TimeSpent { seconds, .. } => {
                        bucket.time_spend += seconds;
                    }
                }
            }
        }

        buckets.sort_by_key(|b| b.hour);
        Ok(buckets)
    }

    /// Ranks search queries and products by interaction volume.
    ///
    /// Product rows are enriched with the catalog title via a
    /// left-outer lookup: malformed or unresolved product ids keep
    /// their aggregates and get the [`UNKNOWN_PRODUCT`] placeholder.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] when a store query
    /// fails.
    pub async fn most_interacted_products(&self) -> Result<MostInteractedReport, GatewayError> {
        let events = self.interactions.all_events().await?;

        let mut search_totals: HashMap<String, u64> = HashMap::new();
        let mut product_totals: HashMap<String, ProductTotals> = HashMap::new();

        for event in &events {
            match &event.kind {
                InteractionKind::Search { query } => {
                    let total = search_totals
                        .entry(query.clone().unwrap_or_default())
                        .or_insert(0);
                    *total = total.saturating_add(event.count);
                }
                InteractionKind::View { product_id } => {
                    let totals = product_totals.entry(product_id.clone()).or_default();
                    totals.interactions = totals.interactions.saturating_add(event.count);
                }
                InteractionKind::Click { product_id } => {
                    let totals = product_totals.entry(product_id.clone()).or_default();
                    totals.interactions = totals.interactions.saturating_add(event.count);
                    totals.clicks = totals.clicks.saturating_add(event.count);
                }
                InteractionKind::TimeSpent {
                    product_id,
                    seconds,
                } => {
                    let totals = product_totals.entry(product_id.clone()).or_default();
                    totals.interactions = totals.interactions.saturating_add(event.count);
                    totals.time_spent += seconds;
                }
            }
        }

        let mut searches: Vec<SearchTrend> = search_totals
            .into_iter()
            .map(|(name, total_interactions)| SearchTrend {
                name,
                total_interactions,
            })
            .collect();
        searches.sort_by(|a, b| {
            b.total_interactions
                .cmp(&a.total_interactions)
                .then_with(|| a.name.cmp(&b.name))
        });

        let mut products = Vec::with_capacity(product_totals.len());
        for (product_id, totals) in product_totals {
            let title = match Uuid::parse_str(&product_id) {
                Ok(id) => self.products.find(id).await?.map(|p| p.title),
                Err(_) => None,
            };
            products.push(ProductLeaderboardEntry {
                name: title.unwrap_or_else(|| UNKNOWN_PRODUCT.to_string()),
                total_interactions: totals.interactions,
                total_clicks: totals.clicks,
                total_time_spent: totals.time_spent,
            });
        }
        products.sort_by(|a, b| {
            b.total_interactions
                .cmp(&a.total_interactions)
                .then_with(|| a.name.cmp(&b.name))
        });

        Ok(MostInteractedReport { searches, products })
    }

    /// Computes the conversion funnel: total searches, views, clicks,
    /// and engagement time in whole minutes.
    ///
    /// Each total is independent of the others and defaults to zero
    /// when no matching events exist.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] when the store query
    /// fails.
    pub async fn conversion_funnel(&self) -> Result<ConversionFunnel, GatewayError> {
        let events = self.interactions.all_events().await?;

        let mut funnel = ConversionFunnel::default();
        let mut seconds_total = 0.0f64;
        for event in &events {
            match &event.kind {
                InteractionKind::Search { .. } => {
                    funnel.searches = funnel.searches.saturating_add(event.count);
                }
                InteractionKind::View { .. } => {
                    funnel.views = funnel.views.saturating_add(event.count);
                }
                InteractionKind::Click { .. } => {
                    funnel.clicks = funnel.clicks.saturating_add(event.count);
                }
                InteractionKind::TimeSpent { seconds, .. } => {
                    seconds_total += seconds;
                }
            }
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            funnel.total_time_spent = (seconds_total / 60.0).floor() as u64;
        }
        Ok(funnel)
    }
}
