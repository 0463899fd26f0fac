//! Report rows produced by the analytics engine.
//!
//! Plain data carriers; all aggregation logic lives in
//! [`crate::service::analytics`].

/// One hourly bucket of the interaction trend report.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendBucket {
    /// Hour-of-day (0-23, UTC) of the bucket start.
    pub hour: u32,
    /// Count-weighted search total in this bucket.
    pub searches: u64,
    /// Count-weighted view total in this bucket.
    pub views: u64,
    /// Count-weighted click total in this bucket.
    pub clicks: u64,
    /// Total seconds of engagement recorded in this bucket.
    pub time_spend: f64,
}

/// One search-query row of the leaderboard report.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchTrend {
    /// The search query (empty string when none was captured).
    pub name: String,
    /// Count-weighted total of searches for this query.
    pub total_interactions: u64,
}

/// One product row of the leaderboard report.
///
/// `name` is the catalog title, or the literal `"Unknown Product"` when
/// the recorded product id does not resolve to a catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductLeaderboardEntry {
    /// Product title or placeholder.
    pub name: String,
    /// Count-weighted total of views, clicks, and time-spent events.
    pub total_interactions: u64,
    /// Count-weighted click total.
    pub total_clicks: u64,
    /// Total engagement seconds.
    pub total_time_spent: f64,
}

/// The leaderboard report: top search queries and top products.
#[derive(Debug, Clone, PartialEq)]
pub struct MostInteractedReport {
    /// Search queries, most searched first.
    pub searches: Vec<SearchTrend>,
    /// Products, most interacted first.
    pub products: Vec<ProductLeaderboardEntry>,
}

/// The conversion funnel report.
///
/// Every field defaults to zero when no matching events exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConversionFunnel {
    /// Count-weighted search total.
    pub searches: u64,
    /// Count-weighted view total.
    pub views: u64,
    /// Count-weighted click total.
    pub clicks: u64,
    /// Total engagement time in whole minutes (floor of seconds / 60).
    pub total_time_spent: u64,
}
