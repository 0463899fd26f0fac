//! Dashboard report DTOs.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    ConversionFunnel, MostInteractedReport, ProductLeaderboardEntry, SearchTrend, TrendBucket,
};

/// Query parameters for `GET /dashboard/interaction-trends`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct TrendsParams {
    /// Window size in hours. Defaults to 24.
    #[serde(default)]
    pub last_hours: Option<u32>,
}

/// One hourly bucket of the trend report.
///
/// The `time_spend` key is snake_case for parity with the dashboard's
/// existing chart bindings.
#[derive(Debug, Serialize, ToSchema)]
pub struct TrendBucketDto {
    /// Hour-of-day (0-23, UTC) of the bucket start.
    pub hour: u32,
    /// Search total in this bucket.
    pub searches: u64,
    /// View total in this bucket.
    pub views: u64,
    /// Click total in this bucket.
    pub clicks: u64,
    /// Engagement seconds in this bucket.
    pub time_spend: f64,
}

impl From<TrendBucket> for TrendBucketDto {
    fn from(bucket: TrendBucket) -> Self {
        Self {
            hour: bucket.hour,
            searches: bucket.searches,
            views: bucket.views,
            clicks: bucket.clicks,
            time_spend: bucket.time_spend,
        }
    }
}

/// One search-query row of the leaderboard.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchTrendDto {
    /// The search query.
    pub name: String,
    /// Total searches for this query.
    pub total_interactions: u64,
}

impl From<SearchTrend> for SearchTrendDto {
    fn from(row: SearchTrend) -> Self {
        Self {
            name: row.name,
            total_interactions: row.total_interactions,
        }
    }
}

/// One product row of the leaderboard.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductLeaderboardDto {
    /// Product title, or `"Unknown Product"`.
    pub name: String,
    /// Total views, clicks, and time-spent events.
    pub total_interactions: u64,
    /// Total clicks.
    pub total_clicks: u64,
    /// Total engagement seconds.
    pub total_time_spent: f64,
}

impl From<ProductLeaderboardEntry> for ProductLeaderboardDto {
    fn from(row: ProductLeaderboardEntry) -> Self {
        Self {
            name: row.name,
            total_interactions: row.total_interactions,
            total_clicks: row.total_clicks,
            total_time_spent: row.total_time_spent,
        }
    }
}

/// Response body for `GET /dashboard/most-interacted-products`.
#[derive(Debug, Serialize, ToSchema)]
pub struct MostInteractedResponse {
    /// Search queries, most searched first.
    pub searches: Vec<SearchTrendDto>,
    /// Products, most interacted first.
    pub products: Vec<ProductLeaderboardDto>,
}

impl From<MostInteractedReport> for MostInteractedResponse {
    fn from(report: MostInteractedReport) -> Self {
        Self {
            searches: report.searches.into_iter().map(Into::into).collect(),
            products: report.products.into_iter().map(Into::into).collect(),
        }
    }
}

/// Response body for `GET /dashboard/conversion-funnel`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConversionFunnelDto {
    /// Total searches.
    pub searches: u64,
    /// Total views.
    pub views: u64,
    /// Total clicks.
    pub clicks: u64,
    /// Total engagement time in whole minutes.
    pub total_time_spent: u64,
}

impl From<ConversionFunnel> for ConversionFunnelDto {
    fn from(funnel: ConversionFunnel) -> Self {
        Self {
            searches: funnel.searches,
            views: funnel.views,
            clicks: funnel.clicks,
            total_time_spent: funnel.total_time_spent,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn funnel_serializes_total_time_spent_camel_case() {
        let dto = ConversionFunnelDto::from(ConversionFunnel::default());
        let Ok(json) = serde_json::to_string(&dto) else {
            panic!("serialization failed");
        };
        assert_eq!(
            json,
            "{\"searches\":0,\"views\":0,\"clicks\":0,\"totalTimeSpent\":0}"
        );
    }

    #[test]
    fn trend_bucket_keeps_the_snake_case_time_spend_key() {
        let dto = TrendBucketDto::from(TrendBucket {
            hour: 9,
            searches: 2,
            views: 0,
            clicks: 1,
            time_spend: 45.0,
        });
        let Ok(json) = serde_json::to_string(&dto) else {
            panic!("serialization failed");
        };
        assert!(json.contains("\"time_spend\":45.0"));
    }

    #[test]
    fn trends_params_reads_last_hours_camel_case() {
        let Ok(params) = serde_json::from_str::<TrendsParams>("{\"lastHours\":3}") else {
            panic!("deserialization failed");
        };
        assert_eq!(params.last_hours, Some(3));
    }
}
