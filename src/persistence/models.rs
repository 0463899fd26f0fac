//! Database row models and row/domain conversion.

use chrono::{DateTime, Utc};

use crate::domain::{InteractionEvent, InteractionKind, Product};

/// A stored interaction row from the `interactions` table.
///
/// The flat shape mirrors the table: kind-specific fields are nullable
/// columns. Conversion back to the domain event is lenient; rows with
/// missing optional columns fall back to defaults rather than failing
/// an entire report.
#[derive(Debug, Clone)]
pub struct InteractionRow {
    /// Session id of the actor.
    pub session_id: String,
    /// Kind discriminant (`"search"`, `"view"`, `"click"`,
    /// `"time_spend"`).
    pub interaction_type: String,
    /// Product id, for product-scoped kinds.
    pub product_id: Option<String>,
    /// Query text, for searches.
    pub search_query: Option<String>,
    /// Record timestamp (refreshed on merge).
    pub timestamp: DateTime<Utc>,
    /// Occurrence counter.
    pub count: i64,
    /// Accumulated duration in seconds, for time-spent records.
    pub time_spend: Option<f64>,
}

impl InteractionRow {
    /// Flattens a domain event into its row shape.
    #[must_use]
    pub fn from_event(event: &InteractionEvent) -> Self {
        Self {
            session_id: event.session_id.clone(),
            interaction_type: event.kind.type_str().to_string(),
            product_id: event.kind.product_id().map(str::to_string),
            search_query: event.kind.search_query().map(str::to_string),
            timestamp: event.timestamp,
            count: i64::try_from(event.count).unwrap_or(i64::MAX),
            time_spend: event.kind.seconds(),
        }
    }

    /// Rebuilds the domain event. Unknown discriminants are `None`;
    /// the caller skips such rows instead of failing the query.
    #[must_use]
    pub fn into_event(self) -> Option<InteractionEvent> {
        let kind = match self.interaction_type.as_str() {
            "search" => InteractionKind::Search {
                query: self.search_query,
            },
            "view" => InteractionKind::View {
                product_id: self.product_id.unwrap_or_default(),
            },
            "click" => InteractionKind::Click {
                product_id: self.product_id.unwrap_or_default(),
            },
            "time_spend" => InteractionKind::TimeSpent {
                product_id: self.product_id.unwrap_or_default(),
                seconds: self.time_spend.unwrap_or(0.0),
            },
            _ => return None,
        };
        Some(InteractionEvent {
            session_id: self.session_id,
            kind,
            timestamp: self.timestamp,
            count: u64::try_from(self.count).unwrap_or(0),
        })
    }
}

/// One page of a product search, with the total match count for
/// pagination metadata.
#[derive(Debug, Clone)]
pub struct ProductPage {
    /// Total number of products matching the query, across all pages.
    pub total: u64,
    /// The products on this page.
    pub items: Vec<Product>,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn row_round_trips_a_time_spent_event() {
        let event = InteractionEvent::new(
            "s1".to_string(),
            InteractionKind::TimeSpent {
                product_id: "p1".to_string(),
                seconds: 45.0,
            },
        );
        let row = InteractionRow::from_event(&event);
        assert_eq!(row.interaction_type, "time_spend");
        assert_eq!(row.time_spend, Some(45.0));

        let Some(back) = row.into_event() else {
            panic!("row should convert back");
        };
        assert_eq!(back, event);
    }

    #[test]
    fn row_round_trips_a_search_event() {
        let event = InteractionEvent::new(
            "s1".to_string(),
            InteractionKind::Search {
                query: Some("red shoes".to_string()),
            },
        );
        let row = InteractionRow::from_event(&event);
        assert_eq!(row.product_id, None);
        assert_eq!(row.search_query.as_deref(), Some("red shoes"));

        let Some(back) = row.into_event() else {
            panic!("row should convert back");
        };
        assert_eq!(back, event);
    }

    #[test]
    fn unknown_discriminant_is_skipped() {
        let row = InteractionRow {
            session_id: "s1".to_string(),
            interaction_type: "hover".to_string(),
            product_id: None,
            search_query: None,
            timestamp: Utc::now(),
            count: 1,
            time_spend: None,
        };
        assert!(row.into_event().is_none());
    }
}
