//! Interaction events: the sole entity of the analytics core.
//!
//! An [`InteractionEvent`] records one user action. The action payload
//! is a tagged [`InteractionKind`] so that kind-specific fields cannot
//! appear on the wrong kind (a search cannot carry a duration, a click
//! cannot carry a query).
//!
//! Repeated identical actions are collapsed under the merge policy: at
//! most one stored record exists per [`MergeKey`], with `count`
//! carrying the occurrence weight and, for time-spent events, the
//! duration accumulating across merges.

use chrono::{DateTime, Utc};

/// The action payload of an interaction event, one variant per
/// interaction kind.
///
/// Product ids are opaque strings at this boundary; they are only
/// resolved against the catalog during leaderboard enrichment.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionKind {
    /// A catalog search, with the free-text query when one was given.
    Search {
        /// Query text captured from the request.
        query: Option<String>,
    },
    /// A product detail view.
    View {
        /// Identifier of the viewed product.
        product_id: String,
    },
    /// A click on a product.
    Click {
        /// Identifier of the clicked product.
        product_id: String,
    },
    /// Time spent on a product page.
    TimeSpent {
        /// Identifier of the product.
        product_id: String,
        /// Duration in seconds. Accumulates across merges.
        seconds: f64,
    },
}

impl InteractionKind {
    /// Returns the wire/storage discriminant for this kind.
    #[must_use]
    pub const fn type_str(&self) -> &'static str {
        match self {
            Self::Search { .. } => "search",
            Self::View { .. } => "view",
            Self::Click { .. } => "click",
            Self::TimeSpent { .. } => "time_spend",
        }
    }

    /// Returns the product id this kind concerns, if any.
    #[must_use]
    pub fn product_id(&self) -> Option<&str> {
        match self {
            Self::Search { .. } => None,
            Self::View { product_id } | Self::Click { product_id } => Some(product_id),
            Self::TimeSpent { product_id, .. } => Some(product_id),
        }
    }

    /// Returns the search query, if this is a search.
    #[must_use]
    pub fn search_query(&self) -> Option<&str> {
        match self {
            Self::Search { query } => query.as_deref(),
            _ => None,
        }
    }

    /// Returns the recorded duration in seconds, if this is a
    /// time-spent event.
    #[must_use]
    pub const fn seconds(&self) -> Option<f64> {
        match self {
            Self::TimeSpent { seconds, .. } => Some(*seconds),
            _ => None,
        }
    }
}

/// A single recorded user action.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionEvent {
    /// Opaque id of the originating user session. Never empty.
    pub session_id: String,
    /// The action payload.
    pub kind: InteractionKind,
    /// When the event was recorded, or last merged into.
    pub timestamp: DateTime<Utc>,
    /// Occurrence counter. Starts at 1, incremented on each merge.
    pub count: u64,
}

impl InteractionEvent {
    /// Creates a fresh event with `count = 1` timestamped now.
    #[must_use]
    pub fn new(session_id: String, kind: InteractionKind) -> Self {
        Self {
            session_id,
            kind,
            timestamp: Utc::now(),
            count: 1,
        }
    }

    /// Returns the deduplication tuple this event merges under.
    #[must_use]
    pub fn merge_key(&self) -> MergeKey {
        MergeKey {
            session_id: self.session_id.clone(),
            interaction_type: self.kind.type_str(),
            product_id: self.kind.product_id().map(str::to_string),
            search_query: self.kind.search_query().map(str::to_string),
        }
    }
}

/// The tuple identifying a stored record under the merge policy.
///
/// Two events with equal keys collapse into one record; the duration of
/// a time-spent event is deliberately not part of the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MergeKey {
    /// Session id of the actor.
    pub session_id: String,
    /// Kind discriminant string.
    pub interaction_type: &'static str,
    /// Product id, when the kind concerns a product.
    pub product_id: Option<String>,
    /// Query text, when the kind is a search.
    pub search_query: Option<String>,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn type_str_matches_wire_values() {
        let search = InteractionKind::Search { query: None };
        let view = InteractionKind::View {
            product_id: "p1".to_string(),
        };
        let click = InteractionKind::Click {
            product_id: "p1".to_string(),
        };
        let time = InteractionKind::TimeSpent {
            product_id: "p1".to_string(),
            seconds: 3.0,
        };
        assert_eq!(search.type_str(), "search");
        assert_eq!(view.type_str(), "view");
        assert_eq!(click.type_str(), "click");
        assert_eq!(time.type_str(), "time_spend");
    }

    #[test]
    fn kind_accessors_only_expose_their_payload() {
        let search = InteractionKind::Search {
            query: Some("red shoes".to_string()),
        };
        assert_eq!(search.search_query(), Some("red shoes"));
        assert_eq!(search.product_id(), None);
        assert_eq!(search.seconds(), None);

        let time = InteractionKind::TimeSpent {
            product_id: "p1".to_string(),
            seconds: 45.0,
        };
        assert_eq!(time.product_id(), Some("p1"));
        assert_eq!(time.seconds(), Some(45.0));
        assert_eq!(time.search_query(), None);
    }

    #[test]
    fn identical_actions_share_a_merge_key() {
        let a = InteractionEvent::new(
            "s1".to_string(),
            InteractionKind::Click {
                product_id: "p1".to_string(),
            },
        );
        let b = InteractionEvent::new(
            "s1".to_string(),
            InteractionKind::Click {
                product_id: "p1".to_string(),
            },
        );
        assert_eq!(a.merge_key(), b.merge_key());
    }

    #[test]
    fn time_spent_duration_is_not_part_of_the_key() {
        let a = InteractionEvent::new(
            "s1".to_string(),
            InteractionKind::TimeSpent {
                product_id: "p1".to_string(),
                seconds: 10.0,
            },
        );
        let b = InteractionEvent::new(
            "s1".to_string(),
            InteractionKind::TimeSpent {
                product_id: "p1".to_string(),
                seconds: 99.0,
            },
        );
        assert_eq!(a.merge_key(), b.merge_key());
    }

    #[test]
    fn distinct_tuples_have_distinct_keys() {
        let click = InteractionEvent::new(
            "s1".to_string(),
            InteractionKind::Click {
                product_id: "p1".to_string(),
            },
        );
        let view = InteractionEvent::new(
            "s1".to_string(),
            InteractionKind::View {
                product_id: "p1".to_string(),
            },
        );
        let other_session = InteractionEvent::new(
            "s2".to_string(),
            InteractionKind::Click {
                product_id: "p1".to_string(),
            },
        );
        assert_ne!(click.merge_key(), view.merge_key());
        assert_ne!(click.merge_key(), other_session.merge_key());
    }

    #[test]
    fn new_event_starts_at_count_one() {
        let event = InteractionEvent::new("s1".to_string(), InteractionKind::Search { query: None });
        assert_eq!(event.count, 1);
    }
}
