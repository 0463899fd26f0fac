//! Interaction recorder: the sole write path into the event store.
//!
//! One generic [`InteractionRecorder::record`] plus a thin wrapper per
//! interaction kind. Validation happens here; the merge itself is the
//! store's job so it stays atomic under concurrency.

use std::sync::Arc;

use crate::domain::{InteractionEvent, InteractionKind};
use crate::error::GatewayError;
use crate::persistence::InteractionStore;

/// Validates and persists interaction events.
///
/// Every successful call produces exactly one durable effect: an
/// insert, or a merge into the existing record of the same tuple. A
/// store failure is surfaced to the caller; there is no retry here.
#[derive(Debug, Clone)]
pub struct InteractionRecorder {
    store: Arc<dyn InteractionStore>,
}

impl InteractionRecorder {
    /// Creates a new recorder over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn InteractionStore>) -> Self {
        Self { store }
    }

    /// Records one interaction event.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] when `session_id` is
    /// empty, or when the kind is time-spent with a duration that is
    /// NaN, non-finite, or negative. Returns
    /// [`GatewayError::PersistenceError`] when the write fails.
    pub async fn record(
        &self,
        session_id: &str,
        kind: InteractionKind,
    ) -> Result<InteractionEvent, GatewayError> {
        if session_id.is_empty() {
            return Err(GatewayError::InvalidRequest(
                "sessionId is required".to_string(),
            ));
        }
        if let InteractionKind::TimeSpent { seconds, .. } = &kind
            && (!seconds.is_finite() || *seconds < 0.0)
        {
            return Err(GatewayError::InvalidRequest(
                "timeSpend must be a non-negative number".to_string(),
            ));
        }

        let event = InteractionEvent::new(session_id.to_string(), kind);
        let stored = self.store.record(event).await?;

        tracing::debug!(
            session_id,
            interaction = stored.kind.type_str(),
            count = stored.count,
            "interaction recorded"
        );
        Ok(stored)
    }

    /// Records a catalog search.
    ///
    /// # Errors
    ///
    /// See [`InteractionRecorder::record`].
    pub async fn record_search(
        &self,
        session_id: &str,
        query: Option<String>,
    ) -> Result<InteractionEvent, GatewayError> {
        self.record(session_id, InteractionKind::Search { query })
            .await
    }

    /// Records a product view.
    ///
    /// # Errors
    ///
    /// See [`InteractionRecorder::record`].
    pub async fn record_view(
        &self,
        session_id: &str,
        product_id: &str,
    ) -> Result<InteractionEvent, GatewayError> {
        self.record(
            session_id,
            InteractionKind::View {
                product_id: product_id.to_string(),
            },
        )
        .await
    }

    /// Records a product click.
    ///
    /// # Errors
    ///
    /// See [`InteractionRecorder::record`].
    pub async fn record_click(
        &self,
        session_id: &str,
        product_id: &str,
    ) -> Result<InteractionEvent, GatewayError> {
        self.record(
            session_id,
            InteractionKind::Click {
                product_id: product_id.to_string(),
            },
        )
        .await
    }

    /// Records time spent on a product page.
    ///
    /// # Errors
    ///
    /// See [`InteractionRecorder::record`].
    pub async fn record_time_spent(
        &self,
        session_id: &str,
        product_id: &str,
        seconds: f64,
    ) -> Result<InteractionEvent, GatewayError> {
        self.record(
            session_id,
            InteractionKind::TimeSpent {
                product_id: product_id.to_string(),
                seconds,
            },
        )
        .await
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::persistence::memory::MemoryInteractionStore;

    fn make_recorder() -> (InteractionRecorder, Arc<MemoryInteractionStore>) {
        let store = Arc::new(MemoryInteractionStore::new());
        let recorder = InteractionRecorder::new(Arc::clone(&store) as Arc<dyn InteractionStore>);
        (recorder, store)
    }

    #[tokio::test]
    async fn empty_session_id_is_rejected() {
        let (recorder, _) = make_recorder();
        let result = recorder.record_click("", "p1").await;
        assert!(matches!(result, Err(GatewayError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn negative_time_spent_is_rejected() {
        let (recorder, _) = make_recorder();
        let result = recorder.record_time_spent("s1", "p1", -1.0).await;
        assert!(matches!(result, Err(GatewayError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn nan_time_spent_is_rejected() {
        let (recorder, _) = make_recorder();
        let result = recorder.record_time_spent("s1", "p1", f64::NAN).await;
        assert!(matches!(result, Err(GatewayError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn zero_time_spent_is_valid() {
        let (recorder, _) = make_recorder();
        let result = recorder.record_time_spent("s1", "p1", 0.0).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn rejected_events_leave_no_durable_effect() {
        let (recorder, store) = make_recorder();
        let _ = recorder.record_time_spent("s1", "p1", -1.0).await;

        let Ok(events) = store.all_events().await else {
            panic!("query failed");
        };
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn each_valid_call_produces_exactly_one_durable_effect() {
        let (recorder, store) = make_recorder();
        let _ = recorder.record_search("s1", Some("red shoes".to_string())).await;
        let _ = recorder.record_view("s1", "p1").await;

        let Ok(events) = store.all_events().await else {
            panic!("query failed");
        };
        assert_eq!(events.len(), 2);
    }

    #[tokio::test]
    async fn identical_events_merge_with_counts() {
        let (recorder, store) = make_recorder();
        for _ in 0..3 {
            let result = recorder.record_click("s1", "p1").await;
            assert!(result.is_ok());
        }

        let Ok(events) = store.all_events().await else {
            panic!("query failed");
        };
        assert_eq!(events.len(), 1);
        let Some(event) = events.first() else {
            panic!("expected one event");
        };
        assert_eq!(event.count, 3);
    }

    #[tokio::test]
    async fn search_without_query_is_recorded() {
        let (recorder, _) = make_recorder();
        let Ok(stored) = recorder.record_search("s1", None).await else {
            panic!("record failed");
        };
        assert_eq!(stored.kind.type_str(), "search");
        assert_eq!(stored.kind.search_query(), None);
    }
}
