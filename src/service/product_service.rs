//! Product catalog service: CRUD, paginated text search, and the
//! catalog-side interaction tracking hooks.
//!
//! Reading a product records a VIEW and a searched listing records a
//! SEARCH, but only when the request carries a non-empty session id;
//! anonymous catalog reads are served untracked.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Product, ProductDraft, ProductPatch};
use crate::error::GatewayError;
use crate::persistence::ProductStore;
use crate::service::InteractionRecorder;

/// One page of catalog listings with pagination metadata.
#[derive(Debug, Clone)]
pub struct ProductListing {
    /// 1-indexed page number.
    pub page: u64,
    /// Items per page.
    pub limit: u64,
    /// Total products matching the query.
    pub total_documents: u64,
    /// Total pages for this query and limit.
    pub total_pages: u64,
    /// The products on this page.
    pub data: Vec<Product>,
}

/// Catalog operations with interaction tracking side effects.
#[derive(Debug, Clone)]
pub struct ProductService {
    store: Arc<dyn ProductStore>,
    recorder: Arc<InteractionRecorder>,
}

impl ProductService {
    /// Creates a new service over the given store and recorder.
    #[must_use]
    pub fn new(store: Arc<dyn ProductStore>, recorder: Arc<InteractionRecorder>) -> Self {
        Self { store, recorder }
    }

    /// Creates a product after validating the draft.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] on an invalid draft and
    /// [`GatewayError::PersistenceError`] on store failure.
    pub async fn create(&self, draft: ProductDraft) -> Result<Product, GatewayError> {
        draft.validate()?;
        let product = self.store.insert(draft.into_product()).await?;
        tracing::info!(product_id = %product.id, title = %product.title, "product created");
        Ok(product)
    }

    /// Lists products with pagination and optional text search.
    ///
    /// A non-empty `search` accompanied by a non-empty `session_id`
    /// records one SEARCH interaction.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on store failure.
    pub async fn list(
        &self,
        page: u64,
        limit: u64,
        search: Option<String>,
        session_id: Option<String>,
    ) -> Result<ProductListing, GatewayError> {
        let page = page.max(1);
        let limit = limit.clamp(1, 100);
        let offset = (page - 1) * limit;

        let search = search.filter(|s| !s.is_empty());
        let result = self.store.search(search.clone(), offset, limit).await?;

        if let (Some(query), Some(session)) = (
            search,
            session_id.filter(|s| !s.is_empty()),
        ) {
            self.recorder.record_search(&session, Some(query)).await?;
        }

        let total_pages = result.total.div_ceil(limit);
        Ok(ProductListing {
            page,
            limit,
            total_documents: result.total,
            total_pages,
            data: result.items,
        })
    }

    /// Fetches a product by id.
    ///
    /// A non-empty `session_id` records one VIEW interaction.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ProductNotFound`] when the id does not
    /// exist and [`GatewayError::PersistenceError`] on store failure.
    pub async fn get(
        &self,
        id: Uuid,
        session_id: Option<String>,
    ) -> Result<Product, GatewayError> {
        let product = self
            .store
            .find(id)
            .await?
            .ok_or(GatewayError::ProductNotFound(id))?;

        if let Some(session) = session_id.filter(|s| !s.is_empty()) {
            self.recorder
                .record_view(&session, &id.to_string())
                .await?;
        }

        Ok(product)
    }

    /// Applies a partial update to a product.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ProductNotFound`] when the id does not
    /// exist and [`GatewayError::PersistenceError`] on store failure.
    pub async fn update(&self, id: Uuid, patch: ProductPatch) -> Result<Product, GatewayError> {
        let updated = self
            .store
            .update(id, patch)
            .await?
            .ok_or(GatewayError::ProductNotFound(id))?;
        tracing::info!(product_id = %id, "product updated");
        Ok(updated)
    }

    /// Deletes a product, returning the deleted entity.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ProductNotFound`] when the id does not
    /// exist and [`GatewayError::PersistenceError`] on store failure.
    pub async fn delete(&self, id: Uuid) -> Result<Product, GatewayError> {
        let deleted = self
            .store
            .delete(id)
            .await?
            .ok_or(GatewayError::ProductNotFound(id))?;
        tracing::info!(product_id = %id, "product deleted");
        Ok(deleted)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::persistence::InteractionStore;
    use crate::persistence::memory::{MemoryInteractionStore, MemoryProductStore};

    struct Fixture {
        service: ProductService,
        interactions: Arc<MemoryInteractionStore>,
    }

    fn fixture() -> Fixture {
        let interactions = Arc::new(MemoryInteractionStore::new());
        let products = Arc::new(MemoryProductStore::new());
        let recorder = Arc::new(InteractionRecorder::new(
            Arc::clone(&interactions) as Arc<dyn InteractionStore>
        ));
        let service = ProductService::new(products as Arc<dyn ProductStore>, recorder);
        Fixture {
            service,
            interactions,
        }
    }

    fn draft(title: &str) -> ProductDraft {
        ProductDraft {
            title: title.to_string(),
            description: "test".to_string(),
            price: 5.0,
            discount_percentage: 0.0,
            rating: 3.0,
            stock: 1,
            brand: "Acme".to_string(),
            category: "misc".to_string(),
            thumbnail: None,
            images: vec![],
        }
    }

    #[tokio::test]
    async fn create_rejects_invalid_drafts() {
        let fx = fixture();
        let mut invalid = draft("Widget");
        invalid.price = -5.0;
        let result = fx.service.create(invalid).await;
        assert!(matches!(result, Err(GatewayError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn get_missing_product_is_not_found() {
        let fx = fixture();
        let result = fx.service.get(Uuid::new_v4(), None).await;
        assert!(matches!(result, Err(GatewayError::ProductNotFound(_))));
    }

    #[tokio::test]
    async fn get_with_session_records_a_view() {
        let fx = fixture();
        let Ok(product) = fx.service.create(draft("Widget")).await else {
            panic!("create failed");
        };

        let result = fx
            .service
            .get(product.id, Some("s1".to_string()))
            .await;
        assert!(result.is_ok());

        let Ok(events) = fx.interactions.all_events().await else {
            panic!("query failed");
        };
        assert_eq!(events.len(), 1);
        let Some(event) = events.first() else {
            panic!("expected one event");
        };
        assert_eq!(event.kind.type_str(), "view");
        assert_eq!(event.kind.product_id(), Some(product.id.to_string().as_str()));
    }

    #[tokio::test]
    async fn get_without_session_is_untracked() {
        let fx = fixture();
        let Ok(product) = fx.service.create(draft("Widget")).await else {
            panic!("create failed");
        };
        let _ = fx.service.get(product.id, None).await;

        let Ok(events) = fx.interactions.all_events().await else {
            panic!("query failed");
        };
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn searched_listing_records_the_query() {
        let fx = fixture();
        let _ = fx.service.create(draft("Red Shoes")).await;

        let Ok(listing) = fx
            .service
            .list(1, 10, Some("red".to_string()), Some("s1".to_string()))
            .await
        else {
            panic!("list failed");
        };
        assert_eq!(listing.total_documents, 1);

        let Ok(events) = fx.interactions.all_events().await else {
            panic!("query failed");
        };
        assert_eq!(events.len(), 1);
        let Some(event) = events.first() else {
            panic!("expected one event");
        };
        assert_eq!(event.kind.search_query(), Some("red"));
    }

    #[tokio::test]
    async fn unsearched_listing_records_nothing() {
        let fx = fixture();
        let _ = fx.service.create(draft("Red Shoes")).await;
        let _ = fx.service.list(1, 10, None, Some("s1".to_string())).await;

        let Ok(events) = fx.interactions.all_events().await else {
            panic!("query failed");
        };
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn listing_paginates_and_reports_totals() {
        let fx = fixture();
        for i in 0..5 {
            let _ = fx.service.create(draft(&format!("Widget {i}"))).await;
        }

        let Ok(listing) = fx.service.list(2, 2, None, None).await else {
            panic!("list failed");
        };
        assert_eq!(listing.page, 2);
        assert_eq!(listing.total_documents, 5);
        assert_eq!(listing.total_pages, 3);
        assert_eq!(listing.data.len(), 2);
    }

    #[tokio::test]
    async fn update_and_delete_round_trip() {
        let fx = fixture();
        let Ok(product) = fx.service.create(draft("Widget")).await else {
            panic!("create failed");
        };

        let patch = ProductPatch {
            stock: Some(42),
            ..ProductPatch::default()
        };
        let Ok(updated) = fx.service.update(product.id, patch).await else {
            panic!("update failed");
        };
        assert_eq!(updated.stock, 42);

        let Ok(deleted) = fx.service.delete(product.id).await else {
            panic!("delete failed");
        };
        assert_eq!(deleted.id, product.id);

        let result = fx.service.delete(product.id).await;
        assert!(matches!(result, Err(GatewayError::ProductNotFound(_))));
    }
}
