//! Persistence layer: interaction and product stores.
//!
//! Both stores are exposed as dyn-compatible traits so services hold
//! `Arc<dyn ...>` and stay oblivious to the backing engine. Methods
//! return explicit `Pin<Box<dyn Future>>` instead of `async fn` to
//! keep the traits object-safe.
//!
//! Two implementations each:
//!
//! - [`postgres::PostgresInteractionStore`] / [`postgres::PostgresProductStore`]
//!   (production, `sqlx::PgPool`)
//! - [`memory::MemoryInteractionStore`] / [`memory::MemoryProductStore`]
//!   (tests and no-database mode)

pub mod memory;
pub mod models;
pub mod postgres;

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use self::models::ProductPage;
use crate::domain::{InteractionEvent, Product, ProductPatch};
use crate::error::GatewayError;

/// Boxed future type returned by store trait methods.
pub type StoreFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, GatewayError>> + Send + 'a>>;

/// Durable store of interaction events under the merge policy.
///
/// # Merge semantics
///
/// [`InteractionStore::record`] is the single write path: an existing
/// record with the same merge tuple gains `count + 1`, a refreshed
/// timestamp, and (for time-spent events) the accumulated duration; a
/// new tuple inserts with `count = 1`. The merge must be atomic within
/// the store so concurrent increments cannot lose updates.
pub trait InteractionStore: Send + Sync + fmt::Debug {
    /// Records one event, merging with an existing record of the same
    /// tuple. Returns the stored record after the merge.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on store failure.
    fn record(&self, event: InteractionEvent) -> StoreFuture<'_, InteractionEvent>;

    /// Returns all events with `start <= timestamp < end`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on store failure.
    fn events_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreFuture<'_, Vec<InteractionEvent>>;

    /// Returns every stored event.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on store failure.
    fn all_events(&self) -> StoreFuture<'_, Vec<InteractionEvent>>;
}

/// Store of catalog products.
pub trait ProductStore: Send + Sync + fmt::Debug {
    /// Inserts a product. Returns the stored product.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on store failure.
    fn insert(&self, product: Product) -> StoreFuture<'_, Product>;

    /// Looks up a product by id. Missing ids are `Ok(None)`, not an
    /// error; callers decide whether absence is a failure.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on store failure.
    fn find(&self, id: Uuid) -> StoreFuture<'_, Option<Product>>;

    /// Applies a partial update. Returns the updated product, or
    /// `None` when the id does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on store failure.
    fn update(&self, id: Uuid, patch: ProductPatch) -> StoreFuture<'_, Option<Product>>;

    /// Deletes a product. Returns the deleted product, or `None` when
    /// the id does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on store failure.
    fn delete(&self, id: Uuid) -> StoreFuture<'_, Option<Product>>;

    /// Case-insensitive text search across title, description, brand,
    /// and category, with pagination. `None` matches everything.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on store failure.
    fn search(
        &self,
        query: Option<String>,
        offset: u64,
        limit: u64,
    ) -> StoreFuture<'_, ProductPage>;

    /// Returns every product in the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on store failure.
    fn all(&self) -> StoreFuture<'_, Vec<Product>>;
}
