//! In-memory store implementations.
//!
//! Used by tests and by the gateway when persistence is disabled. The
//! interaction map is keyed by the merge tuple, so the merge policy
//! falls out of the map structure; a single write-lock mutation keeps
//! each merge atomic.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::ProductPage;
use super::{InteractionStore, ProductStore, StoreFuture};
use crate::domain::{InteractionEvent, InteractionKind, MergeKey, Product, ProductPatch};

/// In-memory interaction store keyed by the merge tuple.
#[derive(Debug, Default)]
pub struct MemoryInteractionStore {
    events: RwLock<HashMap<MergeKey, InteractionEvent>>,
}

impl MemoryInteractionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl InteractionStore for MemoryInteractionStore {
    fn record(&self, event: InteractionEvent) -> StoreFuture<'_, InteractionEvent> {
        Box::pin(async move {
            let mut map = self.events.write().await;
            match map.entry(event.merge_key()) {
                Entry::Occupied(mut occupied) => {
                    let stored = occupied.get_mut();
                    stored.count = stored.count.saturating_add(1);
                    stored.timestamp = event.timestamp;
                    if let (
                        InteractionKind::TimeSpent { seconds, .. },
                        InteractionKind::TimeSpent {
                            seconds: incoming, ..
                        },
                    ) = (&mut stored.kind, &event.kind)
                    {
                        *seconds += *incoming;
                    }
                    Ok(stored.clone())
                }
                Entry::Vacant(vacant) => Ok(vacant.insert(event).clone()),
            }
        })
    }

    fn events_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreFuture<'_, Vec<InteractionEvent>> {
        Box::pin(async move {
            let map = self.events.read().await;
            Ok(map
                .values()
                .filter(|e| e.timestamp >= start && e.timestamp < end)
                .cloned()
                .collect())
        })
    }

    fn all_events(&self) -> StoreFuture<'_, Vec<InteractionEvent>> {
        Box::pin(async move {
            let map = self.events.read().await;
            Ok(map.values().cloned().collect())
        })
    }
}

/// In-memory product store.
#[derive(Debug, Default)]
pub struct MemoryProductStore {
    products: RwLock<HashMap<Uuid, Product>>,
}

impl MemoryProductStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Case-insensitive match across the searchable text fields.
fn matches_query(product: &Product, query: &str) -> bool {
    let needle = query.to_lowercase();
    [
        &product.title,
        &product.description,
        &product.brand,
        &product.category,
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&needle))
}

impl ProductStore for MemoryProductStore {
    fn insert(&self, product: Product) -> StoreFuture<'_, Product> {
        Box::pin(async move {
            let mut map = self.products.write().await;
            map.insert(product.id, product.clone());
            Ok(product)
        })
    }

    fn find(&self, id: Uuid) -> StoreFuture<'_, Option<Product>> {
        Box::pin(async move {
            let map = self.products.read().await;
            Ok(map.get(&id).cloned())
        })
    }

    fn update(&self, id: Uuid, patch: ProductPatch) -> StoreFuture<'_, Option<Product>> {
        Box::pin(async move {
            let mut map = self.products.write().await;
            let Some(product) = map.get_mut(&id) else {
                return Ok(None);
            };
            patch.apply(product);
            Ok(Some(product.clone()))
        })
    }

    fn delete(&self, id: Uuid) -> StoreFuture<'_, Option<Product>> {
        Box::pin(async move {
            let mut map = self.products.write().await;
            Ok(map.remove(&id))
        })
    }

    fn search(
        &self,
        query: Option<String>,
        offset: u64,
        limit: u64,
    ) -> StoreFuture<'_, ProductPage> {
        Box::pin(async move {
            let map = self.products.read().await;
            let mut matched: Vec<Product> = map
                .values()
                .filter(|p| match query.as_deref() {
                    Some(q) if !q.is_empty() => matches_query(p, q),
                    _ => true,
                })
                .cloned()
                .collect();
            // Stable order for pagination
            matched.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

            let total = matched.len() as u64;
            let items = matched
                .into_iter()
                .skip(usize::try_from(offset).unwrap_or(usize::MAX))
                .take(usize::try_from(limit).unwrap_or(usize::MAX))
                .collect();
            Ok(ProductPage { total, items })
        })
    }

    fn all(&self) -> StoreFuture<'_, Vec<Product>> {
        Box::pin(async move {
            let map = self.products.read().await;
            Ok(map.values().cloned().collect())
        })
    }
}
