//! PostgreSQL implementations of the persistence layer.
//!
//! The interaction merge is a single `INSERT ... ON CONFLICT ... DO
//! UPDATE` statement so concurrent increments on the same tuple cannot
//! lose updates. Every round trip is bounded by the configured query
//! timeout; expiry surfaces as a persistence error.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::models::{InteractionRow, ProductPage};
use super::{InteractionStore, ProductStore, StoreFuture};
use crate::domain::{InteractionEvent, Product, ProductPatch};
use crate::error::GatewayError;

/// Interaction row tuple as selected from the `interactions` table.
type InteractionTuple = (
    String,
    String,
    Option<String>,
    Option<String>,
    DateTime<Utc>,
    i64,
    Option<f64>,
);

/// Product row tuple as selected from the `products` table.
type ProductTuple = (
    Uuid,
    String,
    String,
    f64,
    f64,
    f64,
    i64,
    String,
    String,
    Option<String>,
    Vec<String>,
    DateTime<Utc>,
    DateTime<Utc>,
);

const INTERACTION_COLUMNS: &str =
    "session_id, interaction_type, product_id, search_query, timestamp, count, time_spend";

const PRODUCT_COLUMNS: &str = "id, title, description, price, discount_percentage, rating, \
     stock, brand, category, thumbnail, images, created_at, updated_at";

/// Runs a query future under the store's round-trip bound.
async fn bounded<T, F>(query_timeout: Duration, fut: F) -> Result<T, GatewayError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(query_timeout, fut).await {
        Ok(result) => result.map_err(|e| GatewayError::PersistenceError(e.to_string())),
        Err(_) => Err(GatewayError::PersistenceError(
            "store round trip timed out".to_string(),
        )),
    }
}

fn row_from_tuple(tuple: InteractionTuple) -> InteractionRow {
    let (session_id, interaction_type, product_id, search_query, timestamp, count, time_spend) =
        tuple;
    InteractionRow {
        session_id,
        interaction_type,
        product_id,
        search_query,
        timestamp,
        count,
        time_spend,
    }
}

fn product_from_tuple(tuple: ProductTuple) -> Product {
    let (
        id,
        title,
        description,
        price,
        discount_percentage,
        rating,
        stock,
        brand,
        category,
        thumbnail,
        images,
        created_at,
        updated_at,
    ) = tuple;
    Product {
        id,
        title,
        description,
        price,
        discount_percentage,
        rating,
        stock,
        brand,
        category,
        thumbnail,
        images,
        created_at,
        updated_at,
    }
}

/// PostgreSQL-backed interaction store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresInteractionStore {
    pool: PgPool,
    query_timeout: Duration,
}

impl PostgresInteractionStore {
    /// Creates a new store with the given connection pool and
    /// per-round-trip timeout.
    #[must_use]
    pub fn new(pool: PgPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }
}

impl InteractionStore for PostgresInteractionStore {
    fn record(&self, event: InteractionEvent) -> StoreFuture<'_, InteractionEvent> {
        Box::pin(async move {
            let row = InteractionRow::from_event(&event);
            // The unique index on the merge tuple is declared NULLS NOT
            // DISTINCT so absent product ids and queries still conflict.
            let sql = format!(
                "INSERT INTO interactions ({INTERACTION_COLUMNS}) \
                 VALUES ($1, $2, $3, $4, $5, 1, $6) \
                 ON CONFLICT (session_id, interaction_type, product_id, search_query) \
                 DO UPDATE SET \
                     count = interactions.count + 1, \
                     timestamp = EXCLUDED.timestamp, \
                     time_spend = CASE \
                         WHEN interactions.interaction_type = 'time_spend' \
                             THEN COALESCE(interactions.time_spend, 0) \
                                  + COALESCE(EXCLUDED.time_spend, 0) \
                         ELSE interactions.time_spend \
                     END \
                 RETURNING {INTERACTION_COLUMNS}"
            );
            let stored = bounded(
                self.query_timeout,
                sqlx::query_as::<_, InteractionTuple>(&sql)
                    .bind(&row.session_id)
                    .bind(&row.interaction_type)
                    .bind(&row.product_id)
                    .bind(&row.search_query)
                    .bind(row.timestamp)
                    .bind(row.time_spend)
                    .fetch_one(&self.pool),
            )
            .await?;

            row_from_tuple(stored).into_event().ok_or_else(|| {
                GatewayError::PersistenceError("corrupt interaction row".to_string())
            })
        })
    }

    fn events_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreFuture<'_, Vec<InteractionEvent>> {
        Box::pin(async move {
            let sql = format!(
                "SELECT {INTERACTION_COLUMNS} FROM interactions \
                 WHERE timestamp >= $1 AND timestamp < $2"
            );
            let rows = bounded(
                self.query_timeout,
                sqlx::query_as::<_, InteractionTuple>(&sql)
                    .bind(start)
                    .bind(end)
                    .fetch_all(&self.pool),
            )
            .await?;

            Ok(rows
                .into_iter()
                .filter_map(|t| row_from_tuple(t).into_event())
                .collect())
        })
    }

    fn all_events(&self) -> StoreFuture<'_, Vec<InteractionEvent>> {
        Box::pin(async move {
            let sql = format!("SELECT {INTERACTION_COLUMNS} FROM interactions");
            let rows = bounded(
                self.query_timeout,
                sqlx::query_as::<_, InteractionTuple>(&sql).fetch_all(&self.pool),
            )
            .await?;

            Ok(rows
                .into_iter()
                .filter_map(|t| row_from_tuple(t).into_event())
                .collect())
        })
    }
}

/// PostgreSQL-backed product store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresProductStore {
    pool: PgPool,
    query_timeout: Duration,
}

impl PostgresProductStore {
    /// Creates a new store with the given connection pool and
    /// per-round-trip timeout.
    #[must_use]
    pub fn new(pool: PgPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }
}

const PRODUCT_SEARCH_CLAUSE: &str = "($1::text IS NULL \
     OR title ILIKE '%' || $1 || '%' \
     OR description ILIKE '%' || $1 || '%' \
     OR brand ILIKE '%' || $1 || '%' \
     OR category ILIKE '%' || $1 || '%')";

impl ProductStore for PostgresProductStore {
    fn insert(&self, product: Product) -> StoreFuture<'_, Product> {
        Box::pin(async move {
            let sql = format!(
                "INSERT INTO products ({PRODUCT_COLUMNS}) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)"
            );
            bounded(
                self.query_timeout,
                sqlx::query(&sql)
                    .bind(product.id)
                    .bind(&product.title)
                    .bind(&product.description)
                    .bind(product.price)
                    .bind(product.discount_percentage)
                    .bind(product.rating)
                    .bind(product.stock)
                    .bind(&product.brand)
                    .bind(&product.category)
                    .bind(&product.thumbnail)
                    .bind(&product.images)
                    .bind(product.created_at)
                    .bind(product.updated_at)
                    .execute(&self.pool),
            )
            .await?;

            Ok(product)
        })
    }

    fn find(&self, id: Uuid) -> StoreFuture<'_, Option<Product>> {
        Box::pin(async move {
            let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");
            let row = bounded(
                self.query_timeout,
                sqlx::query_as::<_, ProductTuple>(&sql)
                    .bind(id)
                    .fetch_optional(&self.pool),
            )
            .await?;

            Ok(row.map(product_from_tuple))
        })
    }

    fn update(&self, id: Uuid, patch: ProductPatch) -> StoreFuture<'_, Option<Product>> {
        Box::pin(async move {
            let sql = format!(
                "UPDATE products SET \
                     title = COALESCE($2, title), \
                     description = COALESCE($3, description), \
                     price = COALESCE($4, price), \
                     discount_percentage = COALESCE($5, discount_percentage), \
                     rating = COALESCE($6, rating), \
                     stock = COALESCE($7, stock), \
                     brand = COALESCE($8, brand), \
                     category = COALESCE($9, category), \
                     thumbnail = COALESCE($10, thumbnail), \
                     images = COALESCE($11, images), \
                     updated_at = now() \
                 WHERE id = $1 \
                 RETURNING {PRODUCT_COLUMNS}"
            );
            let row = bounded(
                self.query_timeout,
                sqlx::query_as::<_, ProductTuple>(&sql)
                    .bind(id)
                    .bind(&patch.title)
                    .bind(&patch.description)
                    .bind(patch.price)
                    .bind(patch.discount_percentage)
                    .bind(patch.rating)
                    .bind(patch.stock)
                    .bind(&patch.brand)
                    .bind(&patch.category)
                    .bind(&patch.thumbnail)
                    .bind(&patch.images)
                    .fetch_optional(&self.pool),
            )
            .await?;

            Ok(row.map(product_from_tuple))
        })
    }

    fn delete(&self, id: Uuid) -> StoreFuture<'_, Option<Product>> {
        Box::pin(async move {
            let sql = format!("DELETE FROM products WHERE id = $1 RETURNING {PRODUCT_COLUMNS}");
            let row = bounded(
                self.query_timeout,
                sqlx::query_as::<_, ProductTuple>(&sql)
                    .bind(id)
                    .fetch_optional(&self.pool),
            )
            .await?;

            Ok(row.map(product_from_tuple))
        })
    }

    fn search(
        &self,
        query: Option<String>,
        offset: u64,
        limit: u64,
    ) -> StoreFuture<'_, ProductPage> {
        Box::pin(async move {
            let needle = query.filter(|q| !q.is_empty());

            let count_sql = format!("SELECT COUNT(*) FROM products WHERE {PRODUCT_SEARCH_CLAUSE}");
            let total = bounded(
                self.query_timeout,
                sqlx::query_scalar::<_, i64>(&count_sql)
                    .bind(&needle)
                    .fetch_one(&self.pool),
            )
            .await?;

            let page_sql = format!(
                "SELECT {PRODUCT_COLUMNS} FROM products WHERE {PRODUCT_SEARCH_CLAUSE} \
                 ORDER BY created_at ASC, id ASC LIMIT $2 OFFSET $3"
            );
            let rows = bounded(
                self.query_timeout,
                sqlx::query_as::<_, ProductTuple>(&page_sql)
                    .bind(&needle)
                    .bind(i64::try_from(limit).unwrap_or(i64::MAX))
                    .bind(i64::try_from(offset).unwrap_or(i64::MAX))
                    .fetch_all(&self.pool),
            )
            .await?;

            Ok(ProductPage {
                total: u64::try_from(total).unwrap_or(0),
                items: rows.into_iter().map(product_from_tuple).collect(),
            })
        })
    }

    fn all(&self) -> StoreFuture<'_, Vec<Product>> {
        Box::pin(async move {
            let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at ASC");
            let rows = bounded(
                self.query_timeout,
                sqlx::query_as::<_, ProductTuple>(&sql).fetch_all(&self.pool),
            )
            .await?;

            Ok(rows.into_iter().map(product_from_tuple).collect())
        })
    }
}
