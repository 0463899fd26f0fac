//! Product-related DTOs for create, get, list, and update operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::{Product, ProductDraft, ProductPatch};

/// Request body for `POST /products`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    /// Display title.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Unit price.
    pub price: f64,
    /// Discount percentage, defaults to 0.
    #[serde(default)]
    pub discount_percentage: f64,
    /// Average rating, defaults to 0.
    #[serde(default)]
    pub rating: f64,
    /// Units in stock, defaults to 0.
    #[serde(default)]
    pub stock: i64,
    /// Brand name.
    pub brand: String,
    /// Category name.
    pub category: String,
    /// Thumbnail image URL.
    #[serde(default)]
    pub thumbnail: Option<String>,
    /// Gallery image URLs.
    #[serde(default)]
    pub images: Vec<String>,
}

impl CreateProductRequest {
    /// Converts the request into a domain draft.
    #[must_use]
    pub fn into_draft(self) -> ProductDraft {
        ProductDraft {
            title: self.title,
            description: self.description,
            price: self.price,
            discount_percentage: self.discount_percentage,
            rating: self.rating,
            stock: self.stock,
            brand: self.brand,
            category: self.category,
            thumbnail: self.thumbnail,
            images: self.images,
        }
    }
}

/// Request body for `PUT /products/{id}`; absent fields are unchanged.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    /// New title, when set.
    pub title: Option<String>,
    /// New description, when set.
    pub description: Option<String>,
    /// New price, when set.
    pub price: Option<f64>,
    /// New discount percentage, when set.
    pub discount_percentage: Option<f64>,
    /// New rating, when set.
    pub rating: Option<f64>,
    /// New stock level, when set.
    pub stock: Option<i64>,
    /// New brand, when set.
    pub brand: Option<String>,
    /// New category, when set.
    pub category: Option<String>,
    /// New thumbnail URL, when set.
    pub thumbnail: Option<String>,
    /// New image list, when set.
    pub images: Option<Vec<String>>,
}

impl UpdateProductRequest {
    /// Converts the request into a domain patch.
    #[must_use]
    pub fn into_patch(self) -> ProductPatch {
        ProductPatch {
            title: self.title,
            description: self.description,
            price: self.price,
            discount_percentage: self.discount_percentage,
            rating: self.rating,
            stock: self.stock,
            brand: self.brand,
            category: self.category,
            thumbnail: self.thumbnail,
            images: self.images,
        }
    }
}

/// A product as serialized in responses.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    /// Product identifier.
    pub id: Uuid,
    /// Display title.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Unit price.
    pub price: f64,
    /// Discount percentage.
    pub discount_percentage: f64,
    /// Average rating.
    pub rating: f64,
    /// Units in stock.
    pub stock: i64,
    /// Brand name.
    pub brand: String,
    /// Category name.
    pub category: String,
    /// Thumbnail image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Gallery image URLs.
    pub images: Vec<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductDto {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            title: product.title,
            description: product.description,
            price: product.price,
            discount_percentage: product.discount_percentage,
            rating: product.rating,
            stock: product.stock,
            brand: product.brand,
            category: product.category,
            thumbnail: product.thumbnail,
            images: product.images,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

/// Query parameters for `GET /products`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListProductsParams {
    /// Page number (1-indexed). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: u64,
    /// Items per page (max 100). Defaults to 10.
    #[serde(default = "default_limit")]
    pub limit: u64,
    /// Text search across title, description, brand, and category.
    #[serde(default)]
    pub search: Option<String>,
    /// Session id; when present, a searched listing records a SEARCH.
    #[serde(default)]
    pub session_id: Option<String>,
}

fn default_page() -> u64 {
    1
}

fn default_limit() -> u64 {
    10
}

/// Optional session id carried by tracked catalog reads.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct SessionParams {
    /// Session id; when present, the read records a VIEW.
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Paginated list response for `GET /products`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductListResponse {
    /// 1-indexed page number.
    pub page: u64,
    /// Items per page.
    pub limit: u64,
    /// Total products matching the query.
    pub total_documents: u64,
    /// Total pages for this query and limit.
    pub total_pages: u64,
    /// The products on this page.
    pub data: Vec<ProductDto>,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn create_request_accepts_camel_case_keys() {
        let json = r#"{
            "title": "Desk Lamp",
            "description": "Warm light",
            "price": 20.5,
            "discountPercentage": 5.0,
            "brand": "Lumen",
            "category": "lighting"
        }"#;
        let Ok(request) = serde_json::from_str::<CreateProductRequest>(json) else {
            panic!("deserialization failed");
        };
        assert_eq!(request.discount_percentage, 5.0);
        assert_eq!(request.stock, 0);
        assert!(request.images.is_empty());
    }

    #[test]
    fn product_dto_serializes_camel_case() {
        let draft = CreateProductRequest {
            title: "Desk Lamp".to_string(),
            description: "Warm light".to_string(),
            price: 20.5,
            discount_percentage: 5.0,
            rating: 4.0,
            stock: 3,
            brand: "Lumen".to_string(),
            category: "lighting".to_string(),
            thumbnail: None,
            images: vec![],
        }
        .into_draft();
        let dto = ProductDto::from(draft.into_product());
        let Ok(json) = serde_json::to_string(&dto) else {
            panic!("serialization failed");
        };
        assert!(json.contains("\"discountPercentage\""));
        assert!(json.contains("\"createdAt\""));
        assert!(!json.contains("\"thumbnail\""));
    }
}
