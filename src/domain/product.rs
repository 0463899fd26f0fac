//! Product catalog entity and its create/update payloads.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::GatewayError;

/// A catalog product.
///
/// The analytics core treats products as an immutable lookup table
/// keyed by [`Product::id`]; only the leaderboard enrichment and the
/// recommendation prompt read from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Unique product identifier (immutable after creation).
    pub id: Uuid,
    /// Display title.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Unit price.
    pub price: f64,
    /// Discount percentage (0-100).
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
    pub thumbnail: Option<String>,
    /// Gallery image URLs.
    pub images: Vec<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a product.
#[derive(Debug, Clone)]
pub struct ProductDraft {
    /// Display title.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Unit price.
    pub price: f64,
    /// Discount percentage (0-100).
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
    pub thumbnail: Option<String>,
    /// Gallery image URLs.
    pub images: Vec<String>,
}

impl ProductDraft {
    /// Validates the draft fields.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] when the title, brand or
    /// category is empty, or a numeric field is negative or not finite.
    pub fn validate(&self) -> Result<(), GatewayError> {
        if self.title.trim().is_empty() {
            return Err(GatewayError::InvalidRequest(
                "title must not be empty".to_string(),
            ));
        }
        if self.brand.trim().is_empty() {
            return Err(GatewayError::InvalidRequest(
                "brand must not be empty".to_string(),
            ));
        }
        if self.category.trim().is_empty() {
            return Err(GatewayError::InvalidRequest(
                "category must not be empty".to_string(),
            ));
        }
        for (name, value) in [
            ("price", self.price),
            ("discountPercentage", self.discount_percentage),
            ("rating", self.rating),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(GatewayError::InvalidRequest(format!(
                    "{name} must be a non-negative number"
                )));
            }
        }
        if self.stock < 0 {
            return Err(GatewayError::InvalidRequest(
                "stock must be non-negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Builds a [`Product`] with a fresh id and timestamps.
    #[must_use]
    pub fn into_product(self) -> Product {
        let now = Utc::now();
        Product {
            id: Uuid::new_v4(),
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
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update for a product; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
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

impl ProductPatch {
    /// Applies the patch to a product in place and refreshes
    /// `updated_at`.
    pub fn apply(self, product: &mut Product) {
        if let Some(title) = self.title {
            product.title = title;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(discount) = self.discount_percentage {
            product.discount_percentage = discount;
        }
        if let Some(rating) = self.rating {
            product.rating = rating;
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
        if let Some(brand) = self.brand {
            product.brand = brand;
        }
        if let Some(category) = self.category {
            product.category = category;
        }
        if let Some(thumbnail) = self.thumbnail {
            product.thumbnail = Some(thumbnail);
        }
        if let Some(images) = self.images {
            product.images = images;
        }
        product.updated_at = Utc::now();
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn draft() -> ProductDraft {
        ProductDraft {
            title: "Leather Boots".to_string(),
            description: "Sturdy brown boots".to_string(),
            price: 89.99,
            discount_percentage: 10.0,
            rating: 4.5,
            stock: 12,
            brand: "Stompers".to_string(),
            category: "footwear".to_string(),
            thumbnail: None,
            images: vec![],
        }
    }

    #[test]
    fn valid_draft_passes() {
        assert!(draft().validate().is_ok());
    }

    #[test]
    fn empty_title_is_rejected() {
        let mut d = draft();
        d.title = "  ".to_string();
        assert!(d.validate().is_err());
    }

    #[test]
    fn negative_price_is_rejected() {
        let mut d = draft();
        d.price = -1.0;
        assert!(d.validate().is_err());
    }

    #[test]
    fn nan_rating_is_rejected() {
        let mut d = draft();
        d.rating = f64::NAN;
        assert!(d.validate().is_err());
    }

    #[test]
    fn into_product_stamps_id_and_timestamps() {
        let product = draft().into_product();
        assert_eq!(product.created_at, product.updated_at);
        assert_eq!(product.title, "Leather Boots");
    }

    #[test]
    fn patch_applies_only_set_fields() {
        let mut product = draft().into_product();
        let patch = ProductPatch {
            price: Some(79.99),
            stock: Some(5),
            ..ProductPatch::default()
        };
        patch.apply(&mut product);
        assert_eq!(product.price, 79.99);
        assert_eq!(product.stock, 5);
        assert_eq!(product.title, "Leather Boots");
    }
}
