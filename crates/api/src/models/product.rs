//! Product catalog models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use driftwood_core::ProductId;

use crate::services::media;

/// A catalog product.
#[derive(Debug, Clone)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    /// Unit price; non-negative, two decimal places.
    pub price: Decimal,
    pub available_colors: Vec<String>,
    pub available_sizes: Vec<String>,
    /// Garment type tag (e.g. "crew-neck", "oversized").
    pub garment_type: String,
    /// Image path relative to the media root (e.g. `products/<uuid>.jpg`).
    pub image_path: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields for creating a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub available_colors: Vec<String>,
    pub available_sizes: Vec<String>,
    pub garment_type: String,
    pub image_path: String,
    pub is_active: bool,
}

/// Partial update of a product's scalar fields.
///
/// `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub available_colors: Option<Vec<String>>,
    pub available_sizes: Option<Vec<String>>,
    pub garment_type: Option<String>,
    pub is_active: Option<bool>,
}

/// JSON shape of a product as served to the front end.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub available_colors: Vec<String>,
    pub available_sizes: Vec<String>,
    pub garment_type: String,
    /// Public URL of the product image (under `/media`).
    pub image: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            available_colors: product.available_colors,
            available_sizes: product.available_sizes,
            garment_type: product.garment_type,
            image: media::public_url(&product.image_path),
            is_active: product.is_active,
            created_at: product.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_product() -> Product {
        Product {
            id: ProductId::new(1),
            name: "Harbor Tee".to_owned(),
            description: Some("Heavyweight cotton".to_owned()),
            price: Decimal::new(1000, 2),
            available_colors: vec!["Red".to_owned(), "Black".to_owned()],
            available_sizes: vec!["M".to_owned(), "L".to_owned()],
            garment_type: "crew-neck".to_owned(),
            image_path: "products/abc.jpg".to_owned(),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn view_exposes_media_url_and_string_price() {
        let view = ProductView::from(sample_product());
        assert_eq!(view.image, "/media/products/abc.jpg");

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["price"], serde_json::json!("10.00"));
        assert_eq!(json["id"], serde_json::json!(1));
    }
}
