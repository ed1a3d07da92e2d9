//! Order, cart, and line-item models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use driftwood_core::{CartId, CartItemId, CartToken, OrderId, OrderStatus, ProductId};

use crate::services::media;

/// A customer-facing order record.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: OrderId,
    pub customer_name: String,
    pub cart_id: CartId,
    pub status: OrderStatus,
    /// Payment-evidence image path relative to the media root, if uploaded.
    pub payment_screenshot_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A cart; created once per checkout, owned by exactly one order.
#[derive(Debug, Clone)]
pub struct Cart {
    pub id: CartId,
    pub token: CartToken,
    pub created_at: DateTime<Utc>,
}

/// A single product selection within a cart.
#[derive(Debug, Clone)]
pub struct CartItem {
    pub id: CartItemId,
    pub cart_id: CartId,
    pub product_id: ProductId,
    pub color: String,
    pub size: String,
    pub quantity: i32,
}

/// One entry of the checkout request's item list.
///
/// The front end sends these as a JSON array in the `items` form field.
/// Absent fields take the shop's historical defaults.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct ItemRequest {
    /// Raw product id as sent by the client; may not resolve.
    pub id: i32,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
    #[serde(default = "default_size")]
    pub size: String,
    #[serde(default = "default_color")]
    pub color: String,
}

const fn default_quantity() -> i32 {
    1
}

fn default_size() -> String {
    "M".to_owned()
}

fn default_color() -> String {
    "Default".to_owned()
}

/// A cart item joined with the product fields needed for display.
///
/// `unit_price` is the product's price at read time; line totals are not
/// snapshotted at checkout.
#[derive(Debug, Clone)]
pub struct OrderLine {
    pub item: CartItem,
    pub product_name: String,
    pub unit_price: Decimal,
}

impl OrderLine {
    /// Line total: quantity times the current product price.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        Decimal::from(self.item.quantity) * self.unit_price
    }
}

/// An order with its cart and line items fully loaded.
#[derive(Debug, Clone)]
pub struct OrderDetail {
    pub order: Order,
    pub cart: Cart,
    pub items: Vec<OrderLine>,
}

/// JSON shape of an order as served to the admin front end.
#[derive(Debug, Clone, Serialize)]
pub struct OrderView {
    pub id: OrderId,
    pub customer_name: String,
    pub status: OrderStatus,
    pub cart: CartView,
    /// Public URL of the payment-evidence image, if any.
    pub payment_screenshot: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// JSON shape of a cart nested inside an order.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub id: CartId,
    pub session_id: CartToken,
    pub items: Vec<CartItemView>,
}

/// JSON shape of a line item nested inside a cart.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemView {
    pub id: CartItemId,
    pub product_name: String,
    pub color: String,
    pub size: String,
    pub quantity: i32,
    pub total_price: Decimal,
}

impl From<OrderDetail> for OrderView {
    fn from(detail: OrderDetail) -> Self {
        let items = detail
            .items
            .into_iter()
            .map(|line| CartItemView {
                id: line.item.id,
                product_name: line.product_name.clone(),
                color: line.item.color.clone(),
                size: line.item.size.clone(),
                quantity: line.item.quantity,
                total_price: line.total_price(),
            })
            .collect();

        Self {
            id: detail.order.id,
            customer_name: detail.order.customer_name,
            status: detail.order.status,
            cart: CartView {
                id: detail.cart.id,
                session_id: detail.cart.token,
                items,
            },
            payment_screenshot: detail
                .order
                .payment_screenshot_path
                .as_deref()
                .map(media::public_url),
            created_at: detail.order.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_detail() -> OrderDetail {
        let cart_id = CartId::new(5);
        OrderDetail {
            order: Order {
                id: OrderId::new(9),
                customer_name: "Alice".to_owned(),
                cart_id,
                status: OrderStatus::Pending,
                payment_screenshot_path: Some("payments/xyz.png".to_owned()),
                created_at: Utc::now(),
            },
            cart: Cart {
                id: cart_id,
                token: CartToken::generate(),
                created_at: Utc::now(),
            },
            items: vec![OrderLine {
                item: CartItem {
                    id: CartItemId::new(1),
                    cart_id,
                    product_id: ProductId::new(1),
                    color: "Red".to_owned(),
                    size: "M".to_owned(),
                    quantity: 2,
                },
                product_name: "Harbor Tee".to_owned(),
                unit_price: Decimal::new(1000, 2),
            }],
        }
    }

    #[test]
    fn line_total_is_quantity_times_current_price() {
        let detail = sample_detail();
        assert_eq!(detail.items[0].total_price(), Decimal::new(2000, 2));
    }

    #[test]
    fn view_serializes_the_front_end_shape() {
        let view = OrderView::from(sample_detail());
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["status"], serde_json::json!("PENDING"));
        assert_eq!(json["customer_name"], serde_json::json!("Alice"));
        assert_eq!(
            json["payment_screenshot"],
            serde_json::json!("/media/payments/xyz.png")
        );
        let items = json["cart"]["items"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["product_name"], serde_json::json!("Harbor Tee"));
        assert_eq!(items[0]["total_price"], serde_json::json!("20.00"));
    }
}
