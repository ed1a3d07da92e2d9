//! Order repository: checkout placement, status transitions, listings.
//!
//! Checkout creates the cart, the order, and every line item inside one
//! transaction, so an interrupted request leaves no partial order behind.
//! Status transitions lock the order row (`FOR UPDATE`) before validating
//! against the state machine, so concurrent updates serialize at the row.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use thiserror::Error;

use driftwood_core::{
    CartId, CartItemId, CartToken, OrderId, OrderStatus, ProductId, TransitionError,
};

use super::RepositoryError;
use crate::config::CheckoutMode;
use crate::models::{Cart, CartItem, ItemRequest, Order, OrderDetail, OrderLine};

/// Internal row type for order queries, joined with the owning cart.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    customer_name: String,
    cart_id: i32,
    status: String,
    payment_screenshot_path: Option<String>,
    created_at: DateTime<Utc>,
    cart_token: CartToken,
    cart_created_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_parts(self) -> Result<(Order, Cart), RepositoryError> {
        let status: OrderStatus = self.status.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid order status in database: {e}"))
        })?;

        let cart = Cart {
            id: CartId::new(self.cart_id),
            token: self.cart_token,
            created_at: self.cart_created_at,
        };
        let order = Order {
            id: OrderId::new(self.id),
            customer_name: self.customer_name,
            cart_id: cart.id,
            status,
            payment_screenshot_path: self.payment_screenshot_path,
            created_at: self.created_at,
        };
        Ok((order, cart))
    }
}

/// Internal row type for line items joined with their product.
#[derive(Debug, sqlx::FromRow)]
struct OrderLineRow {
    id: i32,
    cart_id: i32,
    product_id: i32,
    color: String,
    size: String,
    quantity: i32,
    product_name: String,
    unit_price: Decimal,
}

impl From<OrderLineRow> for OrderLine {
    fn from(row: OrderLineRow) -> Self {
        Self {
            item: CartItem {
                id: CartItemId::new(row.id),
                cart_id: CartId::new(row.cart_id),
                product_id: ProductId::new(row.product_id),
                color: row.color,
                size: row.size,
                quantity: row.quantity,
            },
            product_name: row.product_name,
            unit_price: row.unit_price,
        }
    }
}

const ORDER_COLUMNS: &str = "o.id, o.customer_name, o.cart_id, o.status, \
     o.payment_screenshot_path, o.created_at, \
     c.token AS cart_token, c.created_at AS cart_created_at";

const LINE_COLUMNS: &str = "ci.id, ci.cart_id, ci.product_id, ci.color, ci.size, \
     ci.quantity, p.name AS product_name, p.price AS unit_price";

/// Result of a successful checkout.
#[derive(Debug)]
pub struct PlacedOrder {
    /// ID of the created order.
    pub id: OrderId,
    /// Requested product ids that did not resolve and were dropped
    /// (lenient mode only; always empty in strict mode).
    pub skipped: Vec<i32>,
}

/// Errors that can occur while placing a checkout.
#[derive(Debug, Error)]
pub enum PlaceOrderError {
    /// A requested product id did not resolve (strict mode only).
    #[error("Product {0} not found")]
    UnknownProduct(i32),

    /// Underlying repository failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for PlaceOrderError {
    fn from(e: sqlx::Error) -> Self {
        Self::Repository(e.into())
    }
}

/// Errors that can occur while transitioning an order's status.
#[derive(Debug, Error)]
pub enum OrderTransitionError {
    /// The order id did not resolve.
    #[error("order not found")]
    NotFound,

    /// The state machine rejected the transition.
    #[error(transparent)]
    Illegal(#[from] TransitionError),

    /// Underlying repository failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for OrderTransitionError {
    fn from(e: sqlx::Error) -> Self {
        Self::Repository(e.into())
    }
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Place a checkout: cart, order, and line items in one transaction.
    ///
    /// Items whose product id does not resolve are dropped in
    /// [`CheckoutMode::Lenient`] (and reported in `skipped`); in
    /// [`CheckoutMode::Strict`] the first unknown id aborts and rolls back.
    ///
    /// # Errors
    ///
    /// Returns `PlaceOrderError::UnknownProduct` in strict mode, or
    /// `PlaceOrderError::Repository` for database failures.
    pub async fn create_checkout(
        &self,
        customer_name: &str,
        payment_screenshot_path: Option<&str>,
        items: &[ItemRequest],
        mode: CheckoutMode,
    ) -> Result<PlacedOrder, PlaceOrderError> {
        let mut tx = self.pool.begin().await?;

        let token = CartToken::generate();
        let cart_id: i32 = sqlx::query_scalar("INSERT INTO cart (token) VALUES ($1) RETURNING id")
            .bind(token)
            .fetch_one(&mut *tx)
            .await?;

        let order_id: i32 = sqlx::query_scalar(
            "INSERT INTO \"order\" (customer_name, cart_id, status, payment_screenshot_path) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(customer_name)
        .bind(cart_id)
        .bind(OrderStatus::Pending.as_str())
        .bind(payment_screenshot_path)
        .fetch_one(&mut *tx)
        .await?;

        let mut skipped = Vec::new();
        for item in items {
            let exists: Option<i32> = sqlx::query_scalar("SELECT id FROM product WHERE id = $1")
                .bind(item.id)
                .fetch_optional(&mut *tx)
                .await?;

            if exists.is_none() {
                match mode {
                    CheckoutMode::Lenient => {
                        tracing::warn!(
                            product_id = item.id,
                            order_id,
                            "skipping unknown product in checkout"
                        );
                        skipped.push(item.id);
                        continue;
                    }
                    CheckoutMode::Strict => {
                        return Err(PlaceOrderError::UnknownProduct(item.id));
                    }
                }
            }

            sqlx::query(
                "INSERT INTO cart_item (cart_id, product_id, color, size, quantity) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(cart_id)
            .bind(item.id)
            .bind(&item.color)
            .bind(&item.size)
            .bind(item.quantity)
            .execute(&mut *tx)
            .await?;
        }

        if skipped.len() == items.len() {
            tracing::warn!(order_id, "order placed with no resolvable items");
        }

        tx.commit().await?;

        Ok(PlacedOrder {
            id: OrderId::new(order_id),
            skipped,
        })
    }

    /// Transition an order to `target`, validating against the state machine.
    ///
    /// The order row is locked for the duration of the check-and-update, so
    /// re-applying the same status is a no-op and concurrent transitions
    /// cannot interleave. Returns the order with cart and items loaded.
    ///
    /// # Errors
    ///
    /// Returns `OrderTransitionError::NotFound` if the id does not resolve,
    /// `OrderTransitionError::Illegal` if the transition is rejected.
    pub async fn transition(
        &self,
        id: OrderId,
        target: OrderStatus,
    ) -> Result<OrderDetail, OrderTransitionError> {
        let mut tx = self.pool.begin().await?;

        let current: Option<String> =
            sqlx::query_scalar("SELECT status FROM \"order\" WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let current: OrderStatus = current
            .ok_or(OrderTransitionError::NotFound)?
            .parse()
            .map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid order status in database: {e}"))
            })?;

        let next = current.transition_to(target)?;

        if next != current {
            sqlx::query("UPDATE \"order\" SET status = $2 WHERE id = $1")
                .bind(id)
                .bind(next.as_str())
                .execute(&mut *tx)
                .await?;
        }

        let detail = load_detail(&mut tx, id)
            .await?
            .ok_or(OrderTransitionError::NotFound)?;
        tx.commit().await?;

        Ok(detail)
    }

    /// List orders newest first, optionally filtered by status, with carts
    /// and items loaded.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn list(
        &self,
        status: Option<OrderStatus>,
    ) -> Result<Vec<OrderDetail>, RepositoryError> {
        let base = format!(
            "SELECT {ORDER_COLUMNS} FROM \"order\" o JOIN cart c ON c.id = o.cart_id"
        );
        let rows: Vec<OrderRow> = match status {
            Some(status) => {
                sqlx::query_as(&format!(
                    "{base} WHERE o.status = $1 ORDER BY o.created_at DESC"
                ))
                .bind(status.as_str())
                .fetch_all(self.pool)
                .await?
            }
            None => {
                sqlx::query_as(&format!("{base} ORDER BY o.created_at DESC"))
                    .fetch_all(self.pool)
                    .await?
            }
        };

        let cart_ids: Vec<i32> = rows.iter().map(|r| r.cart_id).collect();
        let line_rows: Vec<OrderLineRow> = sqlx::query_as(&format!(
            "SELECT {LINE_COLUMNS} FROM cart_item ci \
             JOIN product p ON p.id = ci.product_id \
             WHERE ci.cart_id = ANY($1) \
             ORDER BY ci.id"
        ))
        .bind(&cart_ids)
        .fetch_all(self.pool)
        .await?;

        let mut items_by_cart: HashMap<i32, Vec<OrderLine>> = HashMap::new();
        for row in line_rows {
            items_by_cart
                .entry(row.cart_id)
                .or_default()
                .push(row.into());
        }

        rows.into_iter()
            .map(|row| {
                let cart_id = row.cart_id;
                let (order, cart) = row.into_parts()?;
                Ok(OrderDetail {
                    order,
                    cart,
                    items: items_by_cart.remove(&cart_id).unwrap_or_default(),
                })
            })
            .collect()
    }

    /// Count orders created at or after `cutoff`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_since(&self, cutoff: DateTime<Utc>) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM \"order\" WHERE created_at >= $1")
            .bind(cutoff)
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}

/// Load one order with cart and items on an existing connection.
async fn load_detail(
    conn: &mut PgConnection,
    id: OrderId,
) -> Result<Option<OrderDetail>, RepositoryError> {
    let row: Option<OrderRow> = sqlx::query_as(&format!(
        "SELECT {ORDER_COLUMNS} FROM \"order\" o JOIN cart c ON c.id = o.cart_id WHERE o.id = $1"
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let cart_id = row.cart_id;
    let (order, cart) = row.into_parts()?;

    let line_rows: Vec<OrderLineRow> = sqlx::query_as(&format!(
        "SELECT {LINE_COLUMNS} FROM cart_item ci \
         JOIN product p ON p.id = ci.product_id \
         WHERE ci.cart_id = $1 \
         ORDER BY ci.id"
    ))
    .bind(cart_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(Some(OrderDetail {
        order,
        cart,
        items: line_rows.into_iter().map(Into::into).collect(),
    }))
}
