//! Checkout and order-management route handlers.

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Days, NaiveTime, Utc};
use serde_json::json;
use tracing::instrument;

use driftwood_core::{OrderId, OrderStatus};

use crate::db::OrderRepository;
use crate::db::orders::{OrderTransitionError, PlaceOrderError};
use crate::error::{ApiError, Result};
use crate::middleware::RequireSalesAdmin;
use crate::models::OrderView;
use crate::services::checkout;
use crate::services::media::MediaKind;
use crate::state::AppState;

/// Checkout: create a cart, its line items, and the order in one request.
///
/// Multipart fields: `username` (customer name), `items` (JSON-encoded
/// array), `payment_screenshot` (file, optional).
#[instrument(skip(state, multipart))]
pub async fn create(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let mut username = None;
    let mut items_raw = None;
    let mut screenshot: Option<(Option<String>, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(ToOwned::to_owned) else {
            continue;
        };
        match name.as_str() {
            "username" => username = Some(field.text().await?),
            "items" => items_raw = Some(field.text().await?),
            "payment_screenshot" => {
                let filename = field.file_name().map(ToOwned::to_owned);
                let bytes = field.bytes().await?;
                screenshot = Some((filename, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let customer_name = username
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| ApiError::Validation("Missing field: username".to_owned()))?;
    let items = checkout::parse_items(items_raw.as_deref())?;

    let payment_path = match screenshot {
        Some((filename, bytes)) => Some(
            state
                .media()
                .store(MediaKind::Payment, filename.as_deref(), &bytes)
                .await?,
        ),
        None => None,
    };

    let placed = OrderRepository::new(state.pool())
        .create_checkout(
            &customer_name,
            payment_path.as_deref(),
            &items,
            state.config().checkout_mode,
        )
        .await
        .map_err(|e| match e {
            PlaceOrderError::UnknownProduct(id) => ApiError::NotFound(format!("Product {id}")),
            PlaceOrderError::Repository(err) => {
                // Historical checkout contract: storage failures surface to
                // the client as a generic 400, not a 500
                tracing::error!(error = %err, "checkout failed");
                ApiError::Validation(
                    "Failed to process order. Ensure all fields are valid.".to_owned(),
                )
            }
        })?;

    tracing::info!(
        order_id = %placed.id,
        item_count = items.len() - placed.skipped.len(),
        skipped = placed.skipped.len(),
        "order placed"
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "order_id": placed.id,
            "message": "Order placed successfully! Pending verification.",
        })),
    ))
}

/// Transition an order to CONFIRMED.
#[instrument(skip(_admin, state))]
pub async fn confirm(
    RequireSalesAdmin(_admin): RequireSalesAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<OrderView>> {
    transition(&state, id, OrderStatus::Confirmed).await
}

/// Transition an order to DELIVERED.
#[instrument(skip(_admin, state))]
pub async fn mark_delivered(
    RequireSalesAdmin(_admin): RequireSalesAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<OrderView>> {
    transition(&state, id, OrderStatus::Delivered).await
}

async fn transition(state: &AppState, id: i32, target: OrderStatus) -> Result<Json<OrderView>> {
    let detail = OrderRepository::new(state.pool())
        .transition(OrderId::new(id), target)
        .await
        .map_err(|e| match e {
            OrderTransitionError::NotFound => ApiError::NotFound("Order".to_owned()),
            OrderTransitionError::Illegal(err) => ApiError::Transition(err),
            OrderTransitionError::Repository(err) => ApiError::Repository(err),
        })?;

    Ok(Json(OrderView::from(detail)))
}

/// List all orders, newest first.
#[instrument(skip(_admin, state))]
pub async fn list_all(
    RequireSalesAdmin(_admin): RequireSalesAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<OrderView>>> {
    let orders = OrderRepository::new(state.pool()).list(None).await?;
    Ok(Json(orders.into_iter().map(Into::into).collect()))
}

/// List orders still in PENDING, newest first.
#[instrument(skip(_admin, state))]
pub async fn list_pending(
    RequireSalesAdmin(_admin): RequireSalesAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<OrderView>>> {
    let orders = OrderRepository::new(state.pool())
        .list(Some(OrderStatus::Pending))
        .await?;
    Ok(Json(orders.into_iter().map(Into::into).collect()))
}

/// Count of orders created in the trailing 7 days.
#[instrument(skip(_admin, state))]
pub async fn weekly_total(
    RequireSalesAdmin(_admin): RequireSalesAdmin,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>> {
    let cutoff = weekly_window_start(Utc::now());
    let total = OrderRepository::new(state.pool()).count_since(cutoff).await?;
    Ok(Json(json!({ "weekly_orders": total })))
}

/// Start of the trailing-7-day window: midnight UTC of the date seven days
/// before `now`. The boundary date itself counts.
fn weekly_window_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let start = now.date_naive() - Days::new(7);
    start.and_time(NaiveTime::MIN).and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(date: &str, time: &str) -> DateTime<Utc> {
        format!("{date}T{time}Z").parse().unwrap()
    }

    #[test]
    fn window_starts_at_midnight_seven_days_back() {
        let now = at("2026-03-20", "15:30:00");
        assert_eq!(weekly_window_start(now), at("2026-03-13", "00:00:00"));
    }

    #[test]
    fn window_counts_the_expected_orders() {
        let now = at("2026-03-20", "12:00:00");
        let cutoff = weekly_window_start(now);

        let today = at("2026-03-20", "08:00:00");
        let three_days_ago = at("2026-03-17", "23:59:59");
        let six_days_ago = at("2026-03-14", "01:00:00");
        let ten_days_ago = at("2026-03-10", "12:00:00");

        let counted = [today, three_days_ago, six_days_ago, ten_days_ago]
            .iter()
            .filter(|created| **created >= cutoff)
            .count();
        assert_eq!(counted, 3);
    }

    #[test]
    fn boundary_date_is_inclusive() {
        let now = at("2026-03-20", "12:00:00");
        let cutoff = weekly_window_start(now);
        // An order placed at any time on the boundary date still counts
        assert!(at("2026-03-13", "00:00:00") >= cutoff);
        assert!(at("2026-03-12", "23:59:59") < cutoff);
    }
}
