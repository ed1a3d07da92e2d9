//! Product catalog route handlers.

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use tracing::instrument;

use driftwood_core::ProductId;

use crate::db::ProductRepository;
use crate::error::{ApiError, Result};
use crate::middleware::RequireSalesAdmin;
use crate::models::{NewProduct, ProductUpdate, ProductView};
use crate::services::media::MediaKind;
use crate::state::AppState;

/// Public list of active products, newest first.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<ProductView>>> {
    let products = ProductRepository::new(state.pool()).list_active().await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

/// Retrieve one product (active or not).
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ProductView>> {
    let product = ProductRepository::new(state.pool())
        .get(ProductId::new(id))
        .await?
        .ok_or_else(|| ApiError::NotFound("Product".to_owned()))?;

    Ok(Json(product.into()))
}

/// Create a product from a multipart form with an image.
///
/// Fields: `name`, `price`, `garment_type` (required), `description`,
/// `available_colors` / `available_sizes` (JSON string arrays),
/// `is_active` (default true), `image` (file, required).
#[instrument(skip(_admin, state, multipart))]
pub async fn create(
    RequireSalesAdmin(_admin): RequireSalesAdmin,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let mut name = None;
    let mut description = None;
    let mut price_raw = None;
    let mut colors_raw = None;
    let mut sizes_raw = None;
    let mut garment_type = None;
    let mut is_active_raw = None;
    let mut image: Option<(Option<String>, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await? {
        let Some(field_name) = field.name().map(ToOwned::to_owned) else {
            continue;
        };
        match field_name.as_str() {
            "name" => name = Some(field.text().await?),
            "description" => description = Some(field.text().await?),
            "price" => price_raw = Some(field.text().await?),
            "available_colors" => colors_raw = Some(field.text().await?),
            "available_sizes" => sizes_raw = Some(field.text().await?),
            "garment_type" => garment_type = Some(field.text().await?),
            "is_active" => is_active_raw = Some(field.text().await?),
            "image" => {
                let filename = field.file_name().map(ToOwned::to_owned);
                let bytes = field.bytes().await?;
                image = Some((filename, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let name = required_text(name, "name")?;
    let garment_type = required_text(garment_type, "garment_type")?;
    let price = parse_price(price_raw.as_deref())?;
    let available_colors = parse_string_list(colors_raw.as_deref(), "available_colors")?;
    let available_sizes = parse_string_list(sizes_raw.as_deref(), "available_sizes")?;
    let is_active = match is_active_raw.as_deref() {
        None => true,
        Some(raw) => raw.parse().map_err(|_| {
            ApiError::Validation(format!("Invalid is_active value: {raw}"))
        })?,
    };

    let (filename, bytes) =
        image.ok_or_else(|| ApiError::Validation("Missing field: image".to_owned()))?;
    let image_path = state
        .media()
        .store(MediaKind::Product, filename.as_deref(), &bytes)
        .await?;

    let product = ProductRepository::new(state.pool())
        .create(NewProduct {
            name,
            description: description.filter(|d| !d.is_empty()),
            price,
            available_colors,
            available_sizes,
            garment_type,
            image_path,
            is_active,
        })
        .await?;

    tracing::info!(product_id = %product.id, "product created");

    Ok((StatusCode::CREATED, Json(ProductView::from(product))))
}

/// Update a product's scalar fields from a JSON body.
#[instrument(skip(_admin, state, update))]
pub async fn update(
    RequireSalesAdmin(_admin): RequireSalesAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(update): Json<ProductUpdate>,
) -> Result<Json<ProductView>> {
    if let Some(price) = update.price
        && price < Decimal::ZERO
    {
        return Err(ApiError::Validation("Price must be non-negative".to_owned()));
    }

    let product = ProductRepository::new(state.pool())
        .update(ProductId::new(id), update)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => ApiError::NotFound("Product".to_owned()),
            other => ApiError::Repository(other),
        })?;

    Ok(Json(product.into()))
}

/// Delete a product.
#[instrument(skip(_admin, state))]
pub async fn destroy(
    RequireSalesAdmin(_admin): RequireSalesAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    ProductRepository::new(state.pool())
        .delete(ProductId::new(id))
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => ApiError::NotFound("Product".to_owned()),
            other => ApiError::Repository(other),
        })?;

    Ok(StatusCode::NO_CONTENT)
}

fn required_text(value: Option<String>, field: &'static str) -> Result<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::Validation(format!("Missing field: {field}")))
}

fn parse_price(raw: Option<&str>) -> Result<Decimal> {
    let raw = raw.ok_or_else(|| ApiError::Validation("Missing field: price".to_owned()))?;
    let price: Decimal = raw
        .trim()
        .parse()
        .map_err(|_| ApiError::Validation(format!("Invalid price: {raw}")))?;

    if price < Decimal::ZERO {
        return Err(ApiError::Validation("Price must be non-negative".to_owned()));
    }
    Ok(price)
}

/// Parse a JSON string array form field; an absent field means empty.
fn parse_string_list(raw: Option<&str>, field: &'static str) -> Result<Vec<String>> {
    match raw {
        None => Ok(Vec::new()),
        Some(raw) if raw.trim().is_empty() => Ok(Vec::new()),
        Some(raw) => serde_json::from_str(raw)
            .map_err(|_| ApiError::Validation(format!("Invalid {field}: expected a JSON array"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prices_parse_and_reject_negatives() {
        assert_eq!(parse_price(Some("10.00")).unwrap(), Decimal::new(1000, 2));
        assert_eq!(parse_price(Some(" 0 ")).unwrap(), Decimal::ZERO);
        assert!(parse_price(Some("-1")).is_err());
        assert!(parse_price(Some("ten")).is_err());
        assert!(parse_price(None).is_err());
    }

    #[test]
    fn string_lists_parse_json_arrays() {
        assert_eq!(
            parse_string_list(Some(r#"["Red","Black"]"#), "available_colors").unwrap(),
            vec!["Red".to_owned(), "Black".to_owned()]
        );
        assert!(parse_string_list(None, "available_colors").unwrap().is_empty());
        assert!(parse_string_list(Some(""), "available_colors").unwrap().is_empty());
        assert!(parse_string_list(Some("Red,Black"), "available_colors").is_err());
    }

    #[test]
    fn required_text_rejects_blank_values() {
        assert!(required_text(Some("  ".to_owned()), "name").is_err());
        assert!(required_text(None, "name").is_err());
        assert_eq!(required_text(Some("Tee".to_owned()), "name").unwrap(), "Tee");
    }
}
