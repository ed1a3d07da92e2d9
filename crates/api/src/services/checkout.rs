//! Checkout request parsing.
//!
//! The front end submits the item list as a JSON-encoded string inside a
//! multipart form, so it is parsed here rather than by an extractor. The
//! database side of checkout lives in `db::orders`.

use thiserror::Error;

use crate::models::ItemRequest;

/// Errors produced while parsing a checkout request.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Item list was missing or empty.
    #[error("Your shopping bag is empty")]
    EmptyBag,

    /// Item list was not valid JSON of the expected shape.
    #[error("Invalid items payload: {0}")]
    MalformedItems(#[from] serde_json::Error),

    /// An item carried a non-positive quantity.
    #[error("Item quantity must be at least 1")]
    InvalidQuantity,
}

/// Parse the `items` form field into validated item requests.
///
/// `None` (field absent) is treated the same as an empty array, matching
/// the front end's behavior of omitting the field for an empty bag.
///
/// # Errors
///
/// Returns [`CheckoutError::EmptyBag`] for a missing or empty list,
/// [`CheckoutError::MalformedItems`] for JSON that does not parse, and
/// [`CheckoutError::InvalidQuantity`] for quantities below 1.
pub fn parse_items(raw: Option<&str>) -> Result<Vec<ItemRequest>, CheckoutError> {
    let raw = raw.unwrap_or("[]");
    let items: Vec<ItemRequest> = serde_json::from_str(raw)?;

    if items.is_empty() {
        return Err(CheckoutError::EmptyBag);
    }
    if items.iter().any(|item| item.quantity < 1) {
        return Err(CheckoutError::InvalidQuantity);
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_full_item_entry() {
        let items =
            parse_items(Some(r#"[{"id":1,"quantity":2,"size":"L","color":"Black"}]"#)).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, 1);
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[0].size, "L");
        assert_eq!(items[0].color, "Black");
    }

    #[test]
    fn applies_defaults_for_absent_fields() {
        let items = parse_items(Some(r#"[{"id":7}]"#)).unwrap();
        assert_eq!(items[0].quantity, 1);
        assert_eq!(items[0].size, "M");
        assert_eq!(items[0].color, "Default");
    }

    #[test]
    fn empty_or_missing_lists_are_rejected() {
        assert!(matches!(parse_items(None), Err(CheckoutError::EmptyBag)));
        assert!(matches!(
            parse_items(Some("[]")),
            Err(CheckoutError::EmptyBag)
        ));
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(
            parse_items(Some("{not json")),
            Err(CheckoutError::MalformedItems(_))
        ));
        // An object instead of an array is also malformed
        assert!(matches!(
            parse_items(Some(r#"{"id":1}"#)),
            Err(CheckoutError::MalformedItems(_))
        ));
    }

    #[test]
    fn non_positive_quantities_are_rejected() {
        assert!(matches!(
            parse_items(Some(r#"[{"id":1,"quantity":0}]"#)),
            Err(CheckoutError::InvalidQuantity)
        ));
        assert!(matches!(
            parse_items(Some(r#"[{"id":1,"quantity":-3}]"#)),
            Err(CheckoutError::InvalidQuantity)
        ));
    }
}
