//! Demo-data seeding command.
//!
//! # Usage
//!
//! ```bash
//! dw-cli seed
//! ```
//!
//! Inserts a handful of demo products so the front end has something to
//! render locally. Image paths point at files that are expected to be
//! dropped into the media directory by hand.

use rust_decimal::Decimal;

use driftwood_api::db::ProductRepository;
use driftwood_api::models::NewProduct;

use super::CliError;

/// Insert demo products.
///
/// # Errors
///
/// Returns `CliError` if the database is unreachable or an insert fails.
pub async fn run() -> Result<(), CliError> {
    let pool = super::connect().await?;
    let products = ProductRepository::new(&pool);

    for new in demo_products() {
        let product = products.create(new).await?;
        tracing::info!("Seeded product {} ({})", product.name, product.id);
    }

    tracing::info!("Seeding complete!");
    Ok(())
}

fn demo_products() -> Vec<NewProduct> {
    let sizes = || vec!["S".to_owned(), "M".to_owned(), "L".to_owned(), "XL".to_owned()];

    vec![
        NewProduct {
            name: "Harbor Tee".to_owned(),
            description: Some("Heavyweight cotton, boxy fit.".to_owned()),
            price: Decimal::new(2400, 2),
            available_colors: vec!["Black".to_owned(), "Sand".to_owned()],
            available_sizes: sizes(),
            garment_type: "crew-neck".to_owned(),
            image_path: "products/seed-harbor-tee.jpg".to_owned(),
            is_active: true,
        },
        NewProduct {
            name: "Tidepool Longsleeve".to_owned(),
            description: Some("Midweight, ribbed cuffs.".to_owned()),
            price: Decimal::new(3200, 2),
            available_colors: vec!["Navy".to_owned(), "Rust".to_owned(), "Cream".to_owned()],
            available_sizes: sizes(),
            garment_type: "longsleeve".to_owned(),
            image_path: "products/seed-tidepool-longsleeve.jpg".to_owned(),
            is_active: true,
        },
        NewProduct {
            name: "Driftwood Classic".to_owned(),
            description: None,
            price: Decimal::new(1800, 2),
            available_colors: vec!["White".to_owned()],
            available_sizes: sizes(),
            garment_type: "crew-neck".to_owned(),
            image_path: "products/seed-driftwood-classic.jpg".to_owned(),
            is_active: false,
        },
    ]
}
