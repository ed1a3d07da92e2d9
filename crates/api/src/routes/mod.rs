//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! # Public
//! GET    /products/                        - List active products
//! POST   /order/create/                    - Checkout (multipart)
//! GET    /confirm/{id}/                    - Retrieve one product
//!
//! # Admin (HTTP Basic, sales admin required)
//! POST   /admin/product/create/            - Create product (multipart)
//! GET    /admin/orders/                    - All orders, newest first
//! GET    /admin/orders/pending/            - Pending orders
//! GET    /admin/orders/weekly-total/       - Orders in the trailing 7 days
//! PATCH  /admin/order/confirm/{id}/        - Transition order to CONFIRMED
//! PATCH  /admin/order/mark-delivered/{id}/ - Transition order to DELIVERED
//! POST   /admin/create-sales-user/         - Provision a sales admin
//! PUT    /confirm/{id}/                    - Update product
//! PATCH  /confirm/{id}/                    - Update product
//! DELETE /confirm/{id}/                    - Delete product
//! ```
//!
//! The `/confirm/{id}/` path is the product CRUD endpoint; the name is
//! historical and the web front end depends on it, so it stays.

pub mod orders;
pub mod products;
pub mod users;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::state::AppState;

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/product/create/", post(products::create))
        .route("/orders/", get(orders::list_all))
        .route("/orders/pending/", get(orders::list_pending))
        .route("/orders/weekly-total/", get(orders::weekly_total))
        .route("/order/confirm/{id}/", patch(orders::confirm))
        .route("/order/mark-delivered/{id}/", patch(orders::mark_delivered))
        .route("/create-sales-user/", post(users::create_sales_user))
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Public catalog and checkout
        .route("/products/", get(products::index))
        .route("/order/create/", post(orders::create))
        // Generic product retrieve/update/delete (historically named path)
        .route(
            "/confirm/{id}/",
            get(products::show)
                .put(products::update)
                .patch(products::update)
                .delete(products::destroy),
        )
        // Admin routes
        .nest("/admin", admin_routes())
}
