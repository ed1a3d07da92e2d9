//! Domain models and their API response shapes.
//!
//! Repositories return the plain domain structs; the `*View` types are the
//! JSON shapes the front end consumes and are built at the route layer.

pub mod order;
pub mod product;
pub mod user;

pub use order::{Cart, CartItem, ItemRequest, Order, OrderDetail, OrderLine, OrderView};
pub use product::{NewProduct, Product, ProductUpdate, ProductView};
pub use user::User;
