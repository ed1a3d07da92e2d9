//! Business logic shared between route handlers and the CLI.

pub mod auth;
pub mod checkout;
pub mod media;
