//! Driftwood Core - Shared domain types.
//!
//! This crate provides the common types used across all Driftwood components:
//! - `api` - JSON REST API server (catalog, checkout, order management)
//! - `cli` - Command-line tools for migrations and provisioning
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, the order status state machine, and cart tokens

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
