//! Core types for Driftwood.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod status;
pub mod token;

pub use id::*;
pub use status::{OrderStatus, TransitionError};
pub use token::CartToken;
