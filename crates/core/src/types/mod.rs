//! Core types for Warung.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod customer;
pub mod id;
pub mod price;

pub use customer::{Customer, CustomerError};
pub use id::*;
pub use price::{CURRENCY, ParsePriceError, Price};
