//! Warung Core - Cart, catalog and checkout domain library.
//!
//! This crate provides the domain shared by all Warung front-ends:
//! - `storefront` - Server-rendered web storefront
//! - `cli` - Command-line ordering tool
//!
//! # Architecture
//!
//! The core crate owns the cart state machine and talks to the outside world
//! only through the [`cart::CartStorage`] trait and registered observers. No
//! HTTP, no templates. File-backed storage is available behind the `fs`
//! feature.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices and customer details
//! - [`catalog`] - Menu items offered for sale
//! - [`cart`] - Line items, the cart store and its storage surface
//! - [`checkout`] - Turning a cart into a bill

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod types;

pub use cart::{Cart, CartError, CartObserver, CartStorage, CartStore, Change, LineItem};
pub use catalog::{Catalog, CatalogError, MenuItem};
pub use checkout::{Bill, BillLine, CheckoutError, ClosePolicy};
pub use types::*;
