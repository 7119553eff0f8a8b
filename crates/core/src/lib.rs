//! Feriwala Core - Shared types and catalog logic.
//!
//! This crate provides the types and pure logic used by the storefront:
//! - Wire records received from the backend API (products, categories, sliders)
//! - Category-driven product filtering and search
//! - Client-side pagination over eagerly fetched lists
//! - The session-stored checkout cart
//!
//! # Architecture
//!
//! The core crate contains only types and functions - no I/O, no HTTP
//! clients, no session access. This keeps it lightweight and trivially
//! testable.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, catalog records, delivery charges
//! - [`catalog`] - Category extraction, filtering, search, related products
//! - [`pagination`] - Fixed-size page slicing
//! - [`cart`] - Checkout cart lines and totals

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod pagination;
pub mod types;

pub use cart::{Cart, CartItem};
pub use pagination::{PAGE_SIZE, Page, PageLink};
pub use types::*;
