//! Core types for the Feriwala storefront.
//!
//! This module provides type-safe wrappers for the records exchanged with the
//! backend API.

pub mod catalog;
pub mod delivery;
pub mod id;
pub mod price;

pub use catalog::{Category, Product, SliderImage};
pub use delivery::{DeliveryArea, DeliveryCharge};
pub use id::*;
pub use price::{Price, PriceError};
