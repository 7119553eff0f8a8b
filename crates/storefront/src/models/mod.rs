//! Storefront-side models.
//!
//! Catalog records live in `feriwala-core`; this module only holds what the
//! storefront keeps in the visitor's session.

pub mod session;

pub use session::{DeleteTarget, Flash, FlashKind, PendingDeletion, keys as session_keys};
