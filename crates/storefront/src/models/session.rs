//! Session-related types.
//!
//! Everything the browser would otherwise keep client-side (auth token, cart,
//! one-shot notices, the item awaiting delete confirmation) lives in the
//! tower-sessions store under the keys below.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use feriwala_core::Cart;

/// Session keys.
pub mod keys {
    /// Bearer token returned by the backend login.
    pub const TOKEN: &str = "token";

    /// Serialized [`feriwala_core::Cart`].
    pub const CHECKOUT_CART: &str = "checkout_cart";

    /// One-shot notice shown on the next rendered page.
    pub const FLASH: &str = "flash";

    /// Item waiting for delete confirmation in the dashboard.
    pub const PENDING_DELETION: &str = "pending_deletion";
}

type SessionResult<T> = Result<T, tower_sessions::session::Error>;

// =============================================================================
// Flash messages
// =============================================================================

/// Flash message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
}

impl FlashKind {
    /// CSS modifier class.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// A notice displayed once, on the next page render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }
}

/// Store a flash for the next page.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_flash(session: &Session, flash: Flash) -> SessionResult<()> {
    session.insert(keys::FLASH, flash).await
}

/// Remove and return the pending flash, if any.
///
/// # Errors
///
/// Returns an error if the session cannot be read.
pub async fn take_flash(session: &Session) -> SessionResult<Option<Flash>> {
    session.remove::<Flash>(keys::FLASH).await
}

// =============================================================================
// Pending deletion
// =============================================================================

/// Kind of dashboard record a deletion applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteTarget {
    Product,
    Category,
    Slider,
}

impl DeleteTarget {
    /// Noun used in confirmation and result messages.
    #[must_use]
    pub const fn noun(&self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::Category => "category",
            Self::Slider => "slider image",
        }
    }
}

/// The record the admin asked to delete but has not confirmed yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingDeletion {
    pub target: DeleteTarget,
    pub id: String,
}

/// Mark a record as awaiting confirmation, replacing any earlier one.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_pending_deletion(
    session: &Session,
    pending: &PendingDeletion,
) -> SessionResult<()> {
    session.insert(keys::PENDING_DELETION, pending).await
}

/// Read the pending deletion for `target` without clearing it.
///
/// A pending deletion for another target is ignored.
///
/// # Errors
///
/// Returns an error if the session cannot be read.
pub async fn pending_deletion(
    session: &Session,
    target: DeleteTarget,
) -> SessionResult<Option<PendingDeletion>> {
    Ok(session
        .get::<PendingDeletion>(keys::PENDING_DELETION)
        .await?
        .filter(|p| p.target == target))
}

/// Clear and return the pending deletion for `target`.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn take_pending_deletion(
    session: &Session,
    target: DeleteTarget,
) -> SessionResult<Option<PendingDeletion>> {
    Ok(session
        .remove::<PendingDeletion>(keys::PENDING_DELETION)
        .await?
        .filter(|p| p.target == target))
}

// =============================================================================
// Cart
// =============================================================================

/// Load the cart, or an empty one if none is stored.
///
/// # Errors
///
/// Returns an error if the session cannot be read.
pub async fn load_cart(session: &Session) -> SessionResult<Cart> {
    Ok(session
        .get::<Cart>(keys::CHECKOUT_CART)
        .await?
        .unwrap_or_default())
}

/// Persist the cart.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn save_cart(session: &Session, cart: &Cart) -> SessionResult<()> {
    session.insert(keys::CHECKOUT_CART, cart).await
}

// =============================================================================
// Auth token
// =============================================================================

/// The stored bearer token, if any. Blank tokens count as absent.
///
/// # Errors
///
/// Returns an error if the session cannot be read.
pub async fn token(session: &Session) -> SessionResult<Option<SecretString>> {
    Ok(session
        .get::<String>(keys::TOKEN)
        .await?
        .filter(|t| !t.trim().is_empty())
        .map(SecretString::from))
}

/// Store the bearer token.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_token(session: &Session, token: &str) -> SessionResult<()> {
    session.insert(keys::TOKEN, token).await
}

/// Remove the bearer token (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_token(session: &Session) -> SessionResult<()> {
    session.remove::<String>(keys::TOKEN).await?;
    Ok(())
}
