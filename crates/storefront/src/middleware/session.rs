//! Session middleware configuration.
//!
//! Sessions live in a bounded moka cache. The backend owns all durable
//! data, so a restart only logs admins out and empties carts.

use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_moka_store::MokaStore;

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "feriwala_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Most sessions held at once. The least recently used are evicted past this.
const SESSION_CAPACITY: u64 = 50_000;

/// Create the session store. Expired records are dropped by the cache.
#[must_use]
pub fn create_session_store() -> MokaStore {
    MokaStore::new(Some(SESSION_CAPACITY))
}

/// Create the session layer over a bounded in-memory store.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MokaStore> {
    SessionManagerLayer::new(create_session_store())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use tower_sessions::cookie::time::{Duration, OffsetDateTime};
    use tower_sessions::session::{Id, Record};
    use tower_sessions::SessionStore;

    use super::*;

    fn record(expiry_date: OffsetDateTime) -> Record {
        let mut data = HashMap::new();
        data.insert("cart".to_string(), serde_json::json!({ "items": [] }));
        Record {
            id: Id::default(),
            data,
            expiry_date,
        }
    }

    #[tokio::test]
    async fn test_store_keeps_live_sessions() {
        let store = create_session_store();
        let live = record(OffsetDateTime::now_utc() + Duration::hours(1));
        store.save(&live).await.unwrap();

        let loaded = store.load(&live.id).await.unwrap().unwrap();
        assert!(loaded.data.contains_key("cart"));
    }

    #[tokio::test]
    async fn test_store_sessions_are_independent() {
        let store = create_session_store();
        let first = record(OffsetDateTime::now_utc() + Duration::hours(1));
        let second = record(OffsetDateTime::now_utc() + Duration::hours(1));
        store.save(&first).await.unwrap();

        assert!(store.load(&second.id).await.unwrap().is_none());
        assert!(store.load(&first.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_store_delete() {
        let store = create_session_store();
        let live = record(OffsetDateTime::now_utc() + Duration::hours(1));
        store.save(&live).await.unwrap();
        store.delete(&live.id).await.unwrap();

        assert!(store.load(&live.id).await.unwrap().is_none());
    }
}
