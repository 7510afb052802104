//! Server-side session storage.
//!
//! One record per browser session, keyed by the opaque id carried in the
//! signed session cookie. The store is an explicit, injectable seam so tests
//! and alternative backends can swap the in-memory map out.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::models::Invoice;

/// Tokens obtained from a successful code exchange, bound to one remote
/// company. Immutable once created; replaced wholesale on re-authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialBundle {
    /// Bearer credential for resource API calls.
    pub access_token: String,

    /// Long-lived credential for re-issuing access tokens (stored, unused).
    pub refresh_token: String,

    /// Remote company id the tokens are scoped to.
    pub realm_id: String,
}

impl std::fmt::Debug for CredentialBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialBundle").field("realm_id", &self.realm_id).finish()
    }
}

/// State held for one browser session.
#[derive(Debug, Clone, Default)]
pub struct SessionRecord {
    /// CSRF state token set by the initiate step, consumed by the callback.
    pub pending_state: Option<String>,

    /// Credentials from the last successful exchange, if any.
    pub credentials: Option<CredentialBundle>,

    /// Last invoice collection fetched by the list endpoint. Overwritten on
    /// every fetch, destroyed with the session.
    pub invoices: Option<Vec<Invoice>>,
}

/// Keyed session storage.
///
/// Backends must be safe for concurrent use; distinct session ids never
/// contend. `delete` on a missing id is a no-op so logout stays idempotent.
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    /// Look up a session record by id.
    async fn get(&self, id: &str) -> Result<Option<SessionRecord>, StoreError>;

    /// Insert or replace a session record.
    async fn put(&self, id: &str, record: SessionRecord) -> Result<(), StoreError>;

    /// Destroy a session record.
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}

/// In-memory session store.
#[derive(Clone, Default)]
pub struct MemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionRecord>>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live sessions (for monitoring).
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait::async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, id: &str) -> Result<Option<SessionRecord>, StoreError> {
        Ok(self.sessions.read().await.get(id).cloned())
    }

    async fn put(&self, id: &str, record: SessionRecord) -> Result<(), StoreError> {
        self.sessions.write().await.insert(id.to_owned(), record);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        if self.sessions.write().await.remove(id).is_some() {
            tracing::info!(session_id = %id, "Destroyed session");
        }
        Ok(())
    }
}

impl std::fmt::Debug for MemorySessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemorySessionStore").finish()
    }
}

/// Generate a random 256-bit token from two UUIDv4s.
///
/// UUIDv4 draws from the OS CSPRNG, which makes these suitable for both
/// session ids and CSRF state values.
fn generate_token() -> String {
    format!("{}{}", uuid::Uuid::new_v4().simple(), uuid::Uuid::new_v4().simple())
}

/// Generate a fresh opaque session id.
#[must_use]
pub fn new_session_id() -> String {
    generate_token()
}

/// Generate a fresh CSRF state token.
#[must_use]
pub fn new_state_token() -> String {
    generate_token()
}
