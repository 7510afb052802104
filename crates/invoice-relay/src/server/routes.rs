//! HTTP router and shared handler state.

use std::sync::Arc;

use axum::extract::FromRef;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_extra::extract::cookie::Key;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::provider::QuickBooksClient;
use crate::session::SessionStore;

/// Shared state for HTTP handlers.
///
/// Cheap to clone: the provider wraps an `Arc`-backed HTTP client, the session
/// store is already behind an `Arc`, and the cookie key clones its bytes. Held
/// directly (not behind an outer `Arc`) so the foreign `Key` can implement
/// `FromRef` for this local type without tripping the orphan rule.
#[derive(Clone)]
pub struct HttpState {
    /// Provider API client.
    pub provider: QuickBooksClient,

    /// Session store (injectable; in-memory by default).
    pub sessions: Arc<dyn SessionStore>,

    /// Key for the signed session cookie.
    cookie_key: Key,
}

impl FromRef<HttpState> for Key {
    fn from_ref(state: &HttpState) -> Self {
        state.cookie_key.clone()
    }
}

/// Create the HTTP router for the relay.
///
/// `session_secret` keys the signed session cookie and must be at least
/// 32 bytes (enforced at configuration load).
pub fn create_router(
    provider: QuickBooksClient,
    sessions: Arc<dyn SessionStore>,
    session_secret: &str,
) -> Router {
    let state = HttpState {
        provider,
        sessions,
        cookie_key: Key::derive_from(session_secret.as_bytes()),
    };

    Router::new()
        .route("/", get(handlers::handle_landing))
        .route("/health", get(health_check))
        .route("/auth", get(handlers::handle_auth))
        .route("/callback", get(handlers::handle_callback))
        .route("/invoices", get(handlers::handle_list_invoices))
        .route("/invoices/view", get(handlers::handle_view_invoices))
        .route("/invoices/{doc_number}", get(handlers::handle_get_invoice))
        .route("/logout", get(handlers::handle_logout))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "invoice-relay",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
