//! Handlers for the authorization flow and invoice endpoints.
//!
//! Three state-machine transitions over a session (initiate, callback/
//! exchange, authenticated fetch) plus logout and the rendered invoice
//! view. The CSRF check in the callback always runs before any network
//! call, and a failed post-exchange fetch never rolls back persisted
//! credentials.


use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse};
use axum::Json;
use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};
use serde::Deserialize;

use super::pages;
use super::routes::HttpState;
use crate::config::SESSION_COOKIE;
use crate::error::{RelayError, RelayResult};
use crate::models::Invoice;
use crate::session::{self, CredentialBundle, SessionRecord};

/// Query parameters the provider sends to the callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    /// Authorization code to exchange.
    pub code: String,

    /// Echoed CSRF state token.
    pub state: String,

    /// Company id the user granted access to.
    #[serde(rename = "realmId")]
    pub realm_id: String,
}

// ─── Initiate ────────────────────────────────────────────────────────────────

/// `GET /auth`
///
/// Store a fresh CSRF state token on the session and redirect the browser
/// to the provider's authorization endpoint.
pub async fn handle_auth(
    State(state): State<HttpState>,
    jar: SignedCookieJar,
) -> RelayResult<impl IntoResponse> {
    let session_id = jar
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_owned())
        .unwrap_or_else(session::new_session_id);

    let mut record = state.sessions.get(&session_id).await?.unwrap_or_default();

    let state_token = session::new_state_token();
    record.pending_state = Some(state_token.clone());
    state.sessions.put(&session_id, record).await?;

    let authorize_url = state.provider.authorize_url(&state_token);

    tracing::info!(session_id = %session_id, "Starting authorization flow");

    let jar = jar.add(session_cookie(session_id));
    Ok((jar, (StatusCode::FOUND, [(header::LOCATION, authorize_url)])))
}

// ─── Callback / exchange ─────────────────────────────────────────────────────

/// `GET /callback`
///
/// Validate the echoed state against the session, exchange the code for
/// tokens, persist them, and return the first invoice fetch as the body.
pub async fn handle_callback(
    State(state): State<HttpState>,
    jar: SignedCookieJar,
    Query(query): Query<CallbackQuery>,
) -> RelayResult<Json<Vec<Invoice>>> {
    // CSRF binding: no session or stale state means the callback cannot be
    // tied to an initiate we issued. Checked before any network call.
    let session_id = session_id(&jar).ok_or(RelayError::StateMismatch)?;
    let mut record =
        state.sessions.get(&session_id).await?.ok_or(RelayError::StateMismatch)?;

    if record.pending_state.as_deref() != Some(query.state.as_str()) {
        return Err(RelayError::StateMismatch);
    }

    let grant =
        state.provider.exchange_code(&query.code).await.map_err(RelayError::TokenExchange)?;

    let credentials = CredentialBundle {
        access_token: grant.access_token,
        refresh_token: grant.refresh_token,
        realm_id: query.realm_id,
    };
    let realm_id = credentials.realm_id.clone();
    let access_token = credentials.access_token.clone();

    // The state token is single-use; clear it in the same write that
    // persists the credentials.
    record.pending_state = None;
    record.credentials = Some(credentials);
    state.sessions.put(&session_id, record).await?;

    tracing::info!(session_id = %session_id, realm_id = %realm_id, "Exchanged authorization code");

    // Illustrative first fetch. Credentials stay persisted even if this
    // fails; the user is logged in either way.
    let invoices = state
        .provider
        .query_invoices(&access_token, &realm_id)
        .await
        .map_err(RelayError::ResourceFetch)?;

    Ok(Json(invoices))
}

// ─── Authenticated fetch ─────────────────────────────────────────────────────

/// `GET /invoices`
///
/// Fetch the full invoice collection and store it on the session.
pub async fn handle_list_invoices(
    State(state): State<HttpState>,
    jar: SignedCookieJar,
) -> RelayResult<Json<Vec<Invoice>>> {
    let (session_id, mut record, credentials) = authenticated_session(&state, &jar).await?;

    let invoices = state
        .provider
        .query_invoices(&credentials.access_token, &credentials.realm_id)
        .await
        .map_err(RelayError::ResourceFetch)?;

    record.invoices = Some(invoices.clone());
    state.sessions.put(&session_id, record).await?;

    Ok(Json(invoices))
}

/// `GET /invoices/{doc_number}`
///
/// Fetch the collection and return the first record whose document number
/// matches the path parameter exactly.
pub async fn handle_get_invoice(
    State(state): State<HttpState>,
    jar: SignedCookieJar,
    Path(doc_number): Path<String>,
) -> RelayResult<Json<Invoice>> {
    let (_, _, credentials) = authenticated_session(&state, &jar).await?;

    let invoices = state
        .provider
        .query_invoices(&credentials.access_token, &credentials.realm_id)
        .await
        .map_err(RelayError::ResourceFetch)?;

    let invoice = invoices
        .into_iter()
        .find(|invoice| invoice.matches_doc_number(&doc_number))
        .ok_or(RelayError::InvoiceNotFound { doc_number })?;

    Ok(Json(invoice))
}

/// `GET /invoices/view`
///
/// Fetch the collection and render it as an HTML table.
pub async fn handle_view_invoices(
    State(state): State<HttpState>,
    jar: SignedCookieJar,
) -> RelayResult<Html<String>> {
    let (_, _, credentials) = authenticated_session(&state, &jar).await?;

    let invoices = state
        .provider
        .query_invoices(&credentials.access_token, &credentials.realm_id)
        .await
        .map_err(RelayError::ResourceFetch)?;

    Ok(Html(pages::render_invoices_page(&invoices)))
}

// ─── Logout ──────────────────────────────────────────────────────────────────

/// `GET /logout`
///
/// Destroy the session record, remove the cookie, and redirect to the
/// landing page. Safe to call repeatedly; a store failure surfaces as 500
/// rather than redirecting from a possibly-authenticated state.
pub async fn handle_logout(
    State(state): State<HttpState>,
    jar: SignedCookieJar,
) -> RelayResult<impl IntoResponse> {
    if let Some(session_id) = session_id(&jar) {
        state.sessions.delete(&session_id).await?;
    }

    // The removal cookie must carry the same path the session cookie was
    // set with, or browsers keep the original alive.
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/").build());
    Ok((jar, (StatusCode::FOUND, [(header::LOCATION, "/")])))
}

// ─── Landing ─────────────────────────────────────────────────────────────────

/// `GET /`
pub async fn handle_landing() -> Html<String> {
    Html(pages::render_landing_page())
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Session id from the signed cookie, if present and validly signed.
fn session_id(jar: &SignedCookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE).map(|cookie| cookie.value().to_owned())
}

/// Build the session cookie.
fn session_cookie(session_id: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, session_id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Load the caller's session and require credentials on it.
///
/// Fails with `Unauthenticated` before any network call when the cookie,
/// the record, or the credentials are missing.
async fn authenticated_session(
    state: &HttpState,
    jar: &SignedCookieJar,
) -> RelayResult<(String, SessionRecord, CredentialBundle)> {
    let Some(session_id) = session_id(jar) else {
        return Err(RelayError::Unauthenticated);
    };
    let Some(record) = state.sessions.get(&session_id).await? else {
        return Err(RelayError::Unauthenticated);
    };
    let Some(credentials) = record.credentials.clone() else {
        return Err(RelayError::Unauthenticated);
    };

    Ok((session_id, record, credentials))
}
