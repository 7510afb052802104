//! Error types for the invoice relay.
//!
//! Uses `thiserror` for structured error handling. Provider error bodies are
//! logged server-side only; clients receive a generic status-coded message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors from the provider HTTP layer (token endpoint and accounting API).
#[derive(thiserror::Error, Debug)]
pub enum ProviderError {
    /// HTTP transport error (connection, DNS, TLS, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status from the provider, with the response body captured
    /// for server-side logging.
    #[error("provider returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body or message.
        body: String,
    },

    /// JSON parsing error.
    #[error("failed to parse provider response: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ProviderError {
    /// Create a status error from a provider response.
    #[must_use]
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status { status, body: body.into() }
    }
}

/// Errors from a session store backend.
///
/// The in-memory store never fails; the variant exists so swappable backends
/// (an external cache, say) can surface their failures through the same seam.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// Backend failure (connection loss, serialization, ...).
    #[error("session store failure: {0}")]
    Backend(String),
}

/// Errors from the authorization flow and invoice endpoints.
#[derive(thiserror::Error, Debug)]
pub enum RelayError {
    /// Callback state does not match the session's pending state.
    #[error("callback state does not match session state")]
    StateMismatch,

    /// The provider token endpoint rejected the code exchange.
    #[error("token exchange failed: {0}")]
    TokenExchange(#[source] ProviderError),

    /// The session has no credentials.
    #[error("session has no credentials")]
    Unauthenticated,

    /// The provider resource API call failed.
    #[error("invoice fetch failed: {0}")]
    ResourceFetch(#[source] ProviderError),

    /// No invoice matched the requested document number.
    #[error("no invoice with document number {doc_number}")]
    InvoiceNotFound {
        /// The document number that was looked up.
        doc_number: String,
    },

    /// The session store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RelayError {
    /// HTTP status this error maps to.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::StateMismatch => StatusCode::FORBIDDEN,
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::InvoiceNotFound { .. } => StatusCode::NOT_FOUND,
            Self::TokenExchange(_) | Self::ResourceFetch(_) | Self::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Generic message returned to the client.
    ///
    /// Never includes provider error bodies; those go to the server log only.
    #[must_use]
    pub const fn client_message(&self) -> &'static str {
        match self {
            Self::StateMismatch => "State does not match. Possible CSRF attack.",
            Self::TokenExchange(_) => "Error exchanging code for token",
            Self::Unauthenticated => "Unauthorized",
            Self::ResourceFetch(_) => "Error fetching invoices",
            Self::InvoiceNotFound { .. } => "Invoice not found",
            Self::Store(_) => "Session store error",
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        match &self {
            Self::TokenExchange(source) => {
                tracing::error!(error = %source, "Token exchange failed");
            }
            Self::ResourceFetch(source) => {
                tracing::error!(error = %source, "Invoice fetch failed");
            }
            Self::Store(source) => {
                tracing::error!(error = %source, "Session store failed");
            }
            Self::StateMismatch => {
                tracing::warn!("Rejected callback with mismatched state");
            }
            Self::Unauthenticated | Self::InvoiceNotFound { .. } => {
                tracing::debug!(error = %self, "Request rejected");
            }
        }

        (self.status_code(), self.client_message()).into_response()
    }
}

/// Result type alias for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Result type alias for relay operations.
pub type RelayResult<T> = Result<T, RelayError>;
