//! QuickBooks Online API client.
//!
//! Covers the three provider interactions the relay needs: building the
//! browser authorization URL, exchanging an authorization code for tokens,
//! and querying the invoice collection of one company. Every call is a
//! single bounded-timeout attempt; failures are terminal for the request.

use reqwest::Client;
use url::Url;

use crate::config::{Config, api};
use crate::error::{ProviderError, ProviderResult};
use crate::models::{Invoice, QueryEnvelope};

/// Tokens issued by the provider token endpoint.
#[derive(Debug, serde::Deserialize)]
pub struct TokenGrant {
    /// Bearer credential for resource API calls.
    pub access_token: String,

    /// Long-lived credential for future re-issuance.
    pub refresh_token: String,
}

/// QuickBooks Online API client.
#[derive(Clone)]
pub struct QuickBooksClient {
    /// HTTP client with bounded timeouts.
    http: Client,

    /// OAuth client id.
    client_id: String,

    /// OAuth client secret.
    client_secret: String,

    /// Redirect URL registered with the provider.
    redirect_url: String,

    /// Authorization endpoint.
    authorize_endpoint: Url,

    /// Token endpoint.
    token_endpoint: String,

    /// Accounting API base URL.
    api_base_url: String,
}

impl QuickBooksClient {
    /// Create a new client from the relay configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if HTTP client initialization fails or the
    /// configured authorization endpoint is not a valid URL.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .gzip(true)
            .build()?;

        let authorize_endpoint = Url::parse(&config.authorize_endpoint)?;

        Ok(Self {
            http,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_url: config.redirect_url.clone(),
            authorize_endpoint,
            token_endpoint: config.token_endpoint.clone(),
            api_base_url: config.api_base_url.clone(),
        })
    }

    /// Build the authorization URL embedding the given CSRF state token.
    #[must_use]
    pub fn authorize_url(&self, state: &str) -> String {
        let mut url = self.authorize_endpoint.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("client_id", &self.client_id);
            query.append_pair("redirect_uri", &self.redirect_url);
            query.append_pair("response_type", "code");
            query.append_pair("scope", api::SCOPES);
            query.append_pair("state", state);
        }
        url.to_string()
    }

    /// Exchange an authorization code for tokens at the token endpoint.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, a non-success provider status
    /// (expired or reused code included), or an unparseable response.
    pub async fn exchange_code(&self, code: &str) -> ProviderResult<TokenGrant> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", &self.redirect_url),
        ];

        let response = self
            .http
            .post(&self.token_endpoint)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&params)
            .send()
            .await?;

        let response = Self::handle_response(response).await?;
        let value: serde_json::Value = response.json().await?;

        serde_json::from_value(value).map_err(ProviderError::from)
    }

    /// Fetch the full invoice collection for one company.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, a non-success provider status
    /// (expired access token included), or an unparseable envelope.
    pub async fn query_invoices(
        &self,
        access_token: &str,
        realm_id: &str,
    ) -> ProviderResult<Vec<Invoice>> {
        let url = format!("{}/v3/company/{}/query", self.api_base_url, realm_id);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&[("query", api::INVOICE_QUERY), ("minorversion", api::MINOR_VERSION)])
            .send()
            .await?;

        let response = Self::handle_response(response).await?;
        let value: serde_json::Value = response.json().await?;
        let envelope: QueryEnvelope = serde_json::from_value(value)?;

        Ok(envelope.query_response.invoices)
    }

    /// Capture non-success responses with their body for server-side logging.
    async fn handle_response(response: reqwest::Response) -> ProviderResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ProviderError::status(status.as_u16(), body))
    }
}

impl std::fmt::Debug for QuickBooksClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuickBooksClient")
            .field("client_id", &self.client_id)
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}
