//! Billing API client implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode, Url};
use xai_balance_core::{BillingSnapshot, Credentials};

use crate::error::FetchError;
use crate::types::InvoicePreviewResponse;

/// Production management API.
pub const DEFAULT_BASE_URL: &str = "https://management-api.x.ai";

/// Source of billing snapshots.
///
/// Implemented by [`BillingClient`]; the refresh controller depends only on
/// this trait so tests and embedding hosts can supply their own.
#[async_trait]
pub trait BillingApi: Send + Sync {
    /// Fetch the current invoice preview for the team in `credentials`.
    ///
    /// Resolves to a `Result` for every response; no retries.
    async fn fetch(&self, credentials: &Credentials) -> Result<BillingSnapshot, FetchError>;
}

/// HTTP client for the invoice preview endpoint.
#[derive(Debug, Clone)]
pub struct BillingClient {
    client: Client,
    base_url: Url,
}

impl BillingClient {
    /// Create a client with default options.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Configuration`] if `base_url` is not an HTTP(S)
    /// URL, or [`FetchError::Transport`] if the HTTP client cannot be built.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, FetchError> {
        Self::with_options(base_url, ClientOptions::default())
    }

    /// Create a client with custom options.
    ///
    /// # Errors
    ///
    /// Same as [`BillingClient::new`].
    pub fn with_options(base_url: impl AsRef<str>, options: ClientOptions) -> Result<Self, FetchError> {
        let raw = base_url.as_ref().trim_end_matches('/');
        let base_url = Url::parse(raw)
            .map_err(|e| FetchError::Configuration(format!("invalid base URL {raw:?}: {e}")))?;
        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            return Err(FetchError::Configuration(format!(
                "base URL must be http(s), got {raw:?}"
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .user_agent(options.user_agent)
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Full invoice preview URL for a team.
    ///
    /// The team id is encoded as a single path segment.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Configuration`] if the base URL cannot take a path.
    pub fn invoice_preview_url(&self, team_id: &str) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| FetchError::Configuration("base URL cannot take a path".to_string()))?
            .pop_if_empty()
            .extend(["v1", "billing", "teams", team_id, "postpaid", "invoice", "preview"]);
        Ok(url)
    }
}

#[async_trait]
impl BillingApi for BillingClient {
    async fn fetch(&self, credentials: &Credentials) -> Result<BillingSnapshot, FetchError> {
        let url = self.invoice_preview_url(&credentials.team_id)?;
        tracing::debug!(team_id = %credentials.team_id, url = %url, "Fetching invoice preview");

        let response = self
            .client
            .get(url)
            .bearer_auth(&credentials.api_key)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!(status = status.as_u16(), team_id = %credentials.team_id, "Invoice preview request failed");
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let body = response.bytes().await?;
        parse_invoice_preview(&body)
    }
}

/// Parse an invoice preview body.
///
/// # Errors
///
/// Returns [`FetchError::NoBody`] for an empty (or whitespace-only) body and
/// [`FetchError::Decode`] if the JSON does not have the expected shape or
/// names an invalid billing cycle.
pub fn parse_invoice_preview(body: &[u8]) -> Result<BillingSnapshot, FetchError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(FetchError::NoBody);
    }

    let preview: InvoicePreviewResponse = serde_json::from_slice(body).map_err(|e| {
        tracing::warn!(error = %e, "Failed to decode invoice preview");
        FetchError::Decode(e.to_string())
    })?;

    preview
        .into_snapshot()
        .map_err(|e| FetchError::Decode(e.to_string()))
}

/// Client options for customization.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Request timeout in seconds (default: 30).
    pub timeout_seconds: u64,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agent: concat!("xai-balance-menu/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientOptions {
    /// Create options with a request timeout.
    #[must_use]
    pub fn with_timeout(timeout_seconds: u64) -> Self {
        Self {
            timeout_seconds,
            ..Self::default()
        }
    }
}
