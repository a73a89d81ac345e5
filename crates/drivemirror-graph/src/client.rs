//! Microsoft Graph API client
//!
//! Provides a typed HTTP client for the Microsoft Graph API. Handles the
//! bearer header, base URL construction, JSON deserialization and the
//! normalization of every non-success status into a [`RemoteError`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use drivemirror_graph::client::GraphClient;
//! use drivemirror_graph::paths::GraphPath;
//!
//! # async fn example() -> Result<(), drivemirror_core::ports::RemoteError> {
//! let client = GraphClient::new("access-token-here");
//! let drive: serde_json::Value = client
//!     .get_json(&GraphPath::new().segment("users").segment("alex@contoso.com").segment("drive"))
//!     .await?;
//! println!("drive id: {}", drive["id"]);
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use drivemirror_core::ports::RemoteError;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::paths::GraphPath;
use crate::throttle::retry_after_from_headers;

/// Base URL for Microsoft Graph API v1.0
pub const GRAPH_BASE_URL: &str = "https://graph.microsoft.com/v1.0";

/// Connection establishment timeout; transfers themselves are not bounded
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// Graph error body
// ============================================================================

/// Error envelope returned by Graph on non-success statuses
#[derive(Debug, Deserialize)]
struct GraphErrorEnvelope {
    error: GraphErrorBody,
}

#[derive(Debug, Deserialize)]
struct GraphErrorBody {
    code: Option<String>,
    message: Option<String>,
}

// ============================================================================
// GraphClient
// ============================================================================

/// HTTP client for Microsoft Graph API calls
///
/// Wraps `reqwest::Client` with the bearer token and base URL. The client
/// never retries; callers decide based on [`RemoteError::is_retryable`].
#[derive(Debug, Clone)]
pub struct GraphClient {
    /// The underlying HTTP client
    client: Client,
    /// Base URL for API requests
    base_url: String,
    /// OAuth2 access token
    access_token: String,
}

impl GraphClient {
    /// Creates a new GraphClient with the given access token
    pub fn new(access_token: impl Into<String>) -> Self {
        Self::with_base_url(access_token, GRAPH_BASE_URL)
    }

    /// Creates a new GraphClient with a custom base URL (useful for testing)
    pub fn with_base_url(access_token: impl Into<String>, base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        }
    }

    /// Returns a reference to the current access token
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Creates an authenticated request builder for a path relative to the base URL
    ///
    /// `path` must already be encoded; build it with [`GraphPath`].
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.request_absolute(method, &url)
    }

    /// Creates an authenticated request builder for an absolute URL
    ///
    /// Used for `@odata.nextLink` continuation URLs.
    pub fn request_absolute(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(&self.access_token)
    }

    /// Sends a request and normalizes any non-success status
    pub async fn send(&self, request: RequestBuilder) -> Result<Response, RemoteError> {
        let response = request.send().await.map_err(network_error)?;
        check_status(response).await
    }

    /// `GET {base}{path}` and deserialize the JSON body
    pub async fn get_json<T: DeserializeOwned>(&self, path: &GraphPath) -> Result<T, RemoteError> {
        self.get_json_at(&format!("{}{}", self.base_url, path)).await
    }

    /// `GET` an absolute URL and deserialize the JSON body
    pub async fn get_json_at<T: DeserializeOwned>(&self, url: &str) -> Result<T, RemoteError> {
        debug!(url, "GET");
        let response = self.send(self.request_absolute(Method::GET, url)).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| RemoteError::InvalidResponse(format!("{url}: {e}")))
    }
}

/// Maps a transport-level failure
pub(crate) fn network_error(err: reqwest::Error) -> RemoteError {
    if err.is_decode() {
        RemoteError::InvalidResponse(err.to_string())
    } else {
        RemoteError::Network(err.to_string())
    }
}

/// Passes successful responses through and classifies the rest
///
/// The error message is taken from the Graph error envelope when present.
pub(crate) async fn check_status(response: Response) -> Result<Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let retry_after = retry_after_from_headers(response.headers());
    let url = response.url().path().to_string();
    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<GraphErrorEnvelope>(&body)
        .ok()
        .map(|envelope| match (envelope.error.code, envelope.error.message) {
            (Some(code), Some(message)) => format!("{code}: {message}"),
            (Some(code), None) => code,
            (None, Some(message)) => message,
            (None, None) => String::new(),
        })
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string()
        });

    debug!(status = status.as_u16(), url, detail, "Graph request failed");
    Err(RemoteError::from_status(
        status.as_u16(),
        retry_after,
        format!("{url}: {detail}"),
    ))
}
