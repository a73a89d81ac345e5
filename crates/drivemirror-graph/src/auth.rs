//! App-only authentication for Microsoft Graph
//!
//! A run authenticates once, before any task starts, using the OAuth2
//! client-credentials grant against the tenant's v2.0 token endpoint. A
//! pre-issued token in `DRIVEMIRROR_ACCESS_TOKEN` short-circuits the grant.
//!
//! Failures are reported as [`RemoteError::AuthFailed`] and are never retried.

use chrono::{DateTime, Duration, Utc};
use oauth2::{
    basic::BasicClient, AuthType, ClientId, ClientSecret, EndpointNotSet, EndpointSet, Scope,
    TokenResponse, TokenUrl,
};
use tracing::{debug, info};

use drivemirror_core::config::AuthConfig;
use drivemirror_core::ports::RemoteError;

/// Scope requesting every application permission granted to the app
pub const GRAPH_DEFAULT_SCOPE: &str = "https://graph.microsoft.com/.default";

/// Environment variable carrying a pre-issued bearer token
pub const ACCESS_TOKEN_ENV: &str = "DRIVEMIRROR_ACCESS_TOKEN";

/// A bearer token for Graph requests
#[derive(Clone)]
pub struct AccessToken {
    pub secret: String,
    /// Unknown for tokens supplied through the environment
    pub expires_at: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("secret", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Client-credentials grant against the Microsoft identity platform
pub struct ClientCredentialsFlow {
    client: BasicClient<EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>,
    http: reqwest::Client,
}

impl ClientCredentialsFlow {
    /// Creates the flow for `{authority_host}/{tenant_id}/oauth2/v2.0/token`
    pub fn new(
        authority_host: &str,
        tenant_id: &str,
        client_id: &str,
        client_secret: &str,
    ) -> Result<Self, RemoteError> {
        let token_url = format!(
            "{}/{}/oauth2/v2.0/token",
            authority_host.trim_end_matches('/'),
            tenant_id
        );
        let token_url = TokenUrl::new(token_url)
            .map_err(|e| RemoteError::AuthFailed(format!("invalid token URL: {e}")))?;

        let client = BasicClient::new(ClientId::new(client_id.to_string()))
            .set_client_secret(ClientSecret::new(client_secret.to_string()))
            .set_token_uri(token_url)
            .set_auth_type(AuthType::RequestBody);

        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| RemoteError::AuthFailed(format!("HTTP client: {e}")))?;

        Ok(Self { client, http })
    }

    /// Requests a token for [`GRAPH_DEFAULT_SCOPE`]
    pub async fn acquire(&self) -> Result<AccessToken, RemoteError> {
        debug!("Requesting app-only token");

        let token = self
            .client
            .exchange_client_credentials()
            .add_scope(Scope::new(GRAPH_DEFAULT_SCOPE.to_string()))
            .request_async(&self.http)
            .await
            .map_err(|e| match e {
                oauth2::RequestTokenError::ServerResponse(response) => {
                    RemoteError::AuthFailed(response.to_string())
                }
                other => RemoteError::AuthFailed(other.to_string()),
            })?;

        let expires_at = token
            .expires_in()
            .map(|d| Utc::now() + Duration::seconds(d.as_secs() as i64));

        Ok(AccessToken {
            secret: token.access_token().secret().clone(),
            expires_at,
        })
    }
}

/// Obtains the run's access token
///
/// Order of precedence:
/// 1. `DRIVEMIRROR_ACCESS_TOKEN`, when set and non-empty
/// 2. Client credentials from `auth.tenant_id`, `auth.client_id` and the
///    secret in the environment variable named by `auth.client_secret_env`
///
/// `env` looks up environment variables; pass `|k| std::env::var(k).ok()`.
pub async fn acquire_access_token<F>(auth: &AuthConfig, env: F) -> Result<AccessToken, RemoteError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(token) = env(ACCESS_TOKEN_ENV).filter(|t| !t.trim().is_empty()) {
        info!("Using access token from {ACCESS_TOKEN_ENV}");
        return Ok(AccessToken {
            secret: token.trim().to_string(),
            expires_at: None,
        });
    }

    let tenant_id = auth
        .tenant_id
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| RemoteError::AuthFailed("auth.tenant_id is not configured".into()))?;
    let client_id = auth
        .client_id
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| RemoteError::AuthFailed("auth.client_id is not configured".into()))?;
    let secret = env(&auth.client_secret_env)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            RemoteError::AuthFailed(format!(
                "client secret not found in ${}",
                auth.client_secret_env
            ))
        })?;

    let flow = ClientCredentialsFlow::new(&auth.authority_host, tenant_id, client_id, &secret)?;
    let token = flow.acquire().await?;
    info!(tenant = tenant_id, expires_at = ?token.expires_at, "Acquired app-only token");
    Ok(token)
}
