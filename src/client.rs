//! Harvest API client.
//!
//! Low-level HTTP client that handles authentication and raw requests.
//! Higher-level operations live in [`dispatch`](crate::dispatch) and in the
//! operation traits implemented by the model types.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, ACCEPT};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::classify::classify;
use crate::context::RequestContext;
use crate::error::{HarvestError, Result};
use crate::query;
use crate::rate::Rate;

/// Default API root.
pub const DEFAULT_API_URL: &str = "https://api.harvestapp.com/v2/";

/// Environment variable holding the personal access token.
pub const ACCESS_TOKEN_ENV: &str = "HARVEST_ACCESS_TOKEN";

/// Environment variable holding the Harvest account ID.
pub const ACCOUNT_ID_ENV: &str = "HARVEST_ACCOUNT_ID";

const ACCOUNT_ID_HEADER: &str = "Harvest-Account-Id";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

struct ClientConfig {
    base_url: Url,
    token: String,
    account_id: String,
    user_agent: String,
}

/// Low-level Harvest API client.
///
/// Handles authentication and HTTP requests. Entity-specific operations
/// are implemented via the `Get`, `List`, `Create`, `Update` and `Delete`
/// traits on model types.
///
/// This struct is cheaply cloneable; clones share the connection pool and the
/// immutable configuration.
///
/// # Example
///
/// ```no_run
/// use harvestapi::HarvestClient;
///
/// # fn example() -> harvestapi::Result<()> {
/// // Token and account ID from HARVEST_ACCESS_TOKEN / HARVEST_ACCOUNT_ID
/// let client = HarvestClient::from_env("MyApp (ops@example.com)")?;
///
/// // Or configure manually
/// let client = HarvestClient::new("token", "123456", "MyApp (ops@example.com)")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct HarvestClient {
    http: Client,
    config: Arc<ClientConfig>,
    ctx: RequestContext,
}

impl std::fmt::Debug for HarvestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HarvestClient")
            .field("base_url", &self.config.base_url.as_str())
            .field("account_id", &self.config.account_id)
            .field("user_agent", &self.config.user_agent)
            .finish_non_exhaustive()
    }
}

impl HarvestClient {
    /// Create a client from environment variables.
    ///
    /// Reads `HARVEST_ACCESS_TOKEN` and `HARVEST_ACCOUNT_ID`. The user agent
    /// is mandatory and has the form `"AppName (contact@example.com)"`.
    ///
    /// # Errors
    ///
    /// Returns [`HarvestError::ConfigMissing`] if either variable is unset or
    /// empty, or if `user_agent` is empty.
    pub fn from_env(user_agent: &str) -> Result<Self> {
        let token = read_env(ACCESS_TOKEN_ENV)?;
        let account_id = read_env(ACCOUNT_ID_ENV)?;
        Self::new(&token, &account_id, user_agent)
    }

    /// Create a client against the default API root.
    ///
    /// # Errors
    ///
    /// Returns an error if any argument is empty or the HTTP client cannot be
    /// built (for example, a user agent that is not a valid header value).
    pub fn new(token: &str, account_id: &str, user_agent: &str) -> Result<Self> {
        Self::with_base_url(token, account_id, user_agent, DEFAULT_API_URL)
    }

    /// Create a client against a custom API root.
    ///
    /// # Errors
    ///
    /// Returns an error if any argument is empty, the base URL is invalid, or
    /// the HTTP client cannot be built.
    pub fn with_base_url(
        token: &str,
        account_id: &str,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self> {
        let missing: Vec<&str> = [
            ("access token", token),
            ("account ID", account_id),
            ("user agent", user_agent),
        ]
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();
        if !missing.is_empty() {
            return Err(HarvestError::ConfigMissing(format!(
                "{} must not be empty (user agent format: 'AppName (contact@example.com)')",
                missing.join(", ")
            )));
        }

        // Ensure base URL ends with / so relative paths join beneath it
        let base_url_str = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&base_url_str)?;

        let http = Client::builder()
            .user_agent(user_agent)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(HarvestError::Http)?;

        Ok(Self {
            http,
            config: Arc::new(ClientConfig {
                base_url,
                token: token.to_string(),
                account_id: account_id.to_string(),
                user_agent: user_agent.to_string(),
            }),
            ctx: RequestContext::default(),
        })
    }

    /// A handle bound to `ctx`. Shares the pool and configuration with `self`.
    ///
    /// Every request made through the returned handle is checked against
    /// `ctx` before it is sent.
    #[must_use]
    pub fn with_context(&self, ctx: RequestContext) -> Self {
        Self {
            http: self.http.clone(),
            config: Arc::clone(&self.config),
            ctx,
        }
    }

    /// The context bound to this handle.
    pub fn context(&self) -> &RequestContext {
        &self.ctx
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.config.base_url
    }

    /// The account ID sent with every request.
    pub fn account_id(&self) -> &str {
        &self.config.account_id
    }

    /// The user agent sent with every request.
    pub fn user_agent(&self) -> &str {
        &self.config.user_agent
    }

    /// Resolve `path` (which may carry a query string) against the base URL.
    pub fn url(&self, path: &str) -> Result<Url> {
        Ok(self.config.base_url.join(path)?)
    }

    /// Make a GET request.
    pub async fn get(&self, path: &str) -> Result<RawResponse> {
        let url = self.url(path)?;
        self.execute(Method::GET, url, None::<&()>).await
    }

    /// Make a GET request with `query` encoded into the query string.
    pub async fn get_with_query<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<RawResponse> {
        let mut url = self.url(path)?;
        query::append(&mut url, query)?;
        self.execute(Method::GET, url, None::<&()>).await
    }

    /// Make a POST request with JSON body.
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<RawResponse> {
        let url = self.url(path)?;
        self.execute(Method::POST, url, Some(body)).await
    }

    /// Make a PATCH request, with a JSON body when one is given.
    pub async fn patch<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<RawResponse> {
        let url = self.url(path)?;
        self.execute(Method::PATCH, url, body).await
    }

    /// Make a DELETE request.
    pub async fn delete(&self, path: &str) -> Result<RawResponse> {
        let url = self.url(path)?;
        self.execute(Method::DELETE, url, None::<&()>).await
    }

    /// Send one request and classify the response.
    ///
    /// Attaches the bearer token, account ID, user agent and JSON accept
    /// headers. Non-2xx responses are returned as typed errors.
    #[tracing::instrument(skip_all, fields(method = %method, url = %url))]
    pub async fn execute<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<RawResponse> {
        if let Some(err) = self.ctx.error() {
            return Err(err);
        }

        let mut request = self
            .http
            .request(method.clone(), url.clone())
            .bearer_auth(&self.config.token)
            .header(ACCOUNT_ID_HEADER, self.config.account_id.as_str())
            .header(ACCEPT, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }
        if let Some(remaining) = self.ctx.remaining() {
            request = request.timeout(remaining.min(DEFAULT_TIMEOUT));
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return Err(self.ctx.error().unwrap_or(HarvestError::Http(e))),
        };

        let status = response.status();
        let headers = response.headers().clone();
        let body = match response.bytes().await {
            Ok(bytes) => bytes.to_vec(),
            // The error path reads the body best-effort only
            Err(_) if !status.is_success() => Vec::new(),
            Err(e) => return Err(self.ctx.error().unwrap_or(HarvestError::Http(e))),
        };

        if let Some(err) = classify(&method, &url, status, &headers, &body) {
            return Err(err);
        }

        tracing::trace!(status = status.as_u16(), bytes = body.len(), "response received");
        Ok(RawResponse {
            method,
            url,
            status,
            headers,
            body,
        })
    }
}

fn read_env(name: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(HarvestError::ConfigMissing(format!(
            "{name} environment variable not set"
        ))),
    }
}

/// A successful (2xx) response with its body fully read.
#[derive(Debug, Clone)]
pub struct RawResponse {
    method: Method,
    url: Url,
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl RawResponse {
    /// Decode the body as JSON.
    ///
    /// A 204 or empty body decodes as JSON `null`.
    ///
    /// # Errors
    ///
    /// Returns [`HarvestError::Decode`] if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        let body: &[u8] = if self.status == StatusCode::NO_CONTENT
            || self.body.iter().all(u8::is_ascii_whitespace)
        {
            b"null"
        } else {
            &self.body
        };

        serde_json::from_slice(body).map_err(|source| HarvestError::Decode {
            method: self.method.clone(),
            url: self.url.clone(),
            source,
        })
    }

    /// Rate-limit headers of this response.
    pub fn rate(&self) -> Rate {
        Rate::from_headers(&self.headers)
    }

    /// HTTP status of the response.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Method of the request that produced this response.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// URL the request was sent to.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Raw response body.
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UA: &str = "harvestapi-tests (dev@example.com)";

    #[test]
    fn test_client_debug() {
        let client = HarvestClient::new("test-token", "42", UA).unwrap();
        let debug = format!("{:?}", client);
        assert!(debug.contains("HarvestClient"));
        assert!(debug.contains("base_url"));
        // Token should not be in debug output
        assert!(!debug.contains("test-token"));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client1 =
            HarvestClient::with_base_url("token", "42", UA, "https://api.harvestapp.com/v2").unwrap();
        let client2 =
            HarvestClient::with_base_url("token", "42", UA, "https://api.harvestapp.com/v2/").unwrap();
        assert_eq!(client1.base_url().as_str(), client2.base_url().as_str());
    }

    #[test]
    fn test_missing_configuration_is_rejected() {
        for (token, account, ua) in [("", "42", UA), ("t", "", UA), ("t", "42", " ")] {
            let err = HarvestClient::new(token, account, ua).unwrap_err();
            assert!(matches!(err, HarvestError::ConfigMissing(_)));
        }
    }

    #[test]
    fn test_url_keeps_embedded_query() {
        let client = HarvestClient::new("t", "42", UA).unwrap();
        let url = client.url("projects?is_active=true").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.harvestapp.com/v2/projects?is_active=true"
        );
    }

    #[test]
    fn test_with_context_shares_config() {
        let client = HarvestClient::new("t", "42", UA).unwrap();
        let ctx = RequestContext::new();
        ctx.cancel();
        let scoped = client.with_context(ctx);
        assert!(scoped.context().is_done());
        assert!(!client.context().is_done());
        assert_eq!(scoped.account_id(), "42");
    }

    #[tokio::test]
    async fn test_cancelled_context_sends_nothing() {
        // Unroutable base URL: the request must fail before reaching the network
        let client =
            HarvestClient::with_base_url("t", "42", UA, "http://127.0.0.1:1/v2/").unwrap();
        let ctx = RequestContext::new();
        ctx.cancel();
        let err = client.with_context(ctx).get("company").await.unwrap_err();
        assert!(matches!(err, HarvestError::Cancelled));
    }

    fn raw(status: u16, body: &str) -> RawResponse {
        RawResponse {
            method: Method::GET,
            url: Url::parse("https://api.harvestapp.com/v2/company").unwrap(),
            status: StatusCode::from_u16(status).unwrap(),
            headers: HeaderMap::new(),
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_decode_failure_is_an_error() {
        let err = raw(200, "{not json").json::<serde_json::Value>().unwrap_err();
        assert!(matches!(err, HarvestError::Decode { .. }));
    }

    #[test]
    fn test_no_content_decodes_as_null() {
        assert_eq!(raw(204, "").json::<Option<u32>>().unwrap(), None);
        raw(200, "").json::<()>().unwrap();
    }
}
