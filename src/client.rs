//! Remote fetch client for the rendering/anti-bot proxy service
//!
//! The client issues one HTTPS request per call to a hosted proxy that
//! renders the target page, applies anti-bot measures, and optionally runs
//! server-side CSS extraction. The client itself holds no mutable state
//! beyond its credentials and is safe for unbounded concurrent reuse.
//!
//! There is no automatic retry: the error taxonomy exposes enough context
//! (status code, transport versus service failure) for callers to implement
//! their own policy. The caller-supplied timeout is the sole cancellation
//! point; when it expires the in-flight request is dropped and cancelled.
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```ignore
//! use std::time::Duration;
//! use renderfetch::{FetchClient, FetchRequest, ProxyTier, compile};
//!
//! let client = FetchClient::builder()
//!     .api_key(std::env::var("PROXY_API_KEY")?)
//!     .build()?;
//!
//! let schema = compile::<ListingPage>()?;
//! let request = FetchRequest::new("https://example.com/listings")
//!     .js_render(true)
//!     .proxy_tier(ProxyTier::Premium)
//!     .proxy_country("us")
//!     .wait(Duration::from_secs(30))
//!     .extraction_schema(schema);
//!
//! let result = client.fetch(request, Duration::from_secs(120)).await?;
//! println!("status {} after {:?}", result.status, result.elapsed);
//! ```
//!
//! ## Custom Parameters
//!
//! Service-specific knobs such as anti-bot hints or session pinning ride
//! through as opaque key-value pairs:
//!
//! ```ignore
//! let request = FetchRequest::new(url)
//!     .custom_param("antibot", "true")
//!     .custom_param("session_id", "12345");
//! ```

use std::{
    collections::BTreeMap,
    sync::Arc,
    time::{Duration, Instant},
};

use bytes::Bytes;
use reqwest::Url;
use serde::Deserialize;

use crate::schema::ExtractionSchema;

/// Default endpoint of the hosted rendering/proxy service
pub const DEFAULT_ENDPOINT: &str = "https://api.zenrows.com/v1/";

/// How many body bytes an excerpt keeps for diagnostics
const EXCERPT_LEN: usize = 500;

/// Errors that can occur when constructing a fetch client
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The API key is missing or empty
    #[error("API key must not be empty")]
    MissingApiKey,

    /// The endpoint override is not a valid URL
    #[error("Invalid endpoint URL '{endpoint}': {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    /// The underlying HTTP client could not be constructed
    #[error("Failed to construct HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Errors that can occur during a fetch
///
/// Each variant maps to a different caller policy: `InvalidUrl` is a caller
/// bug, `Transport` and `Timeout` are retryable, and `Service` is retryable
/// only if the caller believes the remote failure is transient.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The target URL failed syntactic validation before any network I/O
    #[error("Invalid target URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// DNS, connection, or TLS failure before a usable response arrived
    #[error("Transport failure for '{url}': {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The caller-supplied deadline expired; the in-flight request was dropped
    #[error("Request timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    /// The remote service responded but reported failure
    ///
    /// Carries the HTTP status and the service's own error payload when it
    /// could be parsed, otherwise a body excerpt.
    #[error("Service reported failure (status {status}): {message}")]
    Service { status: u16, message: String },
}

/// Proxy tier requested from the remote service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProxyTier {
    /// Datacenter proxy pool
    #[default]
    Standard,
    /// Residential proxy pool
    Premium,
}

/// Everything needed for one fetch through the proxy
///
/// Owned by the caller and passed by value to [`FetchClient::fetch`]. The
/// extraction schema is shared via `Arc` so one compiled schema can back any
/// number of concurrent requests.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    target_url: String,
    js_render: bool,
    proxy_tier: ProxyTier,
    proxy_country: Option<String>,
    wait: Duration,
    schema: Option<Arc<ExtractionSchema>>,
    custom_params: BTreeMap<String, String>,
}

impl FetchRequest {
    /// Create a request for the given target URL with defaults
    ///
    /// Defaults: no rendering, standard proxies, no country pinning, no
    /// post-render wait, no extraction schema (the raw body is returned).
    pub fn new(target_url: impl Into<String>) -> Self {
        Self {
            target_url: target_url.into(),
            js_render: false,
            proxy_tier: ProxyTier::Standard,
            proxy_country: None,
            wait: Duration::ZERO,
            schema: None,
            custom_params: BTreeMap::new(),
        }
    }

    /// Render the page's scripts before extraction (default: false)
    pub fn js_render(mut self, enabled: bool) -> Self {
        self.js_render = enabled;
        self
    }

    /// Select the proxy tier (default: standard)
    pub fn proxy_tier(mut self, tier: ProxyTier) -> Self {
        self.proxy_tier = tier;
        self
    }

    /// Pin the proxy exit to a country
    ///
    /// The code is passed through verbatim; the remote service validates it.
    pub fn proxy_country(mut self, code: impl Into<String>) -> Self {
        self.proxy_country = Some(code.into());
        self
    }

    /// Wait after rendering before the page is read (default: zero)
    pub fn wait(mut self, wait: Duration) -> Self {
        self.wait = wait;
        self
    }

    /// Attach an extraction schema
    ///
    /// With a schema the service returns extracted JSON instead of raw HTML.
    /// Rendering should normally be enabled alongside a schema so selectors
    /// see the rendered document; this is policy, not enforced.
    pub fn extraction_schema(mut self, schema: Arc<ExtractionSchema>) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Add an opaque service-specific parameter (e.g. an anti-bot hint or a
    /// session-pinning id)
    pub fn custom_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_params.insert(key.into(), value.into());
        self
    }

    /// The target URL this request will fetch
    pub fn target_url(&self) -> &str {
        &self.target_url
    }

    /// The extraction schema attached to this request, if any
    pub fn schema(&self) -> Option<&Arc<ExtractionSchema>> {
        self.schema.as_ref()
    }
}

/// Error payload the remote service embeds in failure responses
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceError {
    /// Service-assigned error code
    pub code: String,
    /// Short human-readable summary
    #[serde(default)]
    pub title: Option<String>,
    /// Longer diagnostic text
    #[serde(default)]
    pub detail: Option<String>,
}

impl ServiceError {
    /// Parse a service error payload out of a response body
    ///
    /// Requires the service's error shape (a JSON object with at least a
    /// `code` and a `detail` field) so that extraction output which happens
    /// to contain a `code` key is not misread as a failure.
    fn from_body(body: &[u8]) -> Option<Self> {
        let parsed: ServiceError = serde_json::from_slice(body).ok()?;
        parsed.detail.is_some().then_some(parsed)
    }

    /// One-line description for logs and error messages
    pub fn message(&self) -> String {
        match (&self.title, &self.detail) {
            (Some(title), Some(detail)) => format!("{} ({}): {}", title, self.code, detail),
            (Some(title), None) => format!("{} ({})", title, self.code),
            (None, Some(detail)) => format!("{}: {}", self.code, detail),
            (None, None) => self.code.clone(),
        }
    }
}

/// Outcome of one fetch that produced an HTTP response
///
/// Produced exactly once per request; immutable after construction. A
/// successful status does not imply usable content — challenge pages arrive
/// with HTTP 200. Classifying content is the inspector's job, not the
/// client's.
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// HTTP status code of the proxy's response
    pub status: u16,
    /// Raw response body
    pub body: Bytes,
    /// Error payload the service embedded despite a successful status
    pub service_error: Option<ServiceError>,
    /// Wall-clock time from dispatch to fully-read body
    pub elapsed: Duration,
}

impl FetchResult {
    /// Whether the HTTP status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The body as text, with invalid UTF-8 replaced
    pub fn body_text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// A bounded excerpt of the body for diagnostics
    pub fn excerpt(&self) -> String {
        let text = self.body_text();
        if text.len() <= EXCERPT_LEN {
            return text.into_owned();
        }
        let mut end = EXCERPT_LEN;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        text[..end].to_string()
    }
}

/// Client for the remote rendering/extraction proxy
///
/// Credentials are supplied once at construction and attached to every
/// request. The client holds no other mutable state; `fetch` takes `&self`
/// and may be called from any number of tasks concurrently.
pub struct FetchClient {
    http: reqwest::Client,
    endpoint: Url,
    api_key: String,
}

impl FetchClient {
    /// Create a builder for configuring a client
    pub fn builder() -> FetchClientBuilder {
        FetchClientBuilder::default()
    }

    /// Fetch one page through the proxy
    ///
    /// Issues a single request carrying the rendering and proxy options plus
    /// the serialized extraction schema, if any. The `timeout` covers the
    /// whole call, including reading the body; when it expires the request
    /// future is dropped, which cancels the in-flight request.
    ///
    /// # Errors
    ///
    /// - [`FetchError::InvalidUrl`] before any network I/O
    /// - [`FetchError::Transport`] for DNS/connect/TLS/read failures
    /// - [`FetchError::Timeout`] when the deadline expires
    /// - [`FetchError::Service`] when the proxy responds non-2xx
    pub async fn fetch(
        &self,
        request: FetchRequest,
        timeout: Duration,
    ) -> Result<FetchResult, FetchError> {
        let target =
            Url::parse(&request.target_url).map_err(|source| FetchError::InvalidUrl {
                url: request.target_url.clone(),
                source,
            })?;

        if request.schema.is_some() && !request.js_render {
            tracing::warn!(
                url = %target,
                "extraction schema attached without JS rendering; selectors may not apply"
            );
        }

        let query = self.build_query(&request, &target);

        tracing::debug!(
            url = %target,
            timeout_ms = timeout.as_millis() as u64,
            extraction = request.schema.is_some(),
            "dispatching fetch"
        );

        let started = Instant::now();
        let exchange = async {
            let response = self
                .http
                .get(self.endpoint.clone())
                .query(&query)
                .send()
                .await?;
            let status = response.status().as_u16();
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>((status, body))
        };

        let (status, body) = match tokio::time::timeout(timeout, exchange).await {
            Ok(Ok(pair)) => pair,
            Ok(Err(source)) => {
                tracing::debug!(url = %target, error = %source, "transport failure");
                return Err(FetchError::Transport {
                    url: target.to_string(),
                    source,
                });
            }
            Err(_) => {
                tracing::warn!(url = %target, timeout_ms = timeout.as_millis() as u64, "fetch timed out");
                return Err(FetchError::Timeout { timeout });
            }
        };
        let elapsed = started.elapsed();

        if !(200..300).contains(&status) {
            let message = match ServiceError::from_body(&body) {
                Some(error) => error.message(),
                None => String::from_utf8_lossy(&body[..body.len().min(EXCERPT_LEN)]).into_owned(),
            };
            tracing::debug!(url = %target, status, %message, "service reported failure");
            return Err(FetchError::Service { status, message });
        }

        // A 2xx body can still carry the service's error shape; surface it
        // for the inspector instead of failing the fetch.
        let service_error = ServiceError::from_body(&body);

        tracing::debug!(
            url = %target,
            status,
            bytes = body.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "fetch complete"
        );

        Ok(FetchResult {
            status,
            body,
            service_error,
            elapsed,
        })
    }

    /// Assemble the query pairs the remote service expects
    fn build_query(&self, request: &FetchRequest, target: &Url) -> Vec<(String, String)> {
        let mut query = vec![
            ("apikey".to_string(), self.api_key.clone()),
            ("url".to_string(), target.to_string()),
        ];

        if request.js_render {
            query.push(("js_render".to_string(), "true".to_string()));
        }
        if request.proxy_tier == ProxyTier::Premium {
            query.push(("premium_proxy".to_string(), "true".to_string()));
        }
        if let Some(country) = &request.proxy_country {
            query.push(("proxy_country".to_string(), country.clone()));
        }
        if !request.wait.is_zero() {
            query.push(("wait".to_string(), request.wait.as_millis().to_string()));
        }
        if let Some(schema) = &request.schema {
            query.push(("css_extractor".to_string(), schema.to_wire_param()));
        }
        // Reserved keys go first; custom params follow in sorted order
        for (key, value) in &request.custom_params {
            query.push((key.clone(), value.clone()));
        }

        query
    }
}

/// Builder for configuring a FetchClient
#[derive(Default)]
pub struct FetchClientBuilder {
    api_key: Option<String>,
    endpoint: Option<String>,
}

impl FetchClientBuilder {
    /// Set the API key attached to every request (required)
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Override the service endpoint (default: [`DEFAULT_ENDPOINT`])
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Build the client with the configured settings
    pub fn build(self) -> Result<FetchClient, ConfigError> {
        let api_key = match self.api_key {
            Some(key) if !key.trim().is_empty() => key,
            _ => return Err(ConfigError::MissingApiKey),
        };

        let endpoint = self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT);
        let endpoint = Url::parse(endpoint).map_err(|source| ConfigError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            source,
        })?;

        let http = reqwest::Client::builder().build()?;

        Ok(FetchClient {
            http,
            endpoint,
            api_key,
        })
    }
}
