//
//  bamboo-client
//  api/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # HTTP Client Wrapper for the Bamboo API
//!
//! This module provides the request executor shared by every Bamboo service.
//! It resolves endpoint paths against the configured base URL, attaches the
//! credential, encodes request bodies and routes response bodies to the sink
//! the caller selected.
//!
//! ## Features
//!
//! - Base URL normalization (`.../rest/api/latest/` is appended exactly once)
//! - Authentication header injection through [`Authorizer`]
//! - JSON request bodies (no HTML escaping)
//! - Explicit response sinks: decode JSON, copy raw bytes, or discard
//! - Status-aware response envelope for per-operation status mapping
//! - Custom User-Agent header

use std::fmt;
use std::io::Write;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, Request, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use url::Url;

use super::common::{BambooError, Result};
use crate::auth::Authorizer;

/// Base URL used until [`BambooClient::set_url`] is called.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8085/rest/api/latest/";

/// Path every Bamboo REST endpoint lives under.
pub const API_PATH: &str = "/rest/api/latest/";

/// Client-level deadline of the default transport.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// The `User-Agent` sent by transports built by this crate.
pub fn user_agent() -> String {
    format!("bamboo-client/{}", crate::VERSION)
}

/// Extracts a user-friendly message from a Bamboo error response body.
///
/// Bamboo returns errors in one of these formats:
/// ```json
/// {"message": "Human readable message", "status-code": 400}
/// {"errors": ["Human readable message"], "fieldErrors": {}}
/// {"errors": [{"message": "Human readable message"}]}
/// ```
///
/// If none of them match, the trimmed raw body is returned.
///
/// # Parameters
///
/// * `status` - The HTTP status code
/// * `body` - The raw error response body
///
/// # Example
///
/// ```rust
/// use bamboo_client::api::client::format_api_error;
/// use reqwest::StatusCode;
///
/// let body = r#"{"message": "Plan CORE-X not found", "status-code": 404}"#;
/// assert_eq!(format_api_error(StatusCode::NOT_FOUND, body), "Plan CORE-X not found");
/// ```
pub fn format_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        // {"message": "..."}
        if let Some(message) = json.get("message").and_then(|m| m.as_str()) {
            return message.to_string();
        }

        // {"errors": ["..."]} or {"errors": [{"message": "..."}]}
        if let Some(first) = json
            .get("errors")
            .and_then(|e| e.as_array())
            .and_then(|arr| arr.first())
        {
            if let Some(message) = first.as_str() {
                return message.to_string();
            }
            if let Some(message) = first.get("message").and_then(|m| m.as_str()) {
                return message.to_string();
            }
        }
    }

    let body = body.trim();
    if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_string()
    } else {
        body.to_string()
    }
}

/// Normalizes a server URL into a Bamboo REST base URL.
///
/// The URL must parse and use the `http` or `https` scheme. The
/// `/rest/api/latest/` suffix is appended unless the path already ends with
/// it; query and fragment are dropped.
///
/// # Example
///
/// ```rust
/// use bamboo_client::api::client::normalize_base_url;
///
/// let url = normalize_base_url("https://bamboo.example.com:8085").unwrap();
/// assert_eq!(url.as_str(), "https://bamboo.example.com:8085/rest/api/latest/");
///
/// let url = normalize_base_url("https://example.com/bamboo/rest/api/latest").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/bamboo/rest/api/latest/");
///
/// assert!(normalize_base_url("fuzzybunnyslippers").is_err());
/// ```
pub fn normalize_base_url(desired: &str) -> Result<Url> {
    let mut url = Url::parse(desired)
        .map_err(|e| BambooError::InvalidUrl(format!("{}: {}", desired, e)))?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(BambooError::InvalidUrl(format!(
                "unsupported URL scheme \"{}\" in {}",
                other, desired
            )))
        }
    }

    let trimmed = url.path().trim_end_matches('/').to_string();
    let path = if trimmed.ends_with(API_PATH.trim_end_matches('/')) {
        format!("{}/", trimmed)
    } else {
        format!("{}{}", trimmed, API_PATH)
    };

    url.set_path(&path);
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

/// Destination of a response body, chosen by the caller.
///
/// # Variants
///
/// * `Json` - Decode the body as JSON into the target. An empty body is not an
///   error and leaves the target untouched.
/// * `Raw` - Copy the body verbatim into a writer, whatever the status.
/// * `Discard` - Ignore the body.
///
/// # Example
///
/// ```rust,ignore
/// let mut info = BuildInfo::default();
/// client.execute(request, Sink::Json(&mut info)).await?;
///
/// let mut buf = Vec::new();
/// client.execute(request, Sink::raw(&mut buf)).await?;
/// ```
pub enum Sink<'a, T> {
    /// Decode the body as JSON into the target.
    Json(&'a mut T),
    /// Copy the body verbatim into the writer, for every status.
    Raw(&'a mut (dyn Write + Send)),
    /// Ignore the body.
    Discard,
}

impl<'a> Sink<'a, ()> {
    /// Raw sink without a JSON target type.
    pub fn raw(writer: &'a mut (dyn Write + Send)) -> Self {
        Sink::Raw(writer)
    }
}

/// Status-aware envelope returned for every request the server answered.
///
/// # Fields
///
/// * `status` - HTTP status code of the response
/// * `headers` - Response headers
/// * `url` - Final URL of the request
/// * `body` - Body text of non-2xx responses, kept for diagnostics. Successful
///   bodies go to the [`Sink`] and are not retained.
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code of the response.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Final URL of the request.
    pub url: Url,
    /// Body text of non-2xx responses.
    pub body: Option<String>,
}

impl Response {
    /// Returns `Ok(())` if the status equals `expected`, otherwise an
    /// [`BambooError::UnexpectedStatus`] naming `operation`.
    pub fn ensure_status(&self, expected: StatusCode, operation: &str) -> Result<()> {
        if self.status == expected {
            Ok(())
        } else {
            Err(self.unexpected(operation))
        }
    }

    /// Builds an [`BambooError::UnexpectedStatus`] for this response.
    pub fn unexpected(&self, operation: &str) -> BambooError {
        BambooError::UnexpectedStatus {
            operation: operation.to_string(),
            status: self.status,
            message: self.error_message(),
        }
    }

    /// Readable message for the body of this response.
    pub fn error_message(&self) -> String {
        match self.body.as_deref() {
            Some(body) => format_api_error(self.status, body),
            None => "no response body".to_string(),
        }
    }
}

/// Configuration snapshot read by every request.
///
/// Holds the base URL (always ending in `/rest/api/latest/`) and the
/// credential. It can only change through `&mut` methods on
/// [`BambooClient`], so it never changes while a request borrows the client.
pub struct ClientConfig {
    base_url: Url,
    authorizer: Box<dyn Authorizer>,
}

impl ClientConfig {
    /// The normalized base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The `Authorization` header value of the configured credential.
    pub fn authorization(&self) -> String {
        self.authorizer.authorization()
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

/// The client for the Bamboo REST API.
///
/// Services are reached through accessor methods that borrow the client,
/// e.g. [`plans`](BambooClient::plans) or [`projects`](BambooClient::projects).
///
/// # Creating a Client
///
/// ```rust,no_run
/// use bamboo_client::api::BambooClient;
/// use bamboo_client::auth::Credential;
///
/// # async fn example() -> bamboo_client::api::common::Result<()> {
/// let mut client = BambooClient::new(Credential::basic("admin", "admin"))?;
/// client.set_url("https://bamboo.example.com:8085")?;
///
/// let names = client.plans().list_plan_names().await?;
/// println!("{} plans", names.len());
/// # Ok(())
/// # }
/// ```
///
/// # Notes
///
/// - The client is `Send + Sync`; share it by reference across tasks.
/// - Connection pooling and timeouts belong to the underlying `reqwest::Client`.
pub struct BambooClient {
    /// The underlying HTTP client
    http: Client,
    /// Base URL and credentials
    config: ClientConfig,
}

impl fmt::Debug for BambooClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BambooClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl BambooClient {
    /// Creates a client with the default transport and base URL
    /// ([`DEFAULT_BASE_URL`]).
    ///
    /// The default transport has a client-level timeout of
    /// [`DEFAULT_TIMEOUT`] and sends `User-Agent: bamboo-client/<version>`.
    ///
    /// # Errors
    ///
    /// Returns [`BambooError::Transport`] if the HTTP client could not be built.
    pub fn new(credential: impl Authorizer + 'static) -> Result<Self> {
        let http = Client::builder()
            .user_agent(user_agent())
            .timeout(DEFAULT_TIMEOUT)
            .build()?;
        Self::with_http_client(http, credential)
    }

    /// Creates a client on top of an existing `reqwest::Client`.
    ///
    /// Use this to configure proxies, TLS roots or a different timeout.
    pub fn with_http_client(http: Client, credential: impl Authorizer + 'static) -> Result<Self> {
        Ok(Self {
            http,
            config: ClientConfig {
                base_url: normalize_base_url(DEFAULT_BASE_URL)?,
                authorizer: Box::new(credential),
            },
        })
    }

    /// Sets the server URL for the client to use.
    ///
    /// See [`normalize_base_url`] for the accepted forms. On error the
    /// previous base URL is kept.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bamboo_client::api::BambooClient;
    /// use bamboo_client::auth::Credential;
    ///
    /// let mut client = BambooClient::new(Credential::basic("u", "p")).unwrap();
    /// client.set_url("http://localhost:8085").unwrap();
    /// assert_eq!(client.base_url().as_str(), "http://localhost:8085/rest/api/latest/");
    /// ```
    pub fn set_url(&mut self, desired: &str) -> Result<()> {
        self.config.base_url = normalize_base_url(desired)?;
        Ok(())
    }

    /// Builder-style variant of [`set_url`](Self::set_url).
    pub fn with_url(mut self, desired: &str) -> Result<Self> {
        self.set_url(desired)?;
        Ok(self)
    }

    /// Replaces the credential used for subsequent requests.
    pub fn set_credential(&mut self, credential: impl Authorizer + 'static) {
        self.config.authorizer = Box::new(credential);
    }

    /// Builder-style variant of [`set_credential`](Self::set_credential).
    pub fn with_credential(mut self, credential: impl Authorizer + 'static) -> Self {
        self.set_credential(credential);
        self
    }

    /// The normalized base URL.
    pub fn base_url(&self) -> &Url {
        &self.config.base_url
    }

    /// The configuration snapshot read by requests.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Builds a request without a body.
    ///
    /// `path` is resolved relative to the base URL as written and should not
    /// start with a slash. Paths that embed caller input go through
    /// [`new_request_segments`](Self::new_request_segments). Query parameters can be appended through
    /// `request.url_mut().query_pairs_mut()` before executing.
    ///
    /// # Errors
    ///
    /// Returns [`BambooError::InvalidUrl`] if the base URL lacks a trailing
    /// slash or `path` cannot be resolved.
    pub fn new_request(&self, method: Method, path: &str) -> Result<Request> {
        let url = self.resolve(path)?;
        self.build_request(method, url, None)
    }

    /// Builds a request with `body` encoded as JSON.
    ///
    /// Sets `Content-Type: application/json` in addition to the headers set by
    /// [`new_request`](Self::new_request).
    ///
    /// # Errors
    ///
    /// Returns [`BambooError::Serialize`] if `body` cannot be encoded.
    pub fn new_request_with_body<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<Request> {
        let bytes = serde_json::to_vec(body).map_err(BambooError::Serialize)?;
        let url = self.resolve(path)?;
        self.build_request(method, url, Some(bytes))
    }

    /// Builds a request whose path is `segments` appended to the base URL.
    ///
    /// Each segment is percent-encoded on its own, so caller supplied keys
    /// containing `/`, `?`, `#` or `%` stay inside their segment.
    ///
    /// # Errors
    ///
    /// Returns [`BambooError::Validation`] for an empty, `.` or `..` segment
    /// and [`BambooError::InvalidUrl`] if the base URL lacks a trailing slash.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bamboo_client::{BambooClient, Credential};
    /// use reqwest::Method;
    ///
    /// let client = BambooClient::new(Credential::basic("u", "p"))?;
    /// let request = client.new_request_segments(Method::DELETE, &["plan", "fix#12"])?;
    /// assert_eq!(request.url().path(), "/rest/api/latest/plan/fix%2312");
    /// # Ok::<(), bamboo_client::BambooError>(())
    /// ```
    pub fn new_request_segments(&self, method: Method, segments: &[&str]) -> Result<Request> {
        let url = self.resolve_segments(segments)?;
        self.build_request(method, url, None)
    }

    /// Builds a request from path segments with `body` encoded as JSON.
    pub fn new_request_segments_with_body<B: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
    ) -> Result<Request> {
        let bytes = serde_json::to_vec(body).map_err(BambooError::Serialize)?;
        let url = self.resolve_segments(segments)?;
        self.build_request(method, url, Some(bytes))
    }

    fn base(&self) -> Result<&Url> {
        let base = &self.config.base_url;
        if !base.path().ends_with('/') {
            return Err(BambooError::InvalidUrl(format!(
                "base URL must have a trailing slash, but \"{}\" does not",
                base
            )));
        }
        Ok(base)
    }

    fn resolve(&self, path: &str) -> Result<Url> {
        self.base()?
            .join(path)
            .map_err(|e| BambooError::InvalidUrl(format!("cannot resolve \"{}\": {}", path, e)))
    }

    fn resolve_segments(&self, segments: &[&str]) -> Result<Url> {
        if let Some(bad) = segments
            .iter()
            .find(|segment| matches!(**segment, "" | "." | ".."))
        {
            return Err(BambooError::Validation(format!(
                "Invalid path segment: \"{}\"",
                bad
            )));
        }

        let mut url = self.base()?.clone();
        url.path_segments_mut()
            .map_err(|_| BambooError::InvalidUrl("base URL cannot have path segments".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn build_request(&self, method: Method, url: Url, body: Option<Vec<u8>>) -> Result<Request> {
        let mut authorization = HeaderValue::from_str(&self.config.authorization())
            .map_err(|_| BambooError::Validation("Credential produced an invalid Authorization header".to_string()))?;
        authorization.set_sensitive(true);

        let mut request = Request::new(method, url);
        let headers = request.headers_mut();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(AUTHORIZATION, authorization);

        if let Some(bytes) = body {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            *request.body_mut() = Some(bytes.into());
        }

        Ok(request)
    }

    /// Sends a request and routes the response body to `sink`.
    ///
    /// The executor never fails on a non-success status: it returns the
    /// [`Response`] and lets the operation decide. Bodies of non-2xx
    /// responses are kept on [`Response::body`]. A raw sink receives them
    /// verbatim as well; a JSON target is left untouched.
    ///
    /// # Errors
    ///
    /// - [`BambooError::Transport`] for network failures
    /// - [`BambooError::Decode`] if a non-empty 2xx body is not valid JSON for `T`
    /// - [`BambooError::Io`] if the raw sink cannot be written
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: Request,
        sink: Sink<'_, T>,
    ) -> Result<Response> {
        let method = request.method().clone();
        let mut response = self.http.execute(request).await?;

        let status = response.status();
        let url = response.url().clone();
        let headers = response.headers().clone();
        debug!(%method, %url, %status, "bamboo request");

        if !status.is_success() {
            let bytes = response.bytes().await?;
            if let Sink::Raw(writer) = sink {
                writer.write_all(&bytes)?;
                writer.flush()?;
            }
            return Ok(Response {
                status,
                headers,
                url,
                body: Some(String::from_utf8_lossy(&bytes).into_owned()),
            });
        }

        match sink {
            Sink::Json(target) => {
                let bytes = response.bytes().await?;
                // An empty body leaves the target as it was
                if !bytes.iter().all(u8::is_ascii_whitespace) {
                    *target = serde_json::from_slice(&bytes)
                        .map_err(|source| BambooError::Decode { status, source })?;
                }
            }
            Sink::Raw(writer) => {
                while let Some(chunk) = response.chunk().await? {
                    writer.write_all(&chunk)?;
                }
                writer.flush()?;
            }
            Sink::Discard => {}
        }

        Ok(Response {
            status,
            headers,
            url,
            body: None,
        })
    }

    /// Sends a request and discards the response body.
    pub async fn send(&self, request: Request) -> Result<Response> {
        self.execute(request, Sink::<()>::Discard).await
    }
}

#[cfg(test)]
pub(crate) fn test_client(url: &str) -> BambooClient {
    let mut client = BambooClient::new(crate::auth::Credential::basic("", "")).unwrap();
    client.set_url(url).unwrap();
    client
}
