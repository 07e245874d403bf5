//! HTTP transport seam and its reqwest implementation.
#![allow(clippy::future_not_send)]

use std::borrow::Cow;
use std::error::Error;
use std::fmt;

use anyhow::Context;
use reqwest::{Client, Method, Proxy};
use serde_json::Value;

use crate::request::{HttpMethod, RequestDescriptor};

/// Raw outcome of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// HTTP status message.
    pub status_message: String,
    /// Decoded JSON body, `None` when empty or not JSON.
    pub body: Option<Value>,
}

/// Network-level failure reported by a transport.
pub struct TransportFailure {
    inner: Box<dyn Error + Send + Sync>,
}

impl TransportFailure {
    /// Wraps a transport error.
    pub fn new(error: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        Self {
            inner: error.into(),
        }
    }

    /// Returns the wrapped error.
    #[must_use]
    pub fn get_ref(&self) -> &(dyn Error + Send + Sync + 'static) {
        &*self.inner
    }
}

impl fmt::Debug for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl Error for TransportFailure {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.inner.source()
    }
}

/// HTTP transport trait.
///
/// Executes exactly one exchange per call, with no retries.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(Transport: Send)]
pub trait LocalTransport {
    /// Sends a request and returns the raw response.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportFailure`] on DNS, connection, timeout or
    /// body read errors.
    async fn send(&self, request: &RequestDescriptor)
    -> Result<TransportResponse, TransportFailure>;
}

/// Decodes a response body, treating empty or non-JSON text as absent.
fn decode_body(text: &str) -> Option<Value> {
    if text.trim().is_empty() {
        return None;
    }
    serde_json::from_str(text).ok()
}

/// Builds a gzip-enabled HTTP client, optionally routed through a proxy.
fn build_http_client(proxy: Option<&str>) -> reqwest::Result<Client> {
    let mut builder = Client::builder().gzip(true);
    if let Some(address) = proxy {
        builder = builder.proxy(Proxy::all(address)?);
    }
    builder.build()
}

/// [`Transport`] backed by `reqwest`.
#[derive(Debug, Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct ReqwestTransport {
    /// Client for the proxy fixed at construction.
    http_client: Client,
    /// Proxy address `http_client` routes through.
    proxy: Option<String>,
}

impl ReqwestTransport {
    /// Creates a transport, routing through `proxy` when given.
    ///
    /// # Errors
    ///
    /// - The proxy address is invalid.
    /// - `reqwest::Client` build fails.
    pub fn new(proxy: Option<&str>) -> anyhow::Result<Self> {
        let http_client = build_http_client(proxy).context("failed to build HTTP client")?;
        Ok(Self {
            http_client,
            proxy: proxy.map(String::from),
        })
    }

    /// Returns a client for the requested proxy, building a one-off client
    /// when it differs from the one fixed at construction.
    fn client_for(&self, proxy: Option<&str>) -> Result<Cow<'_, Client>, TransportFailure> {
        if proxy == self.proxy.as_deref() {
            return Ok(Cow::Borrowed(&self.http_client));
        }
        build_http_client(proxy)
            .map(Cow::Owned)
            .map_err(TransportFailure::new)
    }
}

impl Transport for ReqwestTransport {
    async fn send(
        &self,
        request: &RequestDescriptor,
    ) -> Result<TransportResponse, TransportFailure> {
        let client = self.client_for(request.proxy.as_deref())?;

        let method = match request.method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        };

        let mut builder = client.request(method, request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(ref body) = request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(TransportFailure::new)?;
        let status = response.status();
        let text = response.text().await.map_err(TransportFailure::new)?;

        Ok(TransportResponse {
            status: status.as_u16(),
            status_message: String::from(status.canonical_reason().unwrap_or_default()),
            body: decode_body(&text),
        })
    }
}
