//! `JustWatchClient` - JustWatch content API client implementation.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::instrument;
use url::Url;

use crate::api::JustWatchApi;
use crate::config::ClientConfig;
use crate::error::JustWatchError;
use crate::params::SearchParams;
use crate::request::{HttpMethod, build_request, classify, encode_segment};
use crate::transport::{ReqwestTransport, Transport};
use crate::user_agent::{FixedUserAgent, RandomUserAgent, UserAgentSource};

/// Default API host.
const DEFAULT_BASE_URL: &str = "https://apis.justwatch.com";

/// JustWatch content API client.
///
/// Configuration is fixed at construction; every call is one independent
/// request through the transport.
#[allow(clippy::module_name_repetitions)]
pub struct JustWatchClient<T = ReqwestTransport> {
    /// HTTP transport.
    transport: T,
    /// Locale and proxy settings.
    config: ClientConfig,
    /// User-agent supplier, queried per request.
    user_agents: Arc<dyn UserAgentSource>,
    /// API host; `/content` is appended per request.
    base_url: Url,
}

impl<T> fmt::Debug for JustWatchClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JustWatchClient")
            .field("config", &self.config)
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

/// Builder for `JustWatchClient`.
#[allow(clippy::module_name_repetitions)]
pub struct JustWatchClientBuilder {
    config: ClientConfig,
    base_url: Option<Url>,
    user_agents: Option<Arc<dyn UserAgentSource>>,
}

impl fmt::Debug for JustWatchClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JustWatchClientBuilder")
            .field("config", &self.config)
            .field("base_url", &self.base_url)
            .field("custom_user_agent", &self.user_agents.is_some())
            .finish()
    }
}

impl JustWatchClientBuilder {
    /// Creates a new builder.
    fn new() -> Self {
        Self {
            config: ClientConfig::default(),
            base_url: None,
            user_agents: None,
        }
    }

    /// Replaces the whole client configuration.
    #[must_use]
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the catalog locale (default: `en_US`).
    #[must_use]
    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.config.locale = locale.into();
        self
    }

    /// Routes requests through a proxy.
    #[must_use]
    pub fn proxy(mut self, address: impl Into<String>) -> Self {
        self.config.proxy = Some(address.into());
        self
    }

    /// Sets the proxy type, sent as the `proxy-type` header.
    #[must_use]
    pub fn proxy_type(mut self, proxy_type: impl Into<String>) -> Self {
        self.config.proxy_type = Some(proxy_type.into());
        self
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Uses a fixed User-Agent instead of a random one.
    #[must_use]
    pub fn user_agent(self, ua: impl Into<String>) -> Self {
        self.user_agent_source(FixedUserAgent::new(ua))
    }

    /// Sets the User-Agent supplier (default: [`RandomUserAgent`]).
    #[must_use]
    pub fn user_agent_source(mut self, source: impl UserAgentSource + 'static) -> Self {
        self.user_agents = Some(Arc::new(source));
        self
    }

    /// Builds the client with the default `reqwest` transport.
    ///
    /// # Errors
    ///
    /// - The configured proxy address is invalid.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<JustWatchClient> {
        let transport = ReqwestTransport::new(self.config.proxy.as_deref())
            .context("failed to build default transport")?;
        self.build_with_transport(transport)
    }

    /// Builds the client around a custom transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the default base URL is invalid.
    pub fn build_with_transport<T: Transport>(self, transport: T) -> Result<JustWatchClient<T>> {
        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let user_agents = self
            .user_agents
            .unwrap_or_else(|| Arc::new(RandomUserAgent));

        Ok(JustWatchClient {
            transport,
            config: self.config,
            user_agents,
            base_url,
        })
    }
}

impl JustWatchClient {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> JustWatchClientBuilder {
        JustWatchClientBuilder::new()
    }
}

impl<T> JustWatchClient<T> {
    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Path-encoded locale segment.
    fn locale(&self) -> Cow<'_, str> {
        encode_segment(&self.config.locale)
    }
}

impl<T: Transport + Sync> JustWatchClient<T> {
    /// Sends one request to `{base}/content{path}` and classifies the outcome.
    ///
    /// GET parameters become the query string; other verbs send them as a
    /// JSON body.
    ///
    /// # Errors
    ///
    /// - [`JustWatchError::Encode`] if `params` cannot be serialized.
    /// - [`JustWatchError::Transport`] / [`JustWatchError::Status`] on
    ///   transport failure or an undecodable response.
    /// - [`JustWatchError::Api`] if the body carries an `error` field.
    #[instrument(skip_all, fields(method = %method, path = %path))]
    pub async fn request<P>(
        &self,
        method: HttpMethod,
        path: &str,
        params: &P,
    ) -> Result<Value, JustWatchError>
    where
        P: Serialize + Sync + ?Sized,
    {
        let request = build_request(
            &self.base_url,
            &self.config,
            self.user_agents.user_agent(),
            method,
            path,
            params,
        )?;

        tracing::debug!(method = %request.method, url = %request.url, "JustWatch API request");

        let outcome = self.transport.send(&request).await;
        if let Ok(ref response) = outcome {
            tracing::debug!(status = response.status, "JustWatch API response");
        }
        classify(outcome)
    }

    /// Sends a GET request without parameters.
    async fn get(&self, path: &str) -> Result<Value, JustWatchError> {
        self.request(HttpMethod::Get, path, &Map::new()).await
    }

    /// Searches with only a free-text query.
    ///
    /// # Errors
    ///
    /// Same as [`JustWatchApi::search`].
    pub async fn search_query(&self, query: &str) -> Result<Value, JustWatchError> {
        self.search(&SearchParams::query(query)).await
    }

    /// Searches with a free-form option object (or a bare query string).
    ///
    /// Option keys are validated before anything is sent. Values are
    /// forwarded unchanged.
    ///
    /// # Errors
    ///
    /// - [`JustWatchError::InvalidOption`] for keys outside the canonical set.
    /// - [`JustWatchError::InvalidOptions`] if `options` is neither an object
    ///   nor a string.
    /// - Otherwise same as [`JustWatchApi::search`].
    pub async fn search_options(&self, options: Value) -> Result<Value, JustWatchError> {
        let params = SearchParams::try_from(options)?;
        self.search(&params).await
    }
}

impl<T: Transport + Sync> JustWatchApi for JustWatchClient<T> {
    #[instrument(skip_all)]
    async fn search(&self, params: &SearchParams) -> Result<Value, JustWatchError> {
        let path = format!("/titles/{}/popular", self.locale());
        self.request(HttpMethod::Post, &path, params).await
    }

    #[instrument(skip_all)]
    async fn providers(&self) -> Result<Value, JustWatchError> {
        let path = format!("/providers/locale/{}", self.locale());
        self.get(&path).await
    }

    #[instrument(skip_all)]
    async fn genres(&self) -> Result<Value, JustWatchError> {
        let path = format!("/genres/locale/{}", self.locale());
        self.get(&path).await
    }

    #[instrument(skip_all)]
    async fn season(&self, season_id: &str) -> Result<Value, JustWatchError> {
        let path = format!(
            "/titles/show_season/{}/locale/{}",
            encode_segment(season_id),
            self.locale()
        );
        self.get(&path).await
    }

    #[instrument(skip_all)]
    async fn episodes(&self, show_id: &str, page: Option<u32>) -> Result<Value, JustWatchError> {
        let query = page
            .filter(|p| *p > 0)
            .map_or_else(String::new, |p| format!("?page={p}"));
        let path = format!(
            "/titles/show/{}/locale/{}/newest_episodes{query}",
            encode_segment(show_id),
            self.locale()
        );
        self.get(&path).await
    }

    #[instrument(skip_all)]
    async fn title(&self, content_type: &str, title_id: &str) -> Result<Value, JustWatchError> {
        let path = format!(
            "/titles/{}/{}/locale/{}",
            encode_segment(content_type),
            encode_segment(title_id),
            self.locale()
        );
        self.get(&path).await
    }

    #[instrument(skip_all)]
    async fn person(&self, person_id: &str) -> Result<Value, JustWatchError> {
        let path = format!(
            "/titles/person/{}/locale/{}",
            encode_segment(person_id),
            self.locale()
        );
        self.get(&path).await
    }
}
