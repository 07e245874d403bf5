//! Client library for the JustWatch content catalog API.
//!
//! Translates search, provider, genre, season, episode, title and person
//! lookups into requests against `https://apis.justwatch.com/content` and
//! normalizes the JSON responses and failures into [`JustWatchError`].

mod api;
mod client;
mod config;
mod error;
mod params;
mod request;
mod transport;
mod user_agent;

#[cfg(test)]
mod testing;

#[allow(clippy::module_name_repetitions)]
pub use api::{JustWatchApi, LocalJustWatchApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{JustWatchClient, JustWatchClientBuilder};
pub use config::{ClientConfig, DEFAULT_LOCALE};
#[allow(clippy::module_name_repetitions)]
pub use error::{ErrorKind, JustWatchError};
pub use params::{SEARCH_PARAM_KEYS, SearchParams, parse_episode_page};
pub use request::{HttpMethod, RequestDescriptor, encode_query, encode_segment};
pub use transport::{
    LocalTransport, ReqwestTransport, Transport, TransportFailure, TransportResponse,
};
pub use user_agent::{FixedUserAgent, RandomUserAgent, UserAgentSource};
