//! `JustWatchApi` trait definition.
#![allow(clippy::future_not_send)]

use serde_json::Value;

use crate::error::JustWatchError;
use crate::params::SearchParams;

/// JustWatch content API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
/// Every method returns the decoded JSON payload unchanged.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(JustWatchApi: Send)]
pub trait LocalJustWatchApi {
    /// Searches popular titles (`POST /titles/{locale}/popular`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API reports an error.
    async fn search(&self, params: &SearchParams) -> Result<Value, JustWatchError>;

    /// Lists streaming providers for the locale.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API reports an error.
    async fn providers(&self) -> Result<Value, JustWatchError>;

    /// Lists genres for the locale.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API reports an error.
    async fn genres(&self) -> Result<Value, JustWatchError>;

    /// Fetches a show season.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API reports an error.
    async fn season(&self, season_id: &str) -> Result<Value, JustWatchError>;

    /// Fetches the newest episodes of a show, optionally for one page.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API reports an error.
    async fn episodes(&self, show_id: &str, page: Option<u32>) -> Result<Value, JustWatchError>;

    /// Fetches a title by content type (`movie`, `show`, ...) and id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API reports an error.
    async fn title(&self, content_type: &str, title_id: &str) -> Result<Value, JustWatchError>;

    /// Fetches a person.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API reports an error.
    async fn person(&self, person_id: &str) -> Result<Value, JustWatchError>;
}
