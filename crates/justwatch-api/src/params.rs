//! Search filter and episode page parameters.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::JustWatchError;

/// Canonical search filter keys, in the order they are sent.
pub const SEARCH_PARAM_KEYS: [&str; 15] = [
    "content_types",
    "presentation_types",
    "providers",
    "genres",
    "languages",
    "release_year_from",
    "release_year_until",
    "monetization_types",
    "min_price",
    "max_price",
    "scoring_filter_types",
    "cinema_release",
    "query",
    "page",
    "page_size",
];

/// Search filter for `/titles/{locale}/popular`.
///
/// Every field is always serialized. Unset fields are sent as `null`, and
/// the field order matches [`SEARCH_PARAM_KEYS`]. Values are forwarded
/// exactly as given; only the key set is validated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchParams {
    /// Content types (e.g. `["movie", "show"]`).
    pub content_types: Option<Value>,
    /// Presentation types (e.g. `["hd", "4k"]`).
    pub presentation_types: Option<Value>,
    /// Provider short names (e.g. `["nfx"]`).
    pub providers: Option<Value>,
    /// Genre short names.
    pub genres: Option<Value>,
    /// Audio languages.
    pub languages: Option<Value>,
    /// Earliest release year.
    pub release_year_from: Option<Value>,
    /// Latest release year.
    pub release_year_until: Option<Value>,
    /// Monetization types (e.g. `["flatrate", "rent"]`).
    pub monetization_types: Option<Value>,
    /// Minimum price.
    pub min_price: Option<Value>,
    /// Maximum price.
    pub max_price: Option<Value>,
    /// Score filters keyed by scoring provider.
    pub scoring_filter_types: Option<Value>,
    /// Only titles currently in cinemas.
    pub cinema_release: Option<Value>,
    /// Free-text query.
    pub query: Option<Value>,
    /// Result page (1-based).
    pub page: Option<Value>,
    /// Results per page.
    pub page_size: Option<Value>,
}

/// Converts a list of names into a JSON array.
fn string_list<I, S>(values: I) -> Value
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Value::Array(
        values
            .into_iter()
            .map(|v| Value::String(v.into()))
            .collect(),
    )
}

impl SearchParams {
    /// Creates a filter with only `query` set.
    #[must_use]
    pub fn query(query: impl Into<String>) -> Self {
        Self {
            query: Some(Value::String(query.into())),
            ..Self::default()
        }
    }

    /// Builds a filter from a free-form option object.
    ///
    /// Each key is overlaid onto the all-`null` default with its value
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`JustWatchError::InvalidOption`] if any key is not one of
    /// [`SEARCH_PARAM_KEYS`].
    pub fn from_options(options: Map<String, Value>) -> Result<Self, JustWatchError> {
        if let Some(key) = options
            .keys()
            .find(|key| !SEARCH_PARAM_KEYS.contains(&key.as_str()))
        {
            return Err(JustWatchError::InvalidOption { key: key.clone() });
        }

        let mut params = Self::default();
        for (key, value) in options {
            *params.slot(&key)? = (!value.is_null()).then_some(value);
        }
        Ok(params)
    }

    /// Field holding a canonical option.
    fn slot(&mut self, key: &str) -> Result<&mut Option<Value>, JustWatchError> {
        let slot = match key {
            "content_types" => &mut self.content_types,
            "presentation_types" => &mut self.presentation_types,
            "providers" => &mut self.providers,
            "genres" => &mut self.genres,
            "languages" => &mut self.languages,
            "release_year_from" => &mut self.release_year_from,
            "release_year_until" => &mut self.release_year_until,
            "monetization_types" => &mut self.monetization_types,
            "min_price" => &mut self.min_price,
            "max_price" => &mut self.max_price,
            "scoring_filter_types" => &mut self.scoring_filter_types,
            "cinema_release" => &mut self.cinema_release,
            "query" => &mut self.query,
            "page" => &mut self.page,
            "page_size" => &mut self.page_size,
            _ => {
                return Err(JustWatchError::InvalidOption {
                    key: String::from(key),
                });
            }
        };
        Ok(slot)
    }

    /// Sets content types.
    #[must_use]
    pub fn content_types<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.content_types = Some(string_list(values));
        self
    }

    /// Sets providers.
    #[must_use]
    pub fn providers<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.providers = Some(string_list(values));
        self
    }

    /// Sets genres.
    #[must_use]
    pub fn genres<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genres = Some(string_list(values));
        self
    }

    /// Sets monetization types.
    #[must_use]
    pub fn monetization_types<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.monetization_types = Some(string_list(values));
        self
    }

    /// Sets the release year window.
    #[must_use]
    pub fn release_years(mut self, from: Option<u16>, until: Option<u16>) -> Self {
        self.release_year_from = from.map(Value::from);
        self.release_year_until = until.map(Value::from);
        self
    }

    /// Sets the price window.
    #[must_use]
    pub fn prices(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_price = min.map(Value::from);
        self.max_price = max.map(Value::from);
        self
    }

    /// Sets the result page.
    #[must_use]
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(Value::from(page));
        self
    }

    /// Sets the page size.
    #[must_use]
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(Value::from(page_size));
        self
    }
}

impl From<&str> for SearchParams {
    fn from(query: &str) -> Self {
        Self::query(query)
    }
}

impl From<String> for SearchParams {
    fn from(query: String) -> Self {
        Self::query(query)
    }
}

impl TryFrom<Value> for SearchParams {
    type Error = JustWatchError;

    /// A JSON string is a bare query; an object is validated as options.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(query) => Ok(Self::query(query)),
            Value::Object(options) => Self::from_options(options),
            Value::Null => Ok(Self::default()),
            other => Err(JustWatchError::InvalidOptions {
                found: other.to_string(),
            }),
        }
    }
}

/// Parses a loosely typed episode page.
///
/// Returns `None` for non-numeric input and for `0`, so the page
/// parameter is omitted.
#[must_use]
pub fn parse_episode_page(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|page| *page > 0)
}
