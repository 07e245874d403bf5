//! Request construction and response classification.

use std::borrow::Cow;
use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};
use url::Url;
use url::form_urlencoded;

use crate::config::ClientConfig;
use crate::error::JustWatchError;
use crate::transport::{TransportFailure, TransportResponse};

/// Path prefix of the content API.
const CONTENT_PREFIX: &str = "/content";

/// Header carrying the per-request user agent.
pub(crate) const USER_AGENT_HEADER: &str = "user-agent";

/// Header carrying the configured proxy type.
pub(crate) const PROXY_TYPE_HEADER: &str = "proxy-type";

/// Header announcing a JSON body.
pub(crate) const CONTENT_TYPE_HEADER: &str = "Content-Type";

/// HTTP verb of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// Parameters go to the query string.
    Get,
    /// Parameters go to a JSON body.
    Post,
    /// Parameters go to a JSON body.
    Put,
    /// Parameters go to a JSON body.
    Delete,
}

impl HttpMethod {
    /// Upper-case verb name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully formed outbound request, built per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    /// HTTP verb.
    pub method: HttpMethod,
    /// Absolute URL including any query string.
    pub url: String,
    /// Header name/value pairs in insertion order.
    pub headers: Vec<(String, String)>,
    /// Serialized JSON body (non-GET only).
    pub body: Option<String>,
    /// Proxy address the transport should route through.
    pub proxy: Option<String>,
}

impl RequestDescriptor {
    /// Looks up a header value (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Marks `encodeURIComponent` leaves unescaped but `urlencoding` escapes.
const SUB_DELIM_MARKS: [(&str, &str); 5] = [
    ("%21", "!"),
    ("%27", "'"),
    ("%28", "("),
    ("%29", ")"),
    ("%2A", "*"),
];

/// Percent-encodes a path segment the way `encodeURIComponent` does.
///
/// Everything except ASCII alphanumerics and `- _ . ! ~ * ' ( )` is
/// escaped as UTF-8 percent-encoding.
#[must_use]
pub fn encode_segment(segment: &str) -> Cow<'_, str> {
    let encoded = urlencoding::encode(segment);
    if !encoded.contains("%2") {
        return encoded;
    }
    Cow::Owned(
        SUB_DELIM_MARKS
            .iter()
            .fold(encoded.into_owned(), |acc, (escaped, mark)| {
                acc.replace(escaped, mark)
            }),
    )
}

/// Encodes a parameter set as `application/x-www-form-urlencoded`.
///
/// Arrays repeat the key once per element and empty arrays are skipped.
/// `null` and nested objects encode as an empty value.
#[must_use]
pub fn encode_query(params: &Map<String, Value>) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        match value {
            Value::Array(items) => {
                for item in items {
                    serializer.append_pair(key, &query_value(item));
                }
            }
            other => {
                serializer.append_pair(key, &query_value(other));
            }
        }
    }
    serializer.finish()
}

/// Text form of a scalar query value.
fn query_value(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        Value::Number(n) => Cow::Owned(n.to_string()),
        Value::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
        Value::Null | Value::Array(_) | Value::Object(_) => Cow::Borrowed(""),
    }
}

/// Serializes request parameters into a key/value map.
fn to_parameter_set<P>(params: &P) -> Result<Map<String, Value>, JustWatchError>
where
    P: Serialize + ?Sized,
{
    match serde_json::to_value(params).map_err(JustWatchError::Encode)? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        other => Err(JustWatchError::Encode(serde::ser::Error::custom(format!(
            "query parameters must be an object, got {other}"
        )))),
    }
}

/// Builds the descriptor for one API call.
///
/// GET parameters are appended as a query string when the set has at
/// least one key. Other verbs carry the parameters as a JSON body.
///
/// # Errors
///
/// Returns [`JustWatchError::Encode`] if the parameters cannot be
/// serialized.
pub(crate) fn build_request<P>(
    base_url: &Url,
    config: &ClientConfig,
    user_agent: String,
    method: HttpMethod,
    path: &str,
    params: &P,
) -> Result<RequestDescriptor, JustWatchError>
where
    P: Serialize + ?Sized,
{
    let mut url = format!(
        "{}{CONTENT_PREFIX}{path}",
        base_url.as_str().trim_end_matches('/')
    );

    let mut headers = vec![(String::from(USER_AGENT_HEADER), user_agent)];
    if let Some(ref proxy_type) = config.proxy_type {
        headers.push((String::from(PROXY_TYPE_HEADER), proxy_type.clone()));
    }

    let body = match method {
        HttpMethod::Get => {
            let query = to_parameter_set(params)?;
            if !query.is_empty() {
                url.push(if url.contains('?') { '&' } else { '?' });
                url.push_str(&encode_query(&query));
            }
            None
        }
        HttpMethod::Post | HttpMethod::Put | HttpMethod::Delete => {
            headers.push((
                String::from(CONTENT_TYPE_HEADER),
                String::from("application/json"),
            ));
            Some(serde_json::to_string(params).map_err(JustWatchError::Encode)?)
        }
    };

    Ok(RequestDescriptor {
        method,
        url,
        headers,
        body,
        proxy: config.proxy.clone(),
    })
}

/// JSON truthiness: `null`, `false`, `0` and `""` are falsy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v.abs() > 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Maps a transport outcome to the decoded payload or a typed failure.
///
/// # Errors
///
/// - [`JustWatchError::Transport`] if the transport failed.
/// - [`JustWatchError::Status`] if there is no decodable body.
/// - [`JustWatchError::Api`] if the body carries a truthy `error` field.
pub(crate) fn classify(
    outcome: Result<TransportResponse, TransportFailure>,
) -> Result<Value, JustWatchError> {
    let response = outcome?;

    let body = match response.body {
        Some(body) if is_truthy(&body) => body,
        _ => {
            return Err(JustWatchError::Status {
                status: response.status,
                message: response.status_message,
            });
        }
    };

    if let Some(error) = body.get("error").filter(|e| is_truthy(e)) {
        let message = error
            .as_str()
            .map_or_else(|| error.to_string(), String::from);
        return Err(JustWatchError::Api(message));
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use serde_json::json;

    use super::*;
    use crate::params::SearchParams;

    fn base_url() -> Url {
        Url::parse("https://apis.justwatch.com").unwrap()
    }

    fn params(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    fn response(status: u16, body: Option<Value>) -> TransportResponse {
        TransportResponse {
            status,
            status_message: String::from("OK"),
            body,
        }
    }

    #[test]
    fn test_url_joins_base_content_and_path() {
        // Arrange
        let config = ClientConfig::default();

        // Act
        let request = build_request(
            &base_url(),
            &config,
            String::from("ua"),
            HttpMethod::Get,
            "/providers/locale/en_US",
            &Map::new(),
        )
        .unwrap();

        // Assert
        assert_eq!(
            request.url,
            "https://apis.justwatch.com/content/providers/locale/en_US"
        );
        assert!(request.body.is_none());
    }

    #[test]
    fn test_get_without_params_has_no_query() {
        // Arrange
        let config = ClientConfig::default();

        // Act
        let request = build_request(
            &base_url(),
            &config,
            String::from("ua"),
            HttpMethod::Get,
            "/genres/locale/en_US",
            &Map::new(),
        )
        .unwrap();

        // Assert
        assert!(!request.url.contains('?'));
    }

    #[test]
    fn test_get_with_params_appends_query() {
        // Arrange
        let config = ClientConfig::default();
        let query = params(json!({"page": 2, "q": "star wars"}));

        // Act
        let request = build_request(
            &base_url(),
            &config,
            String::from("ua"),
            HttpMethod::Get,
            "/titles/movie/1/locale/en_US",
            &query,
        )
        .unwrap();

        // Assert
        assert_eq!(
            request.url,
            "https://apis.justwatch.com/content/titles/movie/1/locale/en_US?page=2&q=star+wars"
        );
    }

    #[test]
    fn test_get_extends_existing_query() {
        // Arrange
        let config = ClientConfig::default();
        let query = params(json!({"page_size": 5}));

        // Act
        let request = build_request(
            &base_url(),
            &config,
            String::from("ua"),
            HttpMethod::Get,
            "/titles/show/1/locale/en_US/newest_episodes?page=3",
            &query,
        )
        .unwrap();

        // Assert
        assert!(request.url.ends_with("newest_episodes?page=3&page_size=5"));
    }

    #[test]
    fn test_post_sends_json_body() {
        // Arrange
        let config = ClientConfig::default();
        let search = SearchParams::query("dune").page(2);

        // Act
        let request = build_request(
            &base_url(),
            &config,
            String::from("ua"),
            HttpMethod::Post,
            "/titles/en_US/popular",
            &search,
        )
        .unwrap();

        // Assert
        assert_eq!(request.header("content-type"), Some("application/json"));
        let body: Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::to_value(&search).unwrap());
        assert!(!request.url.contains('?'));
    }

    #[test]
    fn test_put_and_delete_send_json_body() {
        // Arrange
        let config = ClientConfig::default();
        let payload = params(json!({"id": "tm1"}));

        for method in [HttpMethod::Put, HttpMethod::Delete] {
            // Act
            let request = build_request(
                &base_url(),
                &config,
                String::from("ua"),
                method,
                "/titles/movie/tm1/locale/en_US",
                &payload,
            )
            .unwrap();

            // Assert
            assert_eq!(request.method, method);
            assert_eq!(request.header("content-type"), Some("application/json"));
            assert_eq!(request.body.as_deref(), Some(r#"{"id":"tm1"}"#));
            assert!(!request.url.contains('?'));
        }
    }

    #[test]
    fn test_headers_carry_user_agent_and_proxy_type() {
        // Arrange
        let config = ClientConfig {
            proxy: Some(String::from("http://127.0.0.1:3128")),
            proxy_type: Some(String::from("residential")),
            ..ClientConfig::default()
        };

        // Act
        let request = build_request(
            &base_url(),
            &config,
            String::from("Mozilla/5.0 test"),
            HttpMethod::Get,
            "/genres/locale/en_US",
            &Map::new(),
        )
        .unwrap();

        // Assert
        assert_eq!(request.header("User-Agent"), Some("Mozilla/5.0 test"));
        assert_eq!(request.header("proxy-type"), Some("residential"));
        assert_eq!(request.proxy.as_deref(), Some("http://127.0.0.1:3128"));
        assert!(request.header("content-type").is_none());
    }

    #[test]
    fn test_no_proxy_headers_when_unconfigured() {
        // Arrange
        let config = ClientConfig::default();

        // Act
        let request = build_request(
            &base_url(),
            &config,
            String::from("ua"),
            HttpMethod::Get,
            "/genres/locale/en_US",
            &Map::new(),
        )
        .unwrap();

        // Assert
        assert!(request.header("proxy-type").is_none());
        assert!(request.proxy.is_none());
        assert_eq!(request.headers.len(), 1);
    }

    #[test]
    fn test_get_rejects_scalar_params() {
        // Arrange
        let config = ClientConfig::default();

        // Act
        let result = build_request(
            &base_url(),
            &config,
            String::from("ua"),
            HttpMethod::Get,
            "/genres/locale/en_US",
            &42,
        );

        // Assert
        assert!(matches!(result.unwrap_err(), JustWatchError::Encode(_)));
    }

    #[test]
    fn test_encode_query_form_style() {
        // Arrange
        let query = params(json!({
            "a": ["x", "y z"],
            "b": true,
            "c": null,
            "d": [],
            "e": "ä&=",
        }));

        // Act
        let encoded = encode_query(&query);

        // Assert
        assert_eq!(encoded, "a=x&a=y+z&b=true&c=&e=%C3%A4%26%3D");
    }

    #[test]
    fn test_encode_segment_escapes_reserved() {
        // Arrange & Act & Assert
        assert_eq!(encode_segment("tm/123"), "tm%2F123");
        assert_eq!(encode_segment("a b?#"), "a%20b%3F%23");
        assert_eq!(encode_segment("en_US"), "en_US");
    }

    #[test]
    fn test_encode_segment_keeps_component_marks() {
        // Arrange & Act & Assert
        assert_eq!(encode_segment("a/b (1)!*'~"), "a%2Fb%20(1)!*'~");
        assert_eq!(encode_segment("50%!"), "50%25!");
        assert_eq!(encode_segment("caf\u{e9}"), "caf%C3%A9");
    }

    #[test]
    fn test_classify_success_returns_body() {
        // Arrange
        let body = json!({"items": [1, 2]});

        // Act
        let result = classify(Ok(response(200, Some(body.clone()))));

        // Assert
        assert_eq!(result.unwrap(), body);
    }

    #[test]
    fn test_classify_transport_failure_propagates() {
        // Arrange
        let outcome = Err(TransportFailure::new("dns lookup failed"));

        // Act
        let err = classify(outcome).unwrap_err();

        // Assert
        assert!(matches!(err, JustWatchError::Transport(_)));
        assert_eq!(err.to_string(), "dns lookup failed");
    }

    #[test]
    fn test_classify_missing_body_reports_status() {
        // Arrange
        let outcome = Ok(TransportResponse {
            status: 500,
            status_message: String::from("Internal Server Error"),
            body: None,
        });

        // Act
        let err = classify(outcome).unwrap_err();

        // Assert
        assert!(err.to_string().contains("500"));
        assert!(err.to_string().contains("Internal Server Error"));
    }

    #[test]
    fn test_classify_null_body_reports_status() {
        // Arrange & Act
        let err = classify(Ok(response(204, Some(Value::Null)))).unwrap_err();

        // Assert
        assert!(matches!(err, JustWatchError::Status { status: 204, .. }));
    }

    #[test]
    fn test_classify_error_field_despite_success_status() {
        // Arrange & Act
        let err = classify(Ok(response(200, Some(json!({"error": "bad request"}))))).unwrap_err();

        // Assert
        assert!(matches!(err, JustWatchError::Api(_)));
        assert_eq!(err.to_string(), "bad request");
    }

    #[test]
    fn test_classify_non_string_error_field() {
        // Arrange & Act
        let err = classify(Ok(response(200, Some(json!({"error": {"code": 7}}))))).unwrap_err();

        // Assert
        assert_eq!(err.to_string(), r#"{"code":7}"#);
    }

    #[test]
    fn test_classify_falsy_error_field_is_success() {
        // Arrange
        let body = json!({"error": null, "items": []});

        // Act
        let result = classify(Ok(response(200, Some(body.clone()))));

        // Assert
        assert_eq!(result.unwrap(), body);
    }

    #[test]
    fn test_classify_array_body_is_success() {
        // Arrange
        let body = json!([{"id": 8, "short_name": "nfx"}]);

        // Act
        let result = classify(Ok(response(200, Some(body.clone()))));

        // Assert
        assert_eq!(result.unwrap(), body);
    }
}
