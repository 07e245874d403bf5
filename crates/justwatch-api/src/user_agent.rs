//! User-agent sources, queried once per request.

use rand::seq::SliceRandom;

/// Representative desktop and mobile browser user agents.
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36 Edg/124.0.2478.67",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4.1 Safari/605.1.15",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4_1 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4.1 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.6367.82 Mobile Safari/537.36",
];

/// Supplies the `user-agent` header value.
///
/// Any `Fn() -> String + Send + Sync` closure is a source.
#[allow(clippy::module_name_repetitions)]
pub trait UserAgentSource: Send + Sync {
    /// Returns the user agent for the next request.
    fn user_agent(&self) -> String;
}

impl<F> UserAgentSource for F
where
    F: Fn() -> String + Send + Sync,
{
    fn user_agent(&self) -> String {
        self()
    }
}

/// Picks a random browser user agent on every call.
#[derive(Debug, Clone, Copy, Default)]
#[allow(clippy::module_name_repetitions)]
pub struct RandomUserAgent;

impl UserAgentSource for RandomUserAgent {
    fn user_agent(&self) -> String {
        let mut rng = rand::thread_rng();
        USER_AGENTS
            .choose(&mut rng)
            .map_or_else(String::new, |ua| String::from(*ua))
    }
}

/// Always returns the same user agent.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub struct FixedUserAgent(String);

impl FixedUserAgent {
    /// Creates a source returning `ua`.
    #[must_use]
    pub fn new(ua: impl Into<String>) -> Self {
        Self(ua.into())
    }
}

impl UserAgentSource for FixedUserAgent {
    fn user_agent(&self) -> String {
        self.0.clone()
    }
}
