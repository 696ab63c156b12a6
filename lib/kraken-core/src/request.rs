//! HTTP request building.
//!
//! Use [`Request::builder`] to construct requests with headers and query parameters.
//!
//! # Example
//!
//! ```
//! use kraken_core::Request;
//!
//! let request = Request::builder(http::Method::GET, "https://api.twitch.tv/kraken/clips/top".parse().unwrap())
//!     .header("Accept", "application/vnd.twitchtv.v5+json")
//!     .query("limit", "1")
//!     .build();
//! assert_eq!(request.url().query(), Some("limit=1"));
//! ```

use std::collections::HashMap;

use http::Method;

/// An outbound HTTP request: method, URL and headers.
///
/// The Kraken clip endpoints are read-only, so requests carry no body.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    url: url::Url,
    headers: HashMap<String, String>,
}

impl Request {
    /// Creates a new [`RequestBuilder`].
    #[must_use]
    pub fn builder(method: Method, url: url::Url) -> RequestBuilder {
        RequestBuilder::new(method, url)
    }

    /// A bare GET request for `url`.
    #[must_use]
    pub fn get(url: url::Url) -> Self {
        RequestBuilder::new(Method::GET, url).build()
    }

    /// HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Request URL.
    #[must_use]
    pub fn url(&self) -> &url::Url {
        &self.url
    }

    /// Request headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Mutable access to headers.
    #[must_use]
    pub fn headers_mut(&mut self) -> &mut HashMap<String, String> {
        &mut self.headers
    }

    /// Single header value by name, compared case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Consume into (method, url, headers).
    #[must_use]
    pub fn into_parts(self) -> (Method, url::Url, HashMap<String, String>) {
        (self.method, self.url, self.headers)
    }
}

/// Builder for constructing [`Request`] instances.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    method: Method,
    url: url::Url,
    headers: HashMap<String, String>,
}

impl RequestBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new(method: Method, url: url::Url) -> Self {
        Self {
            method,
            url,
            headers: HashMap::new(),
        }
    }

    /// Sets a header, replacing any value already set under the same name
    /// regardless of case.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|key, _| !key.eq_ignore_ascii_case(&name));
        self.headers.insert(name, value.into());
        self
    }

    /// Appends a query parameter to the URL.
    #[must_use]
    pub fn query(mut self, name: &str, value: &str) -> Self {
        self.url.query_pairs_mut().append_pair(name, value);
        self
    }

    /// Replaces the URL query with an already encoded query string.
    ///
    /// An empty string removes the query entirely.
    #[must_use]
    pub fn query_string(mut self, query: &str) -> Self {
        if query.is_empty() {
            self.url.set_query(None);
        } else {
            self.url.set_query(Some(query));
        }
        self
    }

    /// Builds the [`Request`].
    #[must_use]
    pub fn build(self) -> Request {
        Request {
            method: self.method,
            url: self.url,
            headers: self.headers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clips_url() -> url::Url {
        url::Url::parse("https://api.twitch.tv/kraken/clips/top").expect("valid URL")
    }

    #[test]
    fn request_builder_basic() {
        let request = Request::builder(Method::GET, clips_url())
            .header("Client-ID", "cid")
            .build();

        assert_eq!(request.method(), &Method::GET);
        assert_eq!(
            request.url().as_str(),
            "https://api.twitch.tv/kraken/clips/top"
        );
        assert_eq!(request.header("Client-ID"), Some("cid"));
        assert_eq!(request.header("client-id"), Some("cid"));
        assert!(request.header("Authorization").is_none());
    }

    #[test]
    fn header_replaces_case_insensitively() {
        let request = Request::builder(Method::GET, clips_url())
            .header("user-agent", "first")
            .header("User-Agent", "second")
            .build();

        assert_eq!(request.headers().len(), 1);
        assert_eq!(request.header("USER-AGENT"), Some("second"));
    }

    #[test]
    fn request_builder_with_query() {
        let request = Request::builder(Method::GET, clips_url())
            .query("channel", "summit1g")
            .query("limit", "10")
            .build();

        assert_eq!(
            request.url().as_str(),
            "https://api.twitch.tv/kraken/clips/top?channel=summit1g&limit=10"
        );
    }

    #[test]
    fn query_string_replaces_and_clears() {
        let request = Request::builder(Method::GET, clips_url())
            .query("stale", "1")
            .query_string("limit=10&period=week")
            .build();
        assert_eq!(request.url().query(), Some("limit=10&period=week"));

        let request = Request::builder(Method::GET, clips_url())
            .query("stale", "1")
            .query_string("")
            .build();
        assert_eq!(request.url().query(), None);
    }

    #[test]
    fn get_shortcut() {
        let request = Request::get(clips_url());
        assert_eq!(request.method(), &Method::GET);
        assert!(request.headers().is_empty());
    }
}
