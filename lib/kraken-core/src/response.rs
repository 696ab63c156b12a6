//! HTTP response handling.
//!
//! [`Response`] provides access to status, headers, and body with JSON/text deserialization.

use std::collections::HashMap;

use bytes::Bytes;

/// HTTP response with status, headers, and a fully buffered body.
#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    headers: HashMap<String, String>,
    body: Bytes,
}

impl Response {
    /// Creates a new response.
    #[must_use]
    pub fn new(status: u16, headers: HashMap<String, String>, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Response headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Single header value by name, compared case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Response body.
    #[must_use]
    pub const fn body(&self) -> &Bytes {
        &self.body
    }

    /// Consume into body.
    #[must_use]
    pub fn into_body(self) -> Bytes {
        self.body
    }

    /// Status is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Status is 4xx.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.status >= 400 && self.status < 500
    }

    /// Status is 5xx.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status >= 500 && self.status < 600
    }

    /// Deserialize the response body as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> crate::Result<T> {
        from_json(&self.body)
    }

    /// Get the response body as text.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid UTF-8.
    pub fn text(&self) -> Result<String, std::string::FromUtf8Error> {
        String::from_utf8(self.body.to_vec())
    }
}

/// Deserialize JSON bytes to a value with path-aware error messages.
///
/// Uses `serde_path_to_error` so the error names the field that failed,
/// e.g. `clips[0].created_at`.
///
/// # Errors
///
/// Returns [`crate::Error::JsonDeserialization`] if decoding fails.
///
/// # Example
///
/// ```
/// use kraken_core::from_json;
/// use serde::Deserialize;
///
/// #[derive(Debug, PartialEq, Deserialize)]
/// struct Vod { id: String }
///
/// let vod: Vod = from_json(br#"{"id":"222004532"}"#).expect("deserialize");
/// assert_eq!(vod, Vod { id: "222004532".to_string() });
/// ```
pub fn from_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> crate::Result<T> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        crate::Error::json_deserialization(e.path().to_string(), e.inner().to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_basic() {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());

        let response = Response::new(200, headers, Bytes::from(r#"{"slug":"a"}"#));

        assert_eq!(response.status(), 200);
        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert!(response.is_success());
        assert!(!response.is_client_error());
        assert!(!response.is_server_error());
    }

    #[test]
    fn response_status_checks() {
        let response = Response::new(404, HashMap::new(), Bytes::new());
        assert!(response.is_client_error());

        let response = Response::new(503, HashMap::new(), Bytes::new());
        assert!(response.is_server_error());

        let response = Response::new(304, HashMap::new(), Bytes::new());
        assert!(!response.is_success());
        assert!(!response.is_client_error());
    }

    #[test]
    fn response_json() {
        #[derive(Debug, PartialEq, serde::Deserialize)]
        struct Thumbnails {
            tiny: String,
        }

        let body = Bytes::from(r#"{"tiny":"https://example.test/86x45.jpg"}"#);
        let response = Response::new(200, HashMap::new(), body);

        let thumbnails: Thumbnails = response.json().expect("deserialize");
        assert_eq!(thumbnails.tiny, "https://example.test/86x45.jpg");
    }

    #[test]
    fn json_error_carries_path() {
        #[derive(Debug, serde::Deserialize)]
        #[allow(dead_code)]
        struct Page {
            clips: Vec<Item>,
        }

        #[derive(Debug, serde::Deserialize)]
        #[allow(dead_code)]
        struct Item {
            views: u64,
        }

        let err = from_json::<Page>(br#"{"clips":[{"views":"many"}]}"#).expect_err("bad type");
        match err {
            crate::Error::JsonDeserialization { path, .. } => assert_eq!(path, "clips[0].views"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn response_text() {
        let response = Response::new(500, HashMap::new(), Bytes::from("upstream exploded"));
        assert_eq!(response.text().expect("text"), "upstream exploded");
    }
}
