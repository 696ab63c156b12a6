//! The Kraken API client: credentials, request building, response decoding.
//!
//! Every endpoint goes through [`KrakenClient::get`], which
//! 1. appends the endpoint path to the base URL,
//! 2. encodes the parameter struct (if any) as the query string,
//! 3. attaches the `Accept`, `Client-ID`, `Authorization` and `User-Agent` headers,
//! 4. dispatches through the injected [`HttpClient`],
//! 5. decodes the body according to the status code.
//!
//! A 4xx or 5xx status is not an `Err`: it comes back on the [`ApiResponse`].
//! Only transport and decoding failures are errors.

use derive_more::{Display, Error};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::{Error, HttpClient, HyperClient, Request, Result, ToQueryPairs, to_query_string};

/// Base URL of the Kraken API.
pub const DEFAULT_BASE_URL: &str = "https://api.twitch.tv/kraken";

/// Media type selecting version 5 of the API.
pub const ACCEPT_HEADER: &str = "application/vnd.twitchtv.v5+json";

/// Error triple returned by the API with 4xx statuses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiError {
    /// Reason phrase, e.g. `"Not Found"`.
    pub error: String,
    /// Status code repeated in the body.
    pub status: u16,
    /// Human readable explanation, e.g. `"Clip does not exist"`.
    pub message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}: {}", self.status, self.error, self.message)
    }
}

/// Outcome of one API call.
///
/// | status      | `data`   | `error`  |
/// |-------------|----------|----------|
/// | `< 400`     | `Some`   | `None`   |
/// | `400..=499` | `None`   | `Some`   |
/// | `>= 500`    | `None`   | `None`   |
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    /// HTTP status code of the response.
    pub status_code: u16,
    /// Decoded error triple, for 4xx statuses.
    pub error: Option<ApiError>,
    /// Decoded payload, for statuses below 400.
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Whether the API answered with an error status.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.status_code >= 400
    }

    /// Collapse into a plain `Result` for callers who treat any API error as failure.
    pub fn into_result(self) -> std::result::Result<T, ApiFailure> {
        match (self.data, self.error) {
            (Some(data), _) => Ok(data),
            (None, Some(error)) => Err(ApiFailure::Rejected(error)),
            (None, None) if self.status_code >= 500 => Err(ApiFailure::Server {
                status: self.status_code,
            }),
            (None, None) => Err(ApiFailure::Empty {
                status: self.status_code,
            }),
        }
    }
}

/// Why an [`ApiResponse`] carries no payload.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum ApiFailure {
    /// The API rejected the request (4xx) and explained why.
    #[display("API rejected the request: {_0}")]
    Rejected(#[error(not(source))] ApiError),
    /// The API failed (5xx); the body was not decoded.
    #[display("API server error (status {status})")]
    Server {
        /// HTTP status code.
        status: u16,
    },
    /// Neither payload nor error was decoded.
    #[display("empty API response (status {status})")]
    Empty {
        /// HTTP status code.
        status: u16,
    },
}

/// Parameter type for endpoints that take no query parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoParams;

impl ToQueryPairs for NoParams {
    fn to_query_pairs(&self) -> Vec<(String, String)> {
        Vec::new()
    }
}

/// Client for the Kraken API.
///
/// Holds the client id, optional OAuth token and user agent, the base URL
/// and the transport. Share it by reference (or clone it) across tasks; the
/// setters take `&mut self` and so can only run while nothing else uses it.
///
/// # Example
///
/// ```ignore
/// use kraken::{KrakenClient, TopClipsParams};
///
/// let client = KrakenClient::with_defaults("my-client-id")?;
/// let top = client
///     .get_top_clips(&TopClipsParams {
///         channel: "summit1g".to_string(),
///         ..TopClipsParams::default()
///     })
///     .await?;
/// ```
#[derive(Clone)]
pub struct KrakenClient<C = HyperClient> {
    http: C,
    client_id: String,
    access_token: Option<String>,
    user_agent: Option<String>,
    base_url: Url,
}

impl<C> std::fmt::Debug for KrakenClient<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KrakenClient")
            .field("client_id", &self.client_id)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("user_agent", &self.user_agent)
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl KrakenClient<HyperClient> {
    /// Create a client using the default [`HyperClient`] transport.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingClientId`] if `client_id` is empty.
    pub fn with_defaults(client_id: impl Into<String>) -> Result<Self> {
        Self::new(client_id, HyperClient::new())
    }

    /// Create a client builder.
    #[must_use]
    pub fn builder(client_id: impl Into<String>) -> KrakenClientBuilder {
        KrakenClientBuilder::new(client_id)
    }
}

impl<C> KrakenClient<C> {
    /// Create a client sending requests through `http`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingClientId`] if `client_id` is empty.
    pub fn new(client_id: impl Into<String>, http: C) -> Result<Self> {
        let client_id = client_id.into();
        if client_id.is_empty() {
            return Err(Error::MissingClientId);
        }

        Ok(Self {
            http,
            client_id,
            access_token: None,
            user_agent: None,
            base_url: Url::parse(DEFAULT_BASE_URL)?,
        })
    }

    /// Set the OAuth token sent as `Authorization: OAuth <token>`.
    ///
    /// An empty token removes the header.
    pub fn set_access_token(&mut self, access_token: impl Into<String>) {
        self.access_token = non_empty(access_token.into());
    }

    /// Set the `User-Agent` header. An empty value removes it.
    pub fn set_user_agent(&mut self, user_agent: impl Into<String>) {
        self.user_agent = non_empty(user_agent.into());
    }

    /// Point the client at another API root, e.g. a local mock server.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if `base_url` cannot be parsed.
    pub fn set_base_url(&mut self, base_url: &str) -> Result<()> {
        self.base_url = Url::parse(base_url)?;
        Ok(())
    }

    /// The application client id.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// The OAuth token, if one is set.
    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// The user agent, if one is set.
    #[must_use]
    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    /// The API root every endpoint path is appended to.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The underlying transport.
    #[must_use]
    pub fn http(&self) -> &C {
        &self.http
    }

    /// Build the GET request for `path`, without sending it.
    ///
    /// The path is appended verbatim to the base URL, so a base path such as
    /// `/kraken` is kept. `None` parameters produce no query string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if the joined URL is not valid.
    pub fn build_request<Q>(&self, path: &str, params: Option<&Q>) -> Result<Request>
    where
        Q: ToQueryPairs + ?Sized,
    {
        let url = Url::parse(&format!(
            "{}{path}",
            self.base_url.as_str().trim_end_matches('/')
        ))?;

        let mut builder = Request::builder(http::Method::GET, url)
            .header("Accept", ACCEPT_HEADER)
            .header("Client-ID", self.client_id.as_str());

        if let Some(token) = &self.access_token {
            builder = builder.header("Authorization", format!("OAuth {token}"));
        }
        if let Some(user_agent) = &self.user_agent {
            builder = builder.header("User-Agent", user_agent.as_str());
        }
        if let Some(params) = params {
            builder = builder.query_string(&to_query_string(params));
        }

        Ok(builder.build())
    }
}

impl<C: HttpClient> KrakenClient<C> {
    /// Send a GET request to `path` and decode the response.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport fails or if a body that should be
    /// decoded (status below 500) is not valid JSON for its target type.
    pub async fn get<T, Q>(&self, path: &str, params: Option<&Q>) -> Result<ApiResponse<T>>
    where
        T: DeserializeOwned,
        Q: ToQueryPairs + ?Sized,
    {
        let request = self.build_request(path, params)?;
        let response = self.http.execute(request).await?;
        let status_code = response.status();
        debug!(path, status = status_code, "kraken response received");

        let mut decoded = ApiResponse {
            status_code,
            error: None,
            data: None,
        };

        if status_code < 400 {
            decoded.data = Some(response.json()?);
        } else if status_code < 500 {
            let error: ApiError = response.json()?;
            warn!(
                path,
                status = status_code,
                error = %error.error,
                message = %error.message,
                "kraken API rejected the request"
            );
            decoded.error = Some(error);
        } else {
            warn!(path, status = status_code, "kraken API server error");
        }

        Ok(decoded)
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

/// Builder for [`KrakenClient`].
///
/// # Example
///
/// ```ignore
/// use kraken::{HyperClient, KrakenClient};
///
/// let client = KrakenClient::builder("my-client-id")
///     .access_token("oauth-token")
///     .user_agent("clip-bot/1.0")
///     .build(HyperClient::builder().with_logging().build())?;
/// ```
#[derive(Debug, Clone)]
pub struct KrakenClientBuilder {
    client_id: String,
    access_token: Option<String>,
    user_agent: Option<String>,
    base_url: Option<String>,
}

impl KrakenClientBuilder {
    /// Start a builder for the given client id.
    #[must_use]
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            access_token: None,
            user_agent: None,
            base_url: None,
        }
    }

    /// Set the OAuth token.
    #[must_use]
    pub fn access_token(mut self, access_token: impl Into<String>) -> Self {
        self.access_token = non_empty(access_token.into());
        self
    }

    /// Set the user agent.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = non_empty(user_agent.into());
        self
    }

    /// Override the base URL (defaults to [`DEFAULT_BASE_URL`]).
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Build a client sending requests through `http`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingClientId`] if the client id is empty, or
    /// [`Error::InvalidUrl`] if the base URL cannot be parsed.
    pub fn build<C>(self, http: C) -> Result<KrakenClient<C>> {
        let mut client = KrakenClient::new(self.client_id, http)?;
        client.access_token = self.access_token;
        client.user_agent = self.user_agent;
        if let Some(base_url) = self.base_url {
            client.set_base_url(&base_url)?;
        }
        Ok(client)
    }

    /// Build a client with the default [`HyperClient`] transport.
    ///
    /// # Errors
    ///
    /// Same as [`KrakenClientBuilder::build`].
    pub fn build_default(self) -> Result<KrakenClient<HyperClient>> {
        self.build(HyperClient::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Params(Vec<(&'static str, &'static str)>);

    impl ToQueryPairs for Params {
        fn to_query_pairs(&self) -> Vec<(String, String)> {
            self.0
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect()
        }
    }

    fn client() -> KrakenClient<()> {
        KrakenClient::new("cid", ()).expect("client")
    }

    #[test]
    fn empty_client_id_is_rejected() {
        let err = KrakenClient::new("", ()).expect_err("empty client id");
        assert!(matches!(err, Error::MissingClientId));

        let err = KrakenClient::builder("").build(()).expect_err("empty client id");
        assert!(matches!(err, Error::MissingClientId));
    }

    #[test]
    fn request_keeps_base_path() {
        let request = client()
            .build_request("/clips/top", None::<&NoParams>)
            .expect("request");

        assert_eq!(
            request.url().as_str(),
            "https://api.twitch.tv/kraken/clips/top"
        );
        assert_eq!(request.method(), &http::Method::GET);
    }

    #[test]
    fn default_headers() {
        let request = client()
            .build_request("/clips/x", None::<&NoParams>)
            .expect("request");

        assert_eq!(request.header("Accept"), Some(ACCEPT_HEADER));
        assert_eq!(request.header("Client-ID"), Some("cid"));
        assert!(request.header("Authorization").is_none());
        assert!(request.header("User-Agent").is_none());
    }

    #[test]
    fn optional_headers_follow_setters() {
        let mut client = client();
        client.set_access_token("token");
        client.set_user_agent("clip-bot/1.0");

        let request = client
            .build_request("/clips/followed", None::<&NoParams>)
            .expect("request");
        assert_eq!(request.header("Authorization"), Some("OAuth token"));
        assert_eq!(request.header("User-Agent"), Some("clip-bot/1.0"));

        client.set_access_token("");
        client.set_user_agent("");
        let request = client
            .build_request("/clips/followed", None::<&NoParams>)
            .expect("request");
        assert!(request.header("Authorization").is_none());
        assert!(request.header("User-Agent").is_none());
    }

    #[test]
    fn params_become_sorted_query() {
        let params = Params(vec![("period", "week"), ("limit", "10")]);
        let request = client()
            .build_request("/clips/top", Some(&params))
            .expect("request");

        assert_eq!(request.url().query(), Some("limit=10&period=week"));
    }

    #[test]
    fn params_without_pairs_leave_no_query() {
        let request = client()
            .build_request("/clips/top", Some(&NoParams))
            .expect("request");
        assert_eq!(request.url().query(), None);
    }

    #[test]
    fn base_url_override() {
        let client = KrakenClient::builder("cid")
            .base_url("http://127.0.0.1:8080/")
            .build(())
            .expect("client");

        let request = client
            .build_request("/clips/top", None::<&NoParams>)
            .expect("request");
        assert_eq!(request.url().as_str(), "http://127.0.0.1:8080/clips/top");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = KrakenClient::builder("cid")
            .base_url("not a url")
            .build(())
            .expect_err("invalid url");
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[test]
    fn debug_redacts_token() {
        let client = KrakenClient::builder("cid")
            .access_token("super-secret")
            .build(())
            .expect("client");

        let debug = format!("{client:?}");
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("super-secret"));
    }

    #[test]
    fn into_result_by_status() {
        let ok = ApiResponse {
            status_code: 200,
            error: None,
            data: Some(7),
        };
        assert_eq!(ok.into_result(), Ok(7));

        let rejected = ApiResponse::<u32> {
            status_code: 404,
            error: Some(ApiError {
                error: "Not Found".to_string(),
                status: 404,
                message: "Clip does not exist".to_string(),
            }),
            data: None,
        };
        assert!(rejected.is_error());
        let failure = rejected.into_result().expect_err("rejected");
        assert_eq!(
            failure.to_string(),
            "API rejected the request: 404 Not Found: Clip does not exist"
        );

        let server = ApiResponse::<u32> {
            status_code: 503,
            error: None,
            data: None,
        };
        assert_eq!(
            server.into_result(),
            Err(ApiFailure::Server { status: 503 })
        );
    }
}
