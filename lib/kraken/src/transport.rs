//! Default transport: hyper-util over rustls, composable with Tower layers.

use std::collections::HashMap;
use std::error::Error as StdError;
use std::future::Future;
use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt, Empty};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::TokioExecutor,
};
use tower::util::BoxCloneSyncService;
use tower::{Layer, Service, ServiceExt, service_fn};

use crate::middleware::LoggingLayer;
use crate::{Error, Request, Response, Result};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_POOL_IDLE_PER_HOST: usize = 8;
const DEFAULT_POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

/// Type-erased transport service, the type every layer wraps.
pub type BoxedService = BoxCloneSyncService<Request, Response, Error>;

type PooledClient = Client<HttpsConnector<HttpConnector>, Empty<Bytes>>;

/// HTTPS connector with Mozilla roots, HTTP/1.1 and HTTP/2.
///
/// Plain `http://` URLs are accepted too, which is what local mock servers use.
fn https_connector(connect_timeout: Duration) -> HttpsConnector<HttpConnector> {
    let mut http = HttpConnector::new();
    http.enforce_http(false);
    http.set_connect_timeout(Some(connect_timeout));

    let root_store: rustls::RootCertStore =
        webpki_roots::TLS_SERVER_ROOTS.iter().cloned().collect();

    let tls_config = rustls::ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();

    HttpsConnectorBuilder::new()
        .with_tls_config(tls_config)
        .https_or_http()
        .enable_http1()
        .enable_http2()
        .wrap_connector(http)
}

fn build_hyper_request(request: Request) -> Result<http::Request<Empty<Bytes>>> {
    let (method, url, headers) = request.into_parts();

    let mut builder = http::Request::builder().method(method).uri(url.as_str());
    for (name, value) in &headers {
        builder = builder.header(name.as_str(), value.as_str());
    }

    builder
        .body(Empty::new())
        .map_err(|e| Error::invalid_request(e.to_string()))
}

/// One GET round trip, body fully buffered.
async fn send(client: &PooledClient, request: Request) -> Result<Response> {
    let response = client
        .request(build_hyper_request(request)?)
        .await
        .map_err(|e| classify_hyper_error(&e))?;

    let status = response.status().as_u16();
    let headers: HashMap<String, String> = response
        .headers()
        .iter()
        .filter_map(|(name, value)| Some((name.to_string(), value.to_str().ok()?.to_string())))
        .collect();
    let body = response
        .into_body()
        .collect()
        .await
        .map_err(|e| Error::connection(e.to_string()))?
        .to_bytes();

    Ok(Response::new(status, headers, body))
}

/// The innermost service; `timeout` covers the round trip including the body.
fn round_trip(client: PooledClient, timeout: Duration) -> BoxedService {
    BoxCloneSyncService::new(service_fn(move |request: Request| {
        let client = client.clone();
        async move {
            match tokio::time::timeout(timeout, send(&client, request)).await {
                Ok(result) => result,
                Err(_) => Err(Error::Timeout),
            }
        }
    }))
}

fn classify_hyper_error(err: &hyper_util::client::legacy::Error) -> Error {
    let message = error_chain(err);
    if is_tls_failure(err) {
        Error::tls(message)
    } else {
        Error::connection(message)
    }
}

fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// rustls failures surface through the connector as connect errors, usually
/// as an `io::Error` wrapping a `rustls::Error`.
fn is_tls_failure(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(cause) = current {
        if cause.is::<rustls::Error>() {
            return true;
        }
        if let Some(io) = cause.downcast_ref::<std::io::Error>()
            && io.get_ref().is_some_and(|inner| inner.is::<rustls::Error>())
        {
            return true;
        }
        current = cause.source();
    }

    let message = error_chain(err).to_ascii_lowercase();
    ["tls", "ssl", "certificate"]
        .iter()
        .any(|marker| message.contains(marker))
}

/// HTTP transport using hyper-util with connection pooling, TLS, and
/// Tower middleware support.
///
/// # Example
///
/// ```ignore
/// use kraken::HyperClient;
/// use std::time::Duration;
///
/// let http = HyperClient::builder()
///     .timeout(Duration::from_secs(10))
///     .with_logging()
///     .build();
/// ```
#[derive(Clone)]
pub struct HyperClient {
    service: BoxedService,
    timeout: Duration,
}

impl std::fmt::Debug for HyperClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperClient")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl HyperClient {
    /// Create a transport with default timeouts and no middleware.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a transport builder.
    #[must_use]
    pub fn builder() -> HyperClientBuilder {
        HyperClientBuilder::default()
    }

    /// The whole-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for HyperClient {
    fn default() -> Self {
        Self::new()
    }
}

impl kraken_core::HttpClient for HyperClient {
    fn execute(&self, request: Request) -> impl Future<Output = Result<Response>> + Send {
        self.service.clone().oneshot(request)
    }
}

type WrapFn = Box<dyn FnOnce(BoxedService) -> BoxedService + Send + Sync>;

/// Builder for [`HyperClient`]: timeouts, pool limits and Tower layers.
///
/// Layers are applied in order: first added = outermost.
pub struct HyperClientBuilder {
    timeout: Duration,
    connect_timeout: Duration,
    pool_idle_per_host: usize,
    pool_idle_timeout: Duration,
    layers: Vec<WrapFn>,
}

impl Default for HyperClientBuilder {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            pool_idle_per_host: DEFAULT_POOL_IDLE_PER_HOST,
            pool_idle_timeout: DEFAULT_POOL_IDLE_TIMEOUT,
            layers: Vec::new(),
        }
    }
}

impl std::fmt::Debug for HyperClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperClientBuilder")
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("pool_idle_per_host", &self.pool_idle_per_host)
            .field("pool_idle_timeout", &self.pool_idle_timeout)
            .field("layers_count", &self.layers.len())
            .finish()
    }
}

impl HyperClientBuilder {
    /// Whole-request timeout, from dispatch to the last body byte. Defaults to 30s.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// TCP connect timeout. Defaults to 10s.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Maximum idle connections kept per host. Defaults to 8.
    #[must_use]
    pub const fn pool_idle_per_host(mut self, count: usize) -> Self {
        self.pool_idle_per_host = count;
        self
    }

    /// How long an idle connection stays in the pool. Defaults to 90s.
    #[must_use]
    pub const fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = timeout;
        self
    }

    /// Add a Tower layer around the transport.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use kraken::HyperClient;
    /// use kraken::middleware::LoggingLayer;
    ///
    /// let http = HyperClient::builder()
    ///     .layer(LoggingLayer::debug())
    ///     .build();
    /// ```
    #[must_use]
    pub fn layer<L>(mut self, layer: L) -> Self
    where
        L: Layer<BoxedService> + Send + Sync + 'static,
        L::Service:
            Service<Request, Response = Response, Error = Error> + Clone + Send + Sync + 'static,
        <L::Service as Service<Request>>::Future: Send + 'static,
    {
        self.layers.push(Box::new(move |service| {
            BoxCloneSyncService::new(layer.layer(service))
        }));
        self
    }

    /// Log one summary line per request.
    #[must_use]
    pub fn with_logging(self) -> Self {
        self.layer(LoggingLayer::new())
    }

    /// Log requests at debug level, headers included (credentials redacted).
    #[must_use]
    pub fn with_debug_logging(self) -> Self {
        self.layer(LoggingLayer::debug())
    }

    /// Build the transport with all configured middleware.
    #[must_use]
    pub fn build(self) -> HyperClient {
        let client = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(self.pool_idle_timeout)
            .pool_max_idle_per_host(self.pool_idle_per_host)
            .build(https_connector(self.connect_timeout));

        let mut service = round_trip(client, self.timeout);
        // wrap from the innermost out
        for wrap in self.layers.into_iter().rev() {
            service = wrap(service);
        }

        HyperClient {
            service,
            timeout: self.timeout,
        }
    }
}
