//! The transport seam.
//!
//! The API client never talks to the network itself: it hands every
//! [`Request`] to an [`HttpClient`]. The `kraken` crate ships a hyper-based
//! implementation, tests plug in fakes.

use std::future::Future;
use std::sync::Arc;

use crate::{Request, Response, Result};

/// Core HTTP transport trait.
///
/// Implementations execute a single request and buffer the whole response
/// body. Non-2xx statuses are *not* errors at this level: they come back as a
/// [`Response`] like any other.
///
/// # Example
///
/// ```
/// use kraken_core::{HttpClient, Request, Response, Result};
/// use std::collections::HashMap;
///
/// struct Canned;
///
/// impl HttpClient for Canned {
///     async fn execute(&self, _request: Request) -> Result<Response> {
///         Ok(Response::new(200, HashMap::new(), bytes::Bytes::from_static(b"{}")))
///     }
/// }
/// ```
pub trait HttpClient: Send + Sync {
    /// Execute an HTTP request and return the response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request could not be completed:
    /// - Network errors
    /// - TLS errors
    /// - Timeouts
    fn execute(&self, request: Request) -> impl Future<Output = Result<Response>> + Send;
}

impl<T: HttpClient + ?Sized> HttpClient for &T {
    fn execute(&self, request: Request) -> impl Future<Output = Result<Response>> + Send {
        (**self).execute(request)
    }
}

impl<T: HttpClient + ?Sized> HttpClient for Arc<T> {
    fn execute(&self, request: Request) -> impl Future<Output = Result<Response>> + Send {
        (**self).execute(request)
    }
}
