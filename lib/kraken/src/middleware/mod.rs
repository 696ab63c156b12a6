//! Tower middleware for the [`HyperClient`](crate::HyperClient) transport.
//!
//! Any `tower::Layer` whose service speaks [`Request`](crate::Request) /
//! [`Response`](crate::Response) can be stacked with
//! [`HyperClientBuilder::layer`](crate::HyperClientBuilder::layer).
//!
//! # Available Layers
//!
//! - [`LoggingLayer`] - Logs requests/responses using `tracing`
//!
//! # Example
//!
//! ```ignore
//! use kraken::HyperClient;
//! use kraken::middleware::LoggingLayer;
//!
//! let http = HyperClient::builder()
//!     .layer(LoggingLayer::debug())
//!     .build();
//! ```

mod logging;

pub use logging::{LogLevel, Logging, LoggingLayer};

// Re-export tower types for convenience
pub use tower::{Layer, ServiceBuilder};
