//! Async client for the Twitch v5 ("Kraken") clip endpoints.
//!
//! A [`KrakenClient`] holds the credentials and sends GET requests through
//! an injectable [`HttpClient`]. The default transport is [`HyperClient`],
//! composable with Tower layers.
//!
//! # Example
//!
//! ```ignore
//! use kraken::prelude::*;
//!
//! let client = KrakenClient::builder("my-client-id")
//!     .user_agent("clip-bot/1.0")
//!     .build_default()?;
//!
//! let response = client
//!     .get_top_clips(&TopClipsParams {
//!         channel: "summit1g".to_string(),
//!         period: Some(Period::All),
//!         ..TopClipsParams::default()
//!     })
//!     .await?;
//!
//! match response.into_result() {
//!     Ok(page) => println!("{} clips", page.clips.len()),
//!     Err(failure) => eprintln!("{failure}"),
//! }
//! ```

// lets `#[derive(Query)]` expand to `::kraken::...` inside this crate too
extern crate self as kraken;

mod api;
mod clips;
pub mod middleware;
pub mod prelude;
mod transport;

pub use api::{
    ACCEPT_HEADER, ApiError, ApiFailure, ApiResponse, DEFAULT_BASE_URL, KrakenClient,
    KrakenClientBuilder, NoParams,
};
pub use clips::{
    Clip, ClipResponse, ClipThumbnails, ClipUser, ClipVod, ClipsResponse, FollowedClipsParams,
    ManyClips, Period, TopClipsParams,
};
pub use transport::{BoxedService, HyperClient, HyperClientBuilder};

// Re-export tower for middleware composition
pub use tower;

// Re-export core types
pub use kraken_core::{
    Error, HttpClient, QueryValue, Request, RequestBuilder, Response, Result, StatusCode,
    ToQueryPairs, from_json, header, to_query_string,
};

pub use kraken_macro::Query;
