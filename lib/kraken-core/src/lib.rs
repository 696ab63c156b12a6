//! Core types and traits for the kraken Twitch clips client.
//!
//! This crate provides the foundational types used by `kraken`:
//! - [`Request`] and [`RequestBuilder`] - outbound GET requests
//! - [`Response`] - buffered HTTP response
//! - [`Error`] and [`Result`] - Error handling
//! - [`HttpClient`] - the injectable transport trait
//! - [`ToQueryPairs`] and [`QueryValue`] - parameter structs to query strings
//! - [`StatusCode`] - HTTP status codes (re-exported from `http` crate)
//! - [`header`] - HTTP header names (re-exported from `http` crate)

mod client;
mod error;
pub mod prelude;
mod query;
mod request;
mod response;

pub use client::HttpClient;
pub use error::{Error, Result};
pub use query::{QueryValue, ToQueryPairs, to_query_string};
pub use request::{Request, RequestBuilder};
pub use response::{Response, from_json};

// Re-export http crate types for status codes and headers
pub use http::{StatusCode, header};
