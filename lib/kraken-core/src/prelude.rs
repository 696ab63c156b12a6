//! Prelude module for convenient imports.
//!
//! ```ignore
//! use kraken_core::prelude::*;
//! ```

pub use crate::{
    Error, HttpClient, QueryValue, Request, RequestBuilder, Response, Result, ToQueryPairs,
    from_json, to_query_string,
};
