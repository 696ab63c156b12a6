//! Prelude module for convenient imports.
//!
//! ```ignore
//! use kraken::prelude::*;
//! ```

pub use crate::{
    ApiError, ApiResponse, Clip, ClipsResponse, Error, FollowedClipsParams, HttpClient,
    HyperClient, KrakenClient, ManyClips, Period, Query, QueryValue, Request, Response, Result,
    TopClipsParams, ToQueryPairs,
};
