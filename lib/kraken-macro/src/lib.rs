//! Procedural macros for the kraken Twitch clips client.
//!
//! This crate provides `#[derive(Query)]`, which turns a parameter struct into
//! query string pairs. Keys and default values are fixed at compile time, so
//! nothing is inspected at runtime beyond each field's value.
//!
//! # Example
//!
//! ```ignore
//! use kraken::Query;
//!
//! #[derive(Query)]
//! pub struct FollowedClipsParams {
//!     pub cursor: String,
//!     #[query(default = 10)]
//!     pub limit: u32,
//!     pub trending: bool,
//! }
//! ```

mod query_derive;

use proc_macro::TokenStream;

/// Derive the `ToQueryPairs` trait for a struct.
///
/// Every field type must implement `kraken::QueryValue`. A field whose value
/// is zero (empty string, `0`, `None`) is replaced by its default, or left
/// out when it has none. Booleans are never zero.
///
/// # Struct Attributes
///
/// - `#[query(rename_all = "camelCase")]` - Rename all fields using a case convention
///
/// Supported case conventions:
/// - `lowercase`, `UPPERCASE`
/// - `camelCase`, `PascalCase`
/// - `snake_case`, `SCREAMING_SNAKE_CASE`
/// - `kebab-case`, `SCREAMING-KEBAB-CASE`
///
/// # Field Attributes
///
/// - `#[query(rename = "name")]` - Use a different name in the query string (overrides `rename_all`)
/// - `#[query(default = "week")]` - Value sent when the field is zero; string,
///   integer, float and bool literals are accepted
/// - `#[query(skip)]` - Never send this field
///
/// # Example
///
/// ```ignore
/// use kraken::Query;
///
/// #[derive(Query)]
/// #[query(rename_all = "snake_case")]
/// struct TopClipsParams {
///     channel: String,               // omitted when empty
///     #[query(default = 10)]
///     limit: u32,                    // "limit=10" when left at 0
///     #[query(default = "week")]
///     period: Option<Period>,        // "period=week" when None
///     trending: bool,                // always sent
/// }
/// ```
#[proc_macro_derive(Query, attributes(query))]
pub fn derive_query(input: TokenStream) -> TokenStream {
    query_derive::expand_query_derive(input.into())
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
