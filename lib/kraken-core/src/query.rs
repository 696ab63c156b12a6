//! Parameter structs to query strings.
//!
//! `#[derive(Query)]` resolves every field to a `(key, default)` pair at
//! compile time and implements [`ToQueryPairs`]. At runtime each field only
//! answers two questions through [`QueryValue`]: is it zero, and how does it
//! render. A zero field falls back to its declared default, or is left out
//! when it has none.

use std::borrow::Cow;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Bytes left as-is in a query key or value; everything else is escaped.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// A value that can be sent as a single query parameter.
pub trait QueryValue {
    /// Whether the value counts as "not set".
    fn is_zero(&self) -> bool;

    /// The unencoded query representation.
    fn to_query_value(&self) -> String;
}

/// Types that can be converted to query parameter pairs.
///
/// This is automatically implemented by the `#[derive(Query)]` macro.
///
/// # Example
///
/// ```ignore
/// use kraken::Query;
///
/// #[derive(Query)]
/// struct SearchParams {
///     channel: String,
///     #[query(default = 10)]
///     limit: u32,
///     #[query(rename = "trending")]
///     trending_only: bool,
/// }
/// ```
pub trait ToQueryPairs {
    /// Convert this type to a vector of key-value pairs for query parameters.
    fn to_query_pairs(&self) -> Vec<(String, String)>;
}

impl<T: ToQueryPairs + ?Sized> ToQueryPairs for &T {
    fn to_query_pairs(&self) -> Vec<(String, String)> {
        (**self).to_query_pairs()
    }
}

/// Form-urlencode the pairs of `params`, sorted by key.
///
/// Pairs sharing a key keep their relative order. Only ASCII alphanumerics
/// and `-._~` are left unescaped and a space becomes `+`, so `*` is sent as
/// `%2A` and `~` as itself.
///
/// # Example
///
/// ```
/// use kraken_core::{ToQueryPairs, to_query_string};
///
/// struct Params;
///
/// impl ToQueryPairs for Params {
///     fn to_query_pairs(&self) -> Vec<(String, String)> {
///         vec![
///             ("period".to_string(), "week".to_string()),
///             ("game".to_string(), "Sea of Thieves".to_string()),
///         ]
///     }
/// }
///
/// assert_eq!(to_query_string(&Params), "game=Sea+of+Thieves&period=week");
/// ```
#[must_use]
pub fn to_query_string<Q: ToQueryPairs + ?Sized>(params: &Q) -> String {
    let mut pairs = params.to_query_pairs();
    pairs.sort_by(|(a, _), (b, _)| a.cmp(b));

    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", encode_component(key), encode_component(value)))
        .collect::<Vec<_>>()
        .join("&")
}

// `%` is always escaped, so `%20` in the output can only come from a space.
fn encode_component(raw: &str) -> String {
    utf8_percent_encode(raw, QUERY_COMPONENT)
        .to_string()
        .replace("%20", "+")
}

impl QueryValue for str {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn to_query_value(&self) -> String {
        self.to_owned()
    }
}

impl QueryValue for String {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn to_query_value(&self) -> String {
        self.clone()
    }
}

impl QueryValue for Cow<'_, str> {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn to_query_value(&self) -> String {
        self.to_string()
    }
}

impl QueryValue for char {
    fn is_zero(&self) -> bool {
        false
    }

    fn to_query_value(&self) -> String {
        self.to_string()
    }
}

// A flag is always sent: `false` is a meaningful value, not an absent one.
impl QueryValue for bool {
    fn is_zero(&self) -> bool {
        false
    }

    fn to_query_value(&self) -> String {
        self.to_string()
    }
}

macro_rules! impl_query_value_for_numbers {
    ($zero:literal => $($ty:ty),+ $(,)?) => {
        $(
            impl QueryValue for $ty {
                #[allow(clippy::float_cmp)]
                fn is_zero(&self) -> bool {
                    *self == $zero
                }

                fn to_query_value(&self) -> String {
                    self.to_string()
                }
            }
        )+
    };
}

impl_query_value_for_numbers!(0 => u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);
impl_query_value_for_numbers!(0.0 => f32, f64);

impl<T: QueryValue> QueryValue for Option<T> {
    fn is_zero(&self) -> bool {
        self.as_ref().is_none_or(QueryValue::is_zero)
    }

    fn to_query_value(&self) -> String {
        self.as_ref()
            .map(QueryValue::to_query_value)
            .unwrap_or_default()
    }
}

impl<T: QueryValue + ?Sized> QueryValue for &T {
    fn is_zero(&self) -> bool {
        (**self).is_zero()
    }

    fn to_query_value(&self) -> String {
        (**self).to_query_value()
    }
}
