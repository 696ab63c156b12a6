//! Query derive macro implementation.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Fields, Lit, parse2};

/// Struct-level options parsed from `#[query(...)]` attributes.
#[derive(Debug, Clone, Default)]
struct QueryStructOptions {
    /// Rename all fields using the given case convention.
    rename_all: Option<RenameRule>,
}

/// Case conversion rules for `rename_all`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::enum_variant_names)]
enum RenameRule {
    LowerCase,
    UpperCase,
    CamelCase,
    PascalCase,
    SnakeCase,
    ScreamingSnakeCase,
    KebabCase,
    ScreamingKebabCase,
}

impl RenameRule {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "lowercase" => Some(Self::LowerCase),
            "UPPERCASE" => Some(Self::UpperCase),
            "camelCase" => Some(Self::CamelCase),
            "PascalCase" => Some(Self::PascalCase),
            "snake_case" => Some(Self::SnakeCase),
            "SCREAMING_SNAKE_CASE" => Some(Self::ScreamingSnakeCase),
            "kebab-case" => Some(Self::KebabCase),
            "SCREAMING-KEBAB-CASE" => Some(Self::ScreamingKebabCase),
            _ => None,
        }
    }

    /// Apply the rule to a Rust field name, which is already `snake_case`.
    fn apply(self, name: &str) -> String {
        match self {
            Self::LowerCase | Self::SnakeCase => name.to_owned(),
            Self::UpperCase | Self::ScreamingSnakeCase => name.to_uppercase(),
            Self::CamelCase => to_camel_case(name),
            Self::PascalCase => to_pascal_case(name),
            Self::KebabCase => name.replace('_', "-"),
            Self::ScreamingKebabCase => name.to_uppercase().replace('_', "-"),
        }
    }
}

fn to_camel_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut capitalize_next = false;
    for c in s.chars() {
        if c == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            result.extend(c.to_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }
    result
}

fn to_pascal_case(s: &str) -> String {
    let camel = to_camel_case(s);
    let mut chars = camel.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Field options parsed from `#[query(...)]` attributes.
#[derive(Debug, Clone, Default)]
struct QueryFieldOptions {
    rename: Option<String>,
    /// Default value, already rendered as it goes on the wire.
    default: Option<String>,
    skip: bool,
}

/// Expand the `#[derive(Query)]` macro.
pub fn expand_query_derive(input: TokenStream) -> syn::Result<TokenStream> {
    let input: DeriveInput = parse2(input)?;
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let struct_options = parse_query_struct_options(&input.attrs)?;

    let fields = match &input.data {
        syn::Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Query derive only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Query derive only supports structs",
            ));
        }
    };

    let mut field_handlers = Vec::new();

    for field in fields {
        let Some(field_name) = field.ident.as_ref() else {
            continue;
        };
        let options = parse_query_field_options(&field.attrs)?;
        if options.skip {
            continue;
        }

        // explicit rename > rename_all > field name
        let raw_name = field_name.to_string();
        let raw_name = raw_name.strip_prefix("r#").unwrap_or(&raw_name);
        let key = if let Some(ref rename) = options.rename {
            rename.clone()
        } else if let Some(rule) = struct_options.rename_all {
            rule.apply(raw_name)
        } else {
            raw_name.to_owned()
        };

        field_handlers.push(generate_field_handler(field_name, &key, &options));
    }

    Ok(quote! {
        impl #impl_generics ::kraken::ToQueryPairs for #name #ty_generics #where_clause {
            fn to_query_pairs(&self) -> ::std::vec::Vec<(::std::string::String, ::std::string::String)> {
                let mut pairs = ::std::vec::Vec::new();
                #(#field_handlers)*
                pairs
            }
        }
    })
}

fn parse_query_struct_options(attrs: &[syn::Attribute]) -> syn::Result<QueryStructOptions> {
    let mut options = QueryStructOptions::default();

    for attr in attrs {
        if !attr.path().is_ident("query") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                let value: syn::LitStr = meta.value()?.parse()?;
                let rule = RenameRule::parse(&value.value()).ok_or_else(|| {
                    syn::Error::new_spanned(
                        &value,
                        format!(
                            "unknown rename_all value: \"{}\". Expected one of: \
                             lowercase, UPPERCASE, camelCase, PascalCase, \
                             snake_case, SCREAMING_SNAKE_CASE, kebab-case, SCREAMING-KEBAB-CASE",
                            value.value()
                        ),
                    )
                })?;
                options.rename_all = Some(rule);
                Ok(())
            } else {
                Err(meta.error("unsupported struct-level query attribute, expected `rename_all`"))
            }
        })?;
    }

    Ok(options)
}

fn parse_query_field_options(attrs: &[syn::Attribute]) -> syn::Result<QueryFieldOptions> {
    let mut options = QueryFieldOptions::default();

    for attr in attrs {
        if !attr.path().is_ident("query") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let value: syn::LitStr = meta.value()?.parse()?;
                options.rename = Some(value.value());
            } else if meta.path.is_ident("default") {
                let value: Lit = meta.value()?.parse()?;
                options.default = Some(default_literal(&value)?);
            } else if meta.path.is_ident("skip") {
                options.skip = true;
            } else {
                return Err(meta.error(
                    "unsupported query attribute, expected `rename`, `default` or `skip`",
                ));
            }
            Ok(())
        })?;
    }

    Ok(options)
}

/// Render a `default = ...` literal the way it is sent on the wire.
fn default_literal(lit: &Lit) -> syn::Result<String> {
    match lit {
        Lit::Str(s) => Ok(s.value()),
        Lit::Int(i) => Ok(i.base10_digits().to_owned()),
        Lit::Float(f) => Ok(f.base10_digits().to_owned()),
        Lit::Bool(b) => Ok(b.value.to_string()),
        other => Err(syn::Error::new_spanned(
            other,
            "query default must be a string, integer, float or bool literal",
        )),
    }
}

fn generate_field_handler(
    field_name: &syn::Ident,
    key: &str,
    options: &QueryFieldOptions,
) -> TokenStream {
    let send_value = quote! {
        pairs.push((
            ::std::string::String::from(#key),
            ::kraken::QueryValue::to_query_value(&self.#field_name),
        ));
    };

    match options.default.as_deref() {
        Some(default) => quote! {
            if ::kraken::QueryValue::is_zero(&self.#field_name) {
                pairs.push((
                    ::std::string::String::from(#key),
                    ::std::string::String::from(#default),
                ));
            } else {
                #send_value
            }
        },
        None => quote! {
            if !::kraken::QueryValue::is_zero(&self.#field_name) {
                #send_value
            }
        },
    }
}
