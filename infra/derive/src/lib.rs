#![allow(unreachable_pub)]

//! # Macros
//!
//! Procedural macros shared by the workspace crates.
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! cdmi-derive.workspace = true
//! thiserror.workspace = true
//! ```

mod error;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Turns a struct-variant enum into the crate-level error type used across the workspace.
///
/// # Generated Items
///
/// * `#[derive(Debug, thiserror::Error)]` unless the enum already derives them.
/// * A `<Name>Ext` trait with `.context(...)`, implemented for `Result<T, Name>` and for
///   `Result<T, Source>` of every variant that carries a `source` field.
/// * `From<Source>` for each such variant (so `?` works on upstream errors).
/// * `From<&'static str>` / `From<String>` when an `Internal { message, context }` variant exists.
/// * A module-local `format_context` helper for use inside `#[error(...)]` strings.
///
/// # Requirements
///
/// 1. Only enums are accepted.
/// 2. Every variant uses named fields; tuple and unit variants are rejected.
/// 3. A variant with a `source` (or a field tagged `#[source]`/`#[from]`) must also carry
///    `context: Option<Cow<'static, str>>`.
///
/// # Example
///
/// ```rust,ignore
/// use cdmi_derive::cdmi_error;
/// use std::borrow::Cow;
///
/// #[cdmi_error]
/// pub enum StoreError {
///     #[error("I/O failure{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Conflict{}: {message}", format_context(.context))]
///     Conflict { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn load(path: &std::path::Path) -> Result<Vec<u8>, StoreError> {
///     std::fs::read(path).context(format!("Cannot read {}", path.display()))
/// }
/// ```
#[proc_macro_attribute]
pub fn cdmi_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    error::expand(input).into()
}
