#![allow(unreachable_pub)]

//! # Macros
//!
//! Procedural macros shared by the scaffolding workspace.
//!
//! The only macro exported today is [`macro@scaffold_error`], used by every
//! library crate to declare its error enum with consistent context handling.
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! ssgen-derive.workspace = true
//! thiserror.workspace = true
//! ```

mod error;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Attribute macro for declaring a crate-level error enum.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]` unless already present.
/// * **Context Support**: Generates a companion `<Name>Ext` trait adding `.context(...)` to
///   `Result<T, Name>` and to `Result<T, Source>` for every convertible source type.
/// * **Conversions**: Implements `From<Source>` for variants made of exactly a `source` field
///   and a `context` field, so `?` works on upstream errors.
/// * **Internal Fallback**: Implements `From<&'static str>` and `From<String>` when an
///   `Internal { message, context }` variant is present.
/// * **Formatting Helper**: Emits `format_context(..)` for use in `#[error(...)]` strings.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum** whose variants all have named fields.
/// 2. A `context` field must be typed `Option<Cow<'static, str>>`.
/// 3. Variants with a `source` field (or a field marked `#[source]`/`#[from]`) must also
///    carry a `context` field.
/// 4. Two convertible variants cannot share a source type.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[ssgen_derive::scaffold_error]
/// pub enum RegistryError {
///     #[error("I/O error{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Registry entry is malformed: {line}")]
///     Malformed { line: String },
/// }
///
/// fn load(path: &std::path::Path) -> Result<String, RegistryError> {
///     std::fs::read_to_string(path).context("Reading registry")
/// }
/// ```
#[proc_macro_attribute]
pub fn scaffold_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    error::expand(input).into()
}
