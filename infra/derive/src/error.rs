use fxhash::{FxHashMap, FxHashSet};
use proc_macro2::TokenStream;
use quote::{ToTokens, format_ident, quote};
use syn::{Attribute, Data, DeriveInput, Field, Fields, Ident, Type, Visibility};

const CONTEXT_FIELD: &str = "context";
const SOURCE_FIELD: &str = "source";
const MESSAGE_FIELD: &str = "message";
const INTERNAL_VARIANT: &str = "Internal";

/// Accepted spellings of `Option<Cow<'static, str>>`, compared with whitespace removed.
const CONTEXT_TYPES: &[&str] = &[
    "Option<Cow<'static,str>>",
    "Option<std::borrow::Cow<'static,str>>",
    "Option<::std::borrow::Cow<'static,str>>",
    "std::option::Option<std::borrow::Cow<'static,str>>",
];

pub(crate) fn expand(input: DeriveInput) -> TokenStream {
    match ErrorEnum::parse(&input) {
        Ok(model) => model.render(&input),
        Err(err) => err.to_compile_error(),
    }
}

struct ErrorEnum<'a> {
    ident: &'a Ident,
    vis: &'a Visibility,
    ext: Ident,
    variants: Vec<ErrorVariant<'a>>,
    derives: FxHashSet<String>,
}

struct ErrorVariant<'a> {
    ident: &'a Ident,
    cfg: Vec<&'a Attribute>,
    has_context: bool,
    source: Option<&'a Field>,
    field_count: usize,
    has_message: bool,
}

impl ErrorVariant<'_> {
    /// A variant converts from its source only when it holds nothing else.
    fn is_convertible(&self) -> bool {
        self.source.is_some() && self.has_context && self.field_count == 2 && !self.is_internal()
    }

    fn is_internal(&self) -> bool {
        self.ident == INTERNAL_VARIANT
    }
}

impl<'a> ErrorEnum<'a> {
    fn parse(input: &'a DeriveInput) -> syn::Result<Self> {
        let Data::Enum(data) = &input.data else {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "scaffold_error can only be applied to enums",
            ));
        };

        let mut errors: Option<syn::Error> = None;
        let mut push = |err: syn::Error| match errors.as_mut() {
            Some(acc) => acc.combine(err),
            None => errors = Some(err),
        };

        let mut variants = Vec::with_capacity(data.variants.len());
        for variant in &data.variants {
            let Fields::Named(fields) = &variant.fields else {
                push(syn::Error::new_spanned(
                    &variant.ident,
                    "scaffold_error requires named fields on every variant",
                ));
                continue;
            };

            let mut has_context = false;
            let mut has_message = false;
            let mut source = None;
            for field in &fields.named {
                let Some(name) = &field.ident else { continue };
                if name == CONTEXT_FIELD {
                    if is_context_type(&field.ty) {
                        has_context = true;
                    } else {
                        push(syn::Error::new_spanned(
                            &field.ty,
                            "context field must be Option<Cow<'static, str>>",
                        ));
                    }
                } else if name == MESSAGE_FIELD {
                    has_message = true;
                }
                if name == SOURCE_FIELD || has_attr(field, "source") || has_attr(field, "from") {
                    source = Some(field);
                }
            }

            if source.is_some() && !has_context {
                push(syn::Error::new_spanned(
                    &variant.ident,
                    "variants with a source require `context: Option<Cow<'static, str>>`",
                ));
            }

            variants.push(ErrorVariant {
                ident: &variant.ident,
                cfg: variant.attrs.iter().filter(|attr| attr.path().is_ident("cfg")).collect(),
                has_context,
                source,
                field_count: fields.named.len(),
                has_message,
            });
        }

        let mut seen: FxHashMap<String, &Ident> = FxHashMap::default();
        for variant in variants.iter().filter(|v| v.is_convertible()) {
            let Some(field) = variant.source else { continue };
            let key = normalized(&field.ty);
            if let Some(previous) = seen.insert(key, variant.ident) {
                push(syn::Error::new_spanned(
                    variant.ident,
                    format!("source type is already converted into `{previous}`"),
                ));
            }
        }

        if let Some(err) = errors {
            return Err(err);
        }

        Ok(Self {
            ident: &input.ident,
            vis: &input.vis,
            ext: format_ident!("{}Ext", input.ident),
            variants,
            derives: derived_traits(&input.attrs),
        })
    }

    fn render(&self, input: &DeriveInput) -> TokenStream {
        let mut derives = Vec::new();
        if !self.derives.contains("Debug") {
            derives.push(quote! { Debug });
        }
        if !self.derives.contains("Error") {
            derives.push(quote! { ::thiserror::Error });
        }
        let derive_attr = if derives.is_empty() {
            TokenStream::new()
        } else {
            quote! { #[derive(#(#derives),*)] }
        };

        let ext_trait = self.render_ext_trait();
        let conversions = self.render_conversions();
        let internal = self.render_internal();

        quote! {
            #[allow(non_shorthand_field_patterns)]
            #derive_attr
            #input

            #ext_trait
            #conversions
            #internal

            #[allow(dead_code, clippy::ref_option)]
            fn format_context(
                context: &Option<::std::borrow::Cow<'static, str>>,
            ) -> ::std::borrow::Cow<'static, str> {
                context.as_ref().map_or(::std::borrow::Cow::Borrowed(""), |c| {
                    ::std::borrow::Cow::Owned(format!(" ({c})"))
                })
            }
        }
    }

    fn render_ext_trait(&self) -> TokenStream {
        let Self { ident, vis, ext, .. } = self;
        let arms = self.variants.iter().filter(|v| v.has_context).map(|v| {
            let cfg = &v.cfg;
            let variant = v.ident;
            quote! { #(#cfg)* #ident::#variant { context: slot, .. } => *slot = Some(context.into()), }
        });

        quote! {
            /// Attaches a human-readable context to a failed result.
            #vis trait #ext<T> {
                /// Records `context` on the error, replacing any previous one.
                ///
                /// # Errors
                /// Returns the original error, converted and annotated.
                fn context(
                    self,
                    context: impl Into<::std::borrow::Cow<'static, str>>,
                ) -> ::std::result::Result<T, #ident>;
            }

            #[automatically_derived]
            impl<T> #ext<T> for ::std::result::Result<T, #ident> {
                #[inline]
                fn context(self, context: impl Into<::std::borrow::Cow<'static, str>>) -> Self {
                    self.map_err(|mut err| {
                        match &mut err {
                            #(#arms)*
                            _ => {}
                        }
                        err
                    })
                }
            }
        }
    }

    fn render_conversions(&self) -> TokenStream {
        let Self { ident, ext, .. } = self;
        let impls = self.variants.iter().filter(|v| v.is_convertible()).filter_map(|v| {
            let field = v.source?;
            let binding = field.ident.as_ref()?;
            let ty = &field.ty;
            let cfg = &v.cfg;
            let variant = v.ident;

            Some(quote! {
                #(#cfg)*
                #[automatically_derived]
                impl From<#ty> for #ident {
                    #[inline]
                    fn from(#binding: #ty) -> Self {
                        Self::#variant { #binding, context: None }
                    }
                }

                #(#cfg)*
                #[automatically_derived]
                impl<T> #ext<T> for ::std::result::Result<T, #ty> {
                    #[inline]
                    fn context(
                        self,
                        context: impl Into<::std::borrow::Cow<'static, str>>,
                    ) -> ::std::result::Result<T, #ident> {
                        self.map_err(|#binding| #ident::#variant {
                            #binding,
                            context: Some(context.into()),
                        })
                    }
                }
            })
        });

        quote! { #(#impls)* }
    }

    fn render_internal(&self) -> TokenStream {
        let ident = self.ident;
        let Some(internal) = self
            .variants
            .iter()
            .find(|v| v.is_internal() && v.has_message && v.has_context && v.field_count == 2)
        else {
            return TokenStream::new();
        };
        let cfg = &internal.cfg;

        quote! {
            #(#cfg)*
            #[automatically_derived]
            impl From<&'static str> for #ident {
                #[inline]
                fn from(message: &'static str) -> Self {
                    Self::Internal { message: ::std::borrow::Cow::Borrowed(message), context: None }
                }
            }

            #(#cfg)*
            #[automatically_derived]
            impl From<String> for #ident {
                #[inline]
                fn from(message: String) -> Self {
                    Self::Internal { message: ::std::borrow::Cow::Owned(message), context: None }
                }
            }
        }
    }
}

fn has_attr(field: &Field, name: &str) -> bool {
    field.attrs.iter().any(|attr| attr.path().is_ident(name))
}

fn normalized(tokens: &impl ToTokens) -> String {
    tokens.to_token_stream().to_string().chars().filter(|c| !c.is_whitespace()).collect()
}

fn is_context_type(ty: &Type) -> bool {
    let spelled = normalized(ty);
    CONTEXT_TYPES.contains(&spelled.as_str())
}

fn derived_traits(attrs: &[Attribute]) -> FxHashSet<String> {
    let mut traits = FxHashSet::default();

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("derive")) {
        let _ = attr.parse_nested_meta(|meta| {
            if let Some(segment) = meta.path.segments.last() {
                traits.insert(segment.ident.to_string());
            }
            Ok(())
        });
    }

    traits
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn expand_to_string(input: DeriveInput) -> String {
        expand(input).to_string()
    }

    #[test]
    fn test_rejects_structs() {
        let out = expand_to_string(parse_quote! {
            pub struct NotAnEnum { message: String }
        });
        assert!(out.contains("compile_error"));
        assert!(out.contains("can only be applied to enums"));
    }

    #[test]
    fn test_rejects_tuple_variants() {
        let out = expand_to_string(parse_quote! {
            pub enum DemoError {
                #[error("IO error: {0}")]
                Io(std::io::Error),
            }
        });
        assert!(out.contains("requires named fields"));
    }

    #[test]
    fn test_rejects_source_without_context() {
        let out = expand_to_string(parse_quote! {
            pub enum DemoError {
                #[error("IO error: {source}")]
                Io { source: std::io::Error },
            }
        });
        assert!(out.contains("variants with a source require"));
    }

    #[test]
    fn test_rejects_bad_context_type() {
        let out = expand_to_string(parse_quote! {
            pub enum DemoError {
                #[error("Internal: {message}")]
                Internal { message: String, context: Option<String> },
            }
        });
        assert!(out.contains("context field must be"));
    }

    #[test]
    fn test_rejects_duplicate_sources() {
        let out = expand_to_string(parse_quote! {
            pub enum DemoError {
                #[error("read")]
                Read { source: std::io::Error, context: Option<Cow<'static, str>> },
                #[error("write")]
                Write { source: std::io::Error, context: Option<Cow<'static, str>> },
            }
        });
        assert!(out.contains("already converted into `Read`"));
    }

    #[test]
    fn test_reports_every_violation() {
        let out = expand_to_string(parse_quote! {
            pub enum DemoError {
                First(String),
                Second(String),
            }
        });
        assert_eq!(out.matches("compile_error").count(), 2);
    }

    #[test]
    fn test_skips_from_for_variants_with_extra_fields() {
        let out = expand_to_string(parse_quote! {
            pub enum DemoError {
                #[error("registry")]
                Registry {
                    path: std::path::PathBuf,
                    source: std::io::Error,
                    context: Option<Cow<'static, str>>,
                },
            }
        });
        assert!(!out.contains("compile_error"));
        assert!(!out.contains("impl From < std :: io :: Error >"));
        assert!(out.contains("trait DemoErrorExt"));
    }

    #[test]
    fn test_keeps_existing_derives() {
        let out = expand_to_string(parse_quote! {
            #[derive(Debug)]
            pub enum DemoError {
                #[error("Internal{}: {message}", format_context(.context))]
                Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
            }
        });
        assert_eq!(out.matches("Debug").count(), 1);
        assert!(out.contains(":: thiserror :: Error"));
        assert!(out.contains("impl From < & 'static str > for DemoError"));
    }
}
