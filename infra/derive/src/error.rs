use fxhash::FxHashSet;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Attribute, Data, DeriveInput, Field, Fields, FieldsNamed, Ident, Type, Variant};

/// What the expansion needs to know about a single enum variant.
struct ErrorVariant<'a> {
    ident: &'a Ident,
    source: Option<&'a Field>,
    has_context: bool,
    cfg: Vec<Attribute>,
}

impl ErrorVariant<'_> {
    fn is_internal(&self) -> bool {
        self.ident == "Internal"
    }
}

pub(crate) fn expand(input: DeriveInput) -> TokenStream {
    let Data::Enum(data) = &input.data else {
        return quote! { compile_error!("cdmi_error can only be applied to enums"); };
    };

    let variants = match data.variants.iter().map(analyze).collect::<Result<Vec<_>, _>>() {
        Ok(variants) => variants,
        Err(err) => return err.to_compile_error(),
    };

    if let Some(orphan) = variants.iter().find(|v| v.source.is_some() && !v.has_context) {
        return syn::Error::new_spanned(
            orphan.ident,
            "cdmi_error variants with a source need `context: Option<Cow<'static, str>>`",
        )
        .to_compile_error();
    }

    let name = &input.ident;
    let ext = format_ident!("{name}Ext");

    let derives = missing_derives(&input);
    let context_trait = context_trait(name, &ext, &variants);
    let conversions = variants
        .iter()
        .filter(|v| !v.is_internal())
        .filter_map(|v| source_conversion(name, &ext, v));
    let internal = variants.iter().find(|v| v.is_internal()).map(|v| internal_conversion(name, v));

    quote! {
        #[allow(non_shorthand_field_patterns)]
        #derives
        #input

        #context_trait
        #(#conversions)*
        #internal

        #[allow(dead_code)]
        fn format_context(context: &Option<std::borrow::Cow<'static, str>>) -> std::borrow::Cow<'static, str> {
            match context {
                Some(c) => std::borrow::Cow::Owned(format!(" ({c})")),
                None => std::borrow::Cow::Borrowed(""),
            }
        }
    }
}

fn analyze(variant: &Variant) -> Result<ErrorVariant<'_>, syn::Error> {
    let Fields::Named(fields) = &variant.fields else {
        return Err(syn::Error::new_spanned(
            variant,
            "cdmi_error expects struct-like variants with named fields",
        ));
    };

    Ok(ErrorVariant {
        ident: &variant.ident,
        source: source_field(fields),
        has_context: context_field(fields)?.is_some(),
        cfg: variant.attrs.iter().filter(|a| a.path().is_ident("cfg")).cloned().collect(),
    })
}

fn context_field(fields: &FieldsNamed) -> Result<Option<&Field>, syn::Error> {
    let Some(field) = fields.named.iter().find(|f| f.ident.as_ref().is_some_and(|i| i == "context"))
    else {
        return Ok(None);
    };

    if is_optional_static_cow(&field.ty) {
        Ok(Some(field))
    } else {
        Err(syn::Error::new_spanned(&field.ty, "context must be Option<Cow<'static, str>>"))
    }
}

fn source_field(fields: &FieldsNamed) -> Option<&Field> {
    fields.named.iter().find(|field| {
        field.ident.as_ref().is_some_and(|i| i == "source")
            || field.attrs.iter().any(|a| a.path().is_ident("source") || a.path().is_ident("from"))
    })
}

fn missing_derives(input: &DeriveInput) -> TokenStream {
    let mut present = FxHashSet::default();
    for attr in input.attrs.iter().filter(|a| a.path().is_ident("derive")) {
        let _ = attr.parse_nested_meta(|meta| {
            if let Some(last) = meta.path.segments.last() {
                present.insert(last.ident.to_string());
            }
            Ok(())
        });
    }

    let mut wanted = Vec::new();
    if !present.contains("Debug") {
        wanted.push(quote! { Debug });
    }
    if !present.contains("Error") {
        wanted.push(quote! { ::thiserror::Error });
    }

    if wanted.is_empty() { quote! {} } else { quote! { #[derive(#(#wanted),*)] } }
}

fn context_trait(name: &Ident, ext: &Ident, variants: &[ErrorVariant<'_>]) -> TokenStream {
    let arms = variants.iter().filter(|v| v.has_context).map(|v| {
        let ident = v.ident;
        let cfg = &v.cfg;
        quote! { #(#cfg)* #name::#ident { context: slot, .. } => *slot = Some(context.into()), }
    });

    quote! {
        pub trait #ext<T> {
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> Result<T, #name>;
        }

        #[automatically_derived]
        impl<T> #ext<T> for Result<T, #name> {
            #[inline]
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> Self {
                self.map_err(|mut err| {
                    match &mut err {
                        #( #arms )*
                        _ => {}
                    }
                    err
                })
            }
        }
    }
}

fn source_conversion(name: &Ident, ext: &Ident, v: &ErrorVariant<'_>) -> Option<TokenStream> {
    let field = v.source?;
    let field_ident = field.ident.as_ref()?;
    let ty = &field.ty;
    let ident = v.ident;
    let cfg = &v.cfg;

    Some(quote! {
        #(#cfg)*
        #[automatically_derived]
        impl From<#ty> for #name {
            #[inline]
            fn from(#field_ident: #ty) -> Self {
                Self::#ident { #field_ident, context: None }
            }
        }

        #(#cfg)*
        impl<T> #ext<T> for std::result::Result<T, #ty> {
            #[inline]
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> std::result::Result<T, #name> {
                self.map_err(|#field_ident| #name::#ident { #field_ident, context: Some(context.into()) })
            }
        }
    })
}

fn internal_conversion(name: &Ident, v: &ErrorVariant<'_>) -> TokenStream {
    let cfg = &v.cfg;
    quote! {
        #(#cfg)*
        impl From<&'static str> for #name {
            #[inline]
            fn from(s: &'static str) -> Self {
                Self::Internal { message: std::borrow::Cow::Borrowed(s), context: None }
            }
        }

        #(#cfg)*
        impl From<String> for #name {
            #[inline]
            fn from(s: String) -> Self {
                Self::Internal { message: std::borrow::Cow::Owned(s), context: None }
            }
        }
    }
}

/// Matches `Option<Cow<'static, str>>` by its last path segments.
fn is_optional_static_cow(ty: &Type) -> bool {
    let Some(inner) = single_generic(ty, "Option") else {
        return false;
    };
    let Type::Path(path) = inner else {
        return false;
    };
    let Some(seg) = path.path.segments.last() else {
        return false;
    };
    if seg.ident != "Cow" {
        return false;
    }
    let syn::PathArguments::AngleBracketed(args) = &seg.arguments else {
        return false;
    };

    let mut args = args.args.iter();
    let lifetime_ok =
        matches!(args.next(), Some(syn::GenericArgument::Lifetime(lt)) if lt.ident == "static");
    let str_ok = matches!(
        args.next(),
        Some(syn::GenericArgument::Type(Type::Path(p)))
            if p.path.segments.last().is_some_and(|s| s.ident == "str")
    );
    lifetime_ok && str_ok
}

fn single_generic<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let seg = path.path.segments.last()?;
    if seg.ident != wrapper {
        return None;
    }
    let syn::PathArguments::AngleBracketed(args) = &seg.arguments else {
        return None;
    };
    match args.args.first()? {
        syn::GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_context_type() {
        let ok: Type = syn::parse_quote!(Option<std::borrow::Cow<'static, str>>);
        let wrong_lifetime: Type = syn::parse_quote!(Option<Cow<'a, str>>);
        let not_option: Type = syn::parse_quote!(Cow<'static, str>);

        assert!(is_optional_static_cow(&ok));
        assert!(!is_optional_static_cow(&wrong_lifetime));
        assert!(!is_optional_static_cow(&not_option));
    }

    #[test]
    fn rejects_tuple_variants() {
        let input: DeriveInput = syn::parse_quote! {
            enum Broken {
                #[error("io")]
                Io(std::io::Error),
            }
        };
        let out = expand(input).to_string();
        assert!(out.contains("compile_error"));
    }

    #[test]
    fn rejects_source_without_context() {
        let input: DeriveInput = syn::parse_quote! {
            enum Broken {
                #[error("io")]
                Io { source: std::io::Error },
            }
        };
        let out = expand(input).to_string();
        assert!(out.contains("compile_error"));
    }
}
