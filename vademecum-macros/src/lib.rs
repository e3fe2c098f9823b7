//! Derive macros for Vademecum's compile-time service wiring.
//!
//! - `#[derive(Context)]` turns every field of the application context into
//!   something a service can ask for.
//! - `#[derive(FromContext)]` builds a service by asking the context for each
//!   of its fields.
//!
//! Both expand to implementations of `crate::FromRef`, so the trait must be
//! reachable at the root of the consuming crate.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::token::Comma;
use syn::{parse_macro_input, Data, DeriveInput, Field, Fields};

/// Generates `impl FromRef<Ctx> for FieldType` for each named field.
///
/// ```ignore
/// #[derive(Context, Clone)]
/// pub struct Context {
///     pub catalog: AppCatalog,
///     pub config: AppConfig,
/// }
///
/// // impl FromRef<Context> for AppCatalog { ... ctx.catalog.clone() }
/// // impl FromRef<Context> for AppConfig { ... ctx.config.clone() }
/// ```
///
/// Field types must be `Clone` and distinct from each other.
#[proc_macro_derive(Context)]
pub fn derive_context(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_context(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Generates `impl FromRef<Ctx> for Service`, resolving each field from `Ctx`.
///
/// The context type defaults to `Context`; override it with
/// `#[from_context(Context = "path::To::Ctx")]`.
///
/// ```ignore
/// #[derive(FromContext, Clone)]
/// pub struct QueryService {
///     catalog: AppCatalog,
/// }
/// ```
#[proc_macro_derive(FromContext, attributes(from_context))]
pub fn derive_from_context(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_from_context(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand_context(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let impls = named_fields(input, "Context")?.iter().map(|field| {
        let ident = &field.ident;
        let ty = &field.ty;
        quote! {
            impl #impl_generics crate::FromRef<#name #ty_generics> for #ty #where_clause {
                fn from_ref(ctx: &#name #ty_generics) -> Self {
                    ctx.#ident.clone()
                }
            }
        }
    });

    Ok(quote! { #(#impls)* })
}

fn expand_from_context(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let ctx = context_type(input)?;

    let inits = named_fields(input, "FromContext")?.iter().map(|field| {
        let ident = &field.ident;
        let ty = &field.ty;
        quote! { #ident: <#ty as crate::FromRef<#ctx>>::from_ref(ctx) }
    });

    Ok(quote! {
        impl #impl_generics crate::FromRef<#ctx> for #name #ty_generics #where_clause {
            fn from_ref(ctx: &#ctx) -> Self {
                Self { #(#inits),* }
            }
        }
    })
}

fn named_fields<'a>(
    input: &'a DeriveInput,
    derive: &str,
) -> syn::Result<&'a Punctuated<Field, Comma>> {
    match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => Ok(&fields.named),
            _ => Err(syn::Error::new_spanned(
                input,
                format!("{derive} needs a struct with named fields"),
            )),
        },
        _ => Err(syn::Error::new_spanned(
            input,
            format!("{derive} can only be derived for structs"),
        )),
    }
}

fn context_type(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let mut ctx: Option<syn::Type> = None;

    for attr in input.attrs.iter().filter(|a| a.path().is_ident("from_context")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("Context") {
                let value: syn::LitStr = meta.value()?.parse()?;
                ctx = Some(value.parse()?);
                Ok(())
            } else {
                Err(meta.error("expected `Context = \"Type\"`"))
            }
        })?;
    }

    Ok(match ctx {
        Some(ty) => quote! { #ty },
        None => quote! { Context },
    })
}
