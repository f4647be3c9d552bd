use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse_macro_input, spanned::Spanned, Data, DeriveInput, Expr, ExprLit, Fields, Ident, Lit,
    Result,
};

struct Variant {
    ident: Ident,
    value: u64,
    fallback: bool,
}

pub fn proc_macro_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> Result<TokenStream2> {
    let DeriveInput { ident, data, generics, .. } = input;
    let data = match data {
        Data::Enum(data) => data,
        _ => return Err(syn::Error::new(ident.span(), "`FieldValue` can only be derived for enums")),
    };
    if !generics.params.is_empty() {
        return Err(syn::Error::new(generics.span(), "`FieldValue` enums cannot be generic"));
    }
    let variants = parse_variants(data.variants.iter())?;
    let bits = bits_for(variants.iter().map(|v| v.value).max().unwrap_or(0));
    let mask = if bits == 64 { u64::MAX } else { (1 << bits) - 1 };
    let fallback = resolve_fallback(ident, &variants, bits)?;
    let arms = variants.iter().filter(|v| v.ident != *fallback).map(|Variant { ident, value, .. }| {
        quote!(#value => Self::#ident,)
    });

    Ok(quote! {
        impl ::bitreg::field::FieldValue for #ident {
            const BITS: u32 = #bits;

            #[inline]
            fn from_bits(bits: u64) -> Self {
                match bits & #mask {
                    #(#arms)*
                    _ => Self::#fallback,
                }
            }

            #[inline]
            fn into_bits(self) -> u64 {
                self as u64
            }
        }
    })
}

fn parse_variants<'a>(variants: impl Iterator<Item = &'a syn::Variant>) -> Result<Vec<Variant>> {
    let mut parsed = Vec::<Variant>::new();
    let mut next = 0_u64;
    for variant in variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new(
                variant.span(),
                "`FieldValue` variants cannot carry data",
            ));
        }
        let value = match &variant.discriminant {
            Some((_, Expr::Lit(ExprLit { lit: Lit::Int(lit), .. }))) => lit.base10_parse::<u64>()?,
            Some((_, expr)) => {
                return Err(syn::Error::new(
                    expr.span(),
                    "discriminant must be an integer literal",
                ));
            }
            None => next,
        };
        if let Some(prev) = parsed.iter().find(|v| v.value == value) {
            return Err(syn::Error::new(
                variant.span(),
                format!("discriminant {} is already used by `{}`", value, prev.ident),
            ));
        }
        let fallback = variant.attrs.iter().any(|attr| attr.path.is_ident("fallback"));
        parsed.push(Variant { ident: variant.ident.clone(), value, fallback });
        next = value.wrapping_add(1);
    }
    Ok(parsed)
}

/// Returns the variant that absorbs bit patterns without a variant of their
/// own.
fn resolve_fallback<'a>(ident: &Ident, variants: &'a [Variant], bits: u32) -> Result<&'a Ident> {
    let mut marked = variants.iter().filter(|v| v.fallback);
    match (marked.next(), marked.next()) {
        (Some(_), Some(second)) => Err(syn::Error::new(
            second.ident.span(),
            "only one variant can be marked `#[fallback]`",
        )),
        (Some(fallback), None) => Ok(&fallback.ident),
        (None, _) => {
            let dense = bits < 64 && variants.len() as u64 == 1 << bits;
            match variants.iter().max_by_key(|v| v.value) {
                Some(last) if dense => Ok(&last.ident),
                _ => Err(syn::Error::new(
                    ident.span(),
                    format!(
                        "`{}` does not cover all {}-bit patterns, mark one variant `#[fallback]`",
                        ident, bits
                    ),
                )),
            }
        }
    }
}

/// Number of bits needed to store `max`, at least one.
fn bits_for(max: u64) -> u32 {
    (64 - max.leading_zeros()).max(1)
}
