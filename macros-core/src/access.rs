use proc_macro2::{Span, TokenStream};
use quote::{quote, ToTokens};
use syn::{
    parse::{Parse, ParseStream, Result},
    Ident,
};

/// Field access type as written in a register definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessKind {
    /// `NA`
    Na,
    /// `RO`
    Ro,
    /// `WO`
    Wo,
    /// `RW`
    Rw,
    /// `RW_0C`
    Rw0c,
    /// `RW_1C`
    Rw1c,
    /// `RW_1S`
    Rw1s,
}

/// Pairs of the source spelling and the variant, in declaration order.
const KINDS: &[(&str, AccessKind)] = &[
    ("NA", AccessKind::Na),
    ("RO", AccessKind::Ro),
    ("WO", AccessKind::Wo),
    ("RW", AccessKind::Rw),
    ("RW_0C", AccessKind::Rw0c),
    ("RW_1C", AccessKind::Rw1c),
    ("RW_1S", AccessKind::Rw1s),
];

impl Parse for AccessKind {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        let ident = input.parse::<Ident>()?;
        KINDS.iter().find(|(name, _)| ident == name).map(|&(_, kind)| kind).ok_or_else(|| {
            let expected = KINDS.iter().map(|(name, _)| *name).collect::<Vec<_>>().join(", ");
            syn::Error::new(
                ident.span(),
                format!("unknown access type `{}`, expected one of: {}", ident, expected),
            )
        })
    }
}

impl AccessKind {
    /// Returns `true` if the field can be read.
    pub fn is_readable(self) -> bool {
        !matches!(self, Self::Na | Self::Wo)
    }

    /// Returns `true` if the field can be written.
    pub fn is_writable(self) -> bool {
        !matches!(self, Self::Na | Self::Ro)
    }

    fn variant(self) -> Ident {
        let name = match self {
            Self::Na => "Na",
            Self::Ro => "Ro",
            Self::Wo => "Wo",
            Self::Rw => "Rw",
            Self::Rw0c => "Rw0c",
            Self::Rw1c => "Rw1c",
            Self::Rw1s => "Rw1s",
        };
        Ident::new(name, Span::call_site())
    }
}

impl ToTokens for AccessKind {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let variant = self.variant();
        tokens.extend(quote!(::bitreg::access::Access::#variant));
    }
}
