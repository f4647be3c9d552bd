use bitreg_macros_core::{parse_ident, unkeywordize, AccessKind, BitRange, RegHeader};
use inflector::Inflector;
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    braced,
    parse::{Parse, ParseStream, Result},
    parse_macro_input, token, Attribute, Ident, LitInt, Token, Type, TypePath,
};

const PRIMITIVES: &[&str] = &["bool", "u8", "u16", "u32", "u64"];

struct Reg {
    header: RegHeader,
    address: LitInt,
    value_ty: Ident,
    overflow: Option<Type>,
    fields: Vec<Field>,
}

struct Field {
    attrs: Vec<Attribute>,
    ident: Ident,
    range: BitRange,
    access: AccessKind,
    ty: Option<Type>,
}

impl Parse for Reg {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        let header = input.parse()?;
        let address = input.parse()?;
        let value_ty = input.parse()?;
        input.parse::<Token![;]>()?;
        let overflow = if input.peek(Ident) && !input.peek2(token::Brace) {
            parse_ident!(input, "overflow");
            let ty = input.parse()?;
            input.parse::<Token![;]>()?;
            Some(ty)
        } else {
            None
        };
        let mut fields = Vec::new();
        while !input.is_empty() {
            fields.push(input.parse()?);
        }
        Ok(Self { header, address, value_ty, overflow, fields })
    }
}

impl Parse for Field {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        let attrs = input.call(Attribute::parse_outer)?;
        let ident = input.parse()?;
        let content;
        braced!(content in input);
        let range = content.parse()?;
        let access = content.parse()?;
        let ty = if content.is_empty() { None } else { Some(content.parse()?) };
        Ok(Self { attrs, ident, range, access, ty })
    }
}

pub fn proc_macro(input: TokenStream) -> TokenStream {
    let reg = parse_macro_input!(input as Reg);
    match reg.expand() {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

impl Reg {
    fn expand(&self) -> Result<TokenStream2> {
        let register_bits = register_bits(&self.value_ty)?;
        self.validate(register_bits)?;
        let Self { header, address, value_ty, overflow, fields } = self;
        let RegHeader { attrs, vis, block, ident } = header;
        let name = header.name();
        let reg_mod = Ident::new(&unkeywordize(name.to_snake_case().into()), block.span());
        let reg_alias = Ident::new(&name.to_pascal_case(), ident.span());
        let overflow = match overflow {
            None => quote!(::bitreg::overflow::Clamp),
            Some(Type::Path(TypePath { qself: None, path }))
                if path.is_ident("Clamp") || path.is_ident("Wrap") =>
            {
                quote!(::bitreg::overflow::#path)
            }
            Some(ty) => outer_type(ty),
        };
        let mut members = Vec::new();
        let mut ctor = Vec::new();
        let mut infos = Vec::new();
        let mut field_tokens = Vec::new();
        for field in fields {
            let Field { attrs, ident, range, access, ty } = field;
            let field_name = ident.to_string();
            let field_snake =
                Ident::new(&unkeywordize(field_name.to_snake_case().into()), ident.span());
            let field_struct =
                Ident::new(&unkeywordize(field_name.to_pascal_case().into()), ident.span());
            let (msb, lsb) = (range.msb, range.lsb);
            let field_ty = match ty {
                Some(ty) => outer_type(ty),
                None if msb == lsb => quote!(bool),
                None => quote!(#value_ty),
            };
            members.push(quote! {
                #(#attrs)*
                pub #field_snake: #field_struct
            });
            ctor.push(quote!(#field_snake: #field_struct));
            infos.push(quote! {
                ::bitreg::field::FieldInfo::new(#field_name, #msb, #lsb, #access)
            });
            let rfield = access.is_readable().then(|| {
                quote!(impl ::bitreg::field::RField for #field_struct {})
            });
            let wfield = access.is_writable().then(|| {
                quote!(impl ::bitreg::field::WField for #field_struct {})
            });
            field_tokens.push(quote! {
                #(#attrs)*
                #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
                pub struct #field_struct;

                impl ::bitreg::field::Field for #field_struct {
                    type Reg = Reg;
                    type Value = #field_ty;

                    const NAME: &'static str = #field_name;
                    const MSB: u32 = #msb;
                    const LSB: u32 = #lsb;
                    const ACCESS: ::bitreg::access::Access = #access;
                }

                const _: () = <#field_struct as ::bitreg::field::Field>::VALID;

                #rfield
                #wfield
            });
        }
        let has_wo = fields.iter().any(|f| f.access == AccessKind::Wo);
        let has_ro = fields.iter().any(|f| f.access == AccessKind::Ro);
        let rreg = (!has_wo).then(|| quote!(impl ::bitreg::reg::RReg for Reg {}));
        let wreg = (!has_ro).then(|| quote!(impl ::bitreg::reg::WReg for Reg {}));

        Ok(quote! {
            #(#attrs)*
            #vis mod #reg_mod {
                #(#attrs)*
                #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
                pub struct Reg {
                    #(#members,)*
                }

                /// Register handle.
                pub const REG: Reg = Reg { #(#ctor,)* };

                impl ::bitreg::reg::Register for Reg {
                    type Value = #value_ty;
                    type Overflow = #overflow;

                    const NAME: &'static str = #name;
                    const ADDRESS: usize = #address;
                    const FIELDS: &'static [::bitreg::field::FieldInfo] = &[#(#infos),*];
                }

                const _: () = <Reg as ::bitreg::reg::Register>::VALID;

                #rreg
                #wreg

                #(#field_tokens)*
            }

            #vis use self::#reg_mod::Reg as #reg_alias;
        })
    }

    fn validate(&self, register_bits: u32) -> Result<()> {
        for (i, field) in self.fields.iter().enumerate() {
            field.range.validate(register_bits)?;
            let pascal = field.ident.to_string().to_pascal_case();
            if pascal == "Reg" {
                return Err(syn::Error::new(
                    field.ident.span(),
                    "field name clashes with the register struct",
                ));
            }
            for prev in &self.fields[..i] {
                if prev.ident.to_string().to_pascal_case() == pascal {
                    return Err(syn::Error::new(
                        field.ident.span(),
                        format!("field `{}` is already defined", field.ident),
                    ));
                }
                if prev.range.overlaps(&field.range) {
                    return Err(syn::Error::new(
                        field.range.span,
                        format!("field `{}` overlaps field `{}`", field.ident, prev.ident),
                    ));
                }
            }
            if let (Some(ty), Some(width)) = (&field.ty, field.range.width()) {
                if let Some(bits) = primitive_bits(ty) {
                    if bits < width {
                        return Err(syn::Error::new(
                            field.ident.span(),
                            format!("value type holds {} bits, the field is {} bits wide", bits, width),
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}

fn register_bits(ty: &Ident) -> Result<u32> {
    match ty.to_string().as_str() {
        "u8" => Ok(8),
        "u16" => Ok(16),
        "u32" => Ok(32),
        "u64" => Ok(64),
        _ => Err(syn::Error::new(
            ty.span(),
            "register value type must be one of: u8, u16, u32, u64",
        )),
    }
}

fn primitive_bits(ty: &Type) -> Option<u32> {
    match ty {
        Type::Path(TypePath { qself: None, path }) => match path.get_ident()?.to_string().as_str() {
            "bool" => Some(1),
            "u8" => Some(8),
            "u16" => Some(16),
            "u32" => Some(32),
            "u64" => Some(64),
            _ => None,
        },
        _ => None,
    }
}

/// Resolves a type written next to the macro invocation from inside the
/// generated module.
fn outer_type(ty: &Type) -> TokenStream2 {
    match ty {
        Type::Path(TypePath { qself: None, path }) if path.leading_colon.is_none() => {
            let first = &path.segments[0].ident;
            let primitive = path.segments.len() == 1 && PRIMITIVES.iter().any(|p| first == p);
            if primitive || first == "crate" {
                quote!(#path)
            } else if first == "self" {
                let rest = path.segments.iter().skip(1);
                quote!(super #(::#rest)*)
            } else {
                quote!(super::#path)
            }
        }
        _ => quote!(#ty),
    }
}
