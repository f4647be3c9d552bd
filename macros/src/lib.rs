//! Procedural macros for bitreg.
//!
//! See `bitreg` documentation for details.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

extern crate proc_macro;

mod field_value;
mod reg;

use proc_macro::TokenStream;

#[proc_macro]
pub fn reg(input: TokenStream) -> TokenStream {
    reg::proc_macro(input)
}

#[proc_macro_derive(FieldValue, attributes(fallback))]
pub fn derive_field_value(input: TokenStream) -> TokenStream {
    field_value::proc_macro_derive(input)
}
