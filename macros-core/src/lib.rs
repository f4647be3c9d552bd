//! Parsing helpers shared by the bitreg procedural macros.
//!
//! See `bitreg` documentation for details.

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod access;
mod bit_range;
mod macros;
mod reg_header;
mod unkeywordize;

pub use self::{
    access::AccessKind,
    bit_range::BitRange,
    reg_header::RegHeader,
    unkeywordize::unkeywordize,
};
