//! The bitreg prelude.
//!
//! Brings the field and register traits into scope, which makes the token
//! methods of `reg!`-generated handles callable:
//!
//! ```
//! use bitreg::prelude::*;
//! ```

#[doc(no_inline)]
pub use crate::{
    apply::{apply, apply_all},
    bus::Bus,
    field::{Field, FieldValue, RField, WField},
    reg::{RReg, Register, WReg},
    FieldValue,
};
