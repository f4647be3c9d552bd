//! Statically checked hardware registers.
//!
//! A register is described once with the [`reg!`] macro: its address, its
//! width, and its fields with their bit ranges and access types. The
//! description becomes a module of zero-sized types. Field handles produce
//! operation [tokens](token) which are batched by [`apply`](apply::apply):
//! every token of a batch is merged into at most one bus read and one bus
//! write per register.
//!
//! Mistakes are caught by the compiler: writing a read-only field, reading a
//! write-only field, a constant that does not fit its field, two writes to the
//! same field in one batch, overlapping fields in a description.
//!
//! ```
//! use bitreg::{prelude::*, reg, sim::SimBus};
//!
//! #[derive(Clone, Copy, Debug, PartialEq, Eq, FieldValue)]
//! pub enum Parity {
//!     None = 0,
//!     Even = 2,
//!     #[fallback]
//!     Odd = 3,
//! }
//!
//! reg! {
//!     /// UART control register.
//!     pub mod UART CTRL;
//!     0x4000_1000 u32;
//!     EN { 0 RW }
//!     PARITY { 2:1 RW Parity }
//!     BAUD { 19:4 RW u16 }
//!     BUSY { 31 RO }
//! }
//!
//! fn main() {
//!     let ctrl = uart_ctrl::REG;
//!     let mut bus = SimBus::new();
//!     bus.attach::<UartCtrl>().preload(0x4000_1000, 0x8000_0000);
//!     let ((), (), busy) = apply(
//!         &mut bus,
//!         (ctrl.baud.write(0x1A0), ctrl.parity.write(Parity::Even), ctrl.busy.read()),
//!     );
//!     assert!(busy);
//!     assert_eq!(bus.peek(0x4000_1000), 0x8000_1A04);
//!     let (parity,) = apply(&mut bus, (ctrl.parity.read(),));
//!     assert_eq!(parity, Parity::Even);
//! }
//! ```
//!
//! Without the default `std` feature the crate is `no_std`. The simulated bus
//! in [`sim`] needs `std`.

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::must_use_candidate)]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate self as bitreg;

pub mod access;
pub mod apply;
pub mod bits;
pub mod bus;
pub mod field;
pub mod lit;
pub mod overflow;
pub mod prelude;
pub mod reg;
#[cfg(feature = "std")]
pub mod sim;
pub mod token;

/// Defines a register.
///
/// ```
/// # use bitreg::reg;
/// reg! {
///     /// Timer status.
///     pub mod TIM STATUS;
///     0x4000_0010 u16;
///     overflow Wrap;
///     /// Update flag, cleared by writing 1.
///     UIF { 0 RW_1C }
///     CNT { 14:1 RW }
///     RES { 15 NA }
/// }
///
/// fn main() {
///     use bitreg::reg::Register;
///     assert_eq!(TimStatus::ADDRESS, 0x4000_0010);
///     assert_eq!(TimStatus::LAYOUT, 0x7FFF);
/// }
/// ```
///
/// The header `pub mod BLOCK NAME;` names the generated module `block_name`
/// and the register type `BlockName`. The second line gives the address and
/// the register type, one of `u8`, `u16`, `u32`, `u64`. An optional
/// `overflow` line selects the strategy for run-time values that do not fit a
/// field, [`Clamp`](overflow::Clamp) by default.
///
/// Each field is `NAME { MSB:LSB ACCESS [Type] }` or `NAME { BIT ACCESS
/// [Type] }`. Access is one of `NA`, `RO`, `WO`, `RW`, `RW_0C`, `RW_1C`,
/// `RW_1S`. A single-bit field defaults to `bool`, a wider one to the register
/// type.
///
/// Addresses and bit positions are Rust integer literals, so the only digit
/// separator is `_`. Hand-written [`Register`](reg::Register) and
/// [`Field`](field::Field) impls can use [`addr!`], [`bit!`], and [`lit!`]
/// instead, which also accept `'` separators.
pub use bitreg_macros::reg;

/// Derives [`FieldValue`](field::FieldValue) for a fieldless enum.
///
/// Bit patterns without a variant decode to the variant marked `#[fallback]`.
/// The mark may be omitted when the discriminants cover every pattern.
pub use bitreg_macros::FieldValue;

mod compile_tests {
    //! ```compile_fail
    //! use bitreg::{prelude::*, reg};
    //! reg! { pub mod TST STAT; 0x100 u8; BUSY { 0 RO } }
    //! fn main() {
    //!     let _ = tst_stat::REG.busy.write(true);
    //! }
    //! ```
    //!
    //! ```compile_fail
    //! use bitreg::{prelude::*, reg};
    //! reg! { pub mod TST CMD; 0x100 u8; START { 0 WO } }
    //! fn main() {
    //!     let _ = tst_cmd::REG.start.read();
    //! }
    //! ```
    //!
    //! ```compile_fail
    //! use bitreg::{prelude::*, reg};
    //! reg! { pub mod TST CTRL; 0x100 u8; DIV { 3:0 RW } }
    //! fn main() {
    //!     let _ = tst_ctrl::REG.div.write_const::<16>();
    //! }
    //! ```
    //!
    //! ```
    //! use bitreg::{prelude::*, reg};
    //! reg! { pub mod TST CTRL; 0x100 u8; DIV { 3:0 RW } }
    //! fn main() {
    //!     let _ = tst_ctrl::REG.div.write_const::<15>();
    //! }
    //! ```
    //!
    //! ```compile_fail
    //! use bitreg::{prelude::*, reg, sim::SimBus};
    //! reg! { pub mod TST CTRL; 0x100 u8; EN { 0 RW } }
    //! reg! { pub mod TST DATA; 0x104 u8; BYTE { 7:0 RW } }
    //! fn main() {
    //!     let mut bus = SimBus::new();
    //!     apply(&mut bus, (tst_ctrl::REG.en.write(true), tst_data::REG.byte.write(1)));
    //! }
    //! ```
    //!
    //! ```
    //! use bitreg::{prelude::*, reg, sim::SimBus};
    //! reg! { pub mod TST CTRL; 0x100 u8; EN { 0 RW } }
    //! reg! { pub mod TST DATA; 0x104 u8; BYTE { 7:0 RW } }
    //! fn main() {
    //!     let mut bus = SimBus::new();
    //!     apply_all(&mut bus, (tst_ctrl::REG.en.write(true), tst_data::REG.byte.write(1)));
    //! }
    //! ```
    //!
    //! ```compile_fail
    //! use bitreg::{prelude::*, reg, sim::SimBus};
    //! reg! { pub mod TST CTRL; 0x100 u8; DIV { 3:0 RW } }
    //! fn main() {
    //!     let mut bus = SimBus::new();
    //!     let div = tst_ctrl::REG.div;
    //!     apply(&mut bus, (div.write(1), div.write(2)));
    //! }
    //! ```
    //!
    //! ```compile_fail
    //! use bitreg::{prelude::*, reg, sim::SimBus};
    //! reg! { pub mod TST CTRL; 0x100 u8; DIV { 3:0 RW } EN { 4 RW } }
    //! fn main() {
    //!     let mut bus = SimBus::new();
    //!     let ctrl = tst_ctrl::REG;
    //!     apply(&mut bus, (ctrl.en.write(true), ctrl.write(0)));
    //! }
    //! ```
    //!
    //! ```compile_fail
    //! use bitreg::{prelude::*, reg};
    //! reg! { pub mod TST CTRL; 0x100 u8; DIV { 7:0 RW } }
    //! fn main() {
    //!     let _ = tst_ctrl::REG.div.write(0x1234_u32);
    //! }
    //! ```
    //!
    //! ```compile_fail
    //! use bitreg::{prelude::*, reg};
    //! reg! { pub mod TST STAT; 0x100 u8; EN { 0 RW } BUSY { 1 RO } }
    //! fn main() {
    //!     let _ = tst_stat::REG.write(0);
    //! }
    //! ```
    //!
    //! ```compile_fail
    //! use bitreg::{prelude::*, reg};
    //! reg! { pub mod TST CMD; 0x100 u8; EN { 0 RW } START { 1 WO } }
    //! fn main() {
    //!     let _ = tst_cmd::REG.read();
    //! }
    //! ```
    //!
    //! ```compile_fail
    //! use bitreg::{prelude::*, reg};
    //! reg! { pub mod TST CTRL; 0x100 u8; DIV { 3:0 RW } }
    //! fn main() {
    //!     let _ = tst_ctrl::REG.write_const::<0x10>();
    //! }
    //! ```
    //!
    //! ```compile_fail
    //! bitreg::reg! { pub mod TST CTRL; 0x100 u8; LOW { 3:0 RW } MID { 4:3 RW } }
    //! fn main() {}
    //! ```
    //!
    //! ```compile_fail
    //! bitreg::reg! { pub mod TST CTRL; 0x100 u8; HIGH { 8:4 RW } }
    //! fn main() {}
    //! ```
    //!
    //! ```compile_fail
    //! use bitreg::{prelude::*, reg};
    //! reg! { pub mod TST CTRL; 0x100 u8; LEVEL { 5 NA } }
    //! fn main() {
    //!     let _ = tst_ctrl::REG.level.read();
    //! }
    //! ```
    //!
    //! ```compile_fail
    //! use bitreg::{access::Access, field::FieldInfo, overflow::Clamp, prelude::*};
    //! #[derive(Clone, Copy)]
    //! struct Ctrl;
    //! impl Register for Ctrl {
    //!     type Value = u16;
    //!     type Overflow = Clamp;
    //!     const NAME: &'static str = "CTRL";
    //!     const ADDRESS: usize = 0x100;
    //!     const FIELDS: &'static [FieldInfo] = &[Wide::INFO];
    //! }
    //! #[derive(Clone, Copy)]
    //! struct Wide;
    //! impl Field for Wide {
    //!     type Reg = Ctrl;
    //!     type Value = u8;
    //!     const NAME: &'static str = "WIDE";
    //!     const MSB: u32 = 11;
    //!     const LSB: u32 = 0;
    //!     const ACCESS: Access = Access::Rw;
    //! }
    //! impl RField for Wide {}
    //! fn main() {
    //!     let _ = Wide.read();
    //! }
    //! ```
    //!
    //! ```
    //! use bitreg::{access::Access, field::FieldInfo, overflow::Clamp, prelude::*};
    //! #[derive(Clone, Copy)]
    //! struct Ctrl;
    //! impl Register for Ctrl {
    //!     type Value = u16;
    //!     type Overflow = Clamp;
    //!     const NAME: &'static str = "CTRL";
    //!     const ADDRESS: usize = 0x100;
    //!     const FIELDS: &'static [FieldInfo] = &[Wide::INFO];
    //! }
    //! #[derive(Clone, Copy)]
    //! struct Wide;
    //! impl Field for Wide {
    //!     type Reg = Ctrl;
    //!     type Value = u16;
    //!     const NAME: &'static str = "WIDE";
    //!     const MSB: u32 = 11;
    //!     const LSB: u32 = 0;
    //!     const ACCESS: Access = Access::Rw;
    //! }
    //! impl RField for Wide {}
    //! impl WField for Wide {}
    //! fn main() {
    //!     let _ = Wide.read();
    //!     let _ = Wide.write_const::<0xFFF>();
    //! }
    //! ```
}
