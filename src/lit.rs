//! Compile-time numeric literals.
//!
//! Register descriptions copied from datasheets often carry numbers as text:
//! hexadecimal addresses with digit-group separators, binary reset values. The
//! functions here turn such text into integers inside `const` contexts, and the
//! [`lit!`], [`bit!`], and [`addr!`] macros force the evaluation to happen at
//! compile time:
//!
//! ```
//! use bitreg::{addr, bit, lit};
//!
//! const BASE: usize = addr!("0x4000_1000");
//! const MSB: u32 = bit!("31");
//! const RESET: u64 = lit!("0b0000'0011");
//!
//! assert_eq!(BASE, 0x4000_1000);
//! assert_eq!(MSB, 31);
//! assert_eq!(RESET, 3);
//! ```
//!
//! Malformed text fails the build:
//!
//! ```compile_fail
//! const RESET: u64 = bitreg::lit!("0xFG");
//! ```

use thiserror::Error;

/// Literal parsing error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum LitError {
    /// No digits.
    #[error("numeric literal has no digits")]
    Empty,
    /// A character that is neither a digit of the radix nor a separator.
    #[error("invalid digit at position {position}")]
    InvalidDigit {
        /// Byte offset of the offending character.
        position: usize,
    },
    /// The value does not fit into 64 bits.
    #[error("numeric literal does not fit into 64 bits")]
    Overflow,
}

/// Parses decimal, hexadecimal (`0x`/`0X`, either letter case), or binary
/// (`0b`/`0B`) text. `_` and `'` digit-group separators are skipped.
///
/// # Errors
///
/// See [`LitError`].
pub const fn parse(text: &str) -> Result<u64, LitError> {
    let bytes = text.as_bytes();
    let (radix, mut i) = if bytes.len() > 1 && bytes[0] == b'0' {
        match bytes[1] {
            b'x' | b'X' => (16, 2),
            b'b' | b'B' => (2, 2),
            _ => (10, 0),
        }
    } else {
        (10, 0)
    };
    let mut value: u64 = 0;
    let mut digits = 0;
    while i < bytes.len() {
        let byte = bytes[i];
        if byte == b'_' || byte == b'\'' {
            i += 1;
            continue;
        }
        let digit = match byte {
            b'0'..=b'9' => byte - b'0',
            b'a'..=b'f' => byte - b'a' + 10,
            b'A'..=b'F' => byte - b'A' + 10,
            _ => return Err(LitError::InvalidDigit { position: i }),
        } as u64;
        if digit >= radix {
            return Err(LitError::InvalidDigit { position: i });
        }
        value = match value.checked_mul(radix) {
            Some(value) => value,
            None => return Err(LitError::Overflow),
        };
        value = match value.checked_add(digit) {
            Some(value) => value,
            None => return Err(LitError::Overflow),
        };
        digits += 1;
        i += 1;
    }
    if digits == 0 {
        Err(LitError::Empty)
    } else {
        Ok(value)
    }
}

/// Unwraps a parse result, panicking with a literal message on error.
///
/// # Panics
///
/// If `result` is an error. Inside a `const` item the panic is a build error.
pub const fn expect(result: Result<u64, LitError>) -> u64 {
    match result {
        Ok(value) => value,
        Err(LitError::Empty) => panic!("numeric literal has no digits"),
        Err(LitError::InvalidDigit { .. }) => panic!("invalid digit in numeric literal"),
        Err(LitError::Overflow) => panic!("numeric literal does not fit into 64 bits"),
    }
}

/// Parses a value literal.
///
/// # Panics
///
/// See [`expect`].
pub const fn value(text: &str) -> u64 {
    expect(parse(text))
}

/// Parses a bit position (`msb`/`lsb`).
///
/// # Panics
///
/// If the text is malformed or the position is not below 64.
#[allow(clippy::cast_possible_truncation)]
pub const fn bit(text: &str) -> u32 {
    let value = expect(parse(text));
    assert!(value < 64, "bit position is outside of 64 bits");
    value as u32
}

/// Parses a register address.
///
/// # Panics
///
/// If the text is malformed or the address does not fit into `usize`.
#[allow(clippy::cast_possible_truncation)]
pub const fn address(text: &str) -> usize {
    let value = expect(parse(text));
    assert!(value <= usize::MAX as u64, "address does not fit into usize");
    value as usize
}

/// Evaluates a value literal at compile time.
#[macro_export]
macro_rules! lit {
    ($text:literal) => {{
        const VALUE: u64 = $crate::lit::value($text);
        VALUE
    }};
}

/// Evaluates a bit position literal at compile time.
#[macro_export]
macro_rules! bit {
    ($text:literal) => {{
        const BIT: u32 = $crate::lit::bit($text);
        BIT
    }};
}

/// Evaluates an address literal at compile time.
#[macro_export]
macro_rules! addr {
    ($text:literal) => {{
        const ADDRESS: usize = $crate::lit::address($text);
        ADDRESS
    }};
}
