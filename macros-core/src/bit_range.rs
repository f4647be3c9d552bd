use proc_macro2::Span;
use syn::{
    parse::{Parse, ParseStream, Result},
    LitInt, Token,
};

/// Field bit range: `MSB:LSB` or a single bit position.
pub struct BitRange {
    /// Most significant bit, inclusive.
    pub msb: u32,
    /// Least significant bit, inclusive.
    pub lsb: u32,
    /// Span of the leading bit position.
    pub span: Span,
}

impl Parse for BitRange {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        let first = input.parse::<LitInt>()?;
        let msb = first.base10_parse()?;
        if input.peek(Token![:]) {
            input.parse::<Token![:]>()?;
            let second = input.parse::<LitInt>()?;
            let lsb = second.base10_parse()?;
            Ok(Self { msb, lsb, span: first.span() })
        } else {
            Ok(Self { msb, lsb: msb, span: first.span() })
        }
    }
}

impl BitRange {
    /// Returns the number of bits, or `None` if the range is inverted.
    pub fn width(&self) -> Option<u32> {
        self.msb.checked_sub(self.lsb).map(|diff| diff + 1)
    }

    /// Returns `true` if the two ranges share at least one bit.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.lsb <= other.msb && other.lsb <= self.msb
    }

    /// Checks the range against a register width.
    ///
    /// # Errors
    ///
    /// If the range is inverted or reaches past the register.
    pub fn validate(&self, register_bits: u32) -> Result<()> {
        if self.msb < self.lsb {
            return Err(syn::Error::new(
                self.span,
                format!("msb {} is below lsb {}", self.msb, self.lsb),
            ));
        }
        if self.msb >= register_bits {
            return Err(syn::Error::new(
                self.span,
                format!("bit {} is outside of a {}-bit register", self.msb, register_bits),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_bit() {
        let range: BitRange = syn::parse_str("7").unwrap();
        assert_eq!((range.msb, range.lsb), (7, 7));
        assert_eq!(range.width(), Some(1));
    }

    #[test]
    fn multi_bit() {
        let range: BitRange = syn::parse_str("24:18").unwrap();
        assert_eq!((range.msb, range.lsb), (24, 18));
        assert_eq!(range.width(), Some(7));
        assert!(range.validate(32).is_ok());
        assert!(range.validate(16).is_err());
    }

    #[test]
    fn inverted() {
        let range: BitRange = syn::parse_str("1:3").unwrap();
        assert_eq!(range.width(), None);
        assert!(range.validate(32).is_err());
    }

    #[test]
    fn overlap() {
        let a: BitRange = syn::parse_str("7:4").unwrap();
        let b: BitRange = syn::parse_str("4:0").unwrap();
        let c: BitRange = syn::parse_str("3:0").unwrap();
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
    }
}
