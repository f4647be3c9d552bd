//! Register integers and bit-mask algebra.
//!
//! Every computation inside the crate is carried out on `u64` words. A
//! register's own integer type only shows up at the bus boundary and in the
//! typed accessors, through [`RegValue`].

use core::fmt::Debug;

/// Transfer width of a register.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Width {
    /// 8-bit register.
    W8,
    /// 16-bit register.
    W16,
    /// 32-bit register.
    W32,
    /// 64-bit register.
    W64,
}

impl Width {
    /// Returns the number of bits.
    #[inline]
    pub const fn bits(self) -> u32 {
        match self {
            Self::W8 => 8,
            Self::W16 => 16,
            Self::W32 => 32,
            Self::W64 => 64,
        }
    }

    /// Returns a mask with every bit of the width set.
    #[inline]
    pub const fn mask(self) -> u64 {
        match self {
            Self::W64 => u64::MAX,
            _ => (1 << self.bits()) - 1,
        }
    }
}

/// Underlying integer of a register.
pub trait RegValue
where
    Self: Sized + Debug + Default + Copy + Eq + Send + Sync + 'static,
{
    /// Width of the integer.
    const WIDTH: Width;

    /// Converts the low order bits of `bits` into the integer, discarding the
    /// rest.
    fn from_u64(bits: u64) -> Self;

    /// Widens the integer.
    fn into_u64(self) -> u64;
}

macro_rules! reg_value {
    ($type:ty, $width:ident) => {
        impl RegValue for $type {
            const WIDTH: Width = Width::$width;

            #[inline]
            #[allow(clippy::cast_possible_truncation)]
            fn from_u64(bits: u64) -> Self {
                bits as $type
            }

            #[inline]
            fn into_u64(self) -> u64 {
                u64::from(self)
            }
        }
    };
}

reg_value!(u8, W8);
reg_value!(u16, W16);
reg_value!(u32, W32);
reg_value!(u64, W64);

/// Returns the mask of the bit range `msb..=lsb` inside a register of the
/// given `width`.
///
/// The result has exactly `msb - lsb + 1` contiguous set bits starting at
/// `lsb`. A range ending at the top bit of the register is built by inverting
/// the low part, so that no shift ever reaches the full width.
///
/// # Panics
///
/// At compile time (or run time, outside const contexts) when `msb` is outside
/// of `width` or below `lsb`.
#[inline]
pub const fn mask(msb: u32, lsb: u32, width: Width) -> u64 {
    assert!(msb >= lsb, "msb is below lsb");
    assert!(msb < width.bits(), "msb is outside of the register");
    if msb == lsb {
        1 << msb
    } else if msb == width.bits() - 1 {
        !((1 << lsb) - 1) & width.mask()
    } else {
        ((1 << (msb + 1)) - 1) & !((1 << lsb) - 1)
    }
}

/// Extracts and right-justifies the bits of `raw` selected by `mask`.
#[inline]
pub const fn extract(raw: u64, mask: u64, lsb: u32) -> u64 {
    (raw & mask) >> lsb
}

/// Merges the right-justified `bits` into `raw` at the position selected by
/// `mask`, clearing the target bits first.
#[inline]
pub const fn insert(raw: u64, mask: u64, lsb: u32, bits: u64) -> u64 {
    raw & !mask | bits << lsb & mask
}
