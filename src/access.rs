//! Field access types.
//!
//! Access types are encoded as bit flags, so that read and write permissions
//! can be tested by masking against [`R`] and [`W`].

/// Read permission flag.
pub const R: u8 = 0b0000_0001;
/// Write permission flag.
pub const W: u8 = 0b0000_0010;

const ZERO_CLEARS: u8 = 0b0000_0100;
const ONE_CLEARS: u8 = 0b0000_1000;
const ONE_SETS: u8 = 0b0001_0000;

/// Access permission of a register field.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Access {
    /// Not accessible.
    Na = 0,
    /// Read-only.
    Ro = R,
    /// Write-only.
    Wo = W,
    /// Read-write.
    Rw = R | W,
    /// Read-write, writing 0 clears the bit.
    Rw0c = R | W | ZERO_CLEARS,
    /// Read-write, writing 1 clears the bit.
    Rw1c = R | W | ONE_CLEARS,
    /// Read-write, writing 1 sets the bit.
    Rw1s = R | W | ONE_SETS,
}

impl Access {
    /// Returns the flag encoding.
    #[inline]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Returns `true` if the field can be read.
    #[inline]
    pub const fn is_readable(self) -> bool {
        self.bits() & R != 0
    }

    /// Returns `true` if the field can be written.
    #[inline]
    pub const fn is_writable(self) -> bool {
        self.bits() & W != 0
    }

    /// Returns the bit value that can be written without side effects, if
    /// writing has a side effect at all.
    ///
    /// `Some(false)` for [`Access::Wo`], [`Access::Rw1c`], and
    /// [`Access::Rw1s`], `Some(true)` for [`Access::Rw0c`]. Write-only bits are
    /// treated as triggers.
    #[inline]
    pub const fn neutral(self) -> Option<bool> {
        match self {
            Self::Rw0c => Some(true),
            Self::Wo | Self::Rw1c | Self::Rw1s => Some(false),
            Self::Na | Self::Ro | Self::Rw => None,
        }
    }
}
