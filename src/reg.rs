//! Registers.
//!
//! A register is a fixed-address scalar made of [fields](crate::field). Its
//! fields are enumerated explicitly in [`Register::FIELDS`], from which the
//! derived masks and the whole-register capability checks are computed at
//! compile time.

use crate::{
    access::Access,
    bits::{RegValue, Width},
    field::FieldInfo,
    overflow::Overflow,
    token::{ConstWrite, InRange, Read, UncheckedWrite, Update, Write},
};
use core::{fmt, marker::PhantomData};
use log::debug;
use thiserror::Error;

/// Register field layout error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// `msb` is below `lsb`.
    #[error("field {field} has msb below lsb")]
    Inverted {
        /// Field name.
        field: &'static str,
    },
    /// The field reaches past the register width.
    #[error("field {field} does not fit into the register")]
    OutOfRange {
        /// Field name.
        field: &'static str,
    },
    /// Two fields share bits.
    #[error("fields {first} and {second} overlap")]
    Overlap {
        /// Field declared first.
        first: &'static str,
        /// Field declared second.
        second: &'static str,
    },
}

/// Checks that every field fits into `width` and that no two fields overlap.
///
/// # Errors
///
/// The first violation found, in declaration order.
pub const fn check_layout(fields: &[FieldInfo], width: Width) -> Result<(), LayoutError> {
    let mut i = 0;
    while i < fields.len() {
        let field = &fields[i];
        if field.is_inverted() {
            return Err(LayoutError::Inverted { field: field.name });
        }
        if !field.fits(width) {
            return Err(LayoutError::OutOfRange { field: field.name });
        }
        let mut j = 0;
        while j < i {
            if fields[j].mask(width) & field.mask(width) != 0 {
                return Err(LayoutError::Overlap { first: fields[j].name, second: field.name });
            }
            j += 1;
        }
        i += 1;
    }
    Ok(())
}

/// Run-time description of a register, with its fields folded into masks by
/// access type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegInfo {
    /// Register name.
    pub name: &'static str,
    /// Bus address.
    pub address: usize,
    /// Transfer width.
    pub width: Width,
    /// Read-only bits.
    pub ro: u64,
    /// Write-only bits.
    pub wo: u64,
    /// Plain read-write bits.
    pub rw: u64,
    /// Bits cleared by writing 0.
    pub rw0c: u64,
    /// Bits cleared by writing 1.
    pub rw1c: u64,
    /// Bits set by writing 1.
    pub rw1s: u64,
    /// Declared but inaccessible bits.
    pub na: u64,
    /// Bits written as 0 when a write does not target them.
    pub idle0: u64,
    /// Bits written as 1 when a write does not target them.
    pub idle1: u64,
}

impl RegInfo {
    /// Folds `fields` into per-access masks. Fields that do not fit into
    /// `width` are skipped.
    pub const fn new(
        name: &'static str,
        address: usize,
        width: Width,
        fields: &[FieldInfo],
    ) -> Self {
        let mut info = Self {
            name,
            address,
            width,
            ro: 0,
            wo: 0,
            rw: 0,
            rw0c: 0,
            rw1c: 0,
            rw1s: 0,
            na: 0,
            idle0: 0,
            idle1: 0,
        };
        let mut i = 0;
        while i < fields.len() {
            let mask = fields[i].mask(width);
            match fields[i].access {
                Access::Na => info.na |= mask,
                Access::Ro => info.ro |= mask,
                Access::Wo => info.wo |= mask,
                Access::Rw => info.rw |= mask,
                Access::Rw0c => info.rw0c |= mask,
                Access::Rw1c => info.rw1c |= mask,
                Access::Rw1s => info.rw1s |= mask,
            }
            match fields[i].access.neutral() {
                Some(false) => info.idle0 |= mask,
                Some(true) => info.idle1 |= mask,
                None => {}
            }
            i += 1;
        }
        info
    }

    /// Returns the union of readable field masks.
    #[inline]
    pub const fn layout(&self) -> u64 {
        self.ro | self.rw | self.rw0c | self.rw1c | self.rw1s
    }

    /// Returns the union of writable field masks.
    #[inline]
    pub const fn writable(&self) -> u64 {
        self.wo | self.rw | self.rw0c | self.rw1c | self.rw1s
    }

    /// Returns the union of all field masks.
    #[inline]
    pub const fn declared(&self) -> u64 {
        self.layout() | self.wo | self.na
    }

    /// Returns the bits whose write has a side effect.
    #[inline]
    pub const fn volatile(&self) -> u64 {
        self.rw0c | self.rw1c | self.rw1s
    }

    /// Replaces the bits of side-effect and write-only fields outside
    /// `write_mask` with values that leave the hardware untouched when written
    /// back.
    #[inline]
    pub const fn quiesce(&self, raw: u64, write_mask: u64) -> u64 {
        let keep = !write_mask;
        raw & !(self.idle0 & keep) | self.idle1 & keep
    }
}

impl fmt::Display for RegInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{:#x}", self.name, self.address)
    }
}

/// Register.
pub trait Register: Copy + 'static {
    /// Underlying integer.
    type Value: RegValue;

    /// Strategy for run-time values that do not fit into a field.
    type Overflow: Overflow + Default;

    /// Register name.
    const NAME: &'static str;

    /// Bus address.
    const ADDRESS: usize;

    /// Field descriptions.
    const FIELDS: &'static [FieldInfo];

    #[doc(hidden)]
    const VALID: () = match check_layout(Self::FIELDS, <Self::Value as RegValue>::WIDTH) {
        Ok(()) => (),
        Err(LayoutError::Inverted { .. }) => panic!("field msb is below its lsb"),
        Err(LayoutError::OutOfRange { .. }) => panic!("field does not fit into its register"),
        Err(LayoutError::Overlap { .. }) => panic!("register fields overlap"),
    };

    /// Run-time description.
    const INFO: RegInfo =
        RegInfo::new(Self::NAME, Self::ADDRESS, <Self::Value as RegValue>::WIDTH, Self::FIELDS);

    /// Union of readable field masks.
    const LAYOUT: u64 = Self::INFO.layout();

    /// Union of writable field masks.
    const WRITABLE: u64 = Self::INFO.writable();

    /// Union of all field masks.
    const DECLARED: u64 = Self::INFO.declared();

    /// `true` if any field is write-only.
    const HAS_WRITE_ONLY_FIELD: bool = Self::INFO.wo != 0;

    /// `true` if any field is read-only.
    const HAS_READ_ONLY_FIELD: bool = Self::INFO.ro != 0;

    /// Returns the whole-register target, for use as a
    /// [`modify_with`](crate::field::WField::modify_with) dependency.
    #[inline]
    fn whole(self) -> Whole<Self> {
        Whole::new()
    }
}

/// The whole register as a single operation target.
pub struct Whole<R: Register>(PhantomData<R>);

impl<R: Register> Whole<R> {
    /// Creates the target.
    #[inline]
    pub const fn new() -> Self {
        Self(PhantomData)
    }

    /// Masks a run-time whole-register value down to the writable bits.
    pub fn mask(bits: u64) -> u64 {
        let masked = bits & R::WRITABLE;
        if masked != bits {
            debug!("{:#x} written to {} masked down to {:#x}", bits, R::INFO, masked);
        }
        masked
    }
}

impl<R: Register> Clone for Whole<R> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: Register> Copy for Whole<R> {}

impl<R: Register> Default for Whole<R> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Register> fmt::Debug for Whole<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Whole").field(&R::NAME).finish()
    }
}

/// Register that can be read as a whole.
pub trait RReg: Register {
    #[doc(hidden)]
    const CAN_READ: () =
        assert!(!Self::HAS_WRITE_ONLY_FIELD, "cannot read register with write-only fields");

    /// Requests the current value of the register.
    #[inline]
    fn read(self) -> Read<Whole<Self>> {
        let () = Self::VALID;
        let () = Self::CAN_READ;
        Read::new()
    }
}

/// Register that can be written as a whole.
pub trait WReg: Register {
    #[doc(hidden)]
    const CAN_WRITE: () =
        assert!(!Self::HAS_READ_ONLY_FIELD, "cannot write register with read-only fields");

    /// Writes a run-time value. Bits outside the writable fields are dropped.
    #[inline]
    fn write(self, value: Self::Value) -> Write<Whole<Self>> {
        let () = Self::VALID;
        let () = Self::CAN_WRITE;
        Write::new(Whole::<Self>::mask(value.into_u64()))
    }

    /// Writes a constant. A constant with bits outside the writable fields
    /// fails the build.
    #[inline]
    fn write_const<const V: u64>(self) -> ConstWrite<Whole<Self>> {
        let () = Self::VALID;
        let () = Self::CAN_WRITE;
        let () = InRange::<Whole<Self>, V>::OK;
        ConstWrite::new(V)
    }

    /// Writes raw bits as they are.
    #[inline]
    fn write_unchecked(self, value: Self::Value) -> UncheckedWrite<Whole<Self>> {
        let () = Self::VALID;
        let () = Self::CAN_WRITE;
        UncheckedWrite::new(value.into_u64())
    }

    /// Replaces the register value with the result of `f` applied to the
    /// current one.
    #[inline]
    fn modify<G>(self, f: G) -> Update<Whole<Self>, G>
    where
        Self: RReg,
        G: FnOnce(Self::Value) -> Self::Value,
    {
        let () = Self::VALID;
        let () = Self::CAN_WRITE;
        Update::new(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overflow::Clamp;

    const FIELDS: &[FieldInfo] = &[
        FieldInfo::new("EN", 0, 0, Access::Rw),
        FieldInfo::new("MODE", 3, 1, Access::Rw),
        FieldInfo::new("BUSY", 4, 4, Access::Ro),
        FieldInfo::new("START", 5, 5, Access::Wo),
        FieldInfo::new("OVR", 6, 6, Access::Rw1c),
        FieldInfo::new("ARM", 7, 7, Access::Rw1s),
        FieldInfo::new("RDY", 8, 8, Access::Rw0c),
        FieldInfo::new("RES", 15, 9, Access::Na),
    ];

    #[derive(Clone, Copy)]
    struct Status;

    impl Register for Status {
        type Value = u16;
        type Overflow = Clamp;

        const NAME: &'static str = "STATUS";
        const ADDRESS: usize = 0x40;
        const FIELDS: &'static [FieldInfo] = FIELDS;
    }

    #[test]
    fn layout_ok() {
        assert_eq!(check_layout(FIELDS, Width::W16), Ok(()));
        assert_eq!(check_layout(&[], Width::W8), Ok(()));
    }

    #[test]
    fn layout_errors() {
        assert_eq!(
            check_layout(&[FieldInfo::new("A", 1, 2, Access::Rw)], Width::W8),
            Err(LayoutError::Inverted { field: "A" })
        );
        assert_eq!(
            check_layout(&[FieldInfo::new("A", 8, 2, Access::Rw)], Width::W8),
            Err(LayoutError::OutOfRange { field: "A" })
        );
        assert_eq!(
            check_layout(
                &[FieldInfo::new("A", 7, 4, Access::Rw), FieldInfo::new("B", 4, 0, Access::Rw)],
                Width::W8
            ),
            Err(LayoutError::Overlap { first: "A", second: "B" })
        );
    }

    #[test]
    fn masks() {
        let info = Status::INFO;
        assert_eq!(info.rw, 0b0000_1111);
        assert_eq!(info.ro, 0b0001_0000);
        assert_eq!(info.wo, 0b0010_0000);
        assert_eq!(info.rw1c, 0b0100_0000);
        assert_eq!(info.rw1s, 0b1000_0000);
        assert_eq!(info.rw0c, 0b1_0000_0000);
        assert_eq!(info.na, 0xFE00);
        assert_eq!(Status::LAYOUT, 0b1_1101_1111);
        assert_eq!(Status::WRITABLE, 0b1_1110_1111);
        assert_eq!(Status::DECLARED, 0xFFFF);
        assert!(Status::HAS_WRITE_ONLY_FIELD);
        assert!(Status::HAS_READ_ONLY_FIELD);
    }

    #[test]
    fn quiesce() {
        let info = Status::INFO;
        // Pending flags read as set, nothing targeted.
        assert_eq!(info.quiesce(0b1_1100_0000, 0), 0b1_0000_0000);
        // Flags cleared on purpose are kept.
        assert_eq!(info.quiesce(0b0_0100_0000, 0b0100_0000), 0b1_0100_0000);
        assert_eq!(info.quiesce(0b0_0000_1010, 0b1_0000_0000), 0b0_0000_1010);
        // A write-only trigger reading back as set is not fired again.
        assert_eq!(info.quiesce(0b0_0010_0001, 0), 0b1_0000_0001);
        assert_eq!(info.quiesce(0b0_0010_0000, 0b0010_0000), 0b1_0010_0000);
    }

    #[cfg(feature = "std")]
    #[test]
    fn display() {
        assert_eq!(Status::INFO.to_string(), "STATUS@0x40");
    }

    #[cfg(feature = "std")]
    #[test]
    fn error_messages() {
        assert_eq!(
            LayoutError::Overlap { first: "A", second: "B" }.to_string(),
            "fields A and B overlap"
        );
    }
}
