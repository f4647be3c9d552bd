//! Register fields.
//!
//! A field is a zero-sized handle naming one contiguous bit range of a
//! register. It never holds a value itself. Its methods either convert between
//! register and field values or produce [tokens](crate::token) for
//! [`apply`](crate::apply::apply).

use crate::{
    access::Access,
    bits::{self, RegValue, Width},
    overflow::{self, Overflow},
    reg::Register,
    token::{ConstWrite, Deps, InRange, Modify, Read, UncheckedWrite, Update, Write},
};

/// Logical type of a field value.
///
/// Implemented for `bool` (one bit), the unsigned integers, and enumerations
/// deriving [`FieldValue`](macro@crate::FieldValue).
pub trait FieldValue: Sized + Copy + 'static {
    /// Number of bits the type can represent.
    const BITS: u32;

    /// Converts right-justified field bits into the value.
    fn from_bits(bits: u64) -> Self;

    /// Converts the value into right-justified field bits.
    fn into_bits(self) -> u64;
}

impl FieldValue for bool {
    const BITS: u32 = 1;

    #[inline]
    fn from_bits(bits: u64) -> Self {
        bits & 1 != 0
    }

    #[inline]
    fn into_bits(self) -> u64 {
        u64::from(self)
    }
}

macro_rules! field_value {
    ($($type:ty),*) => {
        $(
            impl FieldValue for $type {
                const BITS: u32 = <$type>::BITS;

                #[inline]
                #[allow(clippy::cast_possible_truncation)]
                fn from_bits(bits: u64) -> Self {
                    bits as $type
                }

                #[inline]
                fn into_bits(self) -> u64 {
                    u64::from(self)
                }
            }
        )*
    };
}

field_value!(u8, u16, u32, u64);

/// Run-time description of a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldInfo {
    /// Field name.
    pub name: &'static str,
    /// Most significant bit, inclusive.
    pub msb: u32,
    /// Least significant bit, inclusive.
    pub lsb: u32,
    /// Access permission.
    pub access: Access,
}

impl FieldInfo {
    /// Creates a new field description.
    #[inline]
    pub const fn new(name: &'static str, msb: u32, lsb: u32, access: Access) -> Self {
        Self { name, msb, lsb, access }
    }

    /// Returns `true` if `msb` is below `lsb`.
    #[inline]
    pub const fn is_inverted(&self) -> bool {
        self.msb < self.lsb
    }

    /// Returns `true` if the field fits into a register of the given width.
    #[inline]
    pub const fn fits(&self, width: Width) -> bool {
        !self.is_inverted() && self.msb < width.bits()
    }

    /// Returns the mask of the field, or zero if the field does not fit into
    /// `width`.
    #[inline]
    pub const fn mask(&self, width: Width) -> u64 {
        if self.fits(width) {
            bits::mask(self.msb, self.lsb, width)
        } else {
            0
        }
    }
}

/// Register value type of a field.
pub type RegVal<F> = <<F as Field>::Reg as Register>::Value;

/// Register field.
pub trait Field: Copy + 'static {
    /// Parent register.
    type Reg: Register;

    /// Logical value type.
    type Value: FieldValue;

    /// Field name.
    const NAME: &'static str;

    /// Most significant bit, inclusive.
    const MSB: u32;

    /// Least significant bit, inclusive.
    const LSB: u32;

    /// Access permission.
    const ACCESS: Access;

    #[doc(hidden)]
    const VALID: () = {
        assert!(Self::MSB >= Self::LSB, "field msb is below its lsb");
        assert!(
            Self::MSB < <RegVal<Self> as RegValue>::WIDTH.bits(),
            "field does not fit into its register"
        );
        assert!(
            <Self::Value as FieldValue>::BITS >= Self::MSB - Self::LSB + 1,
            "field value type is narrower than the field"
        );
    };

    /// Bit mask of the field inside the register.
    const MASK: u64 = bits::mask(Self::MSB, Self::LSB, <RegVal<Self> as RegValue>::WIDTH);

    /// Largest right-justified value the field can hold.
    const MAX: u64 = Self::MASK >> Self::LSB;

    /// Run-time description.
    const INFO: FieldInfo = FieldInfo::new(Self::NAME, Self::MSB, Self::LSB, Self::ACCESS);

    /// Extracts the field value from a register value.
    #[inline]
    fn to_field(self, raw: RegVal<Self>) -> Self::Value {
        let () = Self::VALID;
        Self::Value::from_bits(bits::extract(raw.into_u64(), Self::MASK, Self::LSB))
    }

    /// Merges `value` into a register value, leaving the other bits intact.
    #[inline]
    fn to_reg(self, raw: RegVal<Self>, value: Self::Value) -> RegVal<Self> {
        let () = Self::VALID;
        RegValue::from_u64(bits::insert(raw.into_u64(), Self::MASK, Self::LSB, value.into_bits()))
    }

    /// Brings `value` into the field's range with the register's overflow
    /// strategy.
    #[inline]
    fn runtime_check(self, value: Self::Value) -> Self::Value {
        self.runtime_check_with(value, &<Self::Reg as Register>::Overflow::default())
    }

    /// Brings `value` into the field's range with the given overflow strategy.
    fn runtime_check_with<P: Overflow + ?Sized>(self, value: Self::Value, policy: &P) -> Self::Value {
        let () = Self::VALID;
        let bits = overflow::check(
            policy,
            <Self::Reg as Register>::NAME,
            Self::NAME,
            value.into_bits(),
            Self::MAX,
        );
        Self::Value::from_bits(bits)
    }
}

/// Readable field.
pub trait RField: Field {
    #[doc(hidden)]
    const CAN_READ: () = assert!(Self::ACCESS.is_readable(), "cannot read write-only field");

    /// Requests the current value of the field.
    #[inline]
    fn read(self) -> Read<Self> {
        let () = Self::VALID;
        let () = Self::CAN_READ;
        Read::new()
    }
}

/// Writable field.
pub trait WField: Field {
    #[doc(hidden)]
    const CAN_WRITE: () = assert!(Self::ACCESS.is_writable(), "cannot write read-only field");

    /// Writes a run-time value, routed through the register's overflow
    /// strategy.
    #[inline]
    fn write(self, value: Self::Value) -> Write<Self> {
        let () = Self::VALID;
        let () = Self::CAN_WRITE;
        Write::new(self.runtime_check(value).into_bits())
    }

    /// Writes a run-time value, routed through `policy`.
    #[inline]
    fn write_with<P: Overflow + ?Sized>(self, value: Self::Value, policy: &P) -> Write<Self> {
        let () = Self::VALID;
        let () = Self::CAN_WRITE;
        Write::new(self.runtime_check_with(value, policy).into_bits())
    }

    /// Writes a constant. A constant that does not fit fails the build.
    #[inline]
    fn write_const<const V: u64>(self) -> ConstWrite<Self> {
        let () = Self::VALID;
        let () = Self::CAN_WRITE;
        let () = InRange::<Self, V>::OK;
        ConstWrite::new(V)
    }

    /// Writes raw bits without a range check. Bits beyond the field are
    /// dropped.
    #[inline]
    fn write_unchecked(self, bits: u64) -> UncheckedWrite<Self> {
        let () = Self::VALID;
        let () = Self::CAN_WRITE;
        UncheckedWrite::new(bits)
    }

    /// Replaces the field value with the result of `f` applied to the current
    /// one.
    #[inline]
    fn modify<G>(self, f: G) -> Update<Self, G>
    where
        Self: RField,
        G: FnOnce(Self::Value) -> Self::Value,
    {
        let () = Self::VALID;
        let () = Self::CAN_WRITE;
        Update::new(f)
    }

    /// Replaces the field value with the result of `f` applied to the current
    /// values of `deps`, readable fields of the same register.
    #[inline]
    fn modify_with<D, G>(self, deps: D, f: G) -> Modify<Self, D, G>
    where
        D: Deps<Reg = Self::Reg>,
        G: FnOnce(D::Values) -> Self::Value,
    {
        let () = Self::VALID;
        let () = Self::CAN_WRITE;
        Modify::new(deps, f)
    }
}
