//! Operation tokens.
//!
//! A token records one operation on a field or on a whole register: a write of
//! a compile-time constant, a write of a checked run-time value, an unchecked
//! write, a read-modify-write, or a read. Tokens perform no I/O. They are
//! consumed by [`apply`](crate::apply::apply), which merges every token of a
//! batch into at most one bus read and one bus write per register.
//!
//! Inside the engine each token is seen through the object-safe [`Stage`]
//! trait, which describes it with the [`Op`] tagged union.

use crate::{
    bits::{self, RegValue},
    field::{Field, FieldValue, RField},
    overflow::{self, Overflow},
    reg::{RReg, RegInfo, Register, Whole},
};
use core::{fmt, marker::PhantomData};

/// Something a token can operate on: a field or a [`Whole`] register.
pub trait Target: 'static {
    /// Register the target belongs to.
    type Reg: Register;

    /// Value type handed to and returned from the target's operations.
    type Value: Copy;

    /// Target name.
    const NAME: &'static str;

    /// Bits of the register covered by the target.
    const MASK: u64;

    /// Position of the lowest covered bit.
    const LSB: u32;

    /// Bits a right-justified constant may have set.
    const LIMIT: u64;

    /// Converts right-justified bits into the value type.
    fn lift(bits: u64) -> Self::Value;

    /// Converts the value into right-justified bits.
    fn lower(value: Self::Value) -> u64;

    /// Brings run-time bits into the target's range.
    fn check<P: Overflow + ?Sized>(bits: u64, policy: &P) -> u64;
}

impl<F: Field> Target for F {
    type Reg = <F as Field>::Reg;
    type Value = <F as Field>::Value;

    const NAME: &'static str = <F as Field>::NAME;
    const MASK: u64 = <F as Field>::MASK;
    const LSB: u32 = <F as Field>::LSB;
    const LIMIT: u64 = <F as Field>::MAX;

    #[inline]
    fn lift(bits: u64) -> Self::Value {
        <F as Field>::Value::from_bits(bits)
    }

    #[inline]
    fn lower(value: Self::Value) -> u64 {
        value.into_bits()
    }

    #[inline]
    fn check<P: Overflow + ?Sized>(bits: u64, policy: &P) -> u64 {
        overflow::check(
            policy,
            <<F as Field>::Reg as Register>::NAME,
            <F as Field>::NAME,
            bits,
            <F as Field>::MAX,
        )
    }
}

impl<R: Register> Target for Whole<R> {
    type Reg = R;
    type Value = R::Value;

    const NAME: &'static str = R::NAME;
    const MASK: u64 = <R::Value as RegValue>::WIDTH.mask();
    const LSB: u32 = 0;
    const LIMIT: u64 = R::WRITABLE;

    #[inline]
    fn lift(bits: u64) -> Self::Value {
        R::Value::from_u64(bits)
    }

    #[inline]
    fn lower(value: Self::Value) -> u64 {
        value.into_u64()
    }

    #[inline]
    fn check<P: Overflow + ?Sized>(bits: u64, _policy: &P) -> u64 {
        Self::mask(bits)
    }
}

/// Operation kind with its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    /// Write of a value checked at compile time.
    Const {
        /// Target mask.
        mask: u64,
        /// Target position.
        lsb: u32,
        /// Right-justified value.
        bits: u64,
    },
    /// Write of a value checked at run time.
    Checked {
        /// Target mask.
        mask: u64,
        /// Target position.
        lsb: u32,
        /// Right-justified value.
        bits: u64,
    },
    /// Write of an unchecked value.
    Unchecked {
        /// Target mask.
        mask: u64,
        /// Target position.
        lsb: u32,
        /// Right-justified value.
        bits: u64,
    },
    /// Read-modify-write, the value is produced by [`Stage::modify`].
    Modify {
        /// Target mask.
        mask: u64,
        /// Target position.
        lsb: u32,
    },
    /// Read, the value is delivered to [`Stage::settle`].
    Read {
        /// Target mask.
        mask: u64,
        /// Target position.
        lsb: u32,
    },
}

impl Op {
    /// Returns the target mask.
    pub const fn mask(&self) -> u64 {
        match *self {
            Self::Const { mask, .. }
            | Self::Checked { mask, .. }
            | Self::Unchecked { mask, .. }
            | Self::Modify { mask, .. }
            | Self::Read { mask, .. } => mask,
        }
    }

    /// Returns the target position.
    pub const fn lsb(&self) -> u32 {
        match *self {
            Self::Const { lsb, .. }
            | Self::Checked { lsb, .. }
            | Self::Unchecked { lsb, .. }
            | Self::Modify { lsb, .. }
            | Self::Read { lsb, .. } => lsb,
        }
    }

    /// Returns the bits the operation writes.
    pub const fn write_mask(&self) -> u64 {
        match self {
            Self::Read { .. } => 0,
            _ => self.mask(),
        }
    }
}

/// Token as seen by the apply engine.
pub trait Stage {
    /// Returns the description of the target register.
    fn register(&self) -> RegInfo;

    /// Returns the operation.
    fn op(&self) -> Op;

    /// Returns the right-justified bits to write, computed from the register
    /// value read before the batch. Called once, for [`Op::Modify`] only.
    fn modify(&mut self, snapshot: u64) -> u64 {
        let op = self.op();
        bits::extract(snapshot, op.mask(), op.lsb())
    }

    /// Receives the register value read before the batch. Called once, for
    /// [`Op::Read`] only.
    fn settle(&mut self, _snapshot: u64) {}
}

/// Operation token.
pub trait Token: Stage {
    /// Register the token operates on.
    type Reg: Register;

    /// Value returned from `apply` in the token's position.
    type Output;

    /// Bits written by the token.
    const WRITE_MASK: u64;

    /// Produces the result after the engine has run.
    fn finish(self) -> Self::Output;
}

macro_rules! write_token {
    ($(#[$attr:meta])* $name:ident, $op:ident) => {
        $(#[$attr])*
        #[must_use = "tokens do nothing unless passed to `apply`"]
        pub struct $name<T: Target> {
            bits: u64,
            _target: PhantomData<fn() -> T>,
        }

        impl<T: Target> $name<T> {
            #[inline]
            pub(crate) fn new(bits: u64) -> Self {
                Self { bits, _target: PhantomData }
            }

            /// Returns the right-justified value to write.
            #[inline]
            pub fn bits(&self) -> u64 {
                self.bits
            }
        }

        impl<T: Target> Stage for $name<T> {
            #[inline]
            fn register(&self) -> RegInfo {
                let () = <T::Reg as Register>::VALID;
                <T::Reg as Register>::INFO
            }

            #[inline]
            fn op(&self) -> Op {
                Op::$op { mask: T::MASK, lsb: T::LSB, bits: self.bits }
            }
        }

        impl<T: Target> Token for $name<T> {
            type Reg = T::Reg;
            type Output = ();

            const WRITE_MASK: u64 = T::MASK;

            #[inline]
            fn finish(self) -> Self::Output {}
        }

        impl<T: Target> fmt::Debug for $name<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("target", &T::NAME)
                    .field("bits", &self.bits)
                    .finish()
            }
        }
    };
}

write_token! {
    /// Write of a constant checked at compile time.
    ConstWrite, Const
}

write_token! {
    /// Write of a run-time value brought into range when the token was made.
    Write, Checked
}

write_token! {
    /// Write of raw bits without a range check.
    UncheckedWrite, Unchecked
}

/// Read-modify-write of a target from its own current value.
#[must_use = "tokens do nothing unless passed to `apply`"]
pub struct Update<T: Target, G> {
    f: Option<G>,
    _target: PhantomData<fn() -> T>,
}

impl<T: Target, G> Update<T, G> {
    #[inline]
    pub(crate) fn new(f: G) -> Self {
        Self { f: Some(f), _target: PhantomData }
    }
}

impl<T: Target, G: FnOnce(T::Value) -> T::Value> Stage for Update<T, G> {
    #[inline]
    fn register(&self) -> RegInfo {
        let () = <T::Reg as Register>::VALID;
        <T::Reg as Register>::INFO
    }

    #[inline]
    fn op(&self) -> Op {
        Op::Modify { mask: T::MASK, lsb: T::LSB }
    }

    fn modify(&mut self, snapshot: u64) -> u64 {
        let current = bits::extract(snapshot, T::MASK, T::LSB);
        match self.f.take() {
            Some(f) => T::check(
                T::lower(f(T::lift(current))),
                &<T::Reg as Register>::Overflow::default(),
            ),
            None => current,
        }
    }
}

impl<T: Target, G: FnOnce(T::Value) -> T::Value> Token for Update<T, G> {
    type Reg = T::Reg;
    type Output = ();

    const WRITE_MASK: u64 = T::MASK;

    #[inline]
    fn finish(self) -> Self::Output {}
}

impl<T: Target, G> fmt::Debug for Update<T, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Update").field("target", &T::NAME).finish_non_exhaustive()
    }
}

/// Read-modify-write of a target from the current values of other fields of
/// the same register.
#[must_use = "tokens do nothing unless passed to `apply`"]
pub struct Modify<T: Target, D, G> {
    f: Option<G>,
    _target: PhantomData<fn() -> (T, D)>,
}

impl<T: Target, D: Deps<Reg = T::Reg>, G> Modify<T, D, G> {
    #[inline]
    pub(crate) fn new(_deps: D, f: G) -> Self {
        Self { f: Some(f), _target: PhantomData }
    }
}

impl<T, D, G> Stage for Modify<T, D, G>
where
    T: Target,
    D: Deps<Reg = T::Reg>,
    G: FnOnce(D::Values) -> T::Value,
{
    #[inline]
    fn register(&self) -> RegInfo {
        let () = <T::Reg as Register>::VALID;
        <T::Reg as Register>::INFO
    }

    #[inline]
    fn op(&self) -> Op {
        Op::Modify { mask: T::MASK, lsb: T::LSB }
    }

    fn modify(&mut self, snapshot: u64) -> u64 {
        match self.f.take() {
            Some(f) => T::check(
                T::lower(f(D::extract(snapshot))),
                &<T::Reg as Register>::Overflow::default(),
            ),
            None => bits::extract(snapshot, T::MASK, T::LSB),
        }
    }
}

impl<T, D, G> Token for Modify<T, D, G>
where
    T: Target,
    D: Deps<Reg = T::Reg>,
    G: FnOnce(D::Values) -> T::Value,
{
    type Reg = T::Reg;
    type Output = ();

    const WRITE_MASK: u64 = T::MASK;

    #[inline]
    fn finish(self) -> Self::Output {}
}

impl<T: Target, D, G> fmt::Debug for Modify<T, D, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Modify").field("target", &T::NAME).finish_non_exhaustive()
    }
}

/// Read of a target. The value observed is the one before any write of the
/// same batch.
#[must_use = "tokens do nothing unless passed to `apply`"]
pub struct Read<T: Target> {
    bits: u64,
    _target: PhantomData<fn() -> T>,
}

impl<T: Target> Read<T> {
    #[inline]
    pub(crate) fn new() -> Self {
        Self { bits: 0, _target: PhantomData }
    }
}

impl<T: Target> Stage for Read<T> {
    #[inline]
    fn register(&self) -> RegInfo {
        let () = <T::Reg as Register>::VALID;
        <T::Reg as Register>::INFO
    }

    #[inline]
    fn op(&self) -> Op {
        Op::Read { mask: T::MASK, lsb: T::LSB }
    }

    #[inline]
    fn settle(&mut self, snapshot: u64) {
        self.bits = bits::extract(snapshot, T::MASK, T::LSB);
    }
}

impl<T: Target> Token for Read<T> {
    type Reg = T::Reg;
    type Output = T::Value;

    const WRITE_MASK: u64 = 0;

    #[inline]
    fn finish(self) -> Self::Output {
        T::lift(self.bits)
    }
}

impl<T: Target> fmt::Debug for Read<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Read").field("target", &T::NAME).finish()
    }
}

#[doc(hidden)]
pub struct InRange<T, const V: u64>(PhantomData<T>);

impl<T: Target, const V: u64> InRange<T, V> {
    pub const OK: () = assert!((V & !T::LIMIT) == 0, "assigned value greater than allowed");
}

/// Readable target whose value a read-modify-write may depend on.
pub trait Dep {
    /// Register the dependency belongs to.
    type Reg: Register;

    /// Value type of the dependency.
    type Value;

    /// Extracts the dependency from a register value.
    fn extract(raw: u64) -> Self::Value;
}

impl<F: RField> Dep for F {
    type Reg = <F as Field>::Reg;
    type Value = <F as Field>::Value;

    #[inline]
    fn extract(raw: u64) -> Self::Value {
        <F as Field>::Value::from_bits(bits::extract(raw, <F as Field>::MASK, <F as Field>::LSB))
    }
}

impl<R: RReg> Dep for Whole<R> {
    type Reg = R;
    type Value = R::Value;

    #[inline]
    fn extract(raw: u64) -> Self::Value {
        R::Value::from_u64(raw)
    }
}

/// Tuple of dependencies on a single register.
pub trait Deps {
    /// Register every dependency belongs to.
    type Reg: Register;

    /// Tuple of dependency values.
    type Values;

    /// Extracts every dependency from a register value.
    fn extract(raw: u64) -> Self::Values;
}

macro_rules! deps {
    ($first:ident $(, $rest:ident)*) => {
        impl<$first: Dep $(, $rest: Dep<Reg = <$first as Dep>::Reg>)*> Deps for ($first, $($rest,)*) {
            type Reg = <$first as Dep>::Reg;
            type Values = (<$first as Dep>::Value, $(<$rest as Dep>::Value,)*);

            #[inline]
            fn extract(raw: u64) -> Self::Values {
                (<$first as Dep>::extract(raw), $(<$rest as Dep>::extract(raw),)*)
            }
        }
    };
}

deps!(D0);
deps!(D0, D1);
deps!(D0, D1, D2);
deps!(D0, D1, D2, D3);
deps!(D0, D1, D2, D3, D4);
deps!(D0, D1, D2, D3, D4, D5);
