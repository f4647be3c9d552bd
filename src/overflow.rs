//! Handling of run-time values that do not fit into their field.
//!
//! A value computed at run time and written into a field goes through
//! [`check`]. Values that fit pass unchanged. For the rest, the register's
//! [`Overflow`] strategy picks the value to write instead. The result is always
//! within range, so a write never spills into neighbouring fields.

use log::{debug, warn};
use thiserror::Error;

/// Report of a value exceeding its field's range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("value {value:#x} does not fit into {register}.{field} (max {max:#x})")]
pub struct Overflowed {
    /// Register name.
    pub register: &'static str,
    /// Field name.
    pub field: &'static str,
    /// Offending value, right-justified.
    pub value: u64,
    /// Largest value the field can hold.
    pub max: u64,
}

/// Overflow strategy.
pub trait Overflow {
    /// Returns the value to write instead of `overflowed.value`.
    ///
    /// The result is clamped to `overflowed.max` by the caller.
    fn resolve(&self, overflowed: &Overflowed) -> u64;
}

impl<P: Overflow + ?Sized> Overflow for &P {
    #[inline]
    fn resolve(&self, overflowed: &Overflowed) -> u64 {
        (**self).resolve(overflowed)
    }
}

/// Saturates to the field's maximum. The default strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Clamp;

impl Overflow for Clamp {
    fn resolve(&self, overflowed: &Overflowed) -> u64 {
        warn!("{}; clamped to {:#x}", overflowed, overflowed.max);
        overflowed.max
    }
}

/// Keeps the low order bits that fit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Wrap;

impl Overflow for Wrap {
    fn resolve(&self, overflowed: &Overflowed) -> u64 {
        let value = overflowed.value & overflowed.max;
        debug!("{}; wrapped to {:#x}", overflowed, value);
        value
    }
}

/// Strategy backed by a closure.
///
/// ```
/// use bitreg::overflow::{check, Custom, Overflowed};
///
/// let zero = Custom(|_: &Overflowed| 0_u64);
/// assert_eq!(check(&zero, "CTRL", "DIV", 0x1FF, 0xFF), 0);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Custom<F>(pub F);

impl<F: Fn(&Overflowed) -> u64> Overflow for Custom<F> {
    #[inline]
    fn resolve(&self, overflowed: &Overflowed) -> u64 {
        (self.0)(overflowed)
    }
}

/// Returns `value` if it does not exceed `max`, or the strategy's replacement
/// otherwise. The result never exceeds `max`.
pub fn check<P: Overflow + ?Sized>(
    policy: &P,
    register: &'static str,
    field: &'static str,
    value: u64,
    max: u64,
) -> u64 {
    if value <= max {
        value
    } else {
        policy.resolve(&Overflowed { register, field, value, max }).min(max)
    }
}
