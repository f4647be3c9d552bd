//! Register buses.

use crate::bits::RegValue;
use core::ptr;

/// Transport carrying register reads and writes.
///
/// The apply engine issues at most one read and one write per register in a
/// batch. Retries, timeouts, and atomicity against concurrent modification are
/// the implementation's concern.
pub trait Bus {
    /// Reads the register at `address`.
    fn read<V: RegValue>(&mut self, address: usize) -> V;

    /// Writes `value` to the register at `address`.
    fn write<V: RegValue>(&mut self, value: V, address: usize);
}

impl<B: Bus + ?Sized> Bus for &mut B {
    #[inline]
    fn read<V: RegValue>(&mut self, address: usize) -> V {
        (**self).read(address)
    }

    #[inline]
    fn write<V: RegValue>(&mut self, value: V, address: usize) {
        (**self).write(value, address);
    }
}

/// Memory-mapped bus: volatile loads and stores at the register address.
#[derive(Debug)]
pub struct Mmio {
    _private: (),
}

impl Mmio {
    /// Creates the memory-mapped bus.
    ///
    /// # Safety
    ///
    /// Every register passed to `apply` with this bus must describe a valid,
    /// suitably aligned memory-mapped location, and no other code may treat
    /// that location as ordinary memory.
    #[inline]
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl Bus for Mmio {
    #[inline]
    fn read<V: RegValue>(&mut self, address: usize) -> V {
        // SAFETY: the address validity is guaranteed by the caller of `Mmio::new`.
        unsafe { ptr::read_volatile(address as *const V) }
    }

    #[inline]
    fn write<V: RegValue>(&mut self, value: V, address: usize) {
        // SAFETY: the address validity is guaranteed by the caller of `Mmio::new`.
        unsafe { ptr::write_volatile(address as *mut V, value) }
    }
}
