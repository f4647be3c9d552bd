//! Simulated bus.

use crate::{
    bits::RegValue,
    bus::Bus,
    reg::{RegInfo, Register},
};
use std::collections::BTreeMap;

/// One bus transfer recorded by [`SimBus`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transfer {
    /// Register read.
    Read {
        /// Register address.
        address: usize,
        /// Value returned.
        value: u64,
    },
    /// Register write.
    Write {
        /// Register address.
        address: usize,
        /// Value written.
        value: u64,
    },
}

#[derive(Clone, Copy, Debug, Default)]
struct Cell {
    value: u64,
    info: Option<RegInfo>,
}

/// In-memory bus recording every transfer.
///
/// Unknown addresses read as zero. A register made known with
/// [`attach`](SimBus::attach) behaves like hardware: writes to read-only bits
/// are ignored, write-only bits read as zero, and `RW_1C`, `RW_1S`, `RW_0C`
/// bits clear or set on write.
///
/// ```
/// use bitreg::{bus::Bus, sim::SimBus};
///
/// let mut bus = SimBus::new();
/// bus.preload(0x100, 0xAB);
/// assert_eq!(bus.read::<u8>(0x100), 0xAB);
/// assert_eq!(bus.reads(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct SimBus {
    cells: BTreeMap<usize, Cell>,
    log: Vec<Transfer>,
}

impl SimBus {
    /// Creates an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emulates the field access semantics of `R` at its address.
    pub fn attach<R: Register>(&mut self) -> &mut Self {
        self.cells.entry(R::ADDRESS).or_default().info = Some(R::INFO);
        self
    }

    /// Stores `value` at `address` as is, bypassing access semantics and the
    /// transfer log.
    pub fn preload(&mut self, address: usize, value: u64) -> &mut Self {
        self.cells.entry(address).or_default().value = value;
        self
    }

    /// Returns the stored value at `address`, bypassing access semantics and
    /// the transfer log.
    pub fn peek(&self, address: usize) -> u64 {
        self.cells.get(&address).map_or(0, |cell| cell.value)
    }

    /// Returns every transfer since creation or the last
    /// [`clear_log`](SimBus::clear_log).
    pub fn transfers(&self) -> &[Transfer] {
        &self.log
    }

    /// Returns the number of reads.
    pub fn reads(&self) -> usize {
        self.log.iter().filter(|t| matches!(t, Transfer::Read { .. })).count()
    }

    /// Returns the number of writes.
    pub fn writes(&self) -> usize {
        self.log.iter().filter(|t| matches!(t, Transfer::Write { .. })).count()
    }

    /// Forgets recorded transfers.
    pub fn clear_log(&mut self) {
        self.log.clear();
    }
}

impl Bus for SimBus {
    fn read<V: RegValue>(&mut self, address: usize) -> V {
        let cell = self.cells.get(&address).copied().unwrap_or_default();
        let mut value = cell.value & V::WIDTH.mask();
        if let Some(info) = cell.info {
            value &= !info.wo;
        }
        self.log.push(Transfer::Read { address, value });
        V::from_u64(value)
    }

    fn write<V: RegValue>(&mut self, value: V, address: usize) {
        let value = value.into_u64();
        self.log.push(Transfer::Write { address, value });
        let cell = self.cells.entry(address).or_default();
        cell.value = match cell.info {
            Some(info) => latch(&info, cell.value, value),
            None => value,
        };
    }
}

/// Returns the stored register value after `value` is written over `old`.
fn latch(info: &RegInfo, old: u64, value: u64) -> u64 {
    let plain = !(info.ro | info.volatile());
    value & plain
        | old & info.ro
        | old & info.rw1c & !value
        | (old | value) & info.rw1s
        | old & info.rw0c & value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{access::Access, bits::Width, field::FieldInfo};

    fn info() -> RegInfo {
        RegInfo::new(
            "STAT",
            0x20,
            Width::W8,
            &[
                FieldInfo::new("RO", 0, 0, Access::Ro),
                FieldInfo::new("WO", 1, 1, Access::Wo),
                FieldInfo::new("RW", 2, 2, Access::Rw),
                FieldInfo::new("W1C", 3, 3, Access::Rw1c),
                FieldInfo::new("W1S", 4, 4, Access::Rw1s),
                FieldInfo::new("W0C", 5, 5, Access::Rw0c),
            ],
        )
    }

    #[test]
    fn latch_semantics() {
        let info = info();
        // Read-only survives, write-only and plain take the new value.
        assert_eq!(latch(&info, 0b0000_0001, 0b0000_0110), 0b0000_0111);
        assert_eq!(latch(&info, 0b0000_0000, 0b0000_0001), 0b0000_0000);
        // Write-1-to-clear.
        assert_eq!(latch(&info, 0b0000_1000, 0b0000_1000), 0b0000_0000);
        assert_eq!(latch(&info, 0b0000_1000, 0b0000_0000), 0b0000_1000);
        // Write-1-to-set.
        assert_eq!(latch(&info, 0b0000_0000, 0b0001_0000), 0b0001_0000);
        assert_eq!(latch(&info, 0b0001_0000, 0b0000_0000), 0b0001_0000);
        // Write-0-to-clear.
        assert_eq!(latch(&info, 0b0010_0000, 0b0000_0000), 0b0000_0000);
        assert_eq!(latch(&info, 0b0010_0000, 0b0010_0000), 0b0010_0000);
        // Undeclared bits behave as plain storage.
        assert_eq!(latch(&info, 0b1000_0000, 0b0100_0000), 0b0100_0000);
    }

    #[test]
    fn plain_cells() {
        let mut bus = SimBus::new();
        assert_eq!(bus.read::<u32>(0x10), 0);
        bus.write(0xDEAD_BEEF_u32, 0x10);
        assert_eq!(bus.peek(0x10), 0xDEAD_BEEF);
        assert_eq!(bus.read::<u16>(0x10), 0xBEEF);
        assert_eq!(
            bus.transfers(),
            &[
                Transfer::Read { address: 0x10, value: 0 },
                Transfer::Write { address: 0x10, value: 0xDEAD_BEEF },
                Transfer::Read { address: 0x10, value: 0xBEEF },
            ]
        );
        assert_eq!((bus.reads(), bus.writes()), (2, 1));
        bus.clear_log();
        assert!(bus.transfers().is_empty());
        assert_eq!(bus.peek(0x10), 0xDEAD_BEEF);
    }

    #[test]
    fn write_only_bits_read_as_zero() {
        let mut bus = SimBus::new();
        bus.cells.entry(0x20).or_default().info = Some(info());
        bus.write(0b0000_0110_u8, 0x20);
        assert_eq!(bus.peek(0x20), 0b0000_0110);
        assert_eq!(bus.read::<u8>(0x20), 0b0000_0100);
    }
}
