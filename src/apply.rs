//! The apply engine.
//!
//! [`apply`] takes a tuple of [tokens](crate::token) targeting one register
//! and performs them with at most one bus read and one bus write:
//!
//! 1. The write mask is the union of all write-type tokens.
//! 2. Without writes, one read serves every read token.
//! 3. With writes, the register is read first if the write is partial (it
//!    does not cover every readable bit), if a read-modify-write needs the
//!    current value, or if the batch also reads the register.
//! 4. Side-effect and write-only bits not targeted by the batch get their
//!    neutral value, so writing back a pending `RW_1C` flag does not clear it
//!    and a write-only trigger is not fired again.
//! 5. Read-modify-writes are folded in first, each computed from the value
//!    read before the batch, then constant, checked, and unchecked writes.
//! 6. One write commits the result. Reads observe the value before it.
//!
//! [`apply_all`] accepts tokens for several registers and processes each
//! register once, in ascending address order.
//!
//! Issuing two writes to the same field, or a whole-register write next to any
//! other write to the same register, fails the build.

use crate::{
    bits::{self, RegValue, Width},
    bus::Bus,
    reg::{RegInfo, Register},
    token::{Op, Stage, Token},
};
use log::trace;

/// Tuple of tokens processed together.
pub trait Batch {
    /// Tuple of results, one per token.
    type Output;

    #[doc(hidden)]
    const DISJOINT: ();

    /// Performs the batch.
    fn run<B: Bus + ?Sized>(self, bus: &mut B) -> Self::Output;
}

/// Batch whose tokens all target the same register.
pub trait Uniform: Batch {
    /// The register.
    type Reg: Register;
}

/// Performs a batch of operations on a single register.
///
/// ```
/// use bitreg::{apply::apply, prelude::*, reg, sim::SimBus};
///
/// reg! {
///     pub mod UART CTRL;
///     0x4000_1000 u32;
///     EN { 0 RW }
///     DIV { 15:4 RW u16 }
/// }
///
/// fn main() {
///     let ctrl = uart_ctrl::REG;
///     let mut bus = SimBus::new();
///     bus.preload(0x4000_1000, 0x0000_0120);
///     let ((), div) = apply(&mut bus, (ctrl.en.write(true), ctrl.div.read()));
///     assert_eq!(div, 0x12);
///     assert_eq!(bus.peek(0x4000_1000), 0x0000_0121);
///     assert_eq!((bus.reads(), bus.writes()), (1, 1));
/// }
/// ```
#[inline]
pub fn apply<B: Bus + ?Sized, T: Uniform>(bus: &mut B, batch: T) -> T::Output {
    batch.run(bus)
}

/// Performs a batch of operations on several registers, one register at a
/// time in ascending address order.
#[inline]
pub fn apply_all<B: Bus + ?Sized, T: Batch>(bus: &mut B, batch: T) -> T::Output {
    batch.run(bus)
}

/// Returns `true` if no two entries of the same address share bits.
#[doc(hidden)]
pub const fn disjoint(writes: &[(usize, u64)]) -> bool {
    let mut i = 0;
    while i < writes.len() {
        let mut j = 0;
        while j < i {
            if writes[i].0 == writes[j].0 && writes[i].1 & writes[j].1 != 0 {
                return false;
            }
            j += 1;
        }
        i += 1;
    }
    true
}

macro_rules! batch {
    ($(($index:tt, $token:ident)),+) => {
        impl<$($token: Token),+> Batch for ($($token,)+) {
            type Output = ($(<$token as Token>::Output,)+);

            const DISJOINT: () = assert!(
                disjoint(&[$((
                    <<$token as Token>::Reg as Register>::ADDRESS,
                    <$token as Token>::WRITE_MASK,
                )),+]),
                "more than one write to the same field in one batch"
            );

            fn run<B: Bus + ?Sized>(mut self, bus: &mut B) -> Self::Output {
                let () = Self::DISJOINT;
                run(bus, &mut [$(&mut self.$index as &mut dyn Stage),+]);
                ($(self.$index.finish(),)+)
            }
        }
    };
}

macro_rules! uniform {
    ($first:ident $(, $rest:ident)*) => {
        impl<$first: Token $(, $rest: Token<Reg = <$first as Token>::Reg>)*> Uniform
            for ($first, $($rest,)*)
        {
            type Reg = <$first as Token>::Reg;
        }
    };
}

batch!((0, T0));
batch!((0, T0), (1, T1));
batch!((0, T0), (1, T1), (2, T2));
batch!((0, T0), (1, T1), (2, T2), (3, T3));
batch!((0, T0), (1, T1), (2, T2), (3, T3), (4, T4));
batch!((0, T0), (1, T1), (2, T2), (3, T3), (4, T4), (5, T5));
batch!((0, T0), (1, T1), (2, T2), (3, T3), (4, T4), (5, T5), (6, T6));
batch!((0, T0), (1, T1), (2, T2), (3, T3), (4, T4), (5, T5), (6, T6), (7, T7));

uniform!(T0);
uniform!(T0, T1);
uniform!(T0, T1, T2);
uniform!(T0, T1, T2, T3);
uniform!(T0, T1, T2, T3, T4);
uniform!(T0, T1, T2, T3, T4, T5);
uniform!(T0, T1, T2, T3, T4, T5, T6);
uniform!(T0, T1, T2, T3, T4, T5, T6, T7);

/// Runs the engine over type-erased stages.
///
/// Stages are grouped by register address. Each register is visited once, in
/// ascending address order.
pub fn run<B: Bus + ?Sized>(bus: &mut B, stages: &mut [&mut dyn Stage]) {
    let mut last = None;
    while let Some(info) = next_register(stages, last) {
        run_register(bus, &info, stages);
        last = Some(info.address);
    }
}

/// Returns the register with the lowest address above `last`.
fn next_register(stages: &[&mut dyn Stage], last: Option<usize>) -> Option<RegInfo> {
    stages
        .iter()
        .map(|stage| stage.register())
        .filter(|info| last.map_or(true, |last| info.address > last))
        .min_by_key(|info| info.address)
}

fn run_register<B: Bus + ?Sized>(bus: &mut B, info: &RegInfo, stages: &mut [&mut dyn Stage]) {
    let mut write_mask = 0;
    let mut modifies = false;
    let mut reads = false;
    for stage in stages.iter().filter(|stage| stage.register().address == info.address) {
        let op = stage.op();
        write_mask |= op.write_mask();
        modifies |= matches!(op, Op::Modify { .. });
        reads |= matches!(op, Op::Read { .. });
    }
    if write_mask == 0 {
        if reads {
            let snapshot = load(bus, info);
            settle(info, stages, snapshot);
        }
        return;
    }
    let partial = info.layout() & !write_mask != 0;
    let snapshot = if partial || modifies || reads { load(bus, info) } else { 0 };
    let mut raw = info.quiesce(snapshot, write_mask);
    for pass in 0..4 {
        for stage in stages.iter_mut().filter(|stage| stage.register().address == info.address) {
            let (mask, lsb, value) = match (pass, stage.op()) {
                (0, Op::Modify { mask, lsb }) => (mask, lsb, stage.modify(snapshot)),
                (1, Op::Const { mask, lsb, bits })
                | (2, Op::Checked { mask, lsb, bits })
                | (3, Op::Unchecked { mask, lsb, bits }) => (mask, lsb, bits),
                _ => continue,
            };
            raw = bits::insert(raw, mask, lsb, value);
        }
    }
    store(bus, info, raw);
    settle(info, stages, snapshot);
}

fn settle(info: &RegInfo, stages: &mut [&mut dyn Stage], snapshot: u64) {
    for stage in stages.iter_mut().filter(|stage| stage.register().address == info.address) {
        if let Op::Read { .. } = stage.op() {
            stage.settle(snapshot);
        }
    }
}

fn load<B: Bus + ?Sized>(bus: &mut B, info: &RegInfo) -> u64 {
    let raw = match info.width {
        Width::W8 => bus.read::<u8>(info.address).into_u64(),
        Width::W16 => bus.read::<u16>(info.address).into_u64(),
        Width::W32 => bus.read::<u32>(info.address).into_u64(),
        Width::W64 => bus.read::<u64>(info.address),
    };
    trace!("{} -> {:#x}", info, raw);
    raw
}

fn store<B: Bus + ?Sized>(bus: &mut B, info: &RegInfo, raw: u64) {
    trace!("{} <- {:#x}", info, raw);
    match info.width {
        Width::W8 => bus.write(u8::from_u64(raw), info.address),
        Width::W16 => bus.write(u16::from_u64(raw), info.address),
        Width::W32 => bus.write(u32::from_u64(raw), info.address),
        Width::W64 => bus.write(raw, info.address),
    }
}
