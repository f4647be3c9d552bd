use bitreg::{
    overflow::{Custom, Overflowed, Wrap},
    prelude::*,
    reg,
    sim::{SimBus, Transfer},
};

reg! {
    pub mod DMA CFG;
    0x4002_0000 u32;
    LOW { 15:0 RW }
    HIGH { 31:16 RW }
}

reg! {
    pub mod DMA CNT;
    0x4002_0004 u8;
    COUNT { 4:0 RW u8 }
}

reg! {
    pub mod DMA CTRL;
    0x4002_0008 u16;
    EN { 0 RW }
    SIZE { 3:1 RW u8 }
    BURST { 7:4 RW u8 }
    CHAN { 11:8 RW u8 }
}

const CFG: usize = 0x4002_0000;
const CNT: usize = 0x4002_0004;
const CTRL: usize = 0x4002_0008;

#[test]
fn reads_observe_value_before_write() {
    assert_eq!(DmaCfg::LAYOUT, 0xFFFF_FFFF);
    let mut bus = SimBus::new();
    let cfg = dma_cfg::REG;
    let ((), high) = apply(&mut bus, (cfg.low.write_const::<0xF>(), cfg.high.read()));
    assert_eq!(high, 0);
    assert_eq!(bus.peek(CFG), 0xF);
    assert_eq!((bus.reads(), bus.writes()), (1, 1));
}

#[test]
fn modify_field() {
    let mut bus = SimBus::new();
    bus.preload(CNT, 0b00001);
    let cnt = dma_cnt::REG;
    apply(&mut bus, (cnt.count.modify(|count| count | 0b00010),));
    assert_eq!(cnt.count.to_field(bus.peek(CNT) as u8), 0b00011);
    assert_eq!(
        bus.transfers(),
        &[
            Transfer::Read { address: CNT, value: 0b00001 },
            Transfer::Write { address: CNT, value: 0b00011 },
        ]
    );
}

#[test]
fn full_layout_write_skips_read() {
    let mut bus = SimBus::new();
    bus.preload(CFG, 0x5555_5555);
    let cfg = dma_cfg::REG;
    apply(&mut bus, (cfg.low.write_const::<0x1234>(), cfg.high.write_const::<0xABCD>()));
    assert_eq!(bus.transfers(), &[Transfer::Write { address: CFG, value: 0xABCD_1234 }]);
}

#[test]
fn partial_write_preserves_other_fields() {
    let mut bus = SimBus::new();
    bus.preload(CTRL, 0x0A51);
    let ctrl = dma_ctrl::REG;
    apply(&mut bus, (ctrl.size.write(5),));
    let raw = bus.peek(CTRL) as u16;
    assert_eq!(ctrl.size.to_field(raw), 5);
    assert_eq!(ctrl.burst.to_field(raw), 5);
    assert_eq!(ctrl.chan.to_field(raw), 0xA);
    assert!(ctrl.en.to_field(raw));
}

#[test]
fn out_of_range_values() {
    let mut bus = SimBus::new();
    let ctrl = dma_ctrl::REG;
    apply(&mut bus, (ctrl.burst.write(0xFF),));
    assert_eq!(bus.peek(CTRL), 0xF0);
    apply(&mut bus, (ctrl.burst.write_with(0x13, &Wrap),));
    assert_eq!(bus.peek(CTRL), 0x30);
    let halve = Custom(|overflowed: &Overflowed| overflowed.value >> 4);
    apply(&mut bus, (ctrl.burst.write_with(0x25, &halve),));
    assert_eq!(bus.peek(CTRL), 0x20);
    apply(&mut bus, (ctrl.size.write_unchecked(0xFF),));
    assert_eq!(bus.peek(CTRL), 0x2E);
}

#[test]
fn modify_with_other_fields() {
    let mut bus = SimBus::new();
    bus.preload(CTRL, 0x0014);
    let ctrl = dma_ctrl::REG;
    apply(
        &mut bus,
        (ctrl.en.modify_with((ctrl.size, ctrl.burst), |(size, burst)| size != 0 && burst != 0),),
    );
    assert_eq!(bus.peek(CTRL), 0x0015);
    apply(&mut bus, (ctrl.chan.modify_with((ctrl.burst,), |(burst,)| burst + 2),));
    assert_eq!(bus.peek(CTRL), 0x0315);
}

#[test]
fn modify_with_sees_snapshot() {
    let mut bus = SimBus::new();
    let ctrl = dma_ctrl::REG;
    apply(
        &mut bus,
        (ctrl.size.write(7), ctrl.en.modify_with((ctrl.size,), |(size,)| size == 7)),
    );
    assert_eq!(bus.peek(CTRL), 0x000E);
}

#[test]
fn modify_with_whole_register() {
    let mut bus = SimBus::new();
    bus.preload(CFG, 0x0000_BEEF);
    let cfg = dma_cfg::REG;
    apply(&mut bus, (cfg.high.modify_with((cfg.whole(),), |(raw,)| raw & 0xFFFF),));
    assert_eq!(bus.peek(CFG), 0xBEEF_BEEF);
}

#[test]
fn whole_register() {
    let mut bus = SimBus::new();
    let cfg = dma_cfg::REG;
    apply(&mut bus, (cfg.write(0x1234_5678),));
    assert_eq!((bus.reads(), bus.writes()), (0, 1));
    let (raw,) = apply(&mut bus, (cfg.read(),));
    assert_eq!(raw, 0x1234_5678);
    apply(&mut bus, (cfg.modify(|raw| raw ^ 0xFFFF_0000),));
    assert_eq!(bus.peek(CFG), 0xEDCB_5678);
    apply(&mut bus, (cfg.write_unchecked(0xFFFF_FFFF),));
    assert_eq!(bus.peek(CFG), 0xFFFF_FFFF);
}

#[test]
fn several_registers() {
    let mut bus = SimBus::new();
    bus.preload(CFG, 0x0000_0042);
    let (cfg, cnt, ctrl) = (dma_cfg::REG, dma_cnt::REG, dma_ctrl::REG);
    let ((), low, ()) = apply_all(
        &mut bus,
        (ctrl.en.write(true), cfg.low.read(), cnt.count.write_const::<3>()),
    );
    assert_eq!(low, 0x42);
    assert_eq!(
        bus.transfers(),
        &[
            Transfer::Read { address: CFG, value: 0x42 },
            Transfer::Write { address: CNT, value: 3 },
            Transfer::Read { address: CTRL, value: 0 },
            Transfer::Write { address: CTRL, value: 1 },
        ]
    );
}

#[test]
fn several_tokens_per_register() {
    let mut bus = SimBus::new();
    bus.preload(CTRL, 0x0F00);
    let ctrl = dma_ctrl::REG;
    let (en, (), (), chan, ()) = apply(
        &mut bus,
        (
            ctrl.en.read(),
            ctrl.en.write(true),
            ctrl.size.write_const::<2>(),
            ctrl.chan.read(),
            ctrl.burst.modify(|burst| burst + 1),
        ),
    );
    assert!(!en);
    assert_eq!(chan, 0xF);
    assert_eq!(bus.peek(CTRL), 0x0F15);
    assert_eq!((bus.reads(), bus.writes()), (1, 1));
}
