use bitreg::{
    access::Access,
    addr, bit,
    field::FieldInfo,
    lit,
    overflow::Clamp,
    prelude::*,
    reg,
    reg::RegInfo,
    sim::{SimBus, Transfer},
};
use std::mem::size_of;

reg! {
    /// Test block doc attribute
    #[doc = "test reg attribute"]
    pub mod TEST CTRL;
    0x4000_0000 u32;
    /// Enable bit.
    EN { 0 RW }
    MODE { 3:1 RW u8 }
    BUSY { 4 RO }
    START { 5 WO }
    PRESCALER { 23:8 RW u16 }
    RES { 31:24 NA }
}

reg! {
    pub mod TEST STAT;
    0x4000_0004 u8;
    /// Overrun flag.
    OVR { 0 RW_1C }
    ARM { 1 RW_1S }
    RDY { 2 RW_0C }
    LEVEL { 7:4 RW }
}

reg! {
    pub(crate) mod TEST DATA;
    0x4000_0008 u16;
    overflow Wrap;
    BYTE { 7:0 RW }
    PAD { 15:8 RW u8 }
}

#[test]
fn size_of_handles() {
    assert_eq!(size_of::<TestCtrl>(), 0);
    assert_eq!(size_of::<test_ctrl::Prescaler>(), 0);
    assert_eq!(size_of::<TestStat>(), 0);
}

#[test]
fn register_constants() {
    assert_eq!(TestCtrl::NAME, "TEST_CTRL");
    assert_eq!(TestCtrl::ADDRESS, 0x4000_0000);
    assert_eq!(TestCtrl::LAYOUT, 0x00FF_FF1F);
    assert_eq!(TestCtrl::WRITABLE, 0x00FF_FF2F);
    assert_eq!(TestCtrl::DECLARED, 0xFFFF_FF3F);
    assert!(TestCtrl::HAS_READ_ONLY_FIELD);
    assert!(TestCtrl::HAS_WRITE_ONLY_FIELD);
    assert!(!TestStat::HAS_READ_ONLY_FIELD);
    assert!(!TestStat::HAS_WRITE_ONLY_FIELD);
}

#[test]
fn field_constants() {
    assert_eq!(test_ctrl::Mode::NAME, "MODE");
    assert_eq!(test_ctrl::Mode::MASK, 0b1110);
    assert_eq!(test_ctrl::Mode::MAX, 0b111);
    assert_eq!(test_ctrl::Prescaler::MASK, 0x00FF_FF00);
    assert_eq!(test_ctrl::Busy::ACCESS, Access::Ro);
    assert_eq!(test_stat::Level::MASK, 0xF0);
    assert_eq!(
        TestCtrl::FIELDS,
        &[
            FieldInfo::new("EN", 0, 0, Access::Rw),
            FieldInfo::new("MODE", 3, 1, Access::Rw),
            FieldInfo::new("BUSY", 4, 4, Access::Ro),
            FieldInfo::new("START", 5, 5, Access::Wo),
            FieldInfo::new("PRESCALER", 23, 8, Access::Rw),
            FieldInfo::new("RES", 31, 24, Access::Na),
        ]
    );
}

#[test]
fn register_info() {
    let info: RegInfo = TestStat::INFO;
    assert_eq!(info.rw1c, 0b0001);
    assert_eq!(info.rw1s, 0b0010);
    assert_eq!(info.rw0c, 0b0100);
    assert_eq!(info.rw, 0xF0);
    assert_eq!(info.to_string(), "TEST_STAT@0x40000004");
}

#[test]
fn field_conversions() {
    let ctrl = test_ctrl::REG;
    assert_eq!(ctrl.mode.to_field(0b1010), 0b101);
    assert_eq!(ctrl.prescaler.to_reg(0x0000_00FF, 0xABCD), 0x00AB_CDFF);
    assert!(ctrl.en.to_field(1));
    assert_eq!(ctrl.mode.runtime_check(9), 7);
    assert_eq!(test_data::REG.byte.runtime_check(0x123), 0x23);
}

#[test]
fn wrapping_register() {
    let mut bus = SimBus::new();
    let data = test_data::REG;
    assert_eq!(TestData::ADDRESS, 0x4000_0008);
    assert_eq!(data.byte.write(0x1FF).bits(), 0xFF);
    apply(&mut bus, (data.byte.write(0x123), data.pad.write(0x45)));
    assert_eq!(bus.peek(0x4000_0008), 0x4523);
}

#[test]
fn write_only_field_reads_as_zero() {
    let mut bus = SimBus::new();
    bus.attach::<TestCtrl>();
    let ctrl = test_ctrl::REG;
    apply(&mut bus, (ctrl.start.write(true), ctrl.en.write(true)));
    assert_eq!(bus.peek(0x4000_0000), 0b10_0001);
    let (en, mode) = apply(&mut bus, (ctrl.en.read(), ctrl.mode.read()));
    assert!(en);
    assert_eq!(mode, 0);
    assert_eq!(
        bus.transfers().last(),
        Some(&Transfer::Read { address: 0x4000_0000, value: 0b00_0001 })
    );
}

#[test]
fn write_only_trigger_is_not_replayed() {
    let mut bus = SimBus::new();
    bus.preload(0x4000_0000, 0b10_0000);
    let ctrl = test_ctrl::REG;
    apply(&mut bus, (ctrl.mode.write(1),));
    assert_eq!(
        bus.transfers(),
        &[
            Transfer::Read { address: 0x4000_0000, value: 0b10_0000 },
            Transfer::Write { address: 0x4000_0000, value: 0b00_0010 },
        ]
    );
}

#[test]
fn read_only_field_survives_writes() {
    let mut bus = SimBus::new();
    bus.attach::<TestCtrl>().preload(0x4000_0000, 0b1_0000);
    let ctrl = test_ctrl::REG;
    let (busy, ()) = apply(&mut bus, (ctrl.busy.read(), ctrl.mode.write(3)));
    assert!(busy);
    assert_eq!(bus.peek(0x4000_0000), 0b1_0110);
}

#[test]
fn pending_flag_is_not_cleared_by_neighbour_write() {
    let mut bus = SimBus::new();
    bus.attach::<TestStat>().preload(0x4000_0004, 0b0000_0101);
    let stat = test_stat::REG;
    apply(&mut bus, (stat.level.write(9),));
    assert_eq!(bus.peek(0x4000_0004), 0b1001_0101);
    assert_eq!(
        bus.transfers(),
        &[
            Transfer::Read { address: 0x4000_0004, value: 0b0000_0101 },
            Transfer::Write { address: 0x4000_0004, value: 0b1001_0100 },
        ]
    );
}

#[test]
fn clear_flag_explicitly() {
    let mut bus = SimBus::new();
    bus.attach::<TestStat>().preload(0x4000_0004, 0b0000_0101);
    let stat = test_stat::REG;
    apply(&mut bus, (stat.ovr.write(true), stat.rdy.write(false)));
    assert_eq!(bus.peek(0x4000_0004), 0);
}

#[test]
fn set_flag_explicitly() {
    let mut bus = SimBus::new();
    bus.attach::<TestStat>();
    let stat = test_stat::REG;
    apply(&mut bus, (stat.arm.write(true),));
    assert_eq!(bus.peek(0x4000_0004), 0b0000_0010);
    apply(&mut bus, (stat.level.write(1),));
    assert_eq!(bus.peek(0x4000_0004), 0b0001_0010);
}

#[test]
fn whole_register_write() {
    let mut bus = SimBus::new();
    let stat = test_stat::REG;
    apply(&mut bus, (stat.write_const::<0xF7>(),));
    assert_eq!(bus.peek(0x4000_0004), 0xF7);
    assert_eq!((bus.reads(), bus.writes()), (0, 1));
}

#[derive(Clone, Copy)]
struct Timer;

impl Register for Timer {
    type Value = u32;
    type Overflow = Clamp;

    const NAME: &'static str = "TIMER";
    const ADDRESS: usize = addr!("0x4000'0100");
    const FIELDS: &'static [FieldInfo] = &[Prescale::INFO];
}

impl RReg for Timer {}
impl WReg for Timer {}

#[derive(Clone, Copy)]
struct Prescale;

impl Field for Prescale {
    type Reg = Timer;
    type Value = u8;

    const NAME: &'static str = "PRESCALE";
    const MSB: u32 = bit!("0x7");
    const LSB: u32 = bit!("0");
    const ACCESS: Access = Access::Rw;
}

impl RField for Prescale {}
impl WField for Prescale {}

#[test]
fn hand_written_register_with_literals() {
    const SCALE: u64 = lit!("0b0000'0011");
    assert_eq!(Timer::ADDRESS, 0x4000_0100);
    assert_eq!(Prescale::MASK, 0xFF);
    let mut bus = SimBus::new();
    apply(&mut bus, (Prescale.write_const::<SCALE>(),));
    assert_eq!(bus.peek(0x4000_0100), 3);
    let (scale,) = apply(&mut bus, (Prescale.read(),));
    assert_eq!(scale, 3);
}
