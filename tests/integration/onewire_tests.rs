//! One-wire master vs. simulated slave.

use aquamon::drivers::onewire::OneWireBus;
use aquamon::error::SensorError;
use aquamon::sensors::thermal::ThermalProbe;

use crate::sim_onewire::{scratchpad_for_raw, SimBus};

#[test]
fn reset_sees_presence_pulse() {
    let sim = SimBus::thermometer(scratchpad_for_raw(0));
    let mut bus = OneWireBus::new(sim.line(), sim.delay());
    assert!(bus.reset());
    assert_eq!(sim.resets(), 1);
}

#[test]
fn reset_on_empty_bus_reports_no_presence() {
    let sim = SimBus::absent();
    let mut bus = OneWireBus::new(sim.line(), sim.delay());
    assert!(!bus.reset());
}

#[test]
fn byte_roundtrip_through_loopback_device() {
    let sim = SimBus::loopback();
    let mut bus = OneWireBus::new(sim.line(), sim.delay());
    for value in 0..=255u8 {
        bus.write_byte(value);
        assert_eq!(bus.read_byte(), value, "byte 0x{value:02X} corrupted");
    }
}

#[test]
fn full_temperature_transaction() {
    // 25.0625 °C = raw 0x0191 at 1/16 °C per LSB.
    let sim = SimBus::thermometer(scratchpad_for_raw(0x0191));
    let mut probe = ThermalProbe::new(OneWireBus::new(sim.line(), sim.delay()));

    let t = probe.read_temperature().unwrap();
    assert!((t - 25.0625).abs() < f32::EPSILON);
    // Convert + read means two reset/presence sequences.
    assert_eq!(sim.resets(), 2);
    // Virtual clock covered the 750 ms conversion wait.
    assert!(sim.elapsed_us() >= 750_000);
}

#[test]
fn negative_temperature_transaction() {
    // -10.125 °C = raw 0xFF5E.
    let sim = SimBus::thermometer(scratchpad_for_raw(-162));
    let mut probe = ThermalProbe::new(OneWireBus::new(sim.line(), sim.delay()));
    let t = probe.read_temperature().unwrap();
    assert!((t + 10.125).abs() < f32::EPSILON);
}

#[test]
fn corrupted_scratchpad_is_rejected() {
    let mut pad = scratchpad_for_raw(0x0191);
    pad[1] ^= 0x10; // flip a temperature bit after the CRC was computed
    let sim = SimBus::thermometer(pad);
    let mut probe = ThermalProbe::new(OneWireBus::new(sim.line(), sim.delay()));
    assert_eq!(probe.read_temperature(), Err(SensorError::CrcMismatch));
}

#[test]
fn absent_probe_aborts_without_writing_commands() {
    let sim = SimBus::absent();
    let mut probe = ThermalProbe::new(OneWireBus::new(sim.line(), sim.delay()));
    assert_eq!(probe.read_temperature(), Err(SensorError::NotPresent));
    // No command bytes may follow a failed reset.
    assert_eq!(sim.write_slots(), 0);
}
