//! AquaMon Firmware — Main Entry Point
//!
//! Hexagonal architecture with a blocking, tick-driven control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                   Adapters (outer ring)                    │
//! │                                                            │
//! │  HardwareAdapter        SerialSink       BaselineDetector  │
//! │  (Sensor+Actuator)      (Telemetry)      (AnomalyDetector) │
//! │                                                            │
//! │  ─────────────── Port Trait Boundary ────────────────      │
//! │                                                            │
//! │  ┌──────────────────────────────────────────────────┐      │
//! │  │           ControlService (pure logic)            │      │
//! │  │  FSM · pump policy · level calibration           │      │
//! │  └──────────────────────────────────────────────────┘      │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! The binary is only built with the `espidf` feature; the library and
//! all host tests build without it.

#![deny(unused_must_use)]

use anyhow::Result;
use log::{error, info};

use aquamon::adapters::detector::BaselineDetector;
use aquamon::adapters::hardware::HardwareAdapter;
use aquamon::adapters::serial::SerialSink;
use aquamon::app::service::ControlService;
use aquamon::config::MonitorConfig;
use aquamon::drivers::delay::EspDelay;
use aquamon::drivers::gpio_line::EspGpioLine;
use aquamon::drivers::hw_init;
use aquamon::drivers::onewire::OneWireBus;
use aquamon::drivers::pump::PumpActuator;
use aquamon::pins;
use aquamon::sensors::accel::{AccelerometerLink, I2cRegisterBus, ADXL345_ADDR};
use aquamon::sensors::thermal::ThermalProbe;
use aquamon::sensors::water_level::LevelSensor;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("AquaMon v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Initialise hardware peripherals ────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        // Peripheral init failure is critical — log and halt.
        // In production this triggers the watchdog reset after timeout.
        error!("peripheral init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }

    let config = MonitorConfig::default();
    let loop_interval_ms = u64::from(config.loop_interval_ms);

    // ── 3. Construct adapters ─────────────────────────────────
    let accel = AccelerometerLink::new(
        I2cRegisterBus::new(ADXL345_ADDR),
        config.accel_max_retries,
        config.accel_sample_delay_ms,
    );
    let onewire = OneWireBus::new(EspGpioLine::new(pins::ONEWIRE_DQ_GPIO), EspDelay::new());
    let probe = ThermalProbe::new(onewire);

    let mut hw = HardwareAdapter::new(
        accel,
        probe,
        LevelSensor::new(),
        PumpActuator::new(),
        EspDelay::new(),
    );
    let mut detector = BaselineDetector::new();
    let mut sink = SerialSink::new();
    let mut delay = EspDelay::new();

    // ── 4. Construct and start the control service ────────────
    let mut service = ControlService::new(config);
    service.start(&mut hw, &mut detector, &mut sink, &mut delay)?;

    info!("system ready, entering control loop ({loop_interval_ms} ms tick)");

    // ── 5. Control loop ───────────────────────────────────────
    loop {
        service.tick(&mut hw, &mut detector, &mut sink, &mut delay);
        std::thread::sleep(std::time::Duration::from_millis(loop_interval_ms));
    }
}
