//! Integration test harness.
//!
//! Exercises the one-wire master against a simulated slave device with
//! virtual time, and the control service against scriptable mock ports.
//! Everything here runs on the host; espidf-only code paths are stubbed
//! inside the drivers.

#![cfg(not(target_os = "espidf"))]

mod mock_hw;
mod onewire_tests;
mod service_tests;
mod sim_onewire;
