//! Application core: port traits, telemetry events, and the control service.

pub mod events;
pub mod ports;
pub mod service;
