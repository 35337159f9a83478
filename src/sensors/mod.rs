//! Sensor drivers: thermometer, accelerometer, water level.

pub mod accel;
pub mod thermal;
pub mod water_level;
