//! Driven adapters: concrete implementations of the app port traits.

pub mod detector;
pub mod hardware;
pub mod serial;
