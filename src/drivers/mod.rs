//! Hardware drivers.
//!
//! Everything in here talks to a peripheral (or its host-side simulation).
//! Domain logic lives in `app`/`fsm` and reaches drivers only through the
//! port traits.

pub mod delay;
pub mod gpio_line;
pub mod hw_init;
pub mod onewire;
pub mod pump;
