//! Platform abstraction layer
//!
//! Concrete [`crate::Host`] implementations. The simulation and renderer never
//! depend on anything in here.

pub mod terminal;

pub use terminal::TerminalHost;
