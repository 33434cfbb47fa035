//! # Built-in subscribers
//!
//! - [`LogWriter`]: forwards events to `tracing` with per-kind levels.

mod log;

pub use log::LogWriter;
