//! Command-line interface
//!
//! Command handlers operating on the persisted wallet state.

pub mod commands;

pub use commands::*;
