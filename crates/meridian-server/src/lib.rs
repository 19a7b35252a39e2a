//! # Meridian Server Library
//!
//! Wiring and startup helpers for the Meridian binary.

pub mod di;
pub mod logging;
pub mod startup;
