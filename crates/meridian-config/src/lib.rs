//! # Meridian Config
//!
//! Configuration management for Meridian.
//! Settings are layered from built-in defaults, TOML files, a `.env` file
//! and `MERIDIAN__`-prefixed environment variables, then validated.

mod app_config;
mod loader;
mod validation;

pub use app_config::*;
pub use loader::*;
pub use validation::*;
