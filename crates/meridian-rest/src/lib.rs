//! # Meridian REST
//!
//! Thin Axum boundary over the account service: registration, login,
//! profile read/update and health probes.

pub mod controllers;
pub mod extractors;
pub mod middleware;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
