//! # Meridian Security
//!
//! Opaque security capabilities consumed by the account service:
//! one-way password hashing and signed session tokens.

pub mod jwt;
pub mod password;

pub use jwt::*;
pub use password::*;
