//! # Meridian Core
//!
//! Core types and error definitions shared by every Meridian crate:
//! the error taxonomy, the account identifier and entity, and request
//! validation helpers.

pub mod domain;
pub mod error;
pub mod id;
pub mod result;
pub mod validation;

pub use domain::*;
pub use error::*;
pub use id::*;
pub use result::*;
pub use validation::*;
