//! MySQL repository implementations.

mod account_repository;

pub use account_repository::*;
