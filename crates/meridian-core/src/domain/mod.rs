//! Domain model: the account entity and its profile patch.

pub mod account;
pub mod patch;

pub use account::*;
pub use patch::*;
