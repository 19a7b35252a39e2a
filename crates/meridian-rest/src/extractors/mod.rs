//! Custom Axum extractors.

mod authenticated;
mod validated;

pub use authenticated::*;
pub use validated::*;
