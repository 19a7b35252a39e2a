//! # Meridian Service
//!
//! Account use cases and the cache-aside layer that accelerates them.
//!
//! Reads consult the [`AccountCache`] first and fall back to the store of
//! record on a miss, populating the cache on the way out. Writes go to the
//! store of record and then invalidate the cached entry.

pub mod account_service;
pub mod cache;
pub mod dto;
pub mod r#impl;

pub use account_service::*;
pub use cache::*;
pub use dto::*;
pub use r#impl::AccountServiceImpl;
