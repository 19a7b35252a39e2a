//! Caching infrastructure for the service layer.
//!
//! [`CacheStore`] is the raw key/value seam, with a Redis adapter and an
//! in-process store behind it. [`AccountCache`] layers the account key scheme,
//! fixed TTL and serialization on top.

mod account_cache;
mod cache_interface;
pub mod cache_keys;
mod memory_cache;
mod redis_cache;

pub use account_cache::{AccountCache, ACCOUNT_CACHE_TTL};
pub use cache_interface::CacheStore;
pub use memory_cache::InMemoryCacheStore;
pub use redis_cache::RedisCacheStore;
