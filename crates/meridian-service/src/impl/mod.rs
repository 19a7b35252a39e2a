//! Service implementations.

mod account_service_impl;

pub use account_service_impl::AccountServiceImpl;
