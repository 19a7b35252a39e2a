//! # Meridian Repository
//!
//! Store of record for accounts.
//!
//! ```text
//! Service
//!   ↓  Arc<dyn AccountRepository>
//! MySqlAccountRepository  |  InMemoryAccountRepository
//!   ↓
//! MySQL
//! ```
//!
//! Repositories are cache-unaware; the service layer owns cache-aside.

pub mod memory;
pub mod mysql;
pub mod pool;
pub mod traits;

pub use memory::InMemoryAccountRepository;
pub use mysql::*;
pub use pool::*;
pub use traits::*;
