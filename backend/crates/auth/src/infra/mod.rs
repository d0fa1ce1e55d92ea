//! Infrastructure Layer
//!
//! Repository implementations and external data sources.

pub mod memory;
pub mod postgres;
pub mod sqlite_source;

pub use memory::MemoryAuthRepository;
pub use postgres::PgAuthRepository;
pub use sqlite_source::read_legacy_users;
