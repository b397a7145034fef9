//! SQLx-based GrantLookup implementations for PostgreSQL and SQLite

mod base;
mod common;

#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "sqlite")]
mod sqlite;

// Re-export the base type for those who need the generic version
pub use base::SqlxGrantStore;

#[cfg(feature = "postgres")]
pub use postgres::PostgresGrantStore;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteGrantStore;
