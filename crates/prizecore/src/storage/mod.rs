//! SQLite storage: connection pool, schema migrations and queries

pub mod db;
pub mod migrations;

// Re-exports for convenience
pub use db::{
    create_pool, get_connection, ClaimOutcome, DbConnection, DbPool, PoolStats, Prize, User, WinClaim,
};
