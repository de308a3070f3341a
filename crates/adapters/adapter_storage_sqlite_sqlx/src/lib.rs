//! # turfbook-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the repository port traits defined in `turfbook-app::ports::storage`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//! - Make the booking overlap check and insert a single atomic statement
//!
//! ## Dependency rule
//! Depends on `turfbook-app` (for port traits) and `turfbook-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod blocked_slot_repo;
mod booking_repo;
mod decode;
mod error;
mod owner_directory;
mod pool;
#[cfg(test)]
mod testing;
mod turf_repo;

pub use blocked_slot_repo::SqliteBlockedSlotRepository;
pub use booking_repo::SqliteBookingRepository;
pub use error::StorageError;
pub use owner_directory::SqliteOwnerDirectory;
pub use pool::{Config, Database};
pub use turf_repo::SqliteTurfRepository;
