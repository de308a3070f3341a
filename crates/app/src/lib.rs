//! # turfbook-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `OwnerDirectory` — look up turf owners
//!   - `TurfRepository` — turf records, their image sets and catalog projections
//!   - `BookingRepository` — read confirmed bookings, insert exclusively
//!   - `BlockedSlotRepository` — read and declare blackout windows
//! - Define **driving/inbound ports** as use-case structs:
//!   - `TurfCatalogService` — create, update, delete, read and count turfs
//!   - `AvailabilityService` — free slots and availability questions
//!   - `BookingService` — validate, decide and reserve
//! - Orchestrate domain objects without knowing *how* persistence or IO works
//!
//! ## Dependency rule
//! Depends on `turfbook-domain` only.
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;

#[cfg(test)]
pub(crate) mod testing;
