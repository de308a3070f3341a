//! # turfbook-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a **JSON API** for the turf catalog, slot availability and
//!   bookings (`/api/turfs`, `/api/turfs/{id}/slots`, `/api/bookings`, …)
//! - Map HTTP requests into application service calls (driving adapter)
//! - Map [`TurfBookError`](turfbook_domain::error::TurfBookError) kinds onto
//!   HTTP status codes
//!
//! ## Dependency rule
//! Depends on `turfbook-app` (for port traits and services) and `turfbook-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
