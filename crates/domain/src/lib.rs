//! # turfbook-domain
//!
//! Pure domain model for the turfbook slot booking system.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, calendar helpers
//! - Define the **interval model** (half-open `[start, end)` time-of-day ranges)
//! - Generate the one-hour **slot grid** inside an operating window
//! - Decide **availability** of a candidate slot against bookings and blackouts
//! - Define **Turfs** (with their image sets), **Bookings**, **Blocked slots**
//!   and the **Owners** that hold turfs
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod availability;
pub mod blocked_slot;
pub mod booking;
pub mod image;
pub mod interval;
pub mod owner;
pub mod slot;
pub mod turf;
