//! Common error types used across the workspace.
//!
//! Every layer reports one of the [`TurfBookError`] kinds so that callers can
//! render role-appropriate messages without string matching.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Base error type for every turfbook operation.
#[derive(Debug, thiserror::Error)]
pub enum TurfBookError {
    /// Malformed input (bad operating hours, empty names, unparsable ids, …).
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A referenced turf or owner does not exist.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// The operation collides with existing state.
    #[error(transparent)]
    Conflict(#[from] ConflictError),

    /// The requested interval cannot be booked.
    #[error("slot unavailable: {0}")]
    SlotUnavailable(#[from] SlotUnavailableReason),

    /// Failure reported by the persistence layer.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Input that breaks a domain invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("image url must not be empty")]
    EmptyImageUrl,

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("invalid operating hours: start time {start} must be before end time {end}")]
    InvalidOperatingHours { start: NaiveTime, end: NaiveTime },

    #[error("invalid interval: start time {start} must be before end time {end}")]
    EmptyInterval { start: NaiveTime, end: NaiveTime },

    #[error("price per slot must not be negative (got {0})")]
    NegativePrice(Decimal),

    #[error("invalid price range: {min} is greater than {max}")]
    InvalidPriceRange { min: Decimal, max: Decimal },

    #[error("unknown sport type `{0}`")]
    UnknownSportType(String),

    #[error("invalid identifier `{0}`")]
    InvalidId(String),

    #[error("invalid date `{0}`, expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("invalid price `{0}`")]
    InvalidPrice(String),
}

/// A referenced record is missing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} not found with id: {id}")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// The operation would break a uniqueness or exclusivity rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConflictError {
    #[error("turf name `{name}` already exists for owner {owner_id}")]
    DuplicateTurfName { owner_id: String, name: String },

    #[error("an overlapping reservation for turf {turf_id} on {date} was stored concurrently")]
    OverlappingBooking { turf_id: String, date: NaiveDate },

    #[error("turf {turf_id} still has {count} upcoming booking(s)")]
    UpcomingBookings { turf_id: String, count: u64 },
}

/// Why a candidate interval cannot be booked.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlotUnavailableReason {
    #[error("outside operating hours")]
    OutsideOperatingHours,

    #[error("overlaps an existing booking")]
    OverlapsBooking,

    #[error("overlaps a blocked slot")]
    OverlapsBlockedSlot,
}
