//! Booking: a confirmed one-hour reservation of a turf on a date.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{SlotUnavailableReason, ValidationError};
use crate::id::{BookingId, TurfId};
use crate::interval::TimeInterval;

/// A confirmed reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub turf_id: TurfId,
    pub date: NaiveDate,
    pub interval: TimeInterval,
}

impl Booking {
    #[must_use]
    pub fn new(turf_id: TurfId, date: NaiveDate, interval: TimeInterval) -> Self {
        Self {
            id: BookingId::new(),
            turf_id,
            date,
            interval,
        }
    }
}

/// Inbound reservation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub turf_id: TurfId,
    pub date: NaiveDate,
    pub slot_start: NaiveTime,
    pub slot_end: NaiveTime,
}

impl BookingRequest {
    /// The requested `[slot_start, slot_end)` interval.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyInterval`] when `slot_start >= slot_end`.
    pub fn interval(&self) -> Result<TimeInterval, ValidationError> {
        TimeInterval::new(self.slot_start, self.slot_end)
    }
}

/// A request that passed every availability check at the time it was made.
///
/// Availability is a point-in-time read: the persistence step must re-check
/// under its own exclusivity guarantee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValidatedBooking {
    pub turf_id: TurfId,
    pub date: NaiveDate,
    pub interval: TimeInterval,
}

impl ValidatedBooking {
    /// Turn the accepted request into a booking record ready to persist.
    #[must_use]
    pub fn into_booking(self) -> Booking {
        Booking::new(self.turf_id, self.date, self.interval)
    }
}

/// Outbound accept/reject decision for a reservation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDecision {
    pub accepted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<SlotUnavailableReason>,
}

impl BookingDecision {
    #[must_use]
    pub fn accepted() -> Self {
        Self {
            accepted: true,
            reason: None,
        }
    }

    #[must_use]
    pub fn rejected(reason: SlotUnavailableReason) -> Self {
        Self {
            accepted: false,
            reason: Some(reason),
        }
    }
}
