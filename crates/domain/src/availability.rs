//! Availability rules for a turf on a single date.
//!
//! A candidate slot is free when it lies inside the operating window and
//! overlaps neither a confirmed booking nor a blocked slot on the same date.
//! The three conditions are independent; [`DaySchedule::check`] reports the
//! first one that fails, in that order.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::blocked_slot::BlockedSlot;
use crate::booking::Booking;
use crate::error::SlotUnavailableReason;
use crate::id::TurfId;
use crate::interval::TimeInterval;
use crate::slot::generate_candidate_slots;
use crate::turf::Turf;

/// Everything needed to answer availability questions for one turf and date.
#[derive(Debug, Clone)]
pub struct DaySchedule {
    pub turf_id: TurfId,
    pub date: NaiveDate,
    pub operating_hours: TimeInterval,
    pub bookings: Vec<Booking>,
    pub blocked: Vec<BlockedSlot>,
}

impl DaySchedule {
    #[must_use]
    pub fn new(
        turf: &Turf,
        date: NaiveDate,
        bookings: Vec<Booking>,
        blocked: Vec<BlockedSlot>,
    ) -> Self {
        Self {
            turf_id: turf.id,
            date,
            operating_hours: turf.operating_hours,
            bookings,
            blocked,
        }
    }

    /// Decide whether `candidate` can be booked, with the reason when not.
    ///
    /// Records for other turfs or other dates are ignored even if the caller
    /// passed them in.
    ///
    /// # Errors
    ///
    /// Returns the [`SlotUnavailableReason`] of the first failing rule.
    pub fn check(&self, candidate: &TimeInterval) -> Result<(), SlotUnavailableReason> {
        if !candidate.is_within(&self.operating_hours) {
            return Err(SlotUnavailableReason::OutsideOperatingHours);
        }
        if self
            .bookings
            .iter()
            .filter(|booking| self.applies(booking.turf_id, booking.date))
            .any(|booking| candidate.overlaps(&booking.interval))
        {
            return Err(SlotUnavailableReason::OverlapsBooking);
        }
        if self
            .blocked
            .iter()
            .filter(|blocked| self.applies(blocked.turf_id, blocked.date))
            .any(|blocked| candidate.overlaps(&blocked.interval))
        {
            return Err(SlotUnavailableReason::OverlapsBlockedSlot);
        }
        Ok(())
    }

    #[must_use]
    pub fn is_available(&self, candidate: &TimeInterval) -> bool {
        self.check(candidate).is_ok()
    }

    /// Free one-hour slots in chronological order.
    #[must_use]
    pub fn available_slots(&self) -> Vec<TimeInterval> {
        generate_candidate_slots(self.operating_hours.start(), self.operating_hours.end())
            .filter(|slot| self.is_available(slot))
            .collect()
    }

    fn applies(&self, turf_id: TurfId, date: NaiveDate) -> bool {
        turf_id == self.turf_id && date == self.date
    }
}

/// Outbound list of free slots for a turf on a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableSlotsView {
    pub turf_id: TurfId,
    pub date: NaiveDate,
    pub slots: Vec<TimeInterval>,
}

impl From<&DaySchedule> for AvailableSlotsView {
    fn from(schedule: &DaySchedule) -> Self {
        Self {
            turf_id: schedule.turf_id,
            date: schedule.date,
            slots: schedule.available_slots(),
        }
    }
}
