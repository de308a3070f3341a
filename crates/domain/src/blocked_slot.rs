//! Blocked slot: an owner-declared blackout window on a given date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::id::{BlockedSlotId, TurfId};
use crate::interval::TimeInterval;

/// A blackout (maintenance, private use) during which nothing can be booked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedSlot {
    pub id: BlockedSlotId,
    pub turf_id: TurfId,
    pub date: NaiveDate,
    pub interval: TimeInterval,
}

impl BlockedSlot {
    #[must_use]
    pub fn new(turf_id: TurfId, date: NaiveDate, interval: TimeInterval) -> Self {
        Self {
            id: BlockedSlotId::new(),
            turf_id,
            date,
            interval,
        }
    }
}

/// Request body for declaring a blackout on a turf.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockSlotRequest {
    pub date: NaiveDate,
    pub start: chrono::NaiveTime,
    pub end: chrono::NaiveTime,
}
