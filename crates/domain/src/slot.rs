//! One-hour slot grid inside an operating window.

use chrono::NaiveTime;

use crate::interval::TimeInterval;
use crate::time::slot_length;

/// Iterator over the candidate slots of an operating window.
///
/// The grid depends only on the two boundary times, so cloning the iterator
/// restarts the same sequence.
#[derive(Debug, Clone)]
pub struct CandidateSlots {
    cursor: Option<NaiveTime>,
    end: NaiveTime,
}

impl Iterator for CandidateSlots {
    type Item = TimeInterval;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.cursor?;
        let (slot_end, wrapped) = start.overflowing_add_signed(slot_length());
        // a slot may not run past the window or past midnight
        if wrapped != 0 || slot_end > self.end {
            self.cursor = None;
            return None;
        }
        self.cursor = Some(slot_end);
        TimeInterval::new(start, slot_end).ok()
    }
}

impl std::iter::FusedIterator for CandidateSlots {}

/// Enumerate `[t, t+1h)` for `t = start, start+1h, …` while the slot still
/// ends at or before `end`.
///
/// Yields nothing when the window is shorter than one hour.
#[must_use]
pub fn generate_candidate_slots(start: NaiveTime, end: NaiveTime) -> CandidateSlots {
    CandidateSlots {
        cursor: Some(start),
        end,
    }
}
