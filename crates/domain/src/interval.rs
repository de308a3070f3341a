//! Half-open time-of-day intervals and the overlap predicate.
//!
//! An interval `[start, end)` includes its start instant and excludes its end
//! instant, so a slot ending at 10:00 and one starting at 10:00 never
//! conflict. [`overlaps`] is the only conflict test used anywhere in the
//! system; the storage adapter mirrors it in SQL as
//! `start < other.end AND end > other.start`.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A non-empty `[start, end)` range of times within a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawInterval")]
pub struct TimeInterval {
    start: NaiveTime,
    end: NaiveTime,
}

#[derive(Deserialize)]
struct RawInterval {
    start: NaiveTime,
    end: NaiveTime,
}

impl TryFrom<RawInterval> for TimeInterval {
    type Error = ValidationError;

    fn try_from(raw: RawInterval) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl TimeInterval {
    /// Build an interval, enforcing `start < end`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyInterval`] when `start >= end`.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, ValidationError> {
        if start >= end {
            return Err(ValidationError::EmptyInterval { start, end });
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub fn start(&self) -> NaiveTime {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> NaiveTime {
        self.end
    }

    /// Whether this interval shares at least one instant with `other`.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        overlaps(self, other)
    }

    /// Whether this interval lies entirely inside `window`.
    #[must_use]
    pub fn is_within(&self, window: &Self) -> bool {
        self.start >= window.start && self.end <= window.end
    }
}

impl std::fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Two intervals conflict unless one ends at or before the other begins.
#[must_use]
pub fn overlaps(a: &TimeInterval, b: &TimeInterval) -> bool {
    !(a.end <= b.start || a.start >= b.end)
}

#[cfg(test)]
pub(crate) fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}
