//! Availability service: free-slot queries and owner blackouts.

use chrono::NaiveDate;

use turfbook_domain::availability::{AvailableSlotsView, DaySchedule};
use turfbook_domain::blocked_slot::{BlockSlotRequest, BlockedSlot};
use turfbook_domain::error::{NotFoundError, SlotUnavailableReason, TurfBookError};
use turfbook_domain::id::TurfId;
use turfbook_domain::interval::TimeInterval;
use turfbook_domain::turf::{Turf, TurfFilter, TurfView};

use crate::ports::{BlockedSlotRepository, BookingRepository, TurfRepository};

/// Answers "is this slot free" and "which slots are free" for a turf and date.
pub struct AvailabilityService<T, B, S> {
    turfs: T,
    bookings: B,
    blocked: S,
}

impl<T, B, S> AvailabilityService<T, B, S>
where
    T: TurfRepository,
    B: BookingRepository,
    S: BlockedSlotRepository,
{
    /// Create a new service backed by the given repositories.
    pub fn new(turfs: T, bookings: B, blocked: S) -> Self {
        Self {
            turfs,
            bookings,
            blocked,
        }
    }

    pub(crate) fn bookings(&self) -> &B {
        &self.bookings
    }

    /// Look up a turf by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`TurfBookError::NotFound`] when no turf with `id` exists,
    /// or a storage error from the repository.
    pub async fn get_turf(&self, id: TurfId) -> Result<Turf, TurfBookError> {
        self.turfs.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Turf",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// Load the bookings and blackouts that constrain `turf` on `date`.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repositories.
    pub async fn schedule_for(
        &self,
        turf: &Turf,
        date: NaiveDate,
    ) -> Result<DaySchedule, TurfBookError> {
        let bookings = self.bookings.find_by_turf_and_date(turf.id, date).await?;
        let blocked = self.blocked.find_by_turf_and_date(turf.id, date).await?;
        Ok(DaySchedule::new(turf, date, bookings, blocked))
    }

    /// Whether `candidate` is free on `date`.
    ///
    /// # Errors
    ///
    /// Returns [`TurfBookError::NotFound`] when the turf does not exist, or a
    /// storage error from the repositories.
    #[tracing::instrument(skip(self))]
    pub async fn is_available(
        &self,
        turf_id: TurfId,
        date: NaiveDate,
        candidate: TimeInterval,
    ) -> Result<bool, TurfBookError> {
        let turf = self.get_turf(turf_id).await?;
        let schedule = self.schedule_for(&turf, date).await?;
        Ok(schedule.is_available(&candidate))
    }

    /// Free one-hour slots of a turf on `date`, in chronological order.
    ///
    /// # Errors
    ///
    /// Returns [`TurfBookError::NotFound`] when the turf does not exist, or a
    /// storage error from the repositories.
    #[tracing::instrument(skip(self))]
    pub async fn list_available_slots(
        &self,
        turf_id: TurfId,
        date: NaiveDate,
    ) -> Result<AvailableSlotsView, TurfBookError> {
        let turf = self.get_turf(turf_id).await?;
        let schedule = self.schedule_for(&turf, date).await?;
        let view = AvailableSlotsView::from(&schedule);
        tracing::debug!(free = view.slots.len(), "computed available slots");
        Ok(view)
    }

    /// Catalog views of every turf with at least one free slot on `date`.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repositories.
    #[tracing::instrument(skip(self))]
    pub async fn turfs_available_on(&self, date: NaiveDate) -> Result<Vec<TurfView>, TurfBookError> {
        let views = self.turfs.find_views(&TurfFilter::default()).await?;
        let mut available = Vec::with_capacity(views.len());
        for view in views {
            let turf = self.get_turf(view.id).await?;
            let schedule = self.schedule_for(&turf, date).await?;
            if !schedule.available_slots().is_empty() {
                available.push(view);
            }
        }
        Ok(available)
    }

    /// Declare a blackout window on a turf.
    ///
    /// The window must lie inside the operating hours. Existing bookings are
    /// left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TurfBookError::NotFound`] when the turf does not exist,
    /// [`TurfBookError::Validation`] when `start >= end`,
    /// [`TurfBookError::SlotUnavailable`] when the window falls outside the
    /// operating hours, or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn block_slot(
        &self,
        turf_id: TurfId,
        request: &BlockSlotRequest,
    ) -> Result<BlockedSlot, TurfBookError> {
        let turf = self.get_turf(turf_id).await?;
        let interval = TimeInterval::new(request.start, request.end)?;
        if !interval.is_within(&turf.operating_hours) {
            return Err(SlotUnavailableReason::OutsideOperatingHours.into());
        }
        let blocked = self
            .blocked
            .create(BlockedSlot::new(turf.id, request.date, interval))
            .await?;
        tracing::info!(blocked_id = %blocked.id, %interval, "blocked slot");
        Ok(blocked)
    }
}
