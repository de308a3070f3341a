//! Booking service: validate and persist reservation requests.

use turfbook_domain::booking::{Booking, BookingDecision, BookingRequest, ValidatedBooking};
use turfbook_domain::error::TurfBookError;

use crate::ports::{BlockedSlotRepository, BookingRepository, TurfRepository};
use crate::services::availability_service::AvailabilityService;

/// Application service gating reservations on availability.
pub struct BookingService<T, B, S> {
    availability: AvailabilityService<T, B, S>,
}

impl<T, B, S> BookingService<T, B, S>
where
    T: TurfRepository,
    B: BookingRepository,
    S: BlockedSlotRepository,
{
    /// Create a new service on top of an availability service.
    pub fn new(availability: AvailabilityService<T, B, S>) -> Self {
        Self { availability }
    }

    /// Check a request against the turf's current schedule.
    ///
    /// The turf is looked up first; a missing turf is never reported as a
    /// slot being unavailable.
    ///
    /// # Errors
    ///
    /// Returns [`TurfBookError::NotFound`] when the turf does not exist,
    /// [`TurfBookError::Validation`] when `slot_start >= slot_end`,
    /// [`TurfBookError::SlotUnavailable`] with the failing rule, or a storage
    /// error from the repositories.
    #[tracing::instrument(skip(self))]
    pub async fn validate(&self, request: &BookingRequest) -> Result<ValidatedBooking, TurfBookError> {
        let turf = self.availability.get_turf(request.turf_id).await?;
        let interval = request.interval()?;
        let schedule = self.availability.schedule_for(&turf, request.date).await?;
        if let Err(reason) = schedule.check(&interval) {
            tracing::debug!(%reason, "booking request rejected");
            return Err(reason.into());
        }
        Ok(ValidatedBooking {
            turf_id: turf.id,
            date: request.date,
            interval,
        })
    }

    /// Accept or reject a request without persisting anything.
    ///
    /// # Errors
    ///
    /// Returns [`TurfBookError::NotFound`], [`TurfBookError::Validation`] or
    /// a storage error; unavailability is a rejected decision, not an error.
    pub async fn decide(&self, request: &BookingRequest) -> Result<BookingDecision, TurfBookError> {
        match self.validate(request).await {
            Ok(_) => Ok(BookingDecision::accepted()),
            Err(TurfBookError::SlotUnavailable(reason)) => Ok(BookingDecision::rejected(reason)),
            Err(err) => Err(err),
        }
    }

    /// Validate and persist a request as a confirmed booking.
    ///
    /// # Errors
    ///
    /// Returns every error of [`Self::validate`], or
    /// [`TurfBookError::Conflict`] when a concurrent reservation took the slot
    /// between validation and insert.
    #[tracing::instrument(skip(self))]
    pub async fn reserve(&self, request: &BookingRequest) -> Result<Booking, TurfBookError> {
        let validated = self.validate(request).await?;
        let booking = self
            .availability
            .bookings()
            .insert_exclusive(validated.into_booking())
            .await
            .inspect_err(|err| tracing::warn!(error = %err, "booking insert lost"))?;
        tracing::info!(booking_id = %booking.id, "booking confirmed");
        Ok(booking)
    }
}
