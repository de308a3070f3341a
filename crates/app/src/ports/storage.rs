//! Storage port — repository traits for persistence.
//!
//! Every mutating method is one atomic unit: readers never observe a turf with
//! a half-replaced image set or a half-applied update.

use std::future::Future;

use chrono::NaiveDate;

use turfbook_domain::blocked_slot::BlockedSlot;
use turfbook_domain::booking::Booking;
use turfbook_domain::error::TurfBookError;
use turfbook_domain::id::{OwnerId, TurfId};
use turfbook_domain::image::TurfImage;
use turfbook_domain::owner::Owner;
use turfbook_domain::turf::{Turf, TurfFilter, TurfView};

/// Read access to the external user directory.
pub trait OwnerDirectory {
    /// Look up an owner by id.
    fn lookup_owner(
        &self,
        id: OwnerId,
    ) -> impl Future<Output = Result<Option<Owner>, TurfBookError>> + Send;
}

/// Persistence for turfs and the image sets they own.
pub trait TurfRepository {
    /// Store a new turf together with its images.
    ///
    /// Fails with [`TurfBookError::Conflict`] when the owner already has a turf
    /// with the same name.
    fn create(
        &self,
        turf: Turf,
        images: Vec<TurfImage>,
    ) -> impl Future<Output = Result<Turf, TurfBookError>> + Send;

    /// Get a turf by its unique identifier.
    fn get_by_id(
        &self,
        id: TurfId,
    ) -> impl Future<Output = Result<Option<Turf>, TurfBookError>> + Send;

    /// Overwrite a turf; when `images` is `Some`, replace the whole image set.
    fn update(
        &self,
        turf: Turf,
        images: Option<Vec<TurfImage>>,
    ) -> impl Future<Output = Result<Turf, TurfBookError>> + Send;

    /// Delete a turf with its images, blocked slots and bookings.
    ///
    /// Fails with [`ConflictError::UpcomingBookings`] when any booking is
    /// dated `upcoming_from` or later; the check and the delete happen in the
    /// same atomic unit, so a concurrent reservation is never dropped.
    ///
    /// [`ConflictError::UpcomingBookings`]: turfbook_domain::error::ConflictError::UpcomingBookings
    fn delete(
        &self,
        id: TurfId,
        upcoming_from: NaiveDate,
    ) -> impl Future<Output = Result<(), TurfBookError>> + Send;

    /// Whether `owner_id` already has a turf named exactly `name`.
    fn exists_by_name_and_owner(
        &self,
        name: &str,
        owner_id: OwnerId,
    ) -> impl Future<Output = Result<bool, TurfBookError>> + Send;

    /// Catalog projections matching `filter`, in the filter's order.
    fn find_views(
        &self,
        filter: &TurfFilter,
    ) -> impl Future<Output = Result<Vec<TurfView>, TurfBookError>> + Send;

    /// Number of turfs matching `filter`.
    fn count(&self, filter: &TurfFilter) -> impl Future<Output = Result<u64, TurfBookError>> + Send;
}

/// Confirmed bookings, read-only except for the exclusive insert.
pub trait BookingRepository {
    /// Bookings of a turf on a date.
    fn find_by_turf_and_date(
        &self,
        turf_id: TurfId,
        date: NaiveDate,
    ) -> impl Future<Output = Result<Vec<Booking>, TurfBookError>> + Send;

    /// Bookings of a turf dated on or after `from`.
    fn find_by_turf_from(
        &self,
        turf_id: TurfId,
        from: NaiveDate,
    ) -> impl Future<Output = Result<Vec<Booking>, TurfBookError>> + Send;

    /// Insert `booking` unless an overlapping booking or blocked slot exists
    /// for the same turf and date.
    ///
    /// The overlap check and the insert must be a single atomic unit; a lost
    /// race is reported as [`TurfBookError::Conflict`].
    fn insert_exclusive(
        &self,
        booking: Booking,
    ) -> impl Future<Output = Result<Booking, TurfBookError>> + Send;
}

/// Owner-declared blackout windows.
pub trait BlockedSlotRepository {
    /// Blocked slots of a turf on a date.
    fn find_by_turf_and_date(
        &self,
        turf_id: TurfId,
        date: NaiveDate,
    ) -> impl Future<Output = Result<Vec<BlockedSlot>, TurfBookError>> + Send;

    /// Persist a new blackout.
    fn create(
        &self,
        blocked: BlockedSlot,
    ) -> impl Future<Output = Result<BlockedSlot, TurfBookError>> + Send;
}
