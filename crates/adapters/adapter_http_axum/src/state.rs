//! Shared application state for axum handlers.

use std::sync::Arc;

use turfbook_app::ports::{BlockedSlotRepository, BookingRepository, OwnerDirectory, TurfRepository};
use turfbook_app::services::availability_service::AvailabilityService;
use turfbook_app::services::booking_service::BookingService;
use turfbook_app::services::turf_catalog_service::TurfCatalogService;

/// Application state shared across all axum handlers.
///
/// Generic over the owner directory and the three repositories to avoid
/// dynamic dispatch. `Clone` is implemented manually so the underlying types
/// themselves do not need to be `Clone`.
pub struct AppState<O, T, B, S> {
    /// Turf CRUD and catalog reads.
    pub catalog: Arc<TurfCatalogService<O, T, B>>,
    /// Free-slot queries and blackouts.
    pub availability: Arc<AvailabilityService<T, B, S>>,
    /// Booking validation and persistence.
    pub bookings: Arc<BookingService<T, B, S>>,
}

impl<O, T, B, S> Clone for AppState<O, T, B, S> {
    fn clone(&self) -> Self {
        Self {
            catalog: Arc::clone(&self.catalog),
            availability: Arc::clone(&self.availability),
            bookings: Arc::clone(&self.bookings),
        }
    }
}

impl<O, T, B, S> AppState<O, T, B, S>
where
    O: OwnerDirectory + Send + Sync + 'static,
    T: TurfRepository + Send + Sync + 'static,
    B: BookingRepository + Send + Sync + 'static,
    S: BlockedSlotRepository + Send + Sync + 'static,
{
    /// Create a new application state from service instances.
    pub fn new(
        catalog: TurfCatalogService<O, T, B>,
        availability: AvailabilityService<T, B, S>,
        bookings: BookingService<T, B, S>,
    ) -> Self {
        Self {
            catalog: Arc::new(catalog),
            availability: Arc::new(availability),
            bookings: Arc::new(bookings),
        }
    }
}
