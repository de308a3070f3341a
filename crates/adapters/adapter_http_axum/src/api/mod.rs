//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod bookings;
#[allow(clippy::missing_errors_doc)]
pub mod slots;
#[allow(clippy::missing_errors_doc)]
pub mod turfs;

use axum::Router;
use axum::routing::{get, post};
use chrono::NaiveDate;

use turfbook_app::ports::{BlockedSlotRepository, BookingRepository, OwnerDirectory, TurfRepository};
use turfbook_domain::error::ValidationError;
use turfbook_domain::time::parse_date;

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<O, T, B, S>() -> Router<AppState<O, T, B, S>>
where
    O: OwnerDirectory + Send + Sync + 'static,
    T: TurfRepository + Send + Sync + 'static,
    B: BookingRepository + Send + Sync + 'static,
    S: BlockedSlotRepository + Send + Sync + 'static,
{
    Router::new()
        // Catalog
        .route(
            "/turfs",
            get(turfs::list::<O, T, B, S>).post(turfs::create::<O, T, B, S>),
        )
        .route("/turfs/count", get(turfs::count::<O, T, B, S>))
        .route("/turfs/name-exists", get(turfs::name_exists::<O, T, B, S>))
        .route("/turfs/available", get(slots::available_turfs::<O, T, B, S>))
        .route(
            "/turfs/{id}",
            get(turfs::get::<O, T, B, S>)
                .patch(turfs::update::<O, T, B, S>)
                .delete(turfs::delete::<O, T, B, S>),
        )
        // Availability
        .route("/turfs/{id}/slots", get(slots::list::<O, T, B, S>))
        .route(
            "/turfs/{id}/blocked-slots",
            post(slots::block::<O, T, B, S>),
        )
        // Bookings
        .route("/bookings", post(bookings::reserve::<O, T, B, S>))
        .route("/bookings/check", post(bookings::check::<O, T, B, S>))
}

fn parse_day(raw: &str) -> Result<NaiveDate, ValidationError> {
    parse_date(raw).map_err(|_| ValidationError::InvalidDate(raw.to_owned()))
}
