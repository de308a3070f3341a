//! JSON REST handlers for booking requests.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use turfbook_app::ports::{BlockedSlotRepository, BookingRepository, OwnerDirectory, TurfRepository};
use turfbook_domain::booking::{Booking, BookingDecision, BookingRequest};

use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from the reserve endpoint.
pub enum ReserveResponse {
    Created(Json<Booking>),
}

impl IntoResponse for ReserveResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// `POST /api/bookings/check`
///
/// Never persists; an unavailable slot is a `200` with `accepted: false`.
pub async fn check<O, T, B, S>(
    State(state): State<AppState<O, T, B, S>>,
    Json(req): Json<BookingRequest>,
) -> Result<Json<BookingDecision>, ApiError>
where
    O: OwnerDirectory + Send + Sync + 'static,
    T: TurfRepository + Send + Sync + 'static,
    B: BookingRepository + Send + Sync + 'static,
    S: BlockedSlotRepository + Send + Sync + 'static,
{
    let decision = state.bookings.decide(&req).await?;
    Ok(Json(decision))
}

/// `POST /api/bookings`
pub async fn reserve<O, T, B, S>(
    State(state): State<AppState<O, T, B, S>>,
    Json(req): Json<BookingRequest>,
) -> Result<ReserveResponse, ApiError>
where
    O: OwnerDirectory + Send + Sync + 'static,
    T: TurfRepository + Send + Sync + 'static,
    B: BookingRepository + Send + Sync + 'static,
    S: BlockedSlotRepository + Send + Sync + 'static,
{
    let booking = state.bookings.reserve(&req).await?;
    Ok(ReserveResponse::Created(Json(booking)))
}
