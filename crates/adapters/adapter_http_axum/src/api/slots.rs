//! JSON REST handlers for slot availability and blackouts.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use turfbook_app::ports::{BlockedSlotRepository, BookingRepository, OwnerDirectory, TurfRepository};
use turfbook_domain::availability::AvailableSlotsView;
use turfbook_domain::blocked_slot::{BlockSlotRequest, BlockedSlot};
use turfbook_domain::id::TurfId;
use turfbook_domain::turf::TurfView;

use super::parse_day;
use crate::error::ApiError;
use crate::state::AppState;

/// `?date=YYYY-MM-DD`
#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub date: String,
}

/// Possible responses from the blackout endpoint.
pub enum BlockResponse {
    Created(Json<BlockedSlot>),
}

impl IntoResponse for BlockResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// `GET /api/turfs/{id}/slots?date=YYYY-MM-DD`
pub async fn list<O, T, B, S>(
    State(state): State<AppState<O, T, B, S>>,
    Path(id): Path<String>,
    Query(query): Query<DateQuery>,
) -> Result<Json<AvailableSlotsView>, ApiError>
where
    O: OwnerDirectory + Send + Sync + 'static,
    T: TurfRepository + Send + Sync + 'static,
    B: BookingRepository + Send + Sync + 'static,
    S: BlockedSlotRepository + Send + Sync + 'static,
{
    let turf_id = TurfId::parse(&id)?;
    let date = parse_day(&query.date)?;
    let view = state.availability.list_available_slots(turf_id, date).await?;
    Ok(Json(view))
}

/// `POST /api/turfs/{id}/blocked-slots`
pub async fn block<O, T, B, S>(
    State(state): State<AppState<O, T, B, S>>,
    Path(id): Path<String>,
    Json(req): Json<BlockSlotRequest>,
) -> Result<BlockResponse, ApiError>
where
    O: OwnerDirectory + Send + Sync + 'static,
    T: TurfRepository + Send + Sync + 'static,
    B: BookingRepository + Send + Sync + 'static,
    S: BlockedSlotRepository + Send + Sync + 'static,
{
    let turf_id = TurfId::parse(&id)?;
    let blocked = state.availability.block_slot(turf_id, &req).await?;
    Ok(BlockResponse::Created(Json(blocked)))
}

/// `GET /api/turfs/available?date=YYYY-MM-DD`
pub async fn available_turfs<O, T, B, S>(
    State(state): State<AppState<O, T, B, S>>,
    Query(query): Query<DateQuery>,
) -> Result<Json<Vec<TurfView>>, ApiError>
where
    O: OwnerDirectory + Send + Sync + 'static,
    T: TurfRepository + Send + Sync + 'static,
    B: BookingRepository + Send + Sync + 'static,
    S: BlockedSlotRepository + Send + Sync + 'static,
{
    let date = parse_day(&query.date)?;
    let turfs = state.availability.turfs_available_on(date).await?;
    Ok(Json(turfs))
}
