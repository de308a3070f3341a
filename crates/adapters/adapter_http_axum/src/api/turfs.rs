//! JSON REST handlers for the turf catalog.

use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use turfbook_app::ports::{BlockedSlotRepository, BookingRepository, OwnerDirectory, TurfRepository};
use turfbook_domain::error::ValidationError;
use turfbook_domain::id::{OwnerId, TurfId};
use turfbook_domain::turf::{
    CreateTurfRequest, SportType, TurfFilter, TurfOrder, TurfView, UpdateTurfRequest,
};

use crate::error::ApiError;
use crate::state::AppState;

/// Catalog query string; every parameter is optional and they combine.
#[derive(Debug, Default, Deserialize)]
pub struct TurfQuery {
    pub owner_id: Option<String>,
    pub sport_type: Option<String>,
    pub location: Option<String>,
    pub name: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    #[serde(default)]
    pub order: TurfOrder,
}

impl TurfQuery {
    fn into_filter(self) -> Result<TurfFilter, ValidationError> {
        Ok(TurfFilter {
            owner_id: self.owner_id.as_deref().map(OwnerId::parse).transpose()?,
            sport_type: self
                .sport_type
                .as_deref()
                .map(SportType::from_str)
                .transpose()?,
            name_contains: self.name.filter(|name| !name.trim().is_empty()),
            location_contains: self.location.filter(|loc| !loc.trim().is_empty()),
            min_price: self.min_price.as_deref().map(parse_price).transpose()?,
            max_price: self.max_price.as_deref().map(parse_price).transpose()?,
            order: self.order,
            ..TurfFilter::default()
        })
    }
}

fn parse_price(raw: &str) -> Result<Decimal, ValidationError> {
    Decimal::from_str(raw.trim()).map_err(|_| ValidationError::InvalidPrice(raw.to_owned()))
}

/// Query string of `GET /api/turfs/name-exists`.
#[derive(Debug, Deserialize)]
pub struct NameExistsQuery {
    pub owner_id: String,
    pub name: String,
}

/// Body of `GET /api/turfs/count`.
#[derive(Debug, Serialize)]
pub struct CountBody {
    pub count: u64,
}

/// Body of `GET /api/turfs/name-exists`.
#[derive(Debug, Serialize)]
pub struct NameExistsBody {
    pub exists: bool,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<TurfView>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get and update endpoints.
pub enum GetResponse {
    Ok(Json<TurfView>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<TurfView>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the delete endpoint.
pub enum DeleteResponse {
    NoContent,
}

impl IntoResponse for DeleteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// `GET /api/turfs`
pub async fn list<O, T, B, S>(
    State(state): State<AppState<O, T, B, S>>,
    Query(query): Query<TurfQuery>,
) -> Result<ListResponse, ApiError>
where
    O: OwnerDirectory + Send + Sync + 'static,
    T: TurfRepository + Send + Sync + 'static,
    B: BookingRepository + Send + Sync + 'static,
    S: BlockedSlotRepository + Send + Sync + 'static,
{
    let filter = query.into_filter()?;
    let turfs = state.catalog.search(&filter).await?;
    Ok(ListResponse::Ok(Json(turfs)))
}

/// `GET /api/turfs/{id}`
pub async fn get<O, T, B, S>(
    State(state): State<AppState<O, T, B, S>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    O: OwnerDirectory + Send + Sync + 'static,
    T: TurfRepository + Send + Sync + 'static,
    B: BookingRepository + Send + Sync + 'static,
    S: BlockedSlotRepository + Send + Sync + 'static,
{
    let turf_id = TurfId::parse(&id)?;
    let turf = state.catalog.get_turf(turf_id).await?;
    Ok(GetResponse::Ok(Json(turf)))
}

/// `POST /api/turfs`
pub async fn create<O, T, B, S>(
    State(state): State<AppState<O, T, B, S>>,
    Json(req): Json<CreateTurfRequest>,
) -> Result<CreateResponse, ApiError>
where
    O: OwnerDirectory + Send + Sync + 'static,
    T: TurfRepository + Send + Sync + 'static,
    B: BookingRepository + Send + Sync + 'static,
    S: BlockedSlotRepository + Send + Sync + 'static,
{
    let created = state.catalog.create_turf(req).await?;
    Ok(CreateResponse::Created(Json(created)))
}

/// `PATCH /api/turfs/{id}`
pub async fn update<O, T, B, S>(
    State(state): State<AppState<O, T, B, S>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateTurfRequest>,
) -> Result<GetResponse, ApiError>
where
    O: OwnerDirectory + Send + Sync + 'static,
    T: TurfRepository + Send + Sync + 'static,
    B: BookingRepository + Send + Sync + 'static,
    S: BlockedSlotRepository + Send + Sync + 'static,
{
    let turf_id = TurfId::parse(&id)?;
    let updated = state.catalog.update_turf(turf_id, req).await?;
    Ok(GetResponse::Ok(Json(updated)))
}

/// `DELETE /api/turfs/{id}`
pub async fn delete<O, T, B, S>(
    State(state): State<AppState<O, T, B, S>>,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError>
where
    O: OwnerDirectory + Send + Sync + 'static,
    T: TurfRepository + Send + Sync + 'static,
    B: BookingRepository + Send + Sync + 'static,
    S: BlockedSlotRepository + Send + Sync + 'static,
{
    let turf_id = TurfId::parse(&id)?;
    state.catalog.delete_turf(turf_id).await?;
    Ok(DeleteResponse::NoContent)
}

/// `GET /api/turfs/count`
///
/// Counts every turf, or only those of `owner_id` or `sport_type` when given.
pub async fn count<O, T, B, S>(
    State(state): State<AppState<O, T, B, S>>,
    Query(query): Query<TurfQuery>,
) -> Result<Json<CountBody>, ApiError>
where
    O: OwnerDirectory + Send + Sync + 'static,
    T: TurfRepository + Send + Sync + 'static,
    B: BookingRepository + Send + Sync + 'static,
    S: BlockedSlotRepository + Send + Sync + 'static,
{
    let filter = query.into_filter()?;
    let count = match (filter.owner_id, filter.sport_type) {
        (Some(owner_id), _) => state.catalog.count_by_owner(owner_id).await?,
        (None, Some(sport_type)) => state.catalog.count_by_sport_type(sport_type).await?,
        (None, None) => state.catalog.count_turfs().await?,
    };
    Ok(Json(CountBody { count }))
}

/// `GET /api/turfs/name-exists`
pub async fn name_exists<O, T, B, S>(
    State(state): State<AppState<O, T, B, S>>,
    Query(query): Query<NameExistsQuery>,
) -> Result<Json<NameExistsBody>, ApiError>
where
    O: OwnerDirectory + Send + Sync + 'static,
    T: TurfRepository + Send + Sync + 'static,
    B: BookingRepository + Send + Sync + 'static,
    S: BlockedSlotRepository + Send + Sync + 'static,
{
    let owner_id = OwnerId::parse(&query.owner_id)?;
    let exists = state
        .catalog
        .name_exists_for_owner(&query.name, owner_id)
        .await?;
    Ok(Json(NameExistsBody { exists }))
}
